//! Extractor: pulls posting fields out of job page HTML with ordered selector cascades.
//!
//! For every field the candidates are tried strictly in order. Within a selector,
//! matches are visited in document order and the first element with non-empty
//! trimmed text wins. There is no scoring and no merging across selectors.

use scraper::{Html, Selector};
use tracing::warn;

use crate::scrape::models::{ScrapedPosting, SALARY_NOT_SPECIFIED};
use crate::scrape::selectors;

/// Requirements longer than this (in characters) are cut.
pub const MAX_REQUIREMENTS_CHARS: usize = 5000;
pub const TRUNCATION_MARKER: &str = "...";

/// Ordered lookup strategies for one field.
#[derive(Debug, Clone)]
pub struct SelectorCascade {
    candidates: Vec<Selector>,
}

impl SelectorCascade {
    /// Compiles the candidate list. Selectors that fail to parse are skipped.
    pub fn compile(field: &str, candidates: &[&str]) -> Self {
        let candidates = candidates
            .iter()
            .filter_map(|raw| match Selector::parse(raw) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    warn!("Skipping invalid {field} selector '{raw}': {e}");
                    None
                }
            })
            .collect();
        Self { candidates }
    }

    #[cfg(test)]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Trimmed text of the first non-empty match, or `None`.
    pub fn first_text(&self, document: &Html) -> Option<String> {
        self.candidates.iter().find_map(|selector| {
            document.select(selector).find_map(|element| {
                let text: String = element.text().collect();
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
        })
    }
}

/// Field cascades for one job page family.
#[derive(Debug, Clone)]
pub struct JobPageExtractor {
    title: SelectorCascade,
    company: SelectorCascade,
    location: SelectorCascade,
    salary: SelectorCascade,
    requirements: SelectorCascade,
}

impl Default for JobPageExtractor {
    fn default() -> Self {
        Self::linkedin()
    }
}

impl JobPageExtractor {
    /// Cascades for professional-network job listing pages.
    pub fn linkedin() -> Self {
        Self {
            title: SelectorCascade::compile("title", selectors::TITLE),
            company: SelectorCascade::compile("company", selectors::COMPANY),
            location: SelectorCascade::compile("location", selectors::LOCATION),
            salary: SelectorCascade::compile("salary", selectors::SALARY),
            requirements: SelectorCascade::compile("requirements", selectors::REQUIREMENTS),
        }
    }

    /// Never fails; absent fields come back empty (salary as "Not specified").
    pub fn extract(&self, document: &Html) -> ScrapedPosting {
        let requirements = self.requirements.first_text(document).unwrap_or_default();

        ScrapedPosting {
            title: self.title.first_text(document).unwrap_or_default(),
            company: self.company.first_text(document).unwrap_or_default(),
            location: self.location.first_text(document).unwrap_or_default(),
            salary: self
                .salary
                .first_text(document)
                .unwrap_or_else(|| SALARY_NOT_SPECIFIED.to_string()),
            requirements: truncate_requirements(requirements),
        }
    }

    /// Parses and extracts in one synchronous step so the document never
    /// outlives the call (`Html` is not `Send`).
    pub fn extract_html(&self, html: &str) -> ScrapedPosting {
        let document = Html::parse_document(html);
        self.extract(&document)
    }
}

fn truncate_requirements(text: String) -> String {
    match text.char_indices().nth(MAX_REQUIREMENTS_CHARS) {
        Some((byte_idx, _)) => {
            let mut cut = text[..byte_idx].to_string();
            cut.push_str(TRUNCATION_MARKER);
            cut
        }
        None => text,
    }
}
