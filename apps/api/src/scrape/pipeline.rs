//! Scrape pipeline: URL to merged job info.
//!
//! Flow: fetch → extract → reject incomplete → refine (best effort) → merge.
//! Steps run strictly in sequence; only fetch and extraction can fail.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::scrape::extractor::JobPageExtractor;
use crate::scrape::fetcher::{FetchError, PageFetcher};
use crate::scrape::merger::merge;
use crate::scrape::models::MergedPosting;
use crate::scrape::refiner::{RefineInput, Refiner};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Could not extract job information from this page")]
    ExtractionEmpty,
}

/// Collaborators are built once at startup and shared across requests.
#[derive(Clone)]
pub struct ScrapePipeline {
    fetcher: Arc<dyn PageFetcher>,
    refiner: Arc<dyn Refiner>,
    extractor: JobPageExtractor,
}

impl ScrapePipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, refiner: Arc<dyn Refiner>) -> Self {
        Self {
            fetcher,
            refiner,
            extractor: JobPageExtractor::linkedin(),
        }
    }

    pub async fn run(&self, url: &str, user: Option<&str>) -> Result<MergedPosting, ScrapeError> {
        info!("Scraping URL: {url}");
        let html = self.fetcher.fetch(url).await?;

        let scraped = self.extractor.extract_html(&html);
        if !scraped.is_complete() {
            warn!(
                "Extraction incomplete for {url}: title={:?} company={:?}",
                scraped.title, scraped.company
            );
            return Err(ScrapeError::ExtractionEmpty);
        }
        info!(
            "Scraped data: title={:?} company={:?} location={:?} salary={:?}",
            scraped.title, scraped.company, scraped.location, scraped.salary
        );

        let refined = self
            .refiner
            .refine(RefineInput::from_scraped(&scraped, user))
            .await;
        if refined.is_none() {
            info!("Using scraped data without AI refinement");
        }

        Ok(merge(scraped, refined))
    }
}
