use crate::scrape::models::{FinalJobInfo, MergedPosting, RefinedPosting, ScrapedPosting};

/// Combines scraped and refined fields. Each field is resolved on its own:
/// a non-empty refined value wins, otherwise the scraped value is kept.
/// `ai_enhanced` only records whether a refinement was obtained.
pub fn merge(scraped: ScrapedPosting, refined: Option<RefinedPosting>) -> MergedPosting {
    let ai_enhanced = refined.is_some();
    let refined = refined.unwrap_or_default();

    let job_info = FinalJobInfo {
        title: prefer(refined.title, scraped.title),
        company: prefer(refined.company, scraped.company),
        location: prefer(refined.location, scraped.location),
        salary: prefer(non_empty(refined.salary).or(refined.pay), scraped.salary),
        requirements: prefer(refined.requirements, scraped.requirements),
        description: non_empty(refined.description),
        benefits: non_empty(refined.benefits),
        experience_level: non_empty(refined.experience_level),
        employment_type: non_empty(refined.employment_type),
        skills: refined.skills.filter(|s| !s.is_empty()),
        responsibilities: refined.responsibilities.filter(|r| !r.is_empty()),
    };

    MergedPosting {
        job_info,
        ai_enhanced,
    }
}

fn prefer(refined: Option<String>, scraped: String) -> String {
    non_empty(refined).unwrap_or(scraped)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::models::SALARY_NOT_SPECIFIED;

    fn scraped() -> ScrapedPosting {
        ScrapedPosting {
            title: "Sr. Engineer (Remote)".to_string(),
            company: "Acme Inc".to_string(),
            location: "Remote".to_string(),
            salary: SALARY_NOT_SPECIFIED.to_string(),
            requirements: "Rust, Tokio".to_string(),
        }
    }

    #[test]
    fn test_refined_salary_overrides_sentinel() {
        let refined = RefinedPosting {
            salary: Some("$100k–120k".to_string()),
            ..Default::default()
        };
        let merged = merge(scraped(), Some(refined));
        assert_eq!(merged.job_info.salary, "$100k–120k");
        assert_eq!(merged.job_info.title, "Sr. Engineer (Remote)");
        assert!(merged.ai_enhanced);
    }

    #[test]
    fn test_salary_key_wins_over_pay_key() {
        let both = RefinedPosting {
            salary: Some("$100k".to_string()),
            pay: Some("$90k".to_string()),
            ..Default::default()
        };
        assert_eq!(merge(scraped(), Some(both)).job_info.salary, "$100k");

        let pay_only = RefinedPosting {
            salary: Some(" ".to_string()),
            pay: Some("$90k".to_string()),
            ..Default::default()
        };
        assert_eq!(merge(scraped(), Some(pay_only)).job_info.salary, "$90k");
    }

    #[test]
    fn test_absent_refined_salary_keeps_sentinel() {
        let refined = RefinedPosting {
            title: Some("Senior Engineer".to_string()),
            ..Default::default()
        };
        let merged = merge(scraped(), Some(refined));
        assert_eq!(merged.job_info.salary, SALARY_NOT_SPECIFIED);
        assert_eq!(merged.job_info.title, "Senior Engineer");
    }

    #[test]
    fn test_empty_refined_string_falls_back() {
        let refined = RefinedPosting {
            company: Some(String::new()),
            location: Some("   ".to_string()),
            ..Default::default()
        };
        let merged = merge(scraped(), Some(refined));
        assert_eq!(merged.job_info.company, "Acme Inc");
        assert_eq!(merged.job_info.location, "Remote");
    }

    #[test]
    fn test_ai_enhanced_even_when_nothing_overridden() {
        let merged = merge(scraped(), Some(RefinedPosting::default()));
        assert!(merged.ai_enhanced);
        assert_eq!(merged.job_info, merge(scraped(), None).job_info);
    }

    #[test]
    fn test_no_refinement_copies_scraped_fields() {
        let merged = merge(scraped(), None);
        assert!(!merged.ai_enhanced);
        assert_eq!(merged.job_info.title, "Sr. Engineer (Remote)");
        assert_eq!(merged.job_info.requirements, "Rust, Tokio");
        assert!(merged.job_info.skills.is_none());
        assert!(merged.job_info.description.is_none());
    }

    #[test]
    fn test_refined_extras_carried_through() {
        let refined = RefinedPosting {
            benefits: Some("401k".to_string()),
            employment_type: Some("Full-time".to_string()),
            skills: Some(vec!["Rust".to_string(), "SQL".to_string()]),
            responsibilities: Some(vec!["Own the ingest service".to_string()]),
            ..Default::default()
        };
        let merged = merge(scraped(), Some(refined));
        assert_eq!(merged.job_info.benefits.as_deref(), Some("401k"));
        assert_eq!(merged.job_info.employment_type.as_deref(), Some("Full-time"));
        assert_eq!(merged.job_info.skills.as_ref().map(Vec::len), Some(2));
        assert_eq!(merged.job_info.responsibilities.as_ref().map(Vec::len), Some(1));
    }
}
