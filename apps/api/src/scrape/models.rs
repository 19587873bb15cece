//! Posting shapes that flow through the scrape pipeline. All of them live for a
//! single request; only the downstream application row is persisted.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Salary sentinel used when no salary selector matches.
pub const SALARY_NOT_SPECIFIED: &str = "Not specified";

/// Raw fields pulled from the job page markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapedPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub requirements: String,
}

impl ScrapedPosting {
    /// Title and company are the minimum needed to track an application.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.company.is_empty()
    }
}

/// Structured reply from the job-info assistant. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefinedPosting {
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub salary: Option<String>,
    /// Some replies echo the output key instead of `salary`; both may appear.
    #[serde(deserialize_with = "lenient_text")]
    pub pay: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub requirements: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub benefits: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub experience_level: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub employment_type: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub skills: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub responsibilities: Option<Vec<String>>,
}

/// Merged record handed to the caller and to the applications table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinalJobInfo {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "pay")]
    pub salary: String,
    pub requirements: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<Vec<String>>,
}

/// Pipeline output: the final record plus whether refinement was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedPosting {
    pub job_info: FinalJobInfo,
    pub ai_enhanced: bool,
}

/// Accepts a string, number, bool or array of those; arrays are joined by newlines.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| value_to_text(&v)))
}

/// Accepts an array of scalars or a single comma-separated string.
fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(scalar_to_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    Ok(Some(items).filter(|v: &Vec<String>| !v.is_empty()))
}

fn value_to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Array(arr) => {
            let lines: Vec<String> = arr
                .iter()
                .filter_map(scalar_to_text)
                .filter(|s| !s.is_empty())
                .collect();
            Some(lines.join("\n"))
        }
        other => scalar_to_text(other),
    };
    text.filter(|s| !s.is_empty())
}

fn scalar_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refined_posting_partial_object() {
        let refined: RefinedPosting =
            serde_json::from_str(r#"{"title": "A", "company": "B"}"#).unwrap();
        assert_eq!(refined.title.as_deref(), Some("A"));
        assert_eq!(refined.company.as_deref(), Some("B"));
        assert!(refined.salary.is_none());
        assert!(refined.skills.is_none());
    }

    #[test]
    fn test_refined_posting_requirements_as_list_are_joined() {
        let refined: RefinedPosting = serde_json::from_str(
            r#"{"requirements": ["5+ years Rust", "Distributed systems"], "salary": null}"#,
        )
        .unwrap();
        assert_eq!(
            refined.requirements.as_deref(),
            Some("5+ years Rust\nDistributed systems")
        );
        assert!(refined.salary.is_none());
    }

    #[test]
    fn test_refined_posting_numeric_pay() {
        let refined: RefinedPosting = serde_json::from_str(r#"{"pay": 120000}"#).unwrap();
        assert!(refined.salary.is_none());
        assert_eq!(refined.pay.as_deref(), Some("120000"));
    }

    #[test]
    fn test_refined_posting_accepts_salary_and_pay_together() {
        let refined: RefinedPosting =
            serde_json::from_str(r#"{"title": "A", "salary": "$100k", "pay": "$90k"}"#).unwrap();
        assert_eq!(refined.salary.as_deref(), Some("$100k"));
        assert_eq!(refined.pay.as_deref(), Some("$90k"));
    }

    #[test]
    fn test_refined_posting_skills_from_comma_string() {
        let refined: RefinedPosting =
            serde_json::from_str(r#"{"skills": "Rust, Tokio, , SQL"}"#).unwrap();
        assert_eq!(
            refined.skills,
            Some(vec!["Rust".to_string(), "Tokio".to_string(), "SQL".to_string()])
        );
    }

    #[test]
    fn test_refined_posting_empty_values_are_absent() {
        let refined: RefinedPosting =
            serde_json::from_str(r#"{"benefits": "  ", "responsibilities": []}"#).unwrap();
        assert!(refined.benefits.is_none());
        assert!(refined.responsibilities.is_none());
    }

    #[test]
    fn test_final_job_info_serializes_salary_as_pay() {
        let info = FinalJobInfo {
            title: "Senior Engineer".to_string(),
            company: "Acme".to_string(),
            salary: SALARY_NOT_SPECIFIED.to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["pay"], "Not specified");
        assert!(json.get("salary").is_none());
        assert!(json.get("skills").is_none());
    }

    #[test]
    fn test_merged_posting_uses_camel_case_keys() {
        let merged = MergedPosting {
            job_info: FinalJobInfo::default(),
            ai_enhanced: true,
        };
        let json = serde_json::to_value(&merged).unwrap();
        assert_eq!(json["aiEnhanced"], true);
        assert!(json.get("jobInfo").is_some());
    }

    #[test]
    fn test_scraped_posting_completeness() {
        let mut posting = ScrapedPosting {
            title: "Engineer".to_string(),
            ..Default::default()
        };
        assert!(!posting.is_complete());
        posting.company = "Acme".to_string();
        assert!(posting.is_complete());
    }
}
