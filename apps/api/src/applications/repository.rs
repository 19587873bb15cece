use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, NewApplication, DEFAULT_STATUS};
use crate::scrape::models::FinalJobInfo;

/// Width of the `VARCHAR` columns (title, company, location, salary).
pub const MAX_SHORT_FIELD_CHARS: usize = 255;

/// Builds the insert record for a scraped posting. Short columns are clamped
/// so a verbose page or reply cannot fail the insert.
pub fn application_from_job_info(url: &str, info: &FinalJobInfo) -> NewApplication {
    NewApplication {
        title: clamp_chars(&info.title),
        company: clamp_chars(&info.company),
        location: Some(clamp_chars(&info.location)),
        salary: Some(clamp_chars(&info.salary)),
        requirements: Some(info.requirements.clone()),
        url: url.to_string(),
        status: Some(DEFAULT_STATUS.to_string()),
        notes: info
            .benefits
            .as_ref()
            .map(|benefits| format!("Benefits: {benefits}")),
    }
}

/// Trims inputs, rejects missing required fields and fills the default status.
pub fn normalize_application(mut app: NewApplication) -> Result<NewApplication, AppError> {
    app.title = app.title.trim().to_string();
    app.company = app.company.trim().to_string();
    app.url = app.url.trim().to_string();

    for (field, value) in [("title", &app.title), ("company", &app.company), ("url", &app.url)] {
        if value.is_empty() {
            return Err(AppError::Validation(format!("{field} cannot be empty")));
        }
    }
    let short_fields = [
        ("title", Some(&app.title)),
        ("company", Some(&app.company)),
        ("location", app.location.as_ref()),
        ("salary", app.salary.as_ref()),
    ];
    for (field, value) in short_fields {
        if value.is_some_and(|v| v.chars().count() > MAX_SHORT_FIELD_CHARS) {
            return Err(AppError::Validation(format!(
                "{field} must be at most {MAX_SHORT_FIELD_CHARS} characters"
            )));
        }
    }

    app.status = Some(
        app.status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
    );
    Ok(app)
}

fn clamp_chars(value: &str) -> String {
    value.chars().take(MAX_SHORT_FIELD_CHARS).collect()
}

/// Appends an application row and returns it with its assigned id.
pub async fn insert_application(
    pool: &PgPool,
    app: NewApplication,
) -> Result<ApplicationRow, AppError> {
    let app = normalize_application(app)?;

    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications
            (title, company, location, salary, requirements, url, status, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&app.title)
    .bind(&app.company)
    .bind(&app.location)
    .bind(&app.salary)
    .bind(&app.requirements)
    .bind(&app.url)
    .bind(&app.status)
    .bind(&app.notes)
    .fetch_one(pool)
    .await?;

    info!("Saved application {} ({} at {})", row.id, row.title, row.company);
    Ok(row)
}

/// All applications, newest first.
pub async fn list_applications(pool: &PgPool) -> Result<Vec<ApplicationRow>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_app() -> NewApplication {
        NewApplication {
            title: " Senior Engineer ".to_string(),
            company: "Acme".to_string(),
            url: "https://www.linkedin.com/jobs/view/1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_fills_default_status_and_trims() {
        let app = normalize_application(new_app()).unwrap();
        assert_eq!(app.title, "Senior Engineer");
        assert_eq!(app.status.as_deref(), Some("applied"));
    }

    #[test]
    fn test_normalize_keeps_explicit_status() {
        let app = normalize_application(NewApplication {
            status: Some("interviewing".to_string()),
            ..new_app()
        })
        .unwrap();
        assert_eq!(app.status.as_deref(), Some("interviewing"));
    }

    #[test]
    fn test_normalize_rejects_missing_company() {
        let err = normalize_application(NewApplication {
            company: "  ".to_string(),
            ..new_app()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "company cannot be empty"));
    }

    #[test]
    fn test_application_from_job_info_with_benefits() {
        let info = FinalJobInfo {
            title: "Senior Engineer".to_string(),
            company: "Acme".to_string(),
            salary: "Not specified".to_string(),
            benefits: Some("Equity, 401k".to_string()),
            ..Default::default()
        };
        let app = application_from_job_info("https://example.com/job/7", &info);
        assert_eq!(app.salary.as_deref(), Some("Not specified"));
        assert_eq!(app.notes.as_deref(), Some("Benefits: Equity, 401k"));
        assert_eq!(app.status.as_deref(), Some("applied"));
        assert_eq!(app.url, "https://example.com/job/7");
    }

    #[test]
    fn test_normalize_rejects_overlong_location() {
        let err = normalize_application(NewApplication {
            location: Some("x".repeat(MAX_SHORT_FIELD_CHARS + 1)),
            ..new_app()
        })
        .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(msg) if msg == "location must be at most 255 characters")
        );
    }

    #[test]
    fn test_application_from_job_info_clamps_short_columns() {
        let info = FinalJobInfo {
            title: "T".repeat(300),
            company: "Acme".to_string(),
            location: "ü".repeat(400),
            salary: "$".repeat(256),
            requirements: "r".repeat(6000),
            ..Default::default()
        };
        let app = application_from_job_info("https://example.com/job/8", &info);
        assert_eq!(app.title.chars().count(), MAX_SHORT_FIELD_CHARS);
        assert_eq!(app.location.as_ref().map(|l| l.chars().count()), Some(MAX_SHORT_FIELD_CHARS));
        assert_eq!(app.salary.as_ref().map(|s| s.chars().count()), Some(MAX_SHORT_FIELD_CHARS));
        assert_eq!(app.requirements.as_ref().map(String::len), Some(6000));
        assert!(normalize_application(app).is_ok());
    }

    #[test]
    fn test_application_from_job_info_without_benefits_has_no_notes() {
        let info = FinalJobInfo {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            ..Default::default()
        };
        assert!(application_from_job_info("https://example.com", &info).notes.is_none());
    }
}
