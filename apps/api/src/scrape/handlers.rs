//! Axum route handler for the scrape API.

use axum::{extract::State, Json};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::applications::repository::{application_from_job_info, insert_application};
use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::scrape::models::MergedPosting;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScrapeJobRequest {
    #[serde(default)]
    pub url: String,
    /// Persist the merged posting as an application in the same request.
    #[serde(default)]
    pub save: bool,
    /// Optional note forwarded to the assistant.
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeJobResponse {
    #[serde(flatten)]
    pub posting: MergedPosting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<ApplicationRow>,
}

/// POST /api/scrape-job
///
/// Scrapes a posting URL and returns `{jobInfo, aiEnhanced}`. With `save: true`
/// the merged record is also appended to the applications table.
pub async fn handle_scrape_job(
    State(state): State<AppState>,
    Json(request): Json<ScrapeJobRequest>,
) -> Result<Json<ScrapeJobResponse>, AppError> {
    let url = validate_url(&request.url)?;

    let posting = state.pipeline.run(&url, request.user.as_deref()).await?;

    let application = if request.save {
        let new_app = application_from_job_info(&url, &posting.job_info);
        Some(insert_application(&state.db, new_app).await?)
    } else {
        None
    };

    Ok(Json(ScrapeJobResponse {
        posting,
        application,
    }))
}

fn validate_url(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation("URL is required".to_string()));
    }
    let parsed =
        Url::parse(raw).map_err(|e| AppError::Validation(format!("Invalid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::Validation(
            "URL must use http or https".to_string(),
        ));
    }
    Ok(parsed.to_string())
}
