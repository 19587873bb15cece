pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::resumes::handlers as resumes;
use crate::resumes::upload::MAX_UPLOAD_BYTES;
use crate::scrape::handlers as scrape;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scrape API
        .route("/api/scrape-job", post(scrape::handle_scrape_job))
        // Applications API
        .route(
            "/api/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        // Resume API
        .route("/api/resumes", get(resumes::handle_list_resumes))
        .route(
            "/api/resumes/upload",
            post(resumes::handle_upload_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/resumes/:id/download",
            get(resumes::handle_download_resume),
        )
        .with_state(state)
}
