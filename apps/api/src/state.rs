use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::scrape::pipeline::ScrapePipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Fetcher and refiner are chosen at startup; tests swap in fakes.
    pub pipeline: Arc<ScrapePipeline>,
}
