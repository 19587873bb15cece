// Job posting scrape pipeline.
// Fetcher → Extractor → Refiner → Merger, orchestrated by `pipeline`.
// All assistant calls go through assistant_client.

pub mod extractor;
pub mod fetcher;
pub mod handlers;
pub mod merger;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod refiner;
pub mod selectors;
