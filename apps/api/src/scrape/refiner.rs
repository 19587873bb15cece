//! Refiner: best-effort AI cleanup of scraped fields.
//!
//! Every failure mode (missing config, failed run, non-text reply, no JSON,
//! bad JSON, transport errors, timeout) is logged and collapses to `None`.
//! Callers treat `None` as the ordinary "not enhanced" branch.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::assistant_client::{AssistantClient, AssistantError, RunStatus};
use crate::config::Config;
use crate::scrape::models::{RefinedPosting, ScrapedPosting};
use crate::scrape::prompts::build_refine_message;

/// Inputs sent to the assistant.
#[derive(Debug, Clone, Copy)]
pub struct RefineInput<'a> {
    pub title: &'a str,
    pub company: &'a str,
    pub location: &'a str,
    pub requirements: &'a str,
    pub user: Option<&'a str>,
}

impl<'a> RefineInput<'a> {
    pub fn from_scraped(posting: &'a ScrapedPosting, user: Option<&'a str>) -> Self {
        Self {
            title: &posting.title,
            company: &posting.company,
            location: &posting.location,
            requirements: &posting.requirements,
            user,
        }
    }
}

#[async_trait]
pub trait Refiner: Send + Sync {
    async fn refine(&self, input: RefineInput<'_>) -> Option<RefinedPosting>;
}

/// Refiner backed by a configured OpenAI assistant.
#[derive(Clone)]
pub struct AssistantRefiner {
    client: Option<AssistantClient>,
    assistant_id: Option<String>,
    timeout: Duration,
}

impl AssistantRefiner {
    pub fn new(
        client: Option<AssistantClient>,
        assistant_id: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            assistant_id,
            timeout,
        }
    }

    /// Builds the refiner from config. A missing or unusable API key leaves it
    /// unconfigured instead of failing startup.
    pub fn from_config(config: &Config) -> Self {
        let client = config.openai_api_key.as_deref().and_then(|key| {
            AssistantClient::new(key, config.refine_timeout)
                .map_err(|e| warn!("Assistant client unavailable: {e}"))
                .ok()
        });
        Self::new(
            client,
            config.openai_assistant_id.clone(),
            config.refine_timeout,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some() && self.assistant_id.is_some()
    }

    async fn run_assistant(
        &self,
        client: &AssistantClient,
        assistant_id: &str,
        input: RefineInput<'_>,
    ) -> Result<Option<String>, AssistantError> {
        info!(
            "Starting job info refinement: title={:?} company={:?} requirements_len={}",
            input.title,
            input.company,
            input.requirements.len()
        );

        let thread = client.create_thread().await?;
        let content = build_refine_message(
            input.title,
            input.company,
            input.location,
            input.requirements,
            input.user,
        );
        let message = client.add_user_message(&thread.id, &content).await?;
        info!("Refinement thread {} message {}", thread.id, message.id);

        let run = client.create_and_poll_run(&thread.id, assistant_id).await?;
        if run.status != RunStatus::Completed {
            error!("Assistant run {} ended with status {:?}", run.id, run.status);
            if let Some(last_error) = &run.last_error {
                error!("Last error: {} ({})", last_error.message, last_error.code);
            }
            return Ok(None);
        }

        let reply = client.latest_message(&thread.id).await?;
        match reply.first_text() {
            Some(text) => Ok(Some(text.to_string())),
            None => {
                error!("Assistant reply {} ({}) is not text", reply.id, reply.role);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Refiner for AssistantRefiner {
    async fn refine(&self, input: RefineInput<'_>) -> Option<RefinedPosting> {
        let Some(assistant_id) = self.assistant_id.as_deref() else {
            error!("OPENAI_ASSISTANT_ID not configured; skipping refinement");
            return None;
        };
        let Some(client) = self.client.as_ref() else {
            error!("OPENAI_API_KEY not configured; skipping refinement");
            return None;
        };

        let outcome =
            tokio::time::timeout(self.timeout, self.run_assistant(client, assistant_id, input))
                .await;

        let text = match outcome {
            Ok(Ok(Some(text))) => text,
            Ok(Ok(None)) => return None,
            Ok(Err(e)) => {
                error!("Job info refinement failed: {e}");
                return None;
            }
            Err(_) => {
                warn!("Job info refinement timed out after {:?}", self.timeout);
                return None;
            }
        };

        let refined = parse_refined_reply(&text);
        if refined.is_some() {
            info!("Parsed refined job info");
        }
        refined
    }
}

/// Substring from the first `{` to the last `}` inclusive.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses a free-text assistant reply into a `RefinedPosting`.
pub fn parse_refined_reply(text: &str) -> Option<RefinedPosting> {
    let Some(json) = extract_json_object(text) else {
        error!("No JSON found in assistant reply: {text}");
        return None;
    };

    match serde_json::from_str::<RefinedPosting>(json) {
        Ok(refined) => Some(refined),
        Err(e) => {
            error!("Failed to parse assistant JSON: {e}; raw: {json}");
            None
        }
    }
}
