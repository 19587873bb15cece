/// Assistant Client: the single point of entry for OpenAI Assistants API calls.
///
/// No other module may call the assistant service directly. The refiner drives
/// the thread → message → run → poll → read sequence through this client.
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const ASSISTANTS_BETA: &str = "assistants=v2";
/// Delay between run status checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid API key header")]
    InvalidApiKey,

    #[error("thread has no messages")]
    NoMessages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Cancelling,
    RequiresAction,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct Thread {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    pub last_error: Option<RunError>,
}

#[derive(Debug, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: String,
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct TextContent {
    pub value: String,
}

impl Message {
    /// Text of the first content block, if that block is text.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first()? {
            MessageContent::Text { text } => Some(text.value.as_str()),
            MessageContent::Other => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRun<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Thin wrapper over the Assistants REST endpoints. Single attempt per call.
#[derive(Clone)]
pub struct AssistantClient {
    client: Client,
    base_url: String,
}

impl AssistantClient {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, AssistantError> {
        Self::with_base_url(api_key, OPENAI_API_URL, timeout)
    }

    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| AssistantError::InvalidApiKey)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("openai-beta", HeaderValue::from_static(ASSISTANTS_BETA));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn create_thread(&self) -> Result<Thread, AssistantError> {
        let response = self
            .client
            .post(format!("{}/threads", self.base_url))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        parse_response(response).await
    }

    pub async fn add_user_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<Message, AssistantError> {
        let response = self
            .client
            .post(format!("{}/threads/{thread_id}/messages", self.base_url))
            .json(&CreateMessage {
                role: "user",
                content,
            })
            .send()
            .await?;
        parse_response(response).await
    }

    pub async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<Run, AssistantError> {
        let response = self
            .client
            .post(format!("{}/threads/{thread_id}/runs", self.base_url))
            .json(&CreateRun { assistant_id })
            .send()
            .await?;
        parse_response(response).await
    }

    pub async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        let response = self
            .client
            .get(format!("{}/threads/{thread_id}/runs/{run_id}", self.base_url))
            .send()
            .await?;
        parse_response(response).await
    }

    /// Starts a run and polls until it reaches a terminal status.
    /// No deadline of its own; callers bound it with a timeout.
    pub async fn create_and_poll_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<Run, AssistantError> {
        let mut run = self.create_run(thread_id, assistant_id).await?;
        while !run.status.is_terminal() {
            tokio::time::sleep(POLL_INTERVAL).await;
            run = self.get_run(thread_id, &run.id).await?;
            debug!("Run {} status: {:?}", run.id, run.status);
        }
        Ok(run)
    }

    /// Most recent message in the thread (the API lists newest first).
    pub async fn latest_message(&self, thread_id: &str) -> Result<Message, AssistantError> {
        let response = self
            .client
            .get(format!("{}/threads/{thread_id}/messages", self.base_url))
            .query(&[("order", "desc"), ("limit", "1")])
            .send()
            .await?;
        let list: MessageList = parse_response(response).await?;
        list.data.into_iter().next().ok_or(AssistantError::NoMessages)
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, AssistantError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(AssistantError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_terminal_states() {
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::InProgress.is_terminal());
        assert!(!RunStatus::Cancelling.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::RequiresAction.is_terminal());
        assert!(RunStatus::Expired.is_terminal());
    }

    #[test]
    fn test_run_deserializes_unknown_status() {
        let run: Run =
            serde_json::from_str(r#"{"id": "run_1", "status": "paused", "last_error": null}"#)
                .unwrap();
        assert_eq!(run.status, RunStatus::Unknown);
        assert!(run.status.is_terminal());
    }

    #[test]
    fn test_failed_run_carries_last_error() {
        let run: Run = serde_json::from_str(
            r#"{"id": "run_2", "status": "failed",
                "last_error": {"code": "rate_limit_exceeded", "message": "slow down"}}"#,
        )
        .unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.last_error.unwrap().code, "rate_limit_exceeded");
    }

    #[test]
    fn test_message_first_text() {
        let msg: Message = serde_json::from_str(
            r#"{"id": "msg_1", "role": "assistant",
                "content": [{"type": "text", "text": {"value": "{\"title\": \"A\"}", "annotations": []}}]}"#,
        )
        .unwrap();
        assert_eq!(msg.first_text(), Some("{\"title\": \"A\"}"));
    }

    #[test]
    fn test_message_non_text_content() {
        let msg: Message = serde_json::from_str(
            r#"{"id": "msg_2", "role": "assistant",
                "content": [{"type": "image_file", "image_file": {"file_id": "file_1"}}]}"#,
        )
        .unwrap();
        assert_eq!(msg.first_text(), None);
    }

    #[test]
    fn test_client_rejects_api_key_with_newline() {
        let result = AssistantClient::new("sk-bad\nkey", Duration::from_secs(5));
        assert!(matches!(result, Err(AssistantError::InvalidApiKey)));
    }
}
