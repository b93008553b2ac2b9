use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::{Client, header};
use log::{debug, error};

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::providers::CompletionProvider;

/// Header carrying the account identifier
const ACCOUNT_ID_HEADER: &str = "ChatGPT-Account-Id";

/// SSE event type carrying a chunk of output text
const TEXT_DELTA_EVENT: &str = "response.output_text.delta";

/// SSE event type carrying a service error
const ERROR_EVENT: &str = "error";

/// Codex client for the streaming responses API
pub struct CodexProvider {
    /// HTTP client for API requests
    client: Client,
    /// Bearer token
    access_token: String,
    /// API endpoint URL
    endpoint: String,
    /// Model name
    model: String,
    /// System instructions sent with every request
    instructions: String,
}

impl std::fmt::Debug for CodexProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodexProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Request body for the responses API
#[derive(Debug, Serialize)]
pub struct CodexRequest {
    /// The model to use
    model: String,

    /// System prompt to guide the model
    instructions: String,

    /// The conversation input
    input: Vec<CodexInputMessage>,

    /// The endpoint only accepts streamed requests
    stream: bool,

    /// Do not persist the conversation server-side
    store: bool,
}

/// Input message format
#[derive(Debug, Serialize)]
pub struct CodexInputMessage {
    /// Always "message"
    #[serde(rename = "type")]
    pub message_type: String,

    /// Role of the message sender
    pub role: String,

    /// Content blocks
    pub content: Vec<CodexInputContent>,
}

/// Individual content block in an input message
#[derive(Debug, Serialize)]
pub struct CodexInputContent {
    /// Always "input_text"
    #[serde(rename = "type")]
    pub content_type: String,

    /// The prompt text
    pub text: String,
}

/// One decoded `data:` line of the event stream
#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type", default)]
    event_type: String,

    #[serde(default)]
    delta: Option<String>,

    #[serde(default)]
    message: Option<String>,
}

impl CodexRequest {
    /// Create a streamed single-message request
    pub fn new(model: impl Into<String>, instructions: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            instructions: instructions.into(),
            input: vec![CodexInputMessage {
                message_type: "message".to_string(),
                role: "user".to_string(),
                content: vec![CodexInputContent {
                    content_type: "input_text".to_string(),
                    text: prompt.into(),
                }],
            }],
            stream: true,
            store: false,
        }
    }
}

impl CodexProvider {
    /// Create a new Codex client
    pub fn new(
        access_token: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        instructions: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            access_token: access_token.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            instructions: instructions.into(),
        }
    }

    /// Create a client from the provider section of the configuration
    pub fn from_config(config: &ProviderConfig, access_token: impl Into<String>, timeout: Duration) -> Self {
        Self::new(access_token, &config.endpoint, &config.model, &config.instructions, timeout)
    }

    /// Model this client requests
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for CodexProvider {
    fn name(&self) -> &str {
        "codex"
    }

    async fn send(&self, prompt: &str, account_context: Option<&str>) -> Result<String, ProviderError> {
        let body = CodexRequest::new(&self.model, &self.instructions, prompt);

        let mut request = self.client.post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "text/event-stream")
            .bearer_auth(&self.access_token)
            .json(&body);
        if let Some(account_id) = account_context {
            request = request.header(ACCOUNT_ID_HEADER, account_id);
        }

        let response = request.send()
            .await
            .map_err(|e| ProviderError::Transport(describe_transport_error(&e)))?;

        let status = response.status();
        let text = response.text()
            .await
            .map_err(|e| ProviderError::Transport(describe_transport_error(&e)))?;

        if !status.is_success() {
            let message = extract_detail(&text).unwrap_or(text);
            error!("Codex API error ({}): {}", status, message);
            return Err(ProviderError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        debug!("Received {} bytes from Codex API", text.len());
        parse_event_stream(&text)
    }
}

/// Collect the output text from a server-sent event stream body
///
/// Text deltas are concatenated until `[DONE]`. An `error` event aborts with
/// [`ProviderError::Api`]. Lines that are not `data:` lines, or whose payload is not JSON,
/// are skipped. When the stream carried no text the body is tried as a plain JSON error
/// (`{"detail": ...}`); otherwise the body is reported as malformed.
pub fn parse_event_stream(body: &str) -> Result<String, ProviderError> {
    let mut full_text = String::new();

    for line in body.lines() {
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim_start();
        if data == "[DONE]" {
            break;
        }

        let Ok(event) = serde_json::from_str::<StreamEvent>(data) else {
            continue;
        };

        match event.event_type.as_str() {
            TEXT_DELTA_EVENT => {
                if let Some(delta) = event.delta {
                    full_text.push_str(&delta);
                }
            }
            ERROR_EVENT => {
                let message = event.message.unwrap_or_else(|| data.to_string());
                error!("Codex API error: {}", message);
                return Err(ProviderError::Api {
                    status_code: 200,
                    message,
                });
            }
            _ => {}
        }
    }

    let trimmed = full_text.trim();
    if !trimmed.is_empty() {
        return Ok(trimmed.to_string());
    }

    if let Some(detail) = extract_detail(body) {
        error!("Codex API error: {}", detail);
        return Err(ProviderError::Api {
            status_code: 200,
            message: detail,
        });
    }

    Err(ProviderError::MalformedBody("Codex API returned empty response".to_string()))
}

// @extracts: `detail` field of a JSON error body
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
