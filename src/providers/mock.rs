/*!
 * Mock provider implementation for testing.
 *
 * This module provides a scripted provider that simulates different behaviors:
 * - `MockProvider::fixed(text)` - Always succeeds with the same text
 * - `MockProvider::failing()` - Always fails with a service error
 * - `MockProvider::unreachable()` - Always fails with a transport error
 * - `MockProvider::fail_first(n)` - Fails n times, then succeeds
 * - `MockProvider::empty()` - Succeeds with an empty body
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::CompletionProvider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with the given text
    Fixed(String),
    /// Always fails with a service error
    Failing,
    /// Always fails with a transport error
    Unreachable,
    /// Fails the first `failures` requests, then behaves like `Fixed`
    FailFirst { failures: usize, text: String },
    /// Returns an empty body
    Empty,
    /// Sleeps before answering with the given text
    Slow { delay_ms: u64, text: String },
}

/// A prompt as received by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// The prompt text
    pub prompt: String,
    /// The account context passed along
    pub account_context: Option<String>,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Requests seen so far, shared between clones
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a mock that always answers with `text`
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fixed(text.into()))
    }

    /// Create a failing mock provider that always returns a service error
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock provider whose requests never reach the service
    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Unreachable)
    }

    /// Create a mock that fails `failures` times before answering with `text`
    pub fn fail_first(failures: usize, text: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailFirst { failures, text: text.into() })
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that answers after a delay
    pub fn slow(delay_ms: u64, text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Slow { delay_ms, text: text.into() })
    }

    /// Set a custom response generator, used instead of the fixed text on success
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Generate a numbered response in the format the prompt asks for
    pub fn numbered_response(entries: &[&str]) -> String {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {}", i + 1, entry))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn success(&self, prompt: &str, text: &str) -> Result<String, ProviderError> {
        match self.custom_response {
            Some(generator) => Ok(generator(prompt)),
            None => Ok(text.to_string()),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, prompt: &str, account_context: Option<&str>) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                prompt: prompt.to_string(),
                account_context: account_context.map(str::to_string),
            });
        }

        match &self.behavior {
            MockBehavior::Fixed(text) => self.success(prompt, text),

            MockBehavior::Failing => Err(ProviderError::Api {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::Unreachable => Err(ProviderError::Transport(
                "Simulated connection failure".to_string(),
            )),

            MockBehavior::FailFirst { failures, text } => {
                if count < *failures {
                    Err(ProviderError::Api {
                        status_code: 503,
                        message: format!("Simulated failure (request #{})", count + 1),
                    })
                } else {
                    self.success(prompt, text)
                }
            }

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Slow { delay_ms, text } => {
                tokio::time::sleep(std::time::Duration::from_millis(*delay_ms)).await;
                self.success(prompt, text)
            }
        }
    }
}
