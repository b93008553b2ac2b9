/*!
 * Completion provider implementations.
 *
 * This module contains the boundary to the external text-completion service:
 * - `codex`: streaming Codex responses API client
 * - `mock`: scripted provider used by tests and benchmarks
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for completion services
///
/// A provider receives one fully rendered prompt and returns the raw text the model
/// produced. Transport, authentication headers and response framing are internal to the
/// implementation; the caller only sees text or a [`ProviderError`].
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Short provider name for log lines
    fn name(&self) -> &str;

    /// Send a prompt and return the generated text
    ///
    /// # Arguments
    /// * `prompt` - The rendered instruction block
    /// * `account_context` - Optional account identifier forwarded to the service
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The raw response text or an error
    async fn send(&self, prompt: &str, account_context: Option<&str>) -> Result<String, ProviderError>;
}

pub mod codex;
pub mod mock;
