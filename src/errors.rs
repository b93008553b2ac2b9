/*!
 * Error types for the subtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Failures local to one cue or one batch never surface through these types to the
 * caller of a run; they are absorbed by the orchestrator. What does surface is either a
 * whole-run precondition failure or a cancellation.
 */

use thiserror::Error;

/// Errors that can occur when calling the completion service
///
/// The three variants mirror the three ways a request can go wrong: the request never
/// produced a response, the service answered with an error, or the service answered with
/// something that carries no usable text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The request could not be completed (connection, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error reported by the service itself
    #[error("API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code, or 200 when the error arrived inside a successful stream
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The response body was empty or could not be interpreted
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

impl ProviderError {
    /// Short label used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Api { .. } => "service",
            Self::MalformedBody(_) => "malformed body",
        }
    }
}

/// Errors related to the credential session file
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session file does not exist
    #[error("Session file not found: {0}")]
    NotFound(String),

    /// Session file exists but could not be read or decoded
    #[error("Invalid session file: {0}")]
    Invalid(String),

    /// Session has no access token
    #[error("No access token found in session")]
    MissingToken,

    /// Session token expired
    #[error("Session token expired at {expired_at}")]
    Expired {
        /// Expiry timestamp as stored in the session
        expired_at: String,
    },
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp did not match `HH:MM:SS,mmm`
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A cue ends before it starts
    #[error("Invalid time range: end {end_ms}ms is before start {start_ms}ms")]
    InvalidTimeRange {
        /// Start offset in milliseconds
        start_ms: u64,
        /// End offset in milliseconds
        end_ms: u64,
    },
}

/// Errors that abort a translation run
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The input produced nothing to translate
    #[error("No subtitle cues to translate")]
    NoCues,

    /// The caller aborted the run between batches
    #[error("Translation cancelled after {completed_batches} of {total_batches} batches")]
    Cancelled {
        /// Batches fully processed before cancellation
        completed_batches: usize,
        /// Batches planned for the run
        total_batches: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the session
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
