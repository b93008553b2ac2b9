/*!
 * # subtrans - SRT subtitle translation with a language model
 *
 * A Rust library for translating SRT subtitle files in batches.
 *
 * ## Features
 *
 * - Lenient SRT parsing and byte-order-marked CRLF output
 * - Fixed-size batches with read-only context from neighbouring cues
 * - Numbered prompts and tolerant parsing of numbered answers
 * - Sequential batch processing with bounded retries and backoff
 * - Per-cue fallback to the source text, so a run always produces a complete file
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: SRT codec and the cue model
 * - `translation`: Batch planning, prompt rendering, response parsing and orchestration
 * - `providers`: Completion provider boundary with the Codex client and a mock
 * - `session`: Credential session file loading and validation
 * - `app_config`: Configuration management
 * - `app_controller`: Wiring of a whole run
 * - `file_utils`: File system operations
 * - `language_utils`: Target language display names
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod session;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunReport};
pub use errors::{AppError, ProviderError, SessionError, SubtitleError, TranslationError};
pub use providers::CompletionProvider;
pub use session::Session;
pub use subtitle_processor::{Cue, SubtitleCollection, format_timestamp, parse_timestamp, serialize_cues};
pub use translation::{BatchOrchestrator, PipelineConfig, TranslationSummary};
