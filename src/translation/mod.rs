/*!
 * Subtitle translation.
 *
 * - `batch`: Partitioning cues into batches with read-only context
 * - `prompts`: Prompt rendering for a batch
 * - `response`: Lenient parsing of numbered provider answers
 * - `pipeline`: Sequential batch orchestration with retry and fallback
 */

pub mod batch;
pub mod pipeline;
pub mod prompts;
pub mod response;

pub use self::batch::{Batch, BatchPlanner, BatchSpan, plan};
pub use self::pipeline::{BatchOrchestrator, PipelineConfig, RetryPolicy, TranslationSummary};
pub use self::prompts::{PromptRenderer, PromptTemplate, render};
pub use self::response::{ParsedResponse, parse_response, parse_translation_response};
