/*!
 * Translation pipeline.
 *
 * Batches run one after another in document order. Each batch is rendered into a
 * prompt, sent to the provider with bounded retries, and the parsed answer is written
 * back to the cues the batch owns.
 */

pub mod orchestrator;
pub mod retry;

pub use orchestrator::{
    BatchOrchestrator, BatchOutcome, BatchState, PipelineConfig, TranslationSummary, apply_translations,
};
pub use retry::{RetryPolicy, backoff_delay};
