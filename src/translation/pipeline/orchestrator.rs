/*!
 * Batch orchestrator.
 *
 * Drives every batch through its lifecycle, one batch at a time in document order:
 *
 * `Pending -> Rendering -> Requesting -> ParsingResponse -> Applied`, or
 * `Requesting -> Fallback` once all attempts are exhausted.
 *
 * Each batch writes only to the cues it owns. A batch that cannot be translated keeps
 * its source text and the run carries on; only cancellation stops a run early.
 */

use log::{debug, error, info, trace, warn};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::CompletionProvider;
use crate::subtitle_processor::Cue;
use crate::translation::batch::{BatchPlanner, BatchSpan};
use crate::translation::prompts::PromptRenderer;
use crate::translation::response::parse_response;

use super::retry::RetryPolicy;

/// Configuration for the translation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Target language code
    pub target_language: String,

    /// Maximum cues per batch
    pub batch_size: usize,

    /// Context cues on each side of a batch
    pub context_size: usize,

    /// Retry policy for provider failures
    pub retry: RetryPolicy,

    /// Pause between consecutive batches
    pub rate_limit_delay: Duration,

    /// Upper bound for one provider call
    pub request_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PipelineConfig {
    /// Create a pipeline configuration with defaults for everything but the language.
    pub fn new(target_language: &str) -> Self {
        Self {
            target_language: target_language.to_string(),
            ..Default::default()
        }
    }

    /// Build from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_language: config.target_language.clone(),
            batch_size: config.batch_size,
            context_size: config.context_size,
            retry: RetryPolicy::new(config.max_attempts, config.retry_backoff()),
            rate_limit_delay: config.rate_limit_delay(),
            request_timeout: config.request_timeout(),
        }
    }

    /// Set batch and context sizes.
    pub fn with_batching(mut self, batch_size: usize, context_size: usize) -> Self {
        self.batch_size = batch_size;
        self.context_size = context_size;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the pause between batches.
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Lifecycle states of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Planned, not started
    Pending,
    /// Building the prompt
    Rendering,
    /// Waiting on the provider; `attempt` is 1-based
    Requesting { attempt: u32 },
    /// Extracting translations from the response
    ParsingResponse,
    /// Translations written to the batch's cues (terminal)
    Applied,
    /// Source text copied to every cue of the batch (terminal)
    Fallback,
}

impl BatchState {
    /// True for `Applied` and `Fallback`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Applied | Self::Fallback)
    }
}

/// Result of processing one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Position of the batch in the plan
    pub index: usize,

    /// Terminal state reached
    pub state: BatchState,

    /// Provider calls made
    pub attempts: u32,

    /// Cues that received a translation from the response
    pub translated: usize,

    /// Cues that kept their source text
    pub failed: usize,

    /// Last provider error, when the batch fell back
    pub last_error: Option<ProviderError>,
}

/// Summary of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationSummary {
    /// Cues in the document
    pub total_cues: usize,

    /// Cues whose translation differs from the source
    pub translated_cues: usize,

    /// Cues that fell back to the source text
    pub failed_cues: usize,

    /// Batches planned
    pub total_batches: usize,

    /// Batches that exhausted their attempts
    pub failed_batches: usize,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl fmt::Display for TranslationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total cues: {} | Translated: {} | Kept original: {} | Failed batches: {}/{} | Time: {:.1}s",
            self.total_cues,
            self.translated_cues,
            self.failed_cues,
            self.failed_batches,
            self.total_batches,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Sequential batch orchestrator.
#[derive(Debug)]
pub struct BatchOrchestrator<P: CompletionProvider> {
    provider: P,
    config: PipelineConfig,
    renderer: PromptRenderer,
    account_context: Option<String>,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl<P: CompletionProvider> BatchOrchestrator<P> {
    /// Create an orchestrator for `provider`.
    pub fn new(provider: P, config: PipelineConfig) -> Self {
        let renderer = PromptRenderer::new(&config.target_language);
        Self {
            provider,
            config,
            renderer,
            account_context: None,
            cancel_flag: None,
        }
    }

    /// Forward an account identifier with every request.
    pub fn with_account_context(mut self, account_context: Option<String>) -> Self {
        self.account_context = account_context;
        self
    }

    /// Stop before the next batch once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// The provider in use.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Translate every cue in place.
    pub async fn translate(&self, cues: &mut [Cue]) -> Result<TranslationSummary, TranslationError> {
        self.translate_with_progress(cues, |_, _| {}).await
    }

    /// Translate every cue in place, reporting `(batches_done, batches_total)` after each batch.
    pub async fn translate_with_progress<F>(
        &self,
        cues: &mut [Cue],
        mut progress_callback: F,
    ) -> Result<TranslationSummary, TranslationError>
    where
        F: FnMut(usize, usize),
    {
        let start_time = Instant::now();
        let spans = BatchPlanner::new(self.config.batch_size, self.config.context_size).spans(cues.len());
        let total_batches = spans.len();

        let mut summary = TranslationSummary {
            total_cues: cues.len(),
            total_batches,
            ..Default::default()
        };

        if spans.is_empty() {
            info!("Nothing to translate");
            return Ok(summary);
        }

        info!("Translating {} cues in {} batches into {}",
              cues.len(), total_batches, self.renderer.target_display_name());

        for span in &spans {
            if self.is_cancelled() {
                warn!("Translation cancelled before batch {}/{}", span.index + 1, total_batches);
                return Err(TranslationError::Cancelled {
                    completed_batches: span.index,
                    total_batches,
                });
            }

            if span.index > 0 && !self.config.rate_limit_delay.is_zero() {
                tokio::time::sleep(self.config.rate_limit_delay).await;
            }

            let outcome = self.process_batch(span, cues, total_batches).await;
            summary.failed_cues += outcome.failed;
            if outcome.state == BatchState::Fallback {
                summary.failed_batches += 1;
            }

            progress_callback(span.index + 1, total_batches);
        }

        summary.translated_cues = cues.iter().filter(|cue| cue.is_translated()).count();
        summary.elapsed = start_time.elapsed();

        info!("{}", summary);
        if summary.failed_cues > 0 {
            warn!("{} cues failed and kept original text", summary.failed_cues);
        }

        Ok(summary)
    }

    /// Run one batch to a terminal state.
    pub async fn process_batch(&self, span: &BatchSpan, cues: &mut [Cue], total_batches: usize) -> BatchOutcome {
        let mut state = BatchState::Pending;
        let batch_label = format!("{}/{}", span.index + 1, total_batches);

        transition(&mut state, BatchState::Rendering, &batch_label);
        let prompt = self.renderer.render(&span.view(cues));

        let (result, attempts) = self.request_with_retry(&prompt, &mut state, &batch_label).await;
        let items = &mut cues[span.items.clone()];

        match result {
            Ok(response) => {
                transition(&mut state, BatchState::ParsingResponse, &batch_label);
                let parsed = parse_response(&response, items.len());

                let failed = apply_translations(items, &parsed.translations);
                transition(&mut state, BatchState::Applied, &batch_label);
                if failed > 0 {
                    debug!("Batch {}: {} of {} lines missing from response, kept original text",
                           batch_label, failed, items.len());
                }

                BatchOutcome {
                    index: span.index,
                    state,
                    attempts,
                    translated: items.len() - failed,
                    failed,
                    last_error: None,
                }
            }
            Err(last_error) => {
                error!("Failed to translate batch {} after {} attempts: {}", batch_label, attempts, last_error);
                for cue in items.iter_mut() {
                    cue.apply_fallback();
                }
                transition(&mut state, BatchState::Fallback, &batch_label);

                BatchOutcome {
                    index: span.index,
                    state,
                    attempts,
                    translated: 0,
                    failed: items.len(),
                    last_error: Some(last_error),
                }
            }
        }
    }

    // @returns: Response text or the last error, with the number of attempts made
    async fn request_with_retry(
        &self,
        prompt: &str,
        state: &mut BatchState,
        batch_label: &str,
    ) -> (Result<String, ProviderError>, u32) {
        let max_attempts = self.config.retry.max_attempts;
        let mut last_error = ProviderError::Transport("no attempt made".to_string());

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let wait = self.config.retry.delay_before_retry(attempt - 1);
                warn!("Retrying batch {} in {:.1}s... (attempt {}/{})",
                      batch_label, wait.as_secs_f64(), attempt, max_attempts);
                tokio::time::sleep(wait).await;
            }

            transition(state, BatchState::Requesting { attempt }, batch_label);
            match self.send_once(prompt).await {
                Ok(text) => return (Ok(text), attempt),
                Err(e) => {
                    warn!("Batch {} attempt {}/{} failed ({}): {}",
                          batch_label, attempt, max_attempts, e.kind(), e);
                    last_error = e;
                }
            }
        }

        (Err(last_error), max_attempts)
    }

    // @returns: Non-blank response text, or the failure for this attempt
    async fn send_once(&self, prompt: &str) -> Result<String, ProviderError> {
        let call = self.provider.send(prompt, self.account_context.as_deref());

        match tokio::time::timeout(self.config.request_timeout, call).await {
            Err(_) => Err(ProviderError::Transport(format!(
                "{} request timed out after {}s",
                self.provider.name(),
                self.config.request_timeout.as_secs_f64()
            ))),
            Ok(Err(e)) => Err(e),
            Ok(Ok(text)) if text.trim().is_empty() => Err(ProviderError::MalformedBody(format!(
                "{} returned an empty response",
                self.provider.name()
            ))),
            Ok(Ok(text)) => Ok(text),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Write parsed translations to a batch's cues
///
/// Non-empty entries become the cue's translation; an empty or missing entry makes the
/// cue keep its source text. Returns the number of cues that kept their source text.
pub fn apply_translations(items: &mut [Cue], translations: &[String]) -> usize {
    let mut failed = 0;

    for (idx, cue) in items.iter_mut().enumerate() {
        match translations.get(idx).filter(|t| !t.is_empty()) {
            Some(text) => cue.apply_translation(text.as_str()),
            None => {
                cue.apply_fallback();
                failed += 1;
            }
        }
    }

    failed
}

fn transition(state: &mut BatchState, next: BatchState, batch_label: &str) {
    trace!("Batch {}: {:?} -> {:?}", batch_label, state, next);
    *state = next;
}
