use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::app_config::Config;
use crate::errors::{SessionError, TranslationError};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::CompletionProvider;
use crate::providers::codex::CodexProvider;
use crate::session::Session;
use crate::subtitle_processor::SubtitleCollection;
use crate::translation::pipeline::{BatchOrchestrator, PipelineConfig, TranslationSummary};

// @module: Application controller for subtitle translation

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    // @field: Where the translated document was written
    pub output_path: PathBuf,

    // @field: Counts and timing of the run
    pub summary: TranslationSummary,

    // @field: Malformed blocks dropped while parsing the input
    pub skipped_blocks: usize,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Set to stop the run before the next batch
    cancel_flag: Arc<AtomicBool>,

    // @field: Draw a progress bar on stderr
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        Ok(Self {
            config,
            cancel_flag: Arc::new(AtomicBool::new(false)),
            show_progress: true,
        })
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flag that cancels the run before the next batch when set
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_flag)
    }

    /// Load the configured session file and check it is usable now
    pub fn load_session(&self) -> Result<Session> {
        let session = Session::load(&self.config.session_file)?;
        session.validate(Utc::now())?;
        Ok(session)
    }

    /// Translate `input_file` with the Codex provider
    pub async fn run(&self, input_file: &Path, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<RunReport> {
        let session = self.load_session()?;
        let access_token = session.access_token().ok_or(SessionError::MissingToken)?;
        let account_id = session.account_id();
        if account_id.is_none() {
            warn!("No account id found in session, sending requests without it");
        }

        let provider = CodexProvider::from_config(&self.config.provider, access_token, self.config.request_timeout());
        info!("Using {} with model {}", provider.name(), provider.model());

        self.run_with_provider(provider, account_id, input_file, output_file, force_overwrite).await
    }

    /// Translate `input_file` with any provider
    ///
    /// Reads and parses the input, translates every batch, then writes the document with
    /// translations preferred over source text.
    pub async fn run_with_provider<P: CompletionProvider>(
        &self,
        provider: P,
        account_context: Option<String>,
        input_file: &Path,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<RunReport> {
        let output_path = output_file.unwrap_or_else(|| FileManager::default_output_path(input_file));
        if output_path.exists() && !force_overwrite {
            return Err(anyhow!(
                "Output file already exists: {} (use -f to force overwrite)",
                output_path.display()
            ));
        }

        let content = FileManager::read_subtitle_file(input_file)?;
        let mut collection = SubtitleCollection::parse(&content);
        if collection.is_empty() {
            return Err(TranslationError::NoCues.into());
        }
        if collection.skipped_blocks > 0 {
            warn!("Skipped {} malformed subtitle blocks", collection.skipped_blocks);
        }

        info!("Loaded {} subtitles from {}", collection.len(), input_file.display());
        info!("Target language: {}", language_utils::get_display_name(&self.config.target_language));

        let orchestrator = BatchOrchestrator::new(provider, PipelineConfig::from_config(&self.config))
            .with_account_context(account_context)
            .with_cancel_flag(self.cancel_flag());

        let progress_bar = self.progress_bar();
        let pb = progress_bar.clone();
        let result = orchestrator
            .translate_with_progress(&mut collection.cues, move |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            })
            .await;
        progress_bar.finish_and_clear();
        let summary = result?;

        FileManager::write_to_file(&output_path, &collection.to_srt_string(true))?;
        info!("Success: {}", output_path.display());

        Ok(RunReport {
            output_path,
            summary,
            skipped_blocks: collection.skipped_blocks,
        })
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));
        progress_bar
    }
}
