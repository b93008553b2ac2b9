use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Target language code (e.g. "zh-TW", "ja", "fr")
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Number of cues translated per request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Number of neighbouring cues shown before and after each batch
    #[serde(default = "default_context_size")]
    pub context_size: usize,

    /// Maximum provider attempts per batch, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before each retry in milliseconds; the last value repeats for further retries
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: Vec<u64>,

    /// Delay in milliseconds between consecutive batch requests
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Upper bound for a single provider call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path to the credential session file
    #[serde(default = "default_session_file")]
    pub session_file: String,

    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Completion provider configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: System instructions sent with every request
    #[serde(default = "default_instructions")]
    pub instructions: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            instructions: default_instructions(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "zh-TW".to_string()
}

fn default_batch_size() -> usize {
    30
}

fn default_context_size() -> usize {
    2
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> Vec<u64> {
    vec![1000, 2000, 4000]
}

fn default_rate_limit_delay_ms() -> u64 {
    0 // No delay between batches
}

fn default_request_timeout_secs() -> u64 {
    120 // Streaming responses for a full batch can take a while
}

fn default_session_file() -> String {
    "chatgpt.session.json".to_string()
}

fn default_endpoint() -> String {
    "https://chatgpt.com/backend-api/codex/responses".to_string()
}

fn default_model() -> String {
    "gpt-5.1-codex-mini".to_string()
}

fn default_instructions() -> String {
    "You are a professional subtitle translator. Translate accurately and naturally.".to_string()
}

impl Config {
    /// Load a configuration file, or write and return the defaults if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Load a configuration file, or return the defaults without touching the disk
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("Config file not found at '{}', using defaults.", path.display());
            return Ok(Config::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }
        if !language_utils::is_known_language(&self.target_language) {
            warn!("Target language '{}' is not a recognised language code; it will be passed to the model as-is", self.target_language);
        }

        if self.batch_size == 0 {
            return Err(anyhow!("Batch size must be at least 1"));
        }

        if self.max_attempts == 0 {
            return Err(anyhow!("Max attempts must be at least 1"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be at least 1 second"));
        }

        let endpoint = Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(anyhow!("Provider endpoint must use http or https: {}", self.provider.endpoint));
        }

        if self.provider.model.trim().is_empty() {
            return Err(anyhow!("Provider model must not be empty"));
        }

        Ok(())
    }

    /// Retry delays as durations
    pub fn retry_backoff(&self) -> Vec<Duration> {
        self.retry_backoff_ms.iter().map(|ms| Duration::from_millis(*ms)).collect()
    }

    /// Pause between batch requests
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    /// Upper bound for one provider call
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            batch_size: default_batch_size(),
            context_size: default_context_size(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            session_file: default_session_file(),
            provider: ProviderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
