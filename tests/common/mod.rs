/*!
 * Common test utilities for the subtrans test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use subtrans::app_config::Config;
use subtrans::subtitle_processor::Cue;
use subtrans::translation::pipeline::{PipelineConfig, RetryPolicy};

/// Three-cue document with LF line endings
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

/// Routes log output through the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Writes a session file with the given token and optional expiry
pub fn create_session_file(dir: &Path, access_token: &str, expires_at: Option<&str>) -> Result<PathBuf> {
    let mut session = serde_json::json!({
        "provider": "chatgpt",
        "timestamp": "2026-01-01T00:00:00Z",
        "credentials": {
            "accessToken": access_token,
            "accountId": "acct-123"
        }
    });
    if let Some(expires_at) = expires_at {
        session["expiresAt"] = serde_json::Value::String(expires_at.to_string());
    }

    create_test_file(dir, "chatgpt.session.json", &serde_json::to_string_pretty(&session)?)
}

/// `count` cues one second apart with texts "Line 1", "Line 2", ...
pub fn numbered_cues(count: usize) -> Vec<Cue> {
    (1..=count)
        .map(|i| Cue::new(i, (i as u64 - 1) * 1000, i as u64 * 1000, format!("Line {}", i)))
        .collect()
}

/// Pipeline configuration with millisecond backoff so retry tests stay fast
pub fn fast_pipeline_config(batch_size: usize, context_size: usize, max_attempts: u32) -> PipelineConfig {
    PipelineConfig::new("fr")
        .with_batching(batch_size, context_size)
        .with_retry(RetryPolicy::new(max_attempts, vec![Duration::from_millis(1)]))
        .with_request_timeout(Duration::from_secs(5))
}

/// Application configuration pointing at `session_file`, with fast retries
pub fn test_config(session_file: &Path) -> Config {
    Config {
        target_language: "fr".to_string(),
        batch_size: 2,
        context_size: 1,
        max_attempts: 2,
        retry_backoff_ms: vec![1],
        session_file: session_file.to_string_lossy().to_string(),
        ..Config::default()
    }
}
