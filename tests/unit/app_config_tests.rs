/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;

use subtrans::app_config::{Config, LogLevel, ProviderConfig};
use subtrans::translation::pipeline::PipelineConfig;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.target_language, "zh-TW");
    assert_eq!(config.batch_size, 30);
    assert_eq!(config.context_size, 2);
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.retry_backoff_ms, vec![1000, 2000, 4000]);
    assert_eq!(config.rate_limit_delay_ms, 0);
    assert_eq!(config.request_timeout_secs, 120);
    assert_eq!(config.session_file, "chatgpt.session.json");
    assert_eq!(config.provider.endpoint, "https://chatgpt.com/backend-api/codex/responses");
    assert_eq!(config.provider.model, "gpt-5.1-codex-mini");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.context_size = 0;
    assert!(config.validate().is_ok());

    config.batch_size = 0;
    assert!(config.validate().is_err());
    config.batch_size = 10;

    config.max_attempts = 0;
    assert!(config.validate().is_err());
    config.max_attempts = 1;

    config.target_language = "  ".to_string();
    assert!(config.validate().is_err());
    config.target_language = "klingon".to_string();
    assert!(config.validate().is_ok());

    config.provider.endpoint = "ftp://example.com/responses".to_string();
    assert!(config.validate().is_err());
    config.provider.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.provider.endpoint = "http://localhost:8080/responses".to_string();
    assert!(config.validate().is_ok());

    config.provider.model = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let config: Config = serde_json::from_str(r#"{"target_language": "ja", "batch_size": 10, "log_level": "debug"}"#).unwrap();

    assert_eq!(config.target_language, "ja");
    assert_eq!(config.batch_size, 10);
    assert_eq!(config.context_size, 2);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.provider, ProviderConfig::default());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(created, Config::default());

    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn test_loadOrDefault_withMissingFile_shouldNotCreateFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_default(&path).unwrap();

    assert_eq!(config, Config::default());
    assert!(!path.exists());
}

#[test]
fn test_loadOrDefault_withExistingFile_shouldReadIt() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{"session_file": "other.session.json"}"#).unwrap();

    let config = Config::load_or_default(&path).unwrap();

    assert_eq!(config.session_file, "other.session.json");
    assert_eq!(config.batch_size, 30);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ broken").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_durations_shouldConvertFromConfigUnits() {
    let config = Config {
        retry_backoff_ms: vec![5, 10],
        rate_limit_delay_ms: 250,
        request_timeout_secs: 3,
        ..Config::default()
    };

    assert_eq!(config.retry_backoff(), vec![Duration::from_millis(5), Duration::from_millis(10)]);
    assert_eq!(config.rate_limit_delay(), Duration::from_millis(250));
    assert_eq!(config.request_timeout(), Duration::from_secs(3));
}

#[test]
fn test_pipelineConfig_fromConfig_shouldCarryBatchingAndRetry() {
    let config = Config {
        batch_size: 12,
        context_size: 4,
        max_attempts: 5,
        ..Config::default()
    };
    let pipeline = PipelineConfig::from_config(&config);

    assert_eq!(pipeline.batch_size, 12);
    assert_eq!(pipeline.context_size, 4);
    assert_eq!(pipeline.retry.max_attempts, 5);
    assert_eq!(pipeline.retry.backoff.len(), 3);
    assert_eq!(pipeline.target_language, "zh-TW");
}

#[test]
fn test_logLevel_toLevelFilter_shouldMap() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
