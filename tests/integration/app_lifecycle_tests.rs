/*!
 * Controller preconditions and lifecycle tests
 */

use std::sync::atomic::Ordering;

use subtrans::app_config::Config;
use subtrans::app_controller::Controller;
use subtrans::errors::{SessionError, TranslationError};
use subtrans::providers::mock::MockProvider;
use crate::common;

#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let config = Config { batch_size: 0, ..Config::default() };
    assert!(Controller::with_config(config).is_err());
}

#[tokio::test]
async fn test_run_withMissingSession_shouldFailBeforeTranslating() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt").unwrap();
    let controller = Controller::with_config(common::test_config(&temp_dir.path().join("missing.json")))
        .unwrap()
        .with_progress(false);

    let err = controller.run(&input, None, false).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<SessionError>(), Some(SessionError::NotFound(_))));
    assert!(!temp_dir.path().join("movie_translated.srt").exists());
}

#[tokio::test]
async fn test_run_withExpiredSession_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt").unwrap();
    let session = common::create_session_file(temp_dir.path(), "tok", Some("2000-01-01T00:00:00Z")).unwrap();
    let controller = Controller::with_config(common::test_config(&session)).unwrap().with_progress(false);

    let err = controller.run(&input, None, false).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<SessionError>(), Some(SessionError::Expired { .. })));
}

#[test]
fn test_loadSession_withValidSession_shouldSucceed() {
    let temp_dir = common::create_temp_dir().unwrap();
    let session = common::create_session_file(temp_dir.path(), "tok", Some("2999-01-01T00:00:00Z")).unwrap();
    let controller = Controller::with_config(common::test_config(&session)).unwrap();

    let loaded = controller.load_session().unwrap();
    assert_eq!(loaded.access_token(), Some("tok"));
}

#[tokio::test]
async fn test_runWithProvider_withNoCues_shouldFailWithNoCues() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "empty.srt", "just some text\n").unwrap();
    let controller = Controller::with_config(common::test_config(&temp_dir.path().join("s.json")))
        .unwrap()
        .with_progress(false);
    let provider = MockProvider::fixed("1. x");

    let err = controller
        .run_with_provider(provider.clone(), None, &input, None, false)
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<TranslationError>(), Some(TranslationError::NoCues)));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_runWithProvider_withExistingOutput_shouldRequireForce() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt").unwrap();
    let existing = common::create_test_file(temp_dir.path(), "movie_translated.srt", "old").unwrap();
    let controller = Controller::with_config(common::test_config(&temp_dir.path().join("s.json")))
        .unwrap()
        .with_progress(false);

    let result = controller
        .run_with_provider(MockProvider::fixed("1. a\n2. b"), None, &input, None, false)
        .await;
    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&existing).unwrap(), "old");

    controller
        .run_with_provider(MockProvider::fixed("1. a\n2. b"), None, &input, None, true)
        .await
        .unwrap();
    assert_ne!(std::fs::read_to_string(&existing).unwrap(), "old");
}

#[tokio::test]
async fn test_runWithProvider_whenCancelled_shouldNotWriteOutput() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt").unwrap();
    let controller = Controller::with_config(common::test_config(&temp_dir.path().join("s.json")))
        .unwrap()
        .with_progress(false);
    controller.cancel_flag().store(true, Ordering::SeqCst);

    let err = controller
        .run_with_provider(MockProvider::fixed("1. a"), None, &input, None, false)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TranslationError>(),
        Some(TranslationError::Cancelled { completed_batches: 0, .. })
    ));
    assert!(!temp_dir.path().join("movie_translated.srt").exists());
}
