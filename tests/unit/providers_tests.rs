/*!
 * Tests for completion provider implementations
 */

use std::time::Duration;

use subtrans::app_config::ProviderConfig;
use subtrans::errors::ProviderError;
use subtrans::providers::CompletionProvider;
use subtrans::providers::codex::{CodexProvider, CodexRequest, parse_event_stream};
use subtrans::providers::mock::{MockBehavior, MockProvider};

#[test]
fn test_codexProvider_debug_shouldNotExposeToken() {
    let provider = CodexProvider::from_config(&ProviderConfig::default(), "secret-token", Duration::from_secs(5));
    let debug = format!("{:?}", provider);

    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("gpt-5.1-codex-mini"));
    assert_eq!(provider.name(), "codex");
}

#[test]
fn test_codexRequest_shouldSerializeStreamingFlags() {
    let json = serde_json::to_string(&CodexRequest::new("model", "instr", "hello")).unwrap();

    assert!(json.contains("\"stream\":true"));
    assert!(json.contains("\"store\":false"));
    assert!(json.contains("\"text\":\"hello\""));
}

#[test]
fn test_parseEventStream_withCrlfFraming_shouldCollectText() {
    let body = "data: {\"type\":\"response.output_text.delta\",\"delta\":\"1. Hola\"}\r\n\r\ndata: [DONE]\r\n";
    assert_eq!(parse_event_stream(body).unwrap(), "1. Hola");
}

#[test]
fn test_parseEventStream_withWhitespaceOnly_shouldBeMalformed() {
    let body = "data: {\"type\":\"response.output_text.delta\",\"delta\":\"  \\n \"}\ndata: [DONE]\n";
    assert!(matches!(parse_event_stream(body), Err(ProviderError::MalformedBody(_))));
}

#[tokio::test]
async fn test_codexProvider_withUnreachableEndpoint_shouldReturnTransportError() {
    let provider = CodexProvider::new("token", "http://127.0.0.1:9/responses", "m", "i", Duration::from_secs(2));

    let err = provider.send("prompt", Some("acct")).await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport(_)));
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn test_mockProvider_behaviors_shouldMatchTheirNames() {
    assert!(matches!(
        MockProvider::failing().send("p", None).await,
        Err(ProviderError::Api { status_code: 500, .. })
    ));
    assert_eq!(MockProvider::empty().send("p", None).await.unwrap(), "");
    assert_eq!(MockProvider::slow(1, "late").send("p", None).await.unwrap(), "late");
    assert_eq!(
        MockProvider::new(MockBehavior::Fixed("fixed".to_string())).send("p", None).await.unwrap(),
        "fixed"
    );
}

#[tokio::test]
async fn test_mockProvider_shouldRecordPrompts() {
    let provider = MockProvider::fixed("ok");
    provider.send("first", None).await.unwrap();
    provider.send("second", Some("acct")).await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].prompt, "first");
    assert_eq!(requests[1].account_context.as_deref(), Some("acct"));
}
