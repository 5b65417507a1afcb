use mockito::{Matcher, Server};
use serde_json::json;
use studygroup_core::{
    AssistError, Assistant, GeminiClient, GenerationRequest, GenerationResult, PromptStyle, TransportError,
    FALLBACK_MESSAGE,
};

const PATH: &str = "/models/gemini-pro:generateContent";

fn client_for(server: &Server) -> GeminiClient {
    GeminiClient::new("test-key").with_base_url(&server.url())
}

fn answer_body(text: &str) -> String {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
}

#[tokio::test]
async fn test_well_shaped_response_yields_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_body(Matcher::Json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "What is 2+2?" }] }],
            "generationConfig": { "temperature": 0.7, "maxOutputTokens": 500 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(answer_body("4"))
        .create_async()
        .await;

    let request = GenerationRequest::build(PromptStyle::General, "What is 2+2?").unwrap();
    let result = client_for(&server).answer(&request).await;

    assert_eq!(result, GenerationResult::Answer("4".to_string()));
    assert_eq!(result.text(), "4");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_yields_fallback() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create_async()
        .await;

    let request = GenerationRequest::build(PromptStyle::General, "anything").unwrap();
    let client = client_for(&server);

    let err = client.generate(&request).await.unwrap_err();
    assert!(matches!(
        err,
        AssistError::Transport(TransportError::Status(status)) if status.as_u16() == 500
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_answer_is_fallback_string() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let request = GenerationRequest::build(PromptStyle::General, "anything").unwrap();
    let result = client_for(&server).answer(&request).await;

    assert!(result.is_fallback());
    assert_eq!(result.text(), FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_rate_limit_and_auth_failures_look_the_same() {
    for status in [401, 403, 429] {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(r#"{"error":{"message":"nope"}}"#)
            .create_async()
            .await;

        let request = GenerationRequest::build(PromptStyle::General, "anything").unwrap();
        let result = client_for(&server).answer(&request).await;
        assert_eq!(result.text(), FALLBACK_MESSAGE, "status {status}");
    }
}

#[tokio::test]
async fn test_malformed_json_is_transport_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let request = GenerationRequest::build(PromptStyle::General, "anything").unwrap();
    let err = client_for(&server).generate(&request).await.unwrap_err();

    assert!(matches!(err, AssistError::Transport(TransportError::MalformedBody(_))));
    assert_eq!(err.user_message(), FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_missing_candidates_is_shape_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
        .create_async()
        .await;

    let request = GenerationRequest::build(PromptStyle::General, "anything").unwrap();
    let err = client_for(&server).generate(&request).await.unwrap_err();

    assert!(matches!(err, AssistError::Shape(_)));
    assert_eq!(err.user_message(), FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_network_failure_yields_fallback() {
    // Nothing listens on port 1
    let client = GeminiClient::new("test-key").with_base_url("http://127.0.0.1:1");
    let request = GenerationRequest::build(PromptStyle::General, "anything").unwrap();

    let err = client.generate(&request).await.unwrap_err();
    assert!(matches!(err, AssistError::Transport(TransportError::Network(_))));
    assert_eq!(client.answer(&request).await.text(), FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_tutor_prompt_is_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex(
            "As a helpful academic tutor, please provide a clear, step-by-step explanation for this question: chain rule".to_string(),
        ))
        .with_status(200)
        .with_body(answer_body("Differentiate the outside, then the inside."))
        .create_async()
        .await;

    let request = GenerationRequest::build(PromptStyle::Tutor, "chain rule").unwrap();
    let result = client_for(&server).answer(&request).await;

    assert_eq!(result.text(), "Differentiate the outside, then the inside.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_full_cycle_through_assistant() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(answer_body("4"))
        .expect(1)
        .create_async()
        .await;
    let client = client_for(&server);
    let mut assistant = Assistant::new(PromptStyle::General);

    // Empty input never reaches the server
    assert!(assistant.submit().is_err());

    assistant.set_input("What is 2+2?");
    let (ticket, request) = assistant.submit().unwrap();
    assert!(assistant.is_pending());

    let result = client.answer(&request).await;
    assert!(assistant.complete(ticket, result));
    assert_eq!(assistant.result().map(|r| r.text()), Some("4"));

    assert!(assistant.reset());
    assert_eq!(assistant.input(), "");
    assert!(assistant.result().is_none());
    mock.assert_async().await;
}
