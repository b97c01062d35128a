use super::*;
use mockito::Matcher;

fn backend(server: &mockito::ServerGuard) -> OllamaBackend {
    OllamaBackend::new(OllamaConfig::new().with_api_host(server.url()))
}

#[tokio::test]
async fn chat_returns_message_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3.2",
            "stream": false,
            "options": { "seed": 100 },
            "messages": [{
                "role": "user",
                "content": "Return only one of the following answers: 'positive', 'negative'\nI love it"
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"model":"llama3.2","message":{"role":"assistant","content":"positive"},"done":true}"#,
        )
        .create_async()
        .await;

    let req = GenerationRequest::new(
        "Return only one of the following answers: 'positive', 'negative'",
        "I love it",
        "llama3.2",
    )
    .with_option("options", json!({ "seed": 100 }));
    let out = backend(&server).generate(&req).await.unwrap();
    assert_eq!(out, "positive");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_model_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"model \"llama9\" not found, try pulling it first"}"#)
        .create_async()
        .await;

    let req = GenerationRequest::new("Summarize:", "text", "llama9");
    match backend(&server).generate(&req).await {
        Err(BackendError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("not found"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn response_without_message_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"model":"llama3.2","done":true}"#)
        .create_async()
        .await;

    let req = GenerationRequest::new("Summarize:", "text", "llama3.2");
    let err = backend(&server).generate(&req).await.unwrap_err();
    assert!(matches!(err, BackendError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_json_body_fails_to_deserialize() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let req = GenerationRequest::new("Summarize:", "text", "llama3.2");
    let err = backend(&server).generate(&req).await.unwrap_err();
    assert!(matches!(err, BackendError::JsonDeserialize(_)));
}

#[tokio::test]
async fn unreachable_server_is_http_error() {
    // Nothing listens on port 9 on a test machine
    let backend = OllamaBackend::new(OllamaConfig::new().with_api_host("http://127.0.0.1:9"));
    let req = GenerationRequest::new("Summarize:", "text", "llama3.2");
    let err = backend.generate(&req).await.unwrap_err();
    assert!(matches!(err, BackendError::Http(_)));
}
