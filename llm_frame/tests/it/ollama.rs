use super::*;
use mockito::Matcher;
use serde_json::json;

fn ollama_frame(server: &mockito::ServerGuard, items: &[Option<&str>]) -> LlmFrame {
    let registry = {
        let mut registry = BackendRegistry::new();
        registry.register(
            OLLAMA_BACKEND,
            OllamaBackend::new(OllamaConfig::new().with_api_host(server.url())),
        );
        registry
    };
    let mut frame = LlmFrame::new(single_column("review", items)).with_registry(registry);
    frame.configure(
        SessionUpdate::new()
            .option("options", json!({ "seed": 100 }))
            .no_cache(),
    );
    frame
}

#[tokio::test]
async fn sentiment_through_ollama() {
    let mut server = mockito::Server::new_async().await;
    let positive = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "llama3.2",
                "stream": false,
                "options": { "seed": 100 },
            })),
            Matcher::Regex("I love this tv".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":{"role":"assistant","content":" Positive\n"},"done":true}"#)
        .expect(1)
        .create_async()
        .await;
    let other = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::Regex("meh".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":{"role":"assistant","content":"it is complicated"},"done":true}"#)
        .expect(1)
        .create_async()
        .await;

    let frame = ollama_frame(&server, &[Some("I love this tv"), None, Some("meh")]);
    let out = frame.sentiment("review", None, "", None).await.unwrap();
    assert_eq!(
        out.table().column("sentiment").unwrap().values(),
        cells(&[Some("positive"), None, None])
    );
    positive.assert_async().await;
    other.assert_async().await;
}

#[tokio::test]
async fn server_errors_become_missing_values() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"model \"llama3.2\" not found, try pulling it first"}"#)
        .create_async()
        .await;

    let frame = ollama_frame(&server, &[Some("a"), Some("b")]);
    let out = frame.summarize("review", None, "", None).await.unwrap();
    assert_eq!(
        out.table().column("summary").unwrap().values(),
        cells(&[None, None])
    );
}
