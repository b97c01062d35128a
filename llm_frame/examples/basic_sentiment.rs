use llm_frame::*;

/// Runs every task over a small review table against a local Ollama server.
#[tokio::main(flavor = "current_thread")]
pub async fn main() {
    let table = Table::new(vec![Column::from_values(
        "review",
        [
            "This has been the best TV I've ever used. Great screen, and sound.",
            "I regret buying this laptop. It is too slow and the keyboard is too noisy",
            "Not sure how to feel about my new washing machine. Great color, but hard to figure out",
        ],
    )])
    .unwrap();

    let mut frame = LlmFrame::new(table)
        .logging(LoggingConfig::new().log_level_info())
        .unwrap();
    // Fixed seed so cached results are reproducible
    frame.configure(
        SessionUpdate::new()
            .model("llama3.2")
            .option("options", serde_json::json!({ "seed": 100 })),
    );

    // See what will be sent before sending anything
    let request = frame
        .preview("review", &Task::sentiment(DEFAULT_SENTIMENT_OPTIONS, ""))
        .unwrap();
    if let Some(request) = request {
        println!("{request}");
    }

    let frame = frame.sentiment("review", None, "", None).await.unwrap();
    let frame = frame.summarize("review", Some(5), "", None).await.unwrap();
    let frame = frame
        .translate("review", "spanish", "", None)
        .await
        .unwrap();
    let frame = frame
        .classify("review", [("appliance", "1"), ("computer", "2")], "", None)
        .await
        .unwrap();
    let frame = frame
        .extract_expanded("review", ["product", "feelings"], "")
        .await
        .unwrap();
    let frame = frame
        .custom(
            "review",
            "Is this a happy customer? Answer yes or no",
            Some(Labels::from(["yes", "no"])),
            Some("happy"),
        )
        .await
        .unwrap();

    println!("{}", frame.table());
}
