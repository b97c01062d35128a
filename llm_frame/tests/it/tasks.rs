use super::*;

const X: [Option<&str>; 4] = [
    Some("positive"),
    Some("negative"),
    Some("neutral"),
    Some("not-real"),
];

fn column<'a>(frame: &'a LlmFrame, name: &str) -> &'a [Option<String>] {
    frame.table().column(name).unwrap().values()
}

#[tokio::test]
async fn test_backend_leaves_every_row_missing() {
    let frame = frame(TEST_BACKEND, &X);

    let out = frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(column(&out, "sentiment"), cells(&[None, None, None, None]));

    let restricted = Some(Labels::from(["positive", "negative"]));
    let out = frame.sentiment("x", restricted, "", None).await.unwrap();
    assert_eq!(column(&out, "sentiment"), cells(&[None, None, None, None]));
}

#[tokio::test]
async fn echo_validates_against_options() {
    let frame = frame(ECHO_BACKEND, &X);

    let out = frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(
        column(&out, "sentiment"),
        cells(&[Some("positive"), Some("negative"), Some("neutral"), None])
    );

    let restricted = Some(Labels::from(["positive", "negative"]));
    let out = frame.sentiment("x", restricted, "", None).await.unwrap();
    assert_eq!(
        column(&out, "sentiment"),
        cells(&[Some("positive"), Some("negative"), None, None])
    );
}

#[tokio::test]
async fn mapping_writes_mapped_values() {
    let frame = frame(ECHO_BACKEND, &[Some("Positive"), Some("unknown"), Some(" negative ")]);
    let options = Labels::from([("positive", "1"), ("negative", "0")]);
    let out = frame
        .sentiment("x", Some(options), "", Some("score"))
        .await
        .unwrap();
    assert_eq!(column(&out, "score"), cells(&[Some("1"), None, Some("0")]));
}

#[tokio::test]
async fn classify_and_custom_use_their_vocabularies() {
    let frame = frame(ECHO_BACKEND, &[Some("Computer"), Some("YES"), Some("toaster")]);

    let out = frame
        .classify("x", ["computer", "appliance"], "", None)
        .await
        .unwrap();
    assert_eq!(
        column(&out, "classify"),
        cells(&[Some("computer"), None, None])
    );

    let out = frame
        .custom(
            "x",
            "Is this a happy customer? Answer yes or no",
            Some(Labels::from(["yes", "no"])),
            None,
        )
        .await
        .unwrap();
    assert_eq!(column(&out, "custom"), cells(&[None, Some("yes"), None]));
}

#[tokio::test]
async fn free_text_tasks_pass_trimmed_text() {
    let frame = frame(ECHO_BACKEND, &[Some("  hola mundo "), None]);
    let out = frame.translate("x", "spanish", "", None).await.unwrap();
    assert_eq!(column(&out, "translation"), cells(&[Some("hola mundo"), None]));

    let out = frame.summarize("x", Some(3), "", None).await.unwrap();
    assert_eq!(column(&out, "summary"), cells(&[Some("hola mundo"), None]));
}

#[tokio::test]
async fn prompt_and_row_reach_the_backend() {
    let backend = CountingBackend::default();
    let mut frame = frame("counting", &[Some("I love it"), None, Some("meh")]);
    frame.register_backend("counting", backend.clone());

    let preview = frame
        .preview("x", &Task::sentiment(DEFAULT_SENTIMENT_OPTIONS, ""))
        .unwrap()
        .unwrap();
    assert_eq!(preview.input, "I love it");
    assert!(preview
        .content()
        .ends_with("The answer is based on the following text:\nI love it"));
    assert_eq!(backend.calls(), 0);

    frame.sentiment("x", None, "", None).await.unwrap();
    // missing cells never reach the backend
    assert_eq!(backend.inputs(), vec!["I love it", "meh"]);
}

#[tokio::test]
async fn failing_rows_are_missing_and_others_continue() {
    let mut frame = frame("flaky", &[Some("positive"), Some("negative")]);
    frame.register_backend("flaky", FailingBackend);
    let out = frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(column(&out, "sentiment"), cells(&[None, None]));

    let frame = super::frame("no-such-backend", &[Some("positive")]);
    let out = frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(column(&out, "sentiment"), cells(&[None]));
}

#[tokio::test]
async fn configuration_errors_abort_before_any_call() {
    let backend = CountingBackend::default();
    let mut frame = frame("counting", &X);
    frame.register_backend("counting", backend.clone());

    assert!(matches!(
        frame.sentiment("missing", None, "", None).await,
        Err(FrameError::ColumnNotFound(_))
    ));
    assert!(matches!(
        frame.summarize("x", Some(0), "", None).await,
        Err(FrameError::Configuration(_))
    ));
    assert!(matches!(
        frame.classify("x", Vec::<&str>::new(), "", None).await,
        Err(FrameError::Configuration(_))
    ));
    assert!(matches!(
        frame.custom("x", "", None, None).await,
        Err(FrameError::Configuration(_))
    ));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn concurrent_mapping_preserves_length_and_order() {
    let items: Vec<String> = (0..50).map(|i| format!("row {i}")).collect();
    let refs: Vec<Option<&str>> = items.iter().map(|s| Some(s.as_str())).collect();
    let frame = frame(ECHO_BACKEND, &refs).concurrency(8);
    let out = frame.summarize("x", None, "", None).await.unwrap();
    assert_eq!(out.table().height(), 50);
    assert_eq!(column(&out, "summary"), cells(&refs));
}

#[tokio::test]
async fn pred_name_overwrites_existing_column() {
    let frame = frame(ECHO_BACKEND, &[Some("positive")]);
    let out = frame.sentiment("x", None, "", Some("x")).await.unwrap();
    assert_eq!(out.table().column_names(), vec!["x"]);
    assert_eq!(frame.table().column("x").unwrap().get(0), Some("positive"));
}

#[test]
fn configure_merges_into_session() {
    let mut frame = frame(ECHO_BACKEND, &[]);
    frame.configure(SessionUpdate::new().model("qwen2.5").option("seed", 100).no_cache());
    let session = frame
        .configure(SessionUpdate::new().option("temperature", 0.0).no_cache())
        .clone();
    assert_eq!(session.backend, ECHO_BACKEND);
    assert_eq!(session.model, "qwen2.5");
    assert_eq!(session.extra_options.len(), 2);
    assert!(!session.caching_enabled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn task_calls_can_be_spawned() {
    let frame = frame(ECHO_BACKEND, &[Some("a"), Some("b"), None]).concurrency(2);
    let out = tokio::spawn(async move { frame.summarize("x", None, "", None).await })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(column(&out, "summary"), cells(&[Some("a"), Some("b"), None]));
}
