use super::*;

fn cached_frame(
    dir: &std::path::Path,
    backend: &CountingBackend,
    items: &[Option<&str>],
) -> LlmFrame {
    let mut frame = LlmFrame::new(single_column("x", items));
    frame.configure(
        SessionUpdate::new()
            .backend("counting")
            .cache_path(dir.to_string_lossy()),
    );
    frame.register_backend("counting", backend.clone());
    frame
}

fn count_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|shards| {
            shards
                .flatten()
                .map(|shard| std::fs::read_dir(shard.path()).map_or(0, |f| f.count()))
                .sum()
        })
        .unwrap_or(0)
}

#[tokio::test]
async fn second_identical_call_hits_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let backend = CountingBackend::default();
    let frame = cached_frame(
        dir.path(),
        &backend,
        &[Some("positive"), Some("meh"), None],
    );

    let first = frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(backend.calls(), 2);
    assert_eq!(count_files(dir.path()), 2);

    let second = frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(backend.calls(), 2);
    assert_eq!(first.table(), second.table());
}

#[tokio::test]
async fn duplicate_rows_share_one_generation() {
    let dir = tempfile::tempdir().unwrap();
    let backend = CountingBackend::default();
    let items = [Some("same"); 12];
    let frame = cached_frame(dir.path(), &backend, &items).concurrency(4);

    let out = frame.summarize("x", None, "", None).await.unwrap();
    assert_eq!(backend.calls(), 1);
    assert_eq!(
        out.table().column("summary").unwrap().values(),
        cells(&items)
    );
}

#[tokio::test]
async fn model_and_options_are_part_of_the_key() {
    let dir = tempfile::tempdir().unwrap();
    let backend = CountingBackend::default();
    let mut frame = cached_frame(dir.path(), &backend, &[Some("positive")]);

    frame.sentiment("x", None, "", None).await.unwrap();
    let cache = dir.path().to_string_lossy().to_string();
    frame.configure(SessionUpdate::new().model("other").cache_path(cache.as_str()));
    frame.sentiment("x", None, "", None).await.unwrap();
    frame.configure(SessionUpdate::new().option("seed", 100).cache_path(cache.as_str()));
    frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(backend.calls(), 3);

    frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(backend.calls(), 3);
}

#[tokio::test]
async fn empty_cache_path_disables_reads_and_writes() {
    let dir = tempfile::tempdir().unwrap();
    let backend = CountingBackend::default();
    let mut frame = cached_frame(
        dir.path(),
        &backend,
        &[Some("positive"), Some("positive")],
    );
    frame.configure(SessionUpdate::new().cache_path(""));
    assert!(!frame.session().caching_enabled());

    frame.sentiment("x", None, "", None).await.unwrap();
    frame.sentiment("x", None, "", None).await.unwrap();
    // no dedupe and no reuse without a cache
    assert_eq!(backend.calls(), 4);
    assert_eq!(count_files(dir.path()), 0);
}

#[tokio::test]
async fn failed_generations_are_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let mut frame = LlmFrame::new(single_column("x", &[Some("positive")]));
    frame.configure(
        SessionUpdate::new()
            .backend(TEST_BACKEND)
            .cache_path(dir.path().to_string_lossy()),
    );
    let out = frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(out.table().column("sentiment").unwrap().get(0), None);
    assert_eq!(count_files(dir.path()), 0);
}

#[tokio::test]
async fn unreadable_cache_falls_back_to_generation() {
    let dir = tempfile::tempdir().unwrap();
    // a file where the cache directory should be
    let blocked = dir.path().join("cache");
    std::fs::write(&blocked, b"").unwrap();

    let backend = CountingBackend::default();
    let frame = cached_frame(&blocked, &backend, &[Some("positive"), Some("negative")]);
    let out = frame.sentiment("x", None, "", None).await.unwrap();
    assert_eq!(backend.calls(), 2);
    assert_eq!(
        out.table().column("sentiment").unwrap().values(),
        cells(&[Some("positive"), Some("negative")])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_cached_rows_on_a_spawned_task() {
    let dir = tempfile::tempdir().unwrap();
    let backend = CountingBackend::default();
    let items: Vec<String> = (0..16).map(|i| format!("row {i}")).collect();
    let items: Vec<Option<&str>> = items.iter().map(|s| Some(s.as_str())).collect();
    let frame = cached_frame(dir.path(), &backend, &items).concurrency(4);

    let spawned = frame.clone();
    let first = tokio::spawn(async move { spawned.summarize("x", None, "", None).await })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(backend.calls(), 16);
    assert_eq!(count_files(dir.path()), 16);

    let second = frame.summarize("x", None, "", None).await.unwrap();
    assert_eq!(backend.calls(), 16);
    assert_eq!(first.table(), second.table());
    assert_eq!(
        second.table().column("summary").unwrap().values(),
        cells(&items)
    );
}
