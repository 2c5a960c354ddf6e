// Tests for the analyze workflow: snapshot, analyze, store, flush

mod common;

use common::{
    at, orchestrator, shared_buffer, GatedAnalyzer, StubAnalyzer, StubStorage, ALLOWED_CHAT,
    OTHER_CHAT,
};
use daily_insights::storage::LocalStorage;
use daily_insights::{AnalyzeOutcome, Collector, InsightError, LinkKind, StorageLink};
use std::sync::Arc;
use tempfile::TempDir;

fn collector(buffer: &daily_insights::SharedBuffer) -> Collector {
    Collector::new(Arc::clone(buffer), ALLOWED_CHAT, Vec::new())
}

#[tokio::test]
async fn test_example_day() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let analyzer = StubAnalyzer::ok("Energy dips post-lunch");
    let storage = StubStorage::ok();
    let orchestrator = orchestrator(&buffer, analyzer.clone(), storage.clone());

    collector.record("Felt focused in the morning", at(9, 0)).await;
    collector.record("Tired after lunch", at(14, 0)).await;

    let outcome = orchestrator.analyze_at(at(21, 0)).await.unwrap();
    let reply = outcome.reply().expect("analysis should have run");

    assert_eq!(reply.summary, "Energy dips post-lunch");
    assert_eq!(
        reply.links,
        vec![
            StorageLink {
                url: "L1".to_string(),
                kind: LinkKind::RawInput
            },
            StorageLink {
                url: "L2".to_string(),
                kind: LinkKind::Insight
            },
        ]
    );
    assert!(reply.warnings.is_empty());
    assert_eq!(reply.entry_count, 2);
    assert!(buffer.lock().await.is_empty());

    // Analyzer saw the notes in order
    let inputs = analyzer.inputs.lock().unwrap();
    assert_eq!(
        inputs[0],
        "[09:00] Felt focused in the morning\n[14:00] Tired after lunch"
    );

    // Raw notes and summary were stored under names tagged with the flush
    let tag = &reply.flush_id.simple().to_string()[..8];
    let uploads = storage.uploads.lock().unwrap();
    assert_eq!(uploads[0].0, inputs[0]);
    assert_eq!(uploads[0].1, format!("2025-10-28_2100_{}_notes.txt", tag));
    assert_eq!(uploads[1].0, "Energy dips post-lunch");
    assert_eq!(uploads[1].1, format!("2025-10-28_2100_{}_insights.md", tag));
}

#[tokio::test]
async fn test_same_minute_flushes_keep_separate_files() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let storage = Arc::new(LocalStorage::new(temp_dir.path().to_path_buf()));
    let orchestrator = orchestrator(&buffer, StubAnalyzer::ok("Summary"), storage);

    collector.record("first batch", at(21, 0)).await;
    let first = orchestrator.analyze_at(at(21, 0)).await?;

    collector.record("second batch", at(21, 0)).await;
    let second = orchestrator.analyze_at(at(21, 0)).await?;

    let first_raw = &first.reply().unwrap().links[0];
    let second_raw = &second.reply().unwrap().links[0];
    assert_eq!(first_raw.kind, LinkKind::RawInput);
    assert_ne!(first_raw.url, second_raw.url);

    let read = |url: &str| std::fs::read_to_string(url.trim_start_matches("file://"));
    assert_eq!(read(&first_raw.url)?, "[21:00] first batch");
    assert_eq!(read(&second_raw.url)?, "[21:00] second batch");
    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 4);

    Ok(())
}

#[tokio::test]
async fn test_empty_buffer_makes_no_external_calls() {
    let buffer = shared_buffer();
    let analyzer = StubAnalyzer::ok("unused");
    let storage = StubStorage::ok();
    let orchestrator = orchestrator(&buffer, analyzer.clone(), storage.clone());

    let outcome = orchestrator.analyze_at(at(21, 0)).await.unwrap();

    assert_eq!(outcome, AnalyzeOutcome::NothingCollected);
    assert_eq!(analyzer.calls(), 0);
    assert_eq!(storage.calls(), 0);
}

#[tokio::test]
async fn test_analyzer_failure_keeps_buffer() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let analyzer = StubAnalyzer::failing("quota exhausted");
    let storage = StubStorage::ok();
    let orchestrator = orchestrator(&buffer, analyzer.clone(), storage.clone());

    collector.record("one", at(9, 0)).await;
    collector.record("two", at(10, 0)).await;

    let err = orchestrator.analyze_at(at(21, 0)).await.unwrap_err();

    assert!(matches!(err, InsightError::Analysis(_)));
    assert_eq!(err.stage(), "analysis");
    assert!(err.is_retryable());
    assert_eq!(buffer.lock().await.len(), 2);
    assert_eq!(storage.calls(), 0);

    // Retrying hands the same notes to the analyzer again
    let _ = orchestrator.analyze_at(at(21, 5)).await;
    let inputs = analyzer.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0], inputs[1]);
}

#[tokio::test]
async fn test_storage_failure_still_returns_summary() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let storage = StubStorage::failing();
    let orchestrator = orchestrator(&buffer, StubAnalyzer::ok("Busy day"), storage.clone());

    collector.record("note", at(9, 0)).await;

    let outcome = orchestrator.analyze_at(at(21, 0)).await.unwrap();
    let reply = outcome.reply().unwrap();

    assert_eq!(reply.summary, "Busy day");
    assert!(reply.links.is_empty());
    assert_eq!(reply.warnings.len(), 2);
    assert!(reply.warnings[0].contains("quota exceeded"));
    assert_eq!(storage.calls(), 2);
    assert!(buffer.lock().await.is_empty());
}

#[tokio::test]
async fn test_partial_storage_failure() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let storage = StubStorage::failing_for(&[LinkKind::Insight]);
    let orchestrator = orchestrator(&buffer, StubAnalyzer::ok("Summary"), storage);

    collector.record("note", at(9, 0)).await;

    let outcome = orchestrator.analyze_at(at(21, 0)).await.unwrap();
    let reply = outcome.reply().unwrap();

    assert_eq!(reply.links.len(), 1);
    assert_eq!(reply.links[0].kind, LinkKind::RawInput);
    assert_eq!(reply.warnings.len(), 1);
    assert!(reply.warnings[0].starts_with("Insights not saved"));
}

#[tokio::test]
async fn test_second_analyze_finds_nothing() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let analyzer = StubAnalyzer::ok("Summary");
    let orchestrator = orchestrator(&buffer, analyzer.clone(), StubStorage::ok());

    collector.record("note", at(9, 0)).await;

    let first = orchestrator.analyze_at(at(21, 0)).await.unwrap();
    assert_eq!(first.reply().unwrap().links.len(), 2);

    let second = orchestrator.analyze_at(at(21, 1)).await.unwrap();
    assert_eq!(second, AnalyzeOutcome::NothingCollected);
    assert_eq!(analyzer.calls(), 1);
}

#[tokio::test]
async fn test_foreign_sender_is_rejected_without_side_effects() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let analyzer = StubAnalyzer::ok("Summary");
    let storage = StubStorage::ok();
    let orchestrator = orchestrator(&buffer, analyzer.clone(), storage.clone());

    collector.record("note", at(9, 0)).await;

    let err = orchestrator
        .handle_analyze_at(OTHER_CHAT, at(21, 0))
        .await
        .unwrap_err();

    assert_eq!(err, InsightError::Permission(OTHER_CHAT));
    assert_eq!(buffer.lock().await.len(), 1);
    assert_eq!(analyzer.calls(), 0);
    assert_eq!(storage.calls(), 0);
}

#[tokio::test]
async fn test_allowed_sender_runs_analysis() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let orchestrator = orchestrator(&buffer, StubAnalyzer::ok("Summary"), StubStorage::ok());

    collector.record("note", at(9, 0)).await;

    let outcome = orchestrator
        .handle_analyze_at(ALLOWED_CHAT, at(21, 0))
        .await
        .unwrap();
    assert!(outcome.reply().is_some());
}

#[tokio::test]
async fn test_previous_day_is_not_analyzed() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let analyzer = StubAnalyzer::ok("Summary");
    let orchestrator = orchestrator(&buffer, analyzer.clone(), StubStorage::ok());

    collector.record("yesterday", at(20, 0)).await;

    let next_day = at(20, 0) + chrono::Duration::days(1);
    let outcome = orchestrator.analyze_at(next_day).await.unwrap();

    assert_eq!(outcome, AnalyzeOutcome::NothingCollected);
    assert_eq!(analyzer.calls(), 0);
    assert!(buffer.lock().await.is_empty());
}

#[tokio::test]
async fn test_record_during_analysis_is_kept() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let analyzer = GatedAnalyzer::new();
    let orchestrator = Arc::new(orchestrator(&buffer, analyzer.clone(), StubStorage::ok()));

    collector.record("before", at(9, 0)).await;

    let running = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.analyze_at(at(21, 0)).await })
    };

    analyzer.entered.notified().await;
    collector.record("during", at(21, 0)).await;
    analyzer.release.notify_one();

    let outcome = running.await.unwrap().unwrap();
    assert_eq!(outcome.reply().unwrap().entry_count, 1);

    let buffer = buffer.lock().await;
    assert_eq!(buffer.len(), 1);
    assert_eq!(buffer.entries()[0].text, "during");
}

#[tokio::test]
async fn test_stats_reports_pending_entries() {
    let buffer = shared_buffer();
    let collector = collector(&buffer);
    let orchestrator = orchestrator(&buffer, StubAnalyzer::ok("Summary"), StubStorage::ok());

    collector.record("a", at(9, 0)).await;
    collector.record("b", at(10, 0)).await;

    let stats = orchestrator.stats_at(at(11, 0)).await;
    assert_eq!(stats.entry_count, 2);
    assert_eq!(stats.last_at, Some(at(10, 0)));
}
