mod support;

use std::sync::Arc;
use std::time::Duration;

use jobwatch::application::snapshot::{SnapshotOutcome, SnapshotPublisher, SnapshotSettings};
use jobwatch::application::stats::{StatsSettings, StatsStore};
use jobwatch::domain::MessageHandle;
use jobwatch::port::SinkError;

use support::{detection, MemoryStore, RecordingSink};

fn stats(store: &MemoryStore) -> Arc<StatsStore> {
    Arc::new(StatsStore::new(
        Arc::new(store.clone()),
        StatsSettings {
            max_history: 50,
            reset_interval: chrono::Duration::hours(24),
            place_id: "109983668079237".to_string(),
        },
    ))
}

fn publisher(sink: &RecordingSink, stats: &Arc<StatsStore>, interval: Duration) -> SnapshotPublisher {
    SnapshotPublisher::new(
        Arc::new(sink.clone()),
        Arc::clone(stats),
        SnapshotSettings {
            interval,
            connect_retry: Duration::from_millis(10),
        },
    )
}

#[tokio::test]
async fn edits_in_place_after_first_publish() {
    let store = MemoryStore::new();
    let stats = stats(&store);
    let sink = RecordingSink::new();
    let publisher = publisher(&sink, &stats, Duration::from_secs(300));

    let first = publisher.refresh().await;
    let SnapshotOutcome::Published(handle) = first else {
        panic!("expected a new message, got {first:?}");
    };

    stats.record(&detection("Graipuss", "$2M/s", "job-1"));
    assert_eq!(publisher.refresh().await, SnapshotOutcome::Edited(handle));
    assert_eq!(publisher.refresh().await, SnapshotOutcome::Edited(handle));

    assert_eq!(sink.published(), 1);
    assert_eq!(sink.edits(), vec![handle, handle]);
    assert_eq!(
        store.stats().and_then(|s| s.stats_message_id),
        Some(handle)
    );
}

#[tokio::test]
async fn vanished_message_is_replaced() {
    let store = MemoryStore::new();
    let stats = stats(&store);
    stats.set_message_handle(MessageHandle(7));
    let sink = RecordingSink::new();
    sink.fail_next_edit(SinkError::MessageGone);
    let publisher = publisher(&sink, &stats, Duration::from_secs(300));

    let outcome = publisher.refresh().await;

    let SnapshotOutcome::Published(handle) = outcome else {
        panic!("expected a replacement, got {outcome:?}");
    };
    assert_ne!(handle, MessageHandle(7));
    assert_eq!(stats.message_handle(), Some(handle));
}

#[tokio::test]
async fn transient_edit_failure_keeps_handle() {
    let store = MemoryStore::new();
    let stats = stats(&store);
    stats.set_message_handle(MessageHandle(7));
    let sink = RecordingSink::new();
    sink.fail_next_edit(SinkError::Transport("timeout".into()));
    let publisher = publisher(&sink, &stats, Duration::from_secs(300));

    assert_eq!(publisher.refresh().await, SnapshotOutcome::Failed);
    assert_eq!(sink.published(), 0);
    assert_eq!(stats.message_handle(), Some(MessageHandle(7)));

    assert_eq!(
        publisher.refresh().await,
        SnapshotOutcome::Edited(MessageHandle(7))
    );
}

#[tokio::test]
async fn loop_publishes_then_edits_until_shutdown() {
    let store = MemoryStore::new();
    let stats = stats(&store);
    let sink = RecordingSink::new();
    let (tx, rx) = tokio::sync::watch::channel(false);
    let handle = publisher(&sink, &stats, Duration::from_millis(20)).start(rx);

    for _ in 0..200 {
        if sink.edits().len() >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("snapshot loop did not stop")
        .unwrap();

    assert_eq!(sink.published(), 1);
    assert!(sink.edits().len() >= 2);
}
