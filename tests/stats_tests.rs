mod support;

use std::sync::Arc;

use chrono::Duration;

use jobwatch::adapter::outbound::file::JsonFileStore;
use jobwatch::application::stats::{StatsSettings, StatsStore};
use jobwatch::domain::{Channel, MessageHandle};
use jobwatch::port::StateStore;

use support::{at, detection};

const MAX_HISTORY: usize = 50;

fn settings() -> StatsSettings {
    StatsSettings {
        max_history: MAX_HISTORY,
        reset_interval: Duration::hours(24),
        place_id: "109983668079237".to_string(),
    }
}

fn file_store(dir: &tempfile::TempDir) -> Arc<JsonFileStore> {
    Arc::new(JsonFileStore::new(
        dir.path().join("pool.json"),
        dir.path().join("cache.json"),
    ))
}

#[test]
fn history_is_bounded_and_most_recent_first() {
    let dir = tempfile::tempdir().unwrap();
    let stats = StatsStore::new(file_store(&dir), settings());

    for i in 0..MAX_HISTORY + 5 {
        let name = if i % 2 == 0 { "even" } else { "odd" };
        stats.record_at(&detection(name, "$2M/s", &format!("job-{i}")), at(i as i64));
    }

    let history = stats.history();
    assert_eq!(history.len(), MAX_HISTORY);
    assert_eq!(history[0].job_id, format!("job-{}", MAX_HISTORY + 4));
    assert_eq!(history[MAX_HISTORY - 1].job_id, "job-5");

    let report = stats.report_at(at(100));
    assert_eq!(report.total, (MAX_HISTORY + 5) as u64);
    assert_eq!(report.unique_names, 2);
    assert_eq!(report.tracked_jobs, MAX_HISTORY);
    assert_eq!(report.top_names[0], ("even".to_string(), 28));
}

#[test]
fn restart_continues_from_cache_file() {
    let dir = tempfile::tempdir().unwrap();

    let first = StatsStore::new(file_store(&dir), settings());
    first.record_at(&detection("Graipuss", "$2M/s", "job-1"), at(10));
    first.record_at(&detection("Graipuss", "$3M/s", "job-2"), at(20));
    assert_eq!(first.route(2_000_000.0), Some(Channel::RotationPrimary));
    first.set_message_handle(MessageHandle(4242));
    drop(first);

    let second = StatsStore::new(file_store(&dir), settings());
    second.restore();

    let state = second.state();
    assert_eq!(state.names.get("Graipuss"), Some(&2));
    assert_eq!(state.history.len(), 2);
    assert_eq!(state.history[0].job_id, "job-2");
    assert!(!state.router.use_first_channel);
    assert_eq!(second.message_handle(), Some(MessageHandle(4242)));
    assert_eq!(second.route(2_000_000.0), Some(Channel::RotationSecondary));
}

#[test]
fn reset_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);

    let stats = StatsStore::new(Arc::clone(&store) as Arc<dyn StateStore>, settings());
    stats.record_at(&detection("Graipuss", "$2M/s", "job-1"), at(0));
    stats.reset_at(at(3_600));
    let expected = stats.state();

    let persisted = store.load_stats().unwrap().expect("cache written");
    assert!(persisted.names.is_empty());
    assert!(persisted.history.is_empty());
    assert_eq!(persisted.last_reset, Some(at(3_600)));

    let restored = StatsStore::new(store, settings());
    restored.restore();
    let state = restored.state();
    assert_eq!(state.names, expected.names);
    assert_eq!(state.history, expected.history);
    assert_eq!(state.last_reset, expected.last_reset);
}

#[test]
fn scheduled_reset_fires_only_after_interval() {
    let dir = tempfile::tempdir().unwrap();
    let stats = StatsStore::new(file_store(&dir), settings());
    stats.reset_at(at(0));
    stats.record_at(&detection("Graipuss", "$2M/s", "job-1"), at(10));

    assert!(!stats.reset_if_due(at(86_399)));
    assert_eq!(stats.history().len(), 1);

    assert!(stats.reset_if_due(at(86_400)));
    assert!(stats.history().is_empty());
    assert_eq!(stats.state().last_reset, at(86_400));
    assert!(!stats.reset_if_due(at(86_401)));
}

#[test]
fn corrupt_cache_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cache.json"), "{ not json").unwrap();

    let stats = StatsStore::new(file_store(&dir), settings());
    stats.restore();

    assert!(stats.history().is_empty());
    assert!(stats.state().names.is_empty());
}
