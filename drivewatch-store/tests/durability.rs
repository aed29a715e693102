// SPDX-License-Identifier: GPL-3.0-only

//! Restart and concurrency behavior of the metrics log.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use drivewatch_contracts::MetricsStore;
use drivewatch_store::MetricsLog;
use drivewatch_types::{DeviceType, HealthRecord, HealthStatus};

fn record(wwn: &str, second: u32, status: HealthStatus) -> HealthRecord {
    HealthRecord {
        wwn: wwn.to_string(),
        collected_at: Utc
            .with_ymd_and_hms(2021, 10, 5, 12, second / 60, second % 60)
            .unwrap(),
        device_type: DeviceType::Ata,
        attributes: Vec::new(),
        overall_status: status,
        temperature_celsius: Some(30),
        power_on_hours: Some(1000 + u64::from(second)),
        power_cycle_count: Some(4),
    }
}

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let log = MetricsLog::open(dir.path()).await.unwrap();
        log.append(record("0xaaa", 0, HealthStatus::Passed)).await.unwrap();
        log.append(record("0xaaa", 1, HealthStatus::Passed)).await.unwrap();
        log.append(record("0xbbb", 0, HealthStatus::Failed)).await.unwrap();
    }

    let log = MetricsLog::open(dir.path()).await.unwrap();
    assert_eq!(log.device_count(), 2);
    assert_eq!(log.history("0xaaa", None).await.unwrap().len(), 2);
    let latest = log.latest("0xbbb").await.unwrap().unwrap();
    assert_eq!(latest.overall_status, HealthStatus::Failed);
}

#[tokio::test]
async fn superseding_line_wins_on_replay() {
    let dir = tempfile::tempdir().unwrap();

    {
        let log = MetricsLog::open(dir.path()).await.unwrap();
        log.append(record("0xaaa", 0, HealthStatus::Passed)).await.unwrap();
        log.append(record("0xaaa", 0, HealthStatus::Failed)).await.unwrap();
    }

    let log = MetricsLog::open(dir.path()).await.unwrap();
    let history = log.history("0xaaa", None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].overall_status, HealthStatus::Failed);
}

#[tokio::test]
async fn torn_trailing_line_is_skipped() {
    let dir = tempfile::tempdir().unwrap();

    {
        let log = MetricsLog::open(dir.path()).await.unwrap();
        log.append(record("0xaaa", 0, HealthStatus::Passed)).await.unwrap();
    }

    // Simulate a crash mid-append: a half-written JSON line at the tail.
    let segment = dir.path().join("0xaaa.jsonl");
    let mut contents = std::fs::read_to_string(&segment).unwrap();
    contents.push_str("{\"wwn\":\"0xaaa\",\"collected_at\":\"2021-10-0");
    std::fs::write(&segment, contents).unwrap();

    let log = MetricsLog::open(dir.path()).await.unwrap();
    let history = log.history("0xaaa", None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].overall_status, HealthStatus::Passed);
}

#[tokio::test]
async fn append_after_torn_tail_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let log = MetricsLog::open(dir.path()).await.unwrap();
        log.append(record("0xaaa", 0, HealthStatus::Passed)).await.unwrap();
    }

    // Crash mid-append: torn bytes with no trailing newline.
    let segment = dir.path().join("0xaaa.jsonl");
    let mut contents = std::fs::read_to_string(&segment).unwrap();
    contents.push_str("{\"wwn\":\"0xaaa\",\"collected_at\":\"2021-10-0");
    std::fs::write(&segment, contents).unwrap();

    // An append acknowledged after the crash must not be lost to the torn
    // tail on the next replay.
    {
        let log = MetricsLog::open(dir.path()).await.unwrap();
        log.append(record("0xaaa", 1, HealthStatus::Failed)).await.unwrap();
        assert_eq!(log.history("0xaaa", None).await.unwrap().len(), 2);
    }

    let log = MetricsLog::open(dir.path()).await.unwrap();
    let history = log.history("0xaaa", None).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].overall_status, HealthStatus::Failed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_ingests_stay_ordered_per_device() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(MetricsLog::open(dir.path()).await.unwrap());

    // Submit snapshots for two devices from many tasks at once, in no
    // particular order.
    let mut handles = Vec::new();
    for second in (0..40u32).rev() {
        let log = Arc::clone(&log);
        handles.push(tokio::spawn(async move {
            let wwn = if second % 2 == 0 { "0xaaa" } else { "0xbbb" };
            log.append(record(wwn, second, HealthStatus::Passed)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for wwn in ["0xaaa", "0xbbb"] {
        let history = log.history(wwn, None).await.unwrap();
        assert_eq!(history.len(), 20);
        assert!(
            history
                .windows(2)
                .all(|w| w[0].collected_at < w[1].collected_at),
            "history for {wwn} must ascend by collected_at"
        );
    }
}
