// SPDX-License-Identifier: GPL-3.0-only

//! Durable per-device metrics log
//!
//! One JSON-lines segment file per device under a data directory. Every
//! append is one whole line; replay on open is last-write-wins per
//! `(wwn, collected_at)`, so an in-place overwrite is simply a superseding
//! line and a torn trailing line from a crashed write never surfaces.
//!
//! Concurrency contract: writes for the same device serialize on that
//! device's own lock, writes for distinct devices never contend, and
//! readers always observe records in ascending `collected_at` order.

mod series;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use drivewatch_contracts::{HealthError, MetricsStore};
use drivewatch_types::HealthRecord;

use series::DeviceSeries;

/// Append-only health-record store backed by one segment file per device.
pub struct MetricsLog {
    root: PathBuf,
    devices: RwLock<HashMap<String, Arc<DeviceSeries>>>,
}

impl MetricsLog {
    /// Open (or create) a metrics log rooted at `root`, replaying any
    /// existing device segments.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, HealthError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| HealthError::store(format!("create data dir: {e}")))?;

        let mut devices = HashMap::new();
        let mut entries = tokio::fs::read_dir(&root)
            .await
            .map_err(|e| HealthError::store(format!("read data dir: {e}")))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| HealthError::store(format!("scan data dir: {e}")))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
                continue;
            }
            match DeviceSeries::replay(&path).await {
                Ok(Some(series)) => {
                    tracing::debug!(segment = %path.display(), wwn = %series.wwn(), "replayed device segment");
                    devices.insert(series.wwn().to_string(), Arc::new(series));
                }
                Ok(None) => {
                    tracing::warn!(segment = %path.display(), "empty device segment, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(root = %root.display(), devices = devices.len(), "metrics log opened");
        Ok(Self {
            root,
            devices: RwLock::new(devices),
        })
    }

    /// Number of devices with at least one stored record.
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }

    fn series_for(&self, wwn: &str) -> Option<Arc<DeviceSeries>> {
        self.devices.read().get(wwn).cloned()
    }

    fn series_or_create(&self, wwn: &str) -> Arc<DeviceSeries> {
        if let Some(series) = self.series_for(wwn) {
            return series;
        }
        let mut devices = self.devices.write();
        devices
            .entry(wwn.to_string())
            .or_insert_with(|| Arc::new(DeviceSeries::create(&self.root, wwn)))
            .clone()
    }
}

#[async_trait]
impl MetricsStore for MetricsLog {
    async fn append(&self, record: HealthRecord) -> Result<HealthRecord, HealthError> {
        let series = self.series_or_create(&record.wwn);
        series.append(record).await
    }

    async fn latest(&self, wwn: &str) -> Result<Option<HealthRecord>, HealthError> {
        match self.series_for(wwn) {
            Some(series) => Ok(series.latest().await),
            None => Ok(None),
        }
    }

    async fn history(
        &self,
        wwn: &str,
        window: Option<usize>,
    ) -> Result<Vec<HealthRecord>, HealthError> {
        match self.series_for(wwn) {
            Some(series) => Ok(series.history(window).await),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use drivewatch_types::{DeviceType, HealthStatus};

    fn record(wwn: &str, minute: u32, status: HealthStatus) -> HealthRecord {
        HealthRecord {
            wwn: wwn.to_string(),
            collected_at: Utc.with_ymd_and_hms(2021, 10, 5, 12, minute, 0).unwrap(),
            device_type: DeviceType::Ata,
            attributes: Vec::new(),
            overall_status: status,
            temperature_celsius: None,
            power_on_hours: None,
            power_cycle_count: None,
        }
    }

    #[tokio::test]
    async fn append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::open(dir.path()).await.unwrap();

        log.append(record("0xaaa", 0, HealthStatus::Passed)).await.unwrap();
        log.append(record("0xaaa", 1, HealthStatus::Failed)).await.unwrap();

        let latest = log.latest("0xaaa").await.unwrap().unwrap();
        assert_eq!(latest.overall_status, HealthStatus::Failed);
        assert_eq!(log.history("0xaaa", None).await.unwrap().len(), 2);
        assert!(log.latest("0xbbb").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reingestion_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::open(dir.path()).await.unwrap();

        let snap = record("0xaaa", 0, HealthStatus::Passed);
        log.append(snap.clone()).await.unwrap();
        log.append(snap.clone()).await.unwrap();

        let history = log.history("0xaaa", None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], snap);
    }

    #[tokio::test]
    async fn overwrite_in_place_revises_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::open(dir.path()).await.unwrap();

        log.append(record("0xaaa", 0, HealthStatus::Passed)).await.unwrap();
        log.append(record("0xaaa", 0, HealthStatus::Failed)).await.unwrap();

        let history = log.history("0xaaa", None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].overall_status, HealthStatus::Failed);
    }

    #[tokio::test]
    async fn history_window_returns_last_entries() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetricsLog::open(dir.path()).await.unwrap();

        for minute in 0..10 {
            log.append(record("0xaaa", minute, HealthStatus::Passed))
                .await
                .unwrap();
        }

        let window = log.history("0xaaa", Some(3)).await.unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].collected_at.format("%M").to_string(), "07");
        assert!(window.windows(2).all(|w| w[0].collected_at < w[1].collected_at));
    }
}
