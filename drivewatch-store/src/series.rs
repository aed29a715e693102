// SPDX-License-Identifier: GPL-3.0-only

//! One device's ordered record series and its backing segment file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use drivewatch_contracts::HealthError;
use drivewatch_types::HealthRecord;

/// Ordered record index plus the append handle for one device.
///
/// The inner mutex is the per-device write serialization point; the
/// containing `MetricsLog` never holds a lock across devices.
pub(crate) struct DeviceSeries {
    wwn: String,
    path: PathBuf,
    state: Mutex<BTreeMap<DateTime<Utc>, HealthRecord>>,
}

/// Build the segment filename for a device key. WWNs are hex strings in
/// practice, but fallback ids may carry separators that filesystems reject.
fn segment_name(wwn: &str) -> String {
    let safe: String = wwn
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}.jsonl")
}

impl DeviceSeries {
    pub(crate) fn create(root: &Path, wwn: &str) -> Self {
        Self {
            wwn: wwn.to_string(),
            path: root.join(segment_name(wwn)),
            state: Mutex::new(BTreeMap::new()),
        }
    }

    /// Rebuild a series from an existing segment. Returns `None` when the
    /// segment holds no parseable record (e.g., only a torn line).
    pub(crate) async fn replay(path: &Path) -> Result<Option<Self>, HealthError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HealthError::store(format!("read segment {}: {e}", path.display())))?;

        let mut records: BTreeMap<DateTime<Utc>, HealthRecord> = BTreeMap::new();
        let mut wwn: Option<String> = None;
        let mut offset = 0u64;
        let mut keep = contents.len() as u64;
        for segment in contents.split_inclusive('\n') {
            let complete = segment.ends_with('\n');
            let line = segment.trim();
            if !line.is_empty() {
                match serde_json::from_str::<HealthRecord>(line) {
                    Ok(record) => {
                        wwn.get_or_insert_with(|| record.wwn.clone());
                        // last-write-wins per timestamp
                        records.insert(record.collected_at, record);
                    }
                    Err(e) if complete => {
                        tracing::warn!(
                            segment = %path.display(),
                            error = %e,
                            "skipping unparseable segment line"
                        );
                    }
                    Err(e) => {
                        // Interrupted append left a torn tail. Cut it off so
                        // the next append starts on a fresh line instead of
                        // fusing with the torn bytes.
                        tracing::warn!(
                            segment = %path.display(),
                            error = %e,
                            "truncating torn trailing line"
                        );
                        keep = offset;
                    }
                }
            }
            offset += segment.len() as u64;
        }

        if keep < contents.len() as u64 {
            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .open(path)
                .await
                .map_err(|e| {
                    HealthError::store(format!("open segment {}: {e}", path.display()))
                })?;
            file.set_len(keep)
                .await
                .map_err(|e| HealthError::store(format!("truncate torn tail: {e}")))?;
            file.sync_data()
                .await
                .map_err(|e| HealthError::store(format!("sync segment: {e}")))?;
        } else if !contents.is_empty() && !contents.ends_with('\n') {
            // Parseable tail without its newline: supply the terminator so
            // the next append cannot fuse with it.
            let mut file = tokio::fs::OpenOptions::new()
                .append(true)
                .open(path)
                .await
                .map_err(|e| {
                    HealthError::store(format!("open segment {}: {e}", path.display()))
                })?;
            file.write_all(b"\n")
                .await
                .map_err(|e| HealthError::store(format!("terminate segment tail: {e}")))?;
            file.sync_data()
                .await
                .map_err(|e| HealthError::store(format!("sync segment: {e}")))?;
        }

        Ok(wwn.map(|wwn| Self {
            wwn,
            path: path.to_path_buf(),
            state: Mutex::new(records),
        }))
    }

    pub(crate) fn wwn(&self) -> &str {
        &self.wwn
    }

    /// Durable upsert: the index is only updated once the line is on disk,
    /// so a failed write leaves no partial record behind.
    pub(crate) async fn append(&self, record: HealthRecord) -> Result<HealthRecord, HealthError> {
        let line = serde_json::to_string(&record)
            .map_err(|e| HealthError::store(format!("encode record: {e}")))?;

        let mut records = self.state.lock().await;
        if records.get(&record.collected_at) == Some(&record) {
            // Identical snapshot re-ingested: no-op, keep the segment clean.
            return Ok(record);
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| HealthError::store(format!("open segment {}: {e}", self.path.display())))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| HealthError::store(format!("append segment: {e}")))?;
        file.write_all(b"\n")
            .await
            .map_err(|e| HealthError::store(format!("append segment: {e}")))?;
        file.sync_data()
            .await
            .map_err(|e| HealthError::store(format!("sync segment: {e}")))?;

        records.insert(record.collected_at, record.clone());
        Ok(record)
    }

    pub(crate) async fn latest(&self) -> Option<HealthRecord> {
        let records = self.state.lock().await;
        records.values().next_back().cloned()
    }

    pub(crate) async fn history(&self, window: Option<usize>) -> Vec<HealthRecord> {
        let records = self.state.lock().await;
        let skip = match window {
            Some(window) => records.len().saturating_sub(window),
            None => 0,
        };
        records.values().skip(skip).cloned().collect()
    }
}
