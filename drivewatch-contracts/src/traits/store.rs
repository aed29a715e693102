// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;

use drivewatch_types::HealthRecord;

use crate::HealthError;

/// Read/write contract of the per-device metrics store.
///
/// Implementations must serialize writes per device while keeping distinct
/// devices free of contention, and must expose records to readers in
/// ascending `collected_at` order.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Insert the record, or overwrite in place if one already exists for
    /// the same `(wwn, collected_at)`. Returns the stored record.
    async fn append(&self, record: HealthRecord) -> Result<HealthRecord, HealthError>;

    /// Most recent record for the device, or `None` if the device is
    /// unknown to the store.
    async fn latest(&self, wwn: &str) -> Result<Option<HealthRecord>, HealthError>;

    /// Records for the device ascending by `collected_at`, optionally
    /// limited to the last `window` entries.
    async fn history(
        &self,
        wwn: &str,
        window: Option<usize>,
    ) -> Result<Vec<HealthRecord>, HealthError>;
}
