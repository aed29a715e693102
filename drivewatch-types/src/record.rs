// SPDX-License-Identifier: GPL-3.0-only

//! Canonical health snapshot models
//!
//! One `HealthRecord` per `(wwn, collected_at)` pair, regardless of device
//! family. ATA and SCSI contribute indexed attribute rows; NVMe contributes
//! a fixed set of named health-log counters in the same attribute shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::device::DeviceType;

/// Overall verdict attached to one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Passed,
    Failed,
    Unknown,
}

impl HealthStatus {
    pub fn is_failed(self) -> bool {
        matches!(self, HealthStatus::Failed)
    }
}

/// ATA attribute classification from the reference table.
///
/// A threshold breach on a `PreFail` attribute implies imminent failure;
/// `OldAge` breaches are informational aging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    PreFail,
    OldAge,
}

/// One attribute row of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmartAttribute {
    /// Attribute id for indexed (ATA/SCSI) tables; NVMe counters carry none
    pub id: Option<u16>,

    /// Attribute name (e.g., "Reallocated_Sector_Ct", "percentage_used")
    pub name: String,

    /// Raw value (interpretation depends on the attribute)
    pub raw_value: i64,

    /// Current normalized value (ATA: 1-253, higher is healthier)
    pub normalized_value: Option<i64>,

    /// Worst normalized value seen
    pub worst: Option<i64>,

    /// Failure threshold (attribute fails when normalized <= threshold)
    pub threshold: Option<i64>,

    /// Device-reported failure history marker, verbatim when present
    pub when_failed: Option<String>,

    /// Classification from the reference table, ATA only
    pub kind: Option<AttributeKind>,

    /// Whether this attribute is failing its instantaneous test
    pub failing: bool,
}

impl SmartAttribute {
    /// A named counter without the indexed-attribute columns (NVMe, SCSI
    /// error counters).
    pub fn counter(name: impl Into<String>, raw_value: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            raw_value,
            normalized_value: None,
            worst: None,
            threshold: None,
            when_failed: None,
            kind: None,
            failing: false,
        }
    }
}

/// One normalized telemetry snapshot. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRecord {
    /// Device key, matching `DeviceIdentity::wwn`
    pub wwn: String,

    /// When the host collected the snapshot
    pub collected_at: DateTime<Utc>,

    /// Disk family the payload was parsed as
    pub device_type: DeviceType,

    /// Attribute rows, in payload order
    pub attributes: Vec<SmartAttribute>,

    /// Verdict: normalizer threshold rules, possibly escalated by the
    /// evaluator's trend rule before persistence
    pub overall_status: HealthStatus,

    /// Current temperature in Celsius, if reported
    pub temperature_celsius: Option<i64>,

    /// Total power-on hours, if reported
    pub power_on_hours: Option<u64>,

    /// Number of power cycles, if reported
    pub power_cycle_count: Option<u64>,
}

impl HealthRecord {
    /// Look up an attribute row by indexed id.
    pub fn attribute(&self, id: u16) -> Option<&SmartAttribute> {
        self.attributes.iter().find(|a| a.id == Some(id))
    }

    /// Look up an attribute row by name (NVMe counters, SCSI counters).
    pub fn attribute_named(&self, name: &str) -> Option<&SmartAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
