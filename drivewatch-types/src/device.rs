// SPDX-License-Identifier: GPL-3.0-only

//! Device identity and summary models
//!
//! A device is keyed by its WWN (or a vendor-assigned fallback id for SCSI
//! drives that report none). Everything else on the identity is descriptive
//! metadata that may be refreshed on re-registration; the key never changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::HealthRecord;

/// Disk family a device belongs to.
///
/// Closed set: adding a family means a new variant and a new normalizer arm,
/// not a new trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Ata,
    Scsi,
    Nvme,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Ata => write!(f, "ata"),
            DeviceType::Scsi => write!(f, "scsi"),
            DeviceType::Nvme => write!(f, "nvme"),
        }
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ata" | "sata" => Ok(DeviceType::Ata),
            "scsi" | "sas" => Ok(DeviceType::Scsi),
            "nvme" => Ok(DeviceType::Nvme),
            other => Err(format!("unknown device family: {other}")),
        }
    }
}

/// A monitored device as known to the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// World Wide Name, the primary identifier. SCSI devices without a WWN
    /// use a vendor-assigned id in the same field.
    pub wwn: String,

    /// Disk family, used to pick the normalizer arm
    pub device_type: DeviceType,

    /// Kernel device name (e.g., "/dev/sda")
    #[serde(default)]
    pub device_name: String,

    /// Manufacturer name
    #[serde(default)]
    pub manufacturer: String,

    /// Model name
    #[serde(default)]
    pub model_name: String,

    /// Serial number
    #[serde(default)]
    pub serial_number: String,

    /// Firmware revision
    #[serde(default)]
    pub firmware: String,

    /// Total capacity in bytes, if reported
    #[serde(default)]
    pub capacity_bytes: Option<u64>,

    /// Identifier of the host that pushes telemetry for this device
    #[serde(default)]
    pub host_id: Option<String>,
}

impl DeviceIdentity {
    /// Minimal identity derived from a telemetry envelope alone.
    pub fn minimal(wwn: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            wwn: wwn.into(),
            device_type,
            device_name: String::new(),
            manufacturer: String::new(),
            model_name: String::new(),
            serial_number: String::new(),
            firmware: String::new(),
            capacity_bytes: None,
            host_id: None,
        }
    }

    /// Human-readable display name for the device
    pub fn display_name(&self) -> String {
        if !self.model_name.is_empty() {
            self.model_name.clone()
        } else if !self.device_name.is_empty() {
            self.device_name.clone()
        } else {
            self.wwn.clone()
        }
    }
}

/// Identity plus the latest stored verdict, in device-registration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceSummary {
    /// The registered device
    pub device: DeviceIdentity,

    /// Most recent health record, absent until first ingestion
    pub latest: Option<HealthRecord>,
}
