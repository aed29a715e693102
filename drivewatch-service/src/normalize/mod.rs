// SPDX-License-Identifier: GPL-3.0-only

//! Device-family-aware payload normalization
//!
//! Turns the three incompatible smartctl-style wire payloads (ATA attribute
//! tables, SCSI log pages, NVMe health log) into one canonical
//! `HealthRecord`. Parsing is side-effect free; persistence belongs to the
//! caller.

mod ata;
mod nvme;
pub mod reference;
mod scsi;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use drivewatch_contracts::HealthError;
use drivewatch_types::{DeviceType, HealthRecord, HealthStatus, SmartAttribute};

/// Family-specific parse output folded into the canonical record.
#[derive(Debug)]
pub(crate) struct ParsedSection {
    pub attributes: Vec<SmartAttribute>,
    /// Threshold rules tripped; overrides the self-reported status bit
    pub forced_failure: bool,
    pub temperature_celsius: Option<i64>,
    pub power_on_hours: Option<u64>,
    pub power_cycle_count: Option<u64>,
}

/// Normalize one raw telemetry payload into a `HealthRecord`.
///
/// `expected` is the device type from a previous registration, when known:
/// a payload whose envelope discriminator disagrees with it is rejected. A
/// payload without a discriminator falls back to `expected`.
pub fn normalize(
    expected: Option<DeviceType>,
    wwn: &str,
    payload: &Value,
) -> Result<HealthRecord, HealthError> {
    let device_type = resolve_device_type(expected, payload)?;
    let collected_at = collected_at(payload)?;
    let self_reported = payload
        .pointer("/smart_status/passed")
        .and_then(Value::as_bool);

    let section = match device_type {
        DeviceType::Ata => ata::parse(payload)?,
        DeviceType::Scsi => scsi::parse(payload)?,
        DeviceType::Nvme => nvme::parse(payload)?,
    };

    let overall_status = if section.forced_failure {
        HealthStatus::Failed
    } else {
        match self_reported {
            Some(true) => HealthStatus::Passed,
            Some(false) => HealthStatus::Failed,
            None => HealthStatus::Unknown,
        }
    };

    Ok(HealthRecord {
        wwn: wwn.to_string(),
        collected_at,
        device_type,
        attributes: section.attributes,
        overall_status,
        temperature_celsius: section.temperature_celsius,
        power_on_hours: section.power_on_hours,
        power_cycle_count: section.power_cycle_count,
    })
}

fn resolve_device_type(
    expected: Option<DeviceType>,
    payload: &Value,
) -> Result<DeviceType, HealthError> {
    let declared = payload
        .pointer("/device/protocol")
        .and_then(Value::as_str);

    match (declared, expected) {
        (Some(raw), _) => {
            let declared: DeviceType = raw
                .parse()
                .map_err(|e: String| HealthError::unsupported_device(e))?;
            if let Some(expected) = expected
                && expected != declared
            {
                return Err(HealthError::validation(format!(
                    "payload declares protocol {declared} but device is registered as {expected}"
                )));
            }
            Ok(declared)
        }
        (None, Some(expected)) => Ok(expected),
        (None, None) => Err(HealthError::validation(
            "payload carries no device.protocol and the device is not registered",
        )),
    }
}

fn collected_at(payload: &Value) -> Result<DateTime<Utc>, HealthError> {
    let time_t = payload
        .pointer("/local_time/time_t")
        .and_then(Value::as_i64)
        .ok_or_else(|| HealthError::validation("missing or malformed local_time.time_t"))?;
    Utc.timestamp_opt(time_t, 0)
        .single()
        .ok_or_else(|| HealthError::validation(format!("local_time.time_t out of range: {time_t}")))
}
