// SPDX-License-Identifier: GPL-3.0-only

//! NVMe payload parsing: the fixed health information log replaces the
//! indexed-attribute model.

use serde_json::Value;

use drivewatch_contracts::HealthError;
use drivewatch_types::SmartAttribute;

use super::ParsedSection;

/// A device reporting this much wear is failed regardless of status bit.
const PERCENTAGE_USED_LIMIT: i64 = 100;

/// Health-log counters lifted verbatim into canonical attributes.
const COUNTERS: &[&str] = &[
    "available_spare",
    "media_errors",
    "num_err_log_entries",
    "power_on_hours",
    "power_cycles",
    "unsafe_shutdowns",
];

pub(super) fn parse(payload: &Value) -> Result<ParsedSection, HealthError> {
    let log = payload
        .get("nvme_smart_health_information_log")
        .ok_or_else(|| HealthError::validation("missing nvme_smart_health_information_log"))?;

    let critical_warning = log
        .get("critical_warning")
        .and_then(Value::as_i64)
        .ok_or_else(|| HealthError::validation("health log without critical_warning"))?;
    let percentage_used = log.get("percentage_used").and_then(Value::as_i64).unwrap_or(0);

    let mut forced_failure = false;
    let mut attributes = Vec::new();

    // Any set bit in the critical-warning mask (spare capacity, reliability
    // degraded, read-only mode, volatile memory backup failed) is terminal.
    let mut warning = SmartAttribute::counter("critical_warning", critical_warning);
    warning.failing = critical_warning != 0;
    forced_failure |= warning.failing;
    attributes.push(warning);

    let mut used = SmartAttribute::counter("percentage_used", percentage_used);
    used.failing = percentage_used >= PERCENTAGE_USED_LIMIT;
    forced_failure |= used.failing;
    attributes.push(used);

    let temperature_celsius = log.get("temperature").and_then(Value::as_i64);
    if let Some(temperature) = temperature_celsius {
        attributes.push(SmartAttribute::counter("temperature", temperature));
    }

    for name in COUNTERS {
        if let Some(value) = log.get(*name).and_then(Value::as_i64) {
            attributes.push(SmartAttribute::counter(*name, value));
        }
    }

    let power_on_hours = log.get("power_on_hours").and_then(Value::as_u64);
    let power_cycle_count = log.get("power_cycles").and_then(Value::as_u64);

    Ok(ParsedSection {
        attributes,
        forced_failure,
        temperature_celsius,
        power_on_hours,
        power_cycle_count,
    })
}
