// SPDX-License-Identifier: GPL-3.0-only

//! SCSI payload parsing: grown defect list and error counter log pages.

use serde_json::Value;

use drivewatch_contracts::HealthError;
use drivewatch_types::SmartAttribute;

use super::ParsedSection;

/// Counters above these values force a failure verdict. Zero tolerance:
/// a single grown defect or uncorrected error fails the device.
const GROWN_DEFECT_TOLERANCE: i64 = 0;
const UNCORRECTED_TOLERANCE: i64 = 0;

pub(super) fn parse(payload: &Value) -> Result<ParsedSection, HealthError> {
    // Either page may be absent on older drives, but a payload carrying
    // neither has nothing to normalize.
    let defects = payload.get("scsi_grown_defect_list").and_then(Value::as_i64);
    let counter_log = payload.get("scsi_error_counter_log");
    if defects.is_none() && counter_log.is_none() {
        return Err(HealthError::validation(
            "missing scsi_grown_defect_list and scsi_error_counter_log",
        ));
    }

    let mut attributes = Vec::new();
    let mut forced_failure = false;

    if let Some(defects) = defects {
        let failing = defects > GROWN_DEFECT_TOLERANCE;
        forced_failure |= failing;
        let mut attribute = SmartAttribute::counter("scsi_grown_defect_list", defects);
        attribute.failing = failing;
        attributes.push(attribute);
    }

    for op in ["read", "write", "verify"] {
        let Some(counter) = counter_log.and_then(|log| log.get(op)) else {
            continue;
        };
        let uncorrected = counter
            .get("total_uncorrected_errors")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                HealthError::validation(format!(
                    "scsi_error_counter_log.{op} without total_uncorrected_errors"
                ))
            })?;

        let failing = uncorrected > UNCORRECTED_TOLERANCE;
        forced_failure |= failing;
        let mut attribute =
            SmartAttribute::counter(format!("{op}_errors_uncorrected"), uncorrected);
        attribute.failing = failing;
        attributes.push(attribute);

        if let Some(corrected) = counter
            .get("total_errors_corrected")
            .and_then(Value::as_i64)
        {
            attributes.push(SmartAttribute::counter(
                format!("{op}_errors_corrected"),
                corrected,
            ));
        }
    }

    let temperature_celsius = payload
        .pointer("/temperature/current")
        .and_then(Value::as_i64);
    let power_on_hours = payload
        .pointer("/power_on_time/hours")
        .and_then(Value::as_u64);

    Ok(ParsedSection {
        attributes,
        forced_failure,
        temperature_celsius,
        power_on_hours,
        power_cycle_count: None,
    })
}
