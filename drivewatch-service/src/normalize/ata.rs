// SPDX-License-Identifier: GPL-3.0-only

//! ATA/SATA payload parsing: indexed SMART attribute table.

use serde_json::Value;

use drivewatch_contracts::HealthError;
use drivewatch_types::{AttributeKind, SmartAttribute};

use super::{ParsedSection, reference};

const ATTR_POWER_ON_HOURS: u16 = 9;
const ATTR_POWER_CYCLES: u16 = 12;
const ATTR_TEMPERATURE: u16 = 194;

pub(super) fn parse(payload: &Value) -> Result<ParsedSection, HealthError> {
    let table = payload
        .pointer("/ata_smart_attributes/table")
        .and_then(Value::as_array)
        .ok_or_else(|| HealthError::validation("missing ata_smart_attributes.table"))?;

    let mut attributes = Vec::with_capacity(table.len());
    let mut forced_failure = false;
    let mut temperature_celsius = None;
    let mut power_on_hours = None;
    let mut power_cycle_count = None;

    for entry in table {
        let id = entry
            .get("id")
            .and_then(Value::as_u64)
            .and_then(|id| u16::try_from(id).ok())
            .ok_or_else(|| HealthError::validation("attribute row without a numeric id"))?;
        let normalized = entry
            .get("value")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                HealthError::validation(format!("attribute {id} without a normalized value"))
            })?;
        let worst = entry.get("worst").and_then(Value::as_i64);
        let threshold = entry.get("thresh").and_then(Value::as_i64);
        let raw_value = entry.pointer("/raw/value").and_then(Value::as_i64).unwrap_or(0);
        let when_failed = entry
            .get("when_failed")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let info = reference::lookup(id);
        let kind = info.map(|info| info.kind);
        let name = info.map(|info| info.name.to_string()).unwrap_or_else(|| {
            entry
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown_Attribute")
                .to_string()
        });

        // The threshold test beats the device's self-reported status bit,
        // but only pre-fail breaches imply imminent failure.
        let breached = matches!(threshold, Some(t) if t > 0 && normalized <= t);
        let failing = breached && kind == Some(AttributeKind::PreFail);
        if failing {
            forced_failure = true;
        }

        match id {
            ATTR_POWER_ON_HOURS => power_on_hours = u64::try_from(raw_value).ok(),
            ATTR_POWER_CYCLES => power_cycle_count = u64::try_from(raw_value).ok(),
            // Raw 194 packs min/max into the upper bytes on some vendors.
            ATTR_TEMPERATURE => temperature_celsius = Some(raw_value & 0xff),
            _ => {}
        }

        attributes.push(SmartAttribute {
            id: Some(id),
            name,
            raw_value,
            normalized_value: Some(normalized),
            worst,
            threshold,
            when_failed,
            kind,
            failing,
        });
    }

    Ok(ParsedSection {
        attributes,
        forced_failure,
        temperature_celsius,
        power_on_hours,
        power_cycle_count,
    })
}
