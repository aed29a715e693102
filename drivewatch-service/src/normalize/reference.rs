// SPDX-License-Identifier: GPL-3.0-only

//! Static ATA attribute reference table.
//!
//! Classification (pre-fail vs old-age) comes from here, not from the
//! payload: collectors disagree on flag encoding, the id semantics don't.
//! `trend_slope` is the minimum total decline of the normalized value across
//! the evaluator's window before a strictly declining pre-fail attribute is
//! escalated; noisy attributes get a larger slope.

use drivewatch_types::AttributeKind;

pub struct AtaAttributeInfo {
    pub id: u16,
    pub name: &'static str,
    pub kind: AttributeKind,
    pub trend_slope: i64,
}

const PRE_FAIL: AttributeKind = AttributeKind::PreFail;
const OLD_AGE: AttributeKind = AttributeKind::OldAge;

static ATA_ATTRIBUTES: &[AtaAttributeInfo] = &[
    // Normalized read/seek error rates swing wildly on some vendors
    // (Seagate in particular), so their slopes are wide.
    AtaAttributeInfo { id: 1, name: "Raw_Read_Error_Rate", kind: PRE_FAIL, trend_slope: 10 },
    AtaAttributeInfo { id: 2, name: "Throughput_Performance", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 3, name: "Spin_Up_Time", kind: PRE_FAIL, trend_slope: 10 },
    AtaAttributeInfo { id: 4, name: "Start_Stop_Count", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 5, name: "Reallocated_Sector_Ct", kind: PRE_FAIL, trend_slope: 1 },
    AtaAttributeInfo { id: 7, name: "Seek_Error_Rate", kind: PRE_FAIL, trend_slope: 10 },
    AtaAttributeInfo { id: 8, name: "Seek_Time_Performance", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 9, name: "Power_On_Hours", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 10, name: "Spin_Retry_Count", kind: PRE_FAIL, trend_slope: 1 },
    AtaAttributeInfo { id: 11, name: "Calibration_Retry_Count", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 12, name: "Power_Cycle_Count", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 184, name: "End-to-End_Error", kind: PRE_FAIL, trend_slope: 1 },
    AtaAttributeInfo { id: 187, name: "Reported_Uncorrect", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 188, name: "Command_Timeout", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 190, name: "Airflow_Temperature_Cel", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 191, name: "G-Sense_Error_Rate", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 192, name: "Power-Off_Retract_Count", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 193, name: "Load_Cycle_Count", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 194, name: "Temperature_Celsius", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 196, name: "Reallocated_Event_Count", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 197, name: "Current_Pending_Sector", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 198, name: "Offline_Uncorrectable", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 199, name: "UDMA_CRC_Error_Count", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 200, name: "Multi_Zone_Error_Rate", kind: OLD_AGE, trend_slope: 1 },
    AtaAttributeInfo { id: 201, name: "Soft_Read_Error_Rate", kind: PRE_FAIL, trend_slope: 5 },
];

/// Reference entry for a well-known ATA attribute id, if any.
pub fn lookup(id: u16) -> Option<&'static AtaAttributeInfo> {
    ATA_ATTRIBUTES.iter().find(|info| info.id == id)
}

/// Trend slope used by the evaluator; 1 for ids the table doesn't know.
pub fn trend_slope(id: u16) -> i64 {
    lookup(id).map(|info| info.trend_slope).unwrap_or(1)
}
