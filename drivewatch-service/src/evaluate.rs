// SPDX-License-Identifier: GPL-3.0-only

//! Trend evaluation over current + historical attributes
//!
//! The normalizer's threshold rules catch hard breaches; this pass catches
//! slow degradation before a threshold trips. Evaluation is a pure function
//! of `(record, history)`: identical inputs yield identical output, so a
//! record may be safely re-evaluated.

use drivewatch_types::{AttributeKind, HealthRecord, HealthStatus};

use crate::normalize::reference;

/// Escalates a `Passed` verdict to `Failed` when a pre-fail attribute's
/// normalized value declines monotonically across the trailing window.
/// Never downgrades a verdict.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    trend_window: usize,
}

pub const DEFAULT_TREND_WINDOW: usize = 5;

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_TREND_WINDOW)
    }
}

impl Evaluator {
    pub fn new(trend_window: usize) -> Self {
        Self { trend_window }
    }

    pub fn trend_window(&self) -> usize {
        self.trend_window
    }

    /// Apply the trend rule. `history` is ascending by `collected_at`;
    /// fewer than `trend_window` prior points disables the trend rule only,
    /// the threshold verdict already on the record stands either way.
    pub fn evaluate(&self, mut record: HealthRecord, history: &[HealthRecord]) -> HealthRecord {
        if record.overall_status.is_failed() {
            return record;
        }
        if self.trend_window == 0 || history.len() < self.trend_window {
            return record;
        }
        let window = &history[history.len() - self.trend_window..];

        let mut escalate = false;
        for attribute in &mut record.attributes {
            let (Some(id), Some(current)) = (attribute.id, attribute.normalized_value) else {
                continue;
            };
            if attribute.kind != Some(AttributeKind::PreFail) {
                continue;
            }

            // Every window point must carry the attribute; devices that
            // stop reporting a value don't produce a trend.
            let mut series: Vec<i64> = Vec::with_capacity(self.trend_window + 1);
            for past in window {
                match past.attribute(id).and_then(|a| a.normalized_value) {
                    Some(value) => series.push(value),
                    None => {
                        series.clear();
                        break;
                    }
                }
            }
            if series.is_empty() {
                continue;
            }
            series.push(current);

            let strictly_declining = series.windows(2).all(|pair| pair[1] < pair[0]);
            let total_decline = series[0] - series[series.len() - 1];
            if strictly_declining && total_decline >= reference::trend_slope(id) {
                tracing::warn!(
                    wwn = %record.wwn,
                    attribute = %attribute.name,
                    decline = total_decline,
                    "pre-fail attribute declining monotonically, escalating verdict"
                );
                attribute.failing = true;
                escalate = true;
            }
        }

        if escalate {
            record.overall_status = HealthStatus::Failed;
        }
        record
    }
}
