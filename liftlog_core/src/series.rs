//! Per-exercise series extraction and summary statistics.
//!
//! Consumes the replay's snapshot sequence and produces the read-only
//! views the product charts: weight-over-time, stage progression, and
//! success/fail summary numbers. Nothing here mutates its input.

use crate::{Outcome, SlotSnapshot};
use serde::Serialize;

/// Summary statistics over one exercise's snapshot series
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesStats {
    /// Snapshots with a recorded result (absent results don't count)
    pub total: u32,
    pub successes: u32,
    pub fails: u32,
    /// Success percentage, rounded to an integer; 0 for an empty series
    pub rate: u32,
    pub current_weight: f64,
    pub start_weight: f64,
    /// current - start, rounded to one decimal
    pub gained: f64,
    /// 1-based stage of the last snapshot; 1 for an empty series
    pub current_stage: usize,
}

impl Default for SeriesStats {
    fn default() -> Self {
        Self {
            total: 0,
            successes: 0,
            fails: 0,
            rate: 0,
            current_weight: 0.0,
            start_weight: 0.0,
            gained: 0.0,
            current_stage: 1,
        }
    }
}

/// Restrict a snapshot sequence to one exercise, preserving order
pub fn exercise_series<'a>(
    snapshots: &'a [SlotSnapshot],
    exercise_id: &str,
) -> Vec<&'a SlotSnapshot> {
    snapshots
        .iter()
        .filter(|s| s.exercise_id == exercise_id)
        .collect()
}

/// Derive summary statistics from a snapshot series
///
/// Pure, read-only view; guards every division and every first/last
/// access so an empty series yields all-zero stats (stage 1).
pub fn calculate_stats(series: &[&SlotSnapshot]) -> SeriesStats {
    let successes = series
        .iter()
        .filter(|s| s.result == Some(Outcome::Success))
        .count() as u32;
    let fails = series
        .iter()
        .filter(|s| s.result == Some(Outcome::Fail))
        .count() as u32;
    let total = successes + fails;

    let rate = if total == 0 {
        0
    } else {
        (f64::from(successes) / f64::from(total) * 100.0).round() as u32
    };

    let start_weight = series.first().map_or(0.0, |s| s.weight);
    let current_weight = series.last().map_or(0.0, |s| s.weight);
    let gained = ((current_weight - start_weight) * 10.0).round() / 10.0;
    let current_stage = series.last().map_or(1, |s| s.stage_display);

    SeriesStats {
        total,
        successes,
        fails,
        rate,
        current_weight,
        start_weight,
        gained,
        current_stage,
    }
}
