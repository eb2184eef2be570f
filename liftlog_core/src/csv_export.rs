//! CSV export for snapshot series.
//!
//! Writes one row per snapshot so the weight/stage history can be pulled
//! into a spreadsheet or external charting tool.

use crate::{Outcome, Result, SlotSnapshot};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    workout: u32,
    day: String,
    slot_id: String,
    exercise_id: String,
    stage: usize,
    weight: f64,
    result: Option<String>,
    amrap_reps: Option<u32>,
    recorded_at: Option<String>,
}

impl From<&SlotSnapshot> for CsvRow {
    fn from(snapshot: &SlotSnapshot) -> Self {
        CsvRow {
            workout: snapshot.workout_index,
            day: snapshot.day_name.clone(),
            slot_id: snapshot.slot_id.clone(),
            exercise_id: snapshot.exercise_id.clone(),
            stage: snapshot.stage_display,
            weight: snapshot.weight,
            result: snapshot.result.map(|r| {
                match r {
                    Outcome::Success => "success",
                    Outcome::Fail => "fail",
                }
                .to_string()
            }),
            amrap_reps: snapshot.amrap_reps,
            recorded_at: snapshot.recorded_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Write a snapshot series to a CSV file, returning the row count
///
/// Creates parent directories as needed and truncates any existing file;
/// an export is a derived view, re-runnable at will.
pub fn write_series_csv(path: &Path, series: &[&SlotSnapshot]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for snapshot in series {
        writer.serialize(CsvRow::from(*snapshot))?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} snapshot rows to {:?}", series.len(), path);
    Ok(series.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tier;

    fn snapshot(workout_index: u32, result: Option<Outcome>) -> SlotSnapshot {
        SlotSnapshot {
            workout_index,
            day_name: "A1".into(),
            slot_id: "a1_squat_t1".into(),
            exercise_id: "squat".into(),
            tier: Tier::T1,
            stage_display: 1,
            weight: 60.0 + f64::from(workout_index) * 5.0,
            result,
            amrap_reps: None,
            recorded_at: None,
        }
    }

    #[test]
    fn test_export_writes_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("series.csv");

        let snapshots = vec![
            snapshot(0, Some(Outcome::Success)),
            snapshot(1, Some(Outcome::Fail)),
            snapshot(2, None),
        ];
        let series: Vec<&SlotSnapshot> = snapshots.iter().collect();

        let count = write_series_csv(&path, &series).unwrap();
        assert_eq!(count, 3);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("workout,day,slot_id,exercise_id,stage,weight"));
        assert!(contents.contains("success"));
        assert!(contents.contains("fail"));
    }

    #[test]
    fn test_export_empty_series() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("empty.csv");

        let count = write_series_csv(&path, &[]).unwrap();
        assert_eq!(count, 0);
        assert!(path.exists());
    }

    #[test]
    fn test_export_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/dir/series.csv");

        let snapshots = vec![snapshot(0, None)];
        let series: Vec<&SlotSnapshot> = snapshots.iter().collect();

        write_series_csv(&path, &series).unwrap();
        assert!(path.exists());
    }
}
