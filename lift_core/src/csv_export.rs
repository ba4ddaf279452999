//! CSV export of the session log.
//!
//! One row per performed set. The file is written to a temp file beside the
//! destination and renamed over it, so a reader never sees a partial export.

use crate::{Error, Result, WorkoutSession};
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    session_id: String,
    performed_at: String,
    day_type: &'static str,
    exercise_id: &'a str,
    target_weight: Option<f64>,
    target_reps: Option<u32>,
    target_sets: Option<u32>,
    set_number: usize,
    weight: f64,
    reps: u32,
    rpe: Option<f64>,
}

fn rows(workouts: &[WorkoutSession]) -> impl Iterator<Item = CsvRow<'_>> {
    workouts.iter().flat_map(|workout| {
        workout.exercises.iter().flat_map(move |entry| {
            entry.sets.iter().enumerate().map(move |(i, set)| CsvRow {
                session_id: workout.id.to_string(),
                performed_at: workout.performed_at.to_rfc3339(),
                day_type: workout.day_type.as_str(),
                exercise_id: &entry.exercise_id,
                target_weight: entry.target.weight,
                target_reps: entry.target.reps,
                target_sets: entry.target.sets,
                set_number: i + 1,
                weight: set.weight,
                reps: set.reps,
                rpe: set.rpe,
            })
        })
    })
}

/// Write every performed set to `out_path`, replacing any existing file.
///
/// Returns the number of rows written (header excluded).
pub fn export_csv(workouts: &[WorkoutSession], out_path: &Path) -> Result<usize> {
    let dir = match out_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let temp = NamedTempFile::new_in(dir)?;
    let mut count = 0;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(temp.as_file());
        for row in rows(workouts) {
            writer.serialize(row)?;
            count += 1;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(out_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} sets to {:?}", count, out_path);
    Ok(count)
}
