//! History assembly from the session log.
//!
//! The engine only ever sees `SessionRecord`s for one exercise. This module
//! turns the raw workout log into those slices.

use crate::catalog::canonicalize_exercise_id;
use crate::{Result, SessionRecord, WorkoutSession};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;

/// Load every logged workout, oldest first.
///
/// Workouts appearing more than once under the same ID keep the first copy.
pub fn load_workouts(wal_path: &Path) -> Result<Vec<WorkoutSession>> {
    let mut seen_ids = HashSet::new();
    let mut workouts: Vec<WorkoutSession> = crate::wal::read_sessions(wal_path)?
        .into_iter()
        .filter(|w| seen_ids.insert(w.id))
        .collect();

    workouts.sort_by_key(|w| w.performed_at);
    tracing::debug!("Loaded {} workouts", workouts.len());
    Ok(workouts)
}

/// Sessions of one exercise, oldest first, keeping only the newest `limit`.
///
/// IDs on both sides are canonicalized, so entries logged under an alias are
/// included. Entries with no performed sets are left out.
pub fn history_for_exercise(
    workouts: &[WorkoutSession],
    exercise_id: &str,
    limit: usize,
) -> Vec<SessionRecord> {
    let wanted = canonicalize_exercise_id(exercise_id);
    let mut records: Vec<SessionRecord> = workouts
        .iter()
        .flat_map(move |w| {
            w.exercises
                .iter()
                .filter(move |e| canonicalize_exercise_id(&e.exercise_id) == wanted)
                .filter(|e| !e.sets.is_empty())
                .map(move |e| e.to_record(w.performed_at))
        })
        .collect();

    records.sort_by_key(|r| r.performed_at);
    let skip = records.len().saturating_sub(limit);
    records.split_off(skip)
}

/// Workouts whose UTC date falls within `[start, end]`
pub fn workouts_between(
    workouts: &[WorkoutSession],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&WorkoutSession> {
    workouts
        .iter()
        .filter(|w| {
            let day = w.performed_at.date_naive();
            day >= start && day <= end
        })
        .collect()
}
