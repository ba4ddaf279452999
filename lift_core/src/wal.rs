//! Append-only session log.
//!
//! Each logged workout is one JSON line. Writers take an exclusive lock,
//! readers a shared one, so a `log` racing a `today` never sees half a line.

use crate::{Result, WorkoutSession};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Anything that can persist a finished workout
pub trait SessionSink {
    fn append(&mut self, session: &WorkoutSession) -> Result<()>;
}

/// JSONL file sink with advisory locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSink for JsonlSink {
    fn append(&mut self, session: &WorkoutSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let mut line = serde_json::to_string(session)?;
        line.push('\n');
        {
            let mut writer = BufWriter::new(&file);
            writer.write_all(line.as_bytes())?;
            writer.flush()?;
        }
        file.sync_data()?;
        file.unlock()?;

        tracing::debug!(
            "Appended workout {} ({} exercises) to {:?}",
            session.id,
            session.exercises.len(),
            self.path
        );
        Ok(())
    }
}

/// Read every workout in the log, in file order.
///
/// A missing file is an empty log. Lines that fail to parse are skipped with
/// a warning.
pub fn read_sessions(path: &Path) -> Result<Vec<WorkoutSession>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut sessions = Vec::new();
    let mut skipped = 0usize;
    for (line_num, line) in BufReader::new(&file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<WorkoutSession>(&line) {
            Ok(session) => sessions.push(session),
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping corrupt WAL line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!(
        "Read {} workouts from {:?} ({} skipped)",
        sessions.len(),
        path,
        skipped
    );
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DayType, ExerciseEntry, PerformedSet, SessionTarget};
    use chrono::Utc;
    use uuid::Uuid;

    fn workout(reps: u32) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            performed_at: Utc::now(),
            day_type: DayType::Push,
            exercises: vec![ExerciseEntry {
                exercise_id: "dumbbellBenchPress".into(),
                target: SessionTarget {
                    weight: Some(60.0),
                    reps: Some(5),
                    sets: Some(3),
                },
                sets: vec![
                    PerformedSet {
                        reps,
                        weight: 60.0,
                        rpe: Some(8.0),
                    };
                    3
                ],
            }],
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let sessions = read_sessions(&temp_dir.path().join("absent.wal")).unwrap();
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_append_and_read_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("wal").join("sessions.wal");

        let mut sink = JsonlSink::new(&wal_path);
        let first = workout(5);
        let second = workout(4);
        sink.append(&first).unwrap();
        sink.append(&second).unwrap();

        let sessions = read_sessions(&wal_path).unwrap();
        assert_eq!(sessions, vec![first, second]);
    }

    #[test]
    fn test_corrupt_lines_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("sessions.wal");

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&workout(5)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&wal_path).unwrap();
            writeln!(file, "{{\"id\": \"not-a-uuid\", \"trunc").unwrap();
            writeln!(file).unwrap();
        }
        sink.append(&workout(3)).unwrap();

        let sessions = read_sessions(&wal_path).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1].exercises[0].sets[0].reps, 3);
    }

    #[test]
    fn test_concurrent_appends() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("sessions.wal");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = wal_path.clone();
                std::thread::spawn(move || {
                    let mut sink = JsonlSink::new(path);
                    sink.append(&workout(i)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(read_sessions(&wal_path).unwrap().len(), 8);
    }
}
