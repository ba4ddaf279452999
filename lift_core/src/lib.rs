#![forbid(unsafe_code)]

//! Core domain model and progression logic for the Lift workout logger.
//!
//! This crate provides:
//! - Domain types (exercise definitions, rep schemes, sessions, recommendations)
//! - The progression engine (1RM model, session summaries, failure streaks)
//! - Exercise catalog and weekly scheduling
//! - Persistence (session log, history assembly, CSV export)
//! - Configuration and logging

pub mod types;
pub mod error;
pub mod one_rep_max;
pub mod summary;
pub mod streak;
pub mod engine;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod units;
pub mod wal;
pub mod history;
pub mod schedule;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{canonicalize_exercise_id, get_default_catalog, Catalog, CustomExercise};
pub use config::{Config, ProgressionConfig};
pub use engine::{recommend, recommend_with};
pub use summary::{summarize_session, SessionSummary};
pub use streak::compute_failure_streak;
pub use wal::{JsonlSink, SessionSink};
pub use history::{history_for_exercise, load_workouts};
pub use schedule::recommend_day_type;
pub use units::WeightUnit;
pub use csv_export::export_csv;
