//! Core domain types for the Lift workout logger.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise definitions and their rep schemes
//! - Session records (what was prescribed, what was performed)
//! - Logged workouts as they are persisted
//! - Recommendations produced by the progression engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Exercise Definition Types
// ============================================================================

/// How the load for an exercise is held
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    #[default]
    Barbell,
    /// Dumbbell-class: symmetric, one load per hand. Subject to the per-limb cap.
    Dumbbell,
    Bodyweight,
    Machine,
}

/// Broad movement pattern of an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    Press,
    Pull,
    Squat,
    Hinge,
    Isolation,
    Core,
    #[default]
    Other,
}

/// Set/rep structure prescribed for an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepScheme {
    /// Same rep count on every set (e.g. 3×5)
    Fixed { target_reps: u32, sets: u32 },
    /// Double progression inside a rep window (e.g. 3×10-12)
    Range {
        min_reps: u32,
        max_reps: u32,
        sets: u32,
    },
    /// Each set has its own rep count, all derived from the first set's load
    Custom { reps_per_set: Vec<u32> },
    /// As many reps as possible
    Amrap { sets: u32 },
    /// Any tag this build does not know about
    #[serde(other)]
    Unrecognized,
}

/// Reps used when a scheme cannot tell us anything better
pub const FALLBACK_REPS: u32 = 10;
/// Sets used when a scheme cannot tell us anything better
pub const FALLBACK_SETS: u32 = 3;

impl RepScheme {
    /// The prescription used when nothing else is known: `(reps, sets)`.
    ///
    /// AMRAP has no rep target until the lifter has performed the set, so its
    /// baseline reps are 0.
    pub fn baseline(&self) -> (u32, u32) {
        match self {
            RepScheme::Fixed { target_reps, sets } => (*target_reps, *sets),
            RepScheme::Range { min_reps, sets, .. } => (*min_reps, *sets),
            RepScheme::Custom { reps_per_set } => (
                reps_per_set.first().copied().unwrap_or(FALLBACK_REPS),
                reps_per_set.len().max(1) as u32,
            ),
            RepScheme::Amrap { sets } => (0, *sets),
            RepScheme::Unrecognized => (FALLBACK_REPS, FALLBACK_SETS),
        }
    }

    /// Number of sets the scheme prescribes
    pub fn prescribed_sets(&self) -> u32 {
        self.baseline().1
    }

    /// Rep target for a single set (0-based).
    ///
    /// Custom schemes past the end of their sequence reuse the last entry.
    pub fn reps_for_set(&self, index: usize) -> u32 {
        match self {
            RepScheme::Custom { reps_per_set } => reps_per_set
                .get(index)
                .or_else(|| reps_per_set.last())
                .copied()
                .unwrap_or(FALLBACK_REPS),
            other => other.baseline().0,
        }
    }

    /// Short label for display (e.g. "3×5", "3×10-12", "8/5/12", "1×AMRAP")
    pub fn label(&self) -> String {
        match self {
            RepScheme::Fixed { target_reps, sets } => format!("{}×{}", sets, target_reps),
            RepScheme::Range {
                min_reps,
                max_reps,
                sets,
            } => format!("{}×{}-{}", sets, min_reps, max_reps),
            RepScheme::Custom { reps_per_set } => reps_per_set
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("/"),
            RepScheme::Amrap { sets } => format!("{}×AMRAP", sets),
            RepScheme::Unrecognized => "unknown".to_string(),
        }
    }
}

/// When to deload after missed sessions
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FailurePolicy {
    /// Consecutive misses that trigger a deload
    #[serde(default = "default_repeat_failures")]
    pub repeat_failures_threshold: u32,
    /// Fraction of the last target weight removed on deload
    #[serde(default = "default_deload_fraction")]
    pub deload_fraction: f64,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            repeat_failures_threshold: default_repeat_failures(),
            deload_fraction: default_deload_fraction(),
        }
    }
}

fn default_repeat_failures() -> u32 {
    2
}

fn default_deload_fraction() -> f64 {
    0.1
}

fn default_increment() -> f64 {
    2.5
}

fn default_rounding() -> f64 {
    2.5
}

/// Static catalog entry describing how an exercise is trained
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDefinition {
    pub id: String,
    pub name: String,
    #[serde(default = "default_increment")]
    pub increment: f64,
    /// Weight is always a multiple of this; 0 for bodyweight movements
    #[serde(default = "default_rounding")]
    pub rounding_step: f64,
    #[serde(default)]
    pub starting_weight: f64,
    pub rep_scheme: RepScheme,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub modality: Modality,
    #[serde(default)]
    pub movement: MovementPattern,
}

impl ExerciseDefinition {
    /// Whether the per-limb weight cap applies
    pub fn is_dumbbell_class(&self) -> bool {
        self.modality == Modality::Dumbbell
    }

    /// Pull-ups, chin-ups and similar
    pub fn is_bodyweight_pull(&self) -> bool {
        self.modality == Modality::Bodyweight && self.movement == MovementPattern::Pull
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// What was prescribed for a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct SessionTarget {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub sets: Option<u32>,
}

/// One performed set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PerformedSet {
    pub reps: u32,
    pub weight: f64,
    /// Rate of perceived exertion, 0-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

/// A single exercise's session as handed to the engine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub performed_at: DateTime<Utc>,
    #[serde(default)]
    pub target: SessionTarget,
    #[serde(default)]
    pub performed_sets: Vec<PerformedSet>,
}

/// Oldest first
pub type History = [SessionRecord];

// ============================================================================
// Logged Workout Types
// ============================================================================

/// Training day of the weekly plan
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
    Full,
    Rest,
}

impl DayType {
    pub const TRAINING_DAYS: [DayType; 6] = [
        DayType::Push,
        DayType::Pull,
        DayType::Legs,
        DayType::Upper,
        DayType::Lower,
        DayType::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Push => "push",
            DayType::Pull => "pull",
            DayType::Legs => "legs",
            DayType::Upper => "upper",
            DayType::Lower => "lower",
            DayType::Full => "full",
            DayType::Rest => "rest",
        }
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DayType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "push" => Ok(DayType::Push),
            "pull" => Ok(DayType::Pull),
            "legs" => Ok(DayType::Legs),
            "upper" => Ok(DayType::Upper),
            "lower" => Ok(DayType::Lower),
            "full" | "full_body" | "fullbody" => Ok(DayType::Full),
            "rest" => Ok(DayType::Rest),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown day type: {}",
                other
            ))),
        }
    }
}

/// One exercise inside a logged workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseEntry {
    pub exercise_id: String,
    #[serde(default)]
    pub target: SessionTarget,
    #[serde(default)]
    pub sets: Vec<PerformedSet>,
}

/// A logged workout as persisted in the session log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub performed_at: DateTime<Utc>,
    pub day_type: DayType,
    pub exercises: Vec<ExerciseEntry>,
}

impl ExerciseEntry {
    /// View this entry as an engine session record
    pub fn to_record(&self, performed_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            performed_at,
            target: self.target,
            performed_sets: self.sets.clone(),
        }
    }
}

// ============================================================================
// Recommendation Types
// ============================================================================

/// Load and reps for one prescribed set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedSet {
    pub reps: u32,
    pub weight: f64,
}

/// Numbers behind a recommendation, for display and debugging
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendationMeta {
    pub increment: f64,
    pub rounding: f64,
    pub failure_streak: u32,
    pub last_average_rpe: Option<f64>,
}

/// The engine's answer for the next session of one exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub exercise_id: String,
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
    pub plan: Vec<PlannedSet>,
    pub reason: String,
    pub metadata: RecommendationMeta,
}

impl Recommendation {
    /// The target to record when this recommendation is logged
    pub fn as_target(&self) -> SessionTarget {
        SessionTarget {
            weight: Some(self.weight),
            reps: Some(self.reps),
            sets: Some(self.sets),
        }
    }
}
