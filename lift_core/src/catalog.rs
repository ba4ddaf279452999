//! Default catalog of exercise definitions.
//!
//! This module provides the built-in exercises for each day of the weekly
//! plan, alias canonicalization for renamed exercise IDs, and validation.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// The complete catalog of exercises and the days they are trained on
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: HashMap<String, ExerciseDefinition>,
    pub days: HashMap<DayType, Vec<String>>,
}

/// A user-defined exercise from the config file
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CustomExercise {
    #[serde(flatten)]
    pub definition: ExerciseDefinition,
    #[serde(default)]
    pub days: Vec<DayType>,
}

/// Map a historical or variant exercise ID to its catalog ID
pub fn canonicalize_exercise_id(exercise_id: &str) -> &str {
    match exercise_id {
        "pullUp" => "pullUps",
        "dumbbellRow" => "singleArmDumbbellRow",
        "dumbbellRDL" | "dumbbellRomanianDeadlift" => "romanianDeadlifts",
        "gobletSquats" => "dumbbellGobletSquat",
        "dumbbellLateraRaise" => "dumbbellLateralRaise",
        "diamondPushUp" => "diamondPushups",
        other => other,
    }
}

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalogs.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn fixed(target_reps: u32, sets: u32) -> RepScheme {
    RepScheme::Fixed { target_reps, sets }
}

fn range(min_reps: u32, max_reps: u32, sets: u32) -> RepScheme {
    RepScheme::Range {
        min_reps,
        max_reps,
        sets,
    }
}

fn exercise(
    id: &str,
    name: &str,
    rep_scheme: RepScheme,
    modality: Modality,
    movement: MovementPattern,
    starting_weight: f64,
) -> ExerciseDefinition {
    let (increment, rounding_step) = match (modality, movement) {
        (Modality::Bodyweight, _) => (5.0, 0.0),
        (_, MovementPattern::Isolation) => (2.5, 2.5),
        _ => (5.0, 2.5),
    };
    ExerciseDefinition {
        id: id.into(),
        name: name.into(),
        increment,
        rounding_step,
        starting_weight,
        rep_scheme,
        failure_policy: FailurePolicy::default(),
        modality,
        movement,
    }
}

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> Catalog {
    use Modality::*;
    use MovementPattern::*;

    let definitions = vec![
        // Push
        exercise("dumbbellBenchPress", "Dumbbell Bench Press", fixed(5, 3), Dumbbell, Press, 60.0),
        exercise("larsenPress", "Larsen Press", fixed(10, 2), Barbell, Press, 95.0),
        exercise("standingArnoldPress", "Standing Arnold Press", range(8, 10, 3), Dumbbell, Press, 30.0),
        exercise("deficitPushups", "Deficit Push-ups", RepScheme::Amrap { sets: 1 }, Bodyweight, Press, 0.0),
        exercise("lateralRaises", "Lateral Raises", range(12, 15, 3), Dumbbell, Isolation, 15.0),
        exercise("skullCrushers", "Skull-crushers", fixed(15, 3), Barbell, Isolation, 40.0),
        exercise("tricepKickback", "Single-arm Tricep Kickback", fixed(12, 2), Dumbbell, Isolation, 15.0),
        // Pull
        exercise("pullUps", "Pull-ups", fixed(10, 4), Bodyweight, Pull, 0.0),
        exercise("rearDeltRaises", "Rear Delt Raises", range(12, 15, 3), Dumbbell, Isolation, 12.5),
        exercise("latPulldowns", "Lat Pulldowns", range(10, 12, 3), Machine, Pull, 100.0),
        exercise("hammerCurls", "Hammer Curls", range(10, 12, 3), Dumbbell, Isolation, 25.0),
        exercise("preacherCurls", "Preacher Curls", range(10, 12, 3), Barbell, Isolation, 40.0),
        // Legs
        exercise("bulgarianSplitSquats", "Bulgarian Split Squats", fixed(4, 4), Dumbbell, Squat, 40.0),
        exercise("bulgarianSplitSquatsPause", "Bulgarian Split Squats (Pause)", fixed(5, 2), Dumbbell, Squat, 30.0),
        exercise("romanianDeadlifts", "Romanian Deadlift", fixed(10, 3), Dumbbell, Hinge, 50.0),
        exercise("dumbbellGobletSquat", "Dumbbell Goblet Squat", range(10, 12, 3), Dumbbell, Squat, 50.0),
        exercise("calfRaises", "Calf Raises", range(15, 20, 3), Machine, Isolation, 90.0),
        exercise("weightedCrunches", "Weighted Crunches", range(12, 20, 3), Dumbbell, Core, 20.0),
        // Upper
        exercise(
            "closeGripInclineDumbbellPress",
            "Close-Grip Incline Dumbbell Press",
            RepScheme::Custom {
                reps_per_set: vec![8, 5, 12],
            },
            Dumbbell,
            Press,
            50.0,
        ),
        exercise("singleArmDumbbellRow", "Single-arm Dumbbell Row", fixed(12, 3), Dumbbell, Pull, 50.0),
        exercise("dumbbellLateralRaise", "Dumbbell Lateral Raise", fixed(12, 3), Dumbbell, Isolation, 15.0),
        exercise("dumbbellBicepCurl", "Dumbbell Bicep Curl", fixed(12, 3), Dumbbell, Isolation, 25.0),
        exercise("diamondPushups", "Diamond Push-ups", RepScheme::Amrap { sets: 1 }, Bodyweight, Press, 0.0),
        // Lower
        exercise("trapBarDeadlift", "Dumbbell Deadlift", fixed(5, 1), Dumbbell, Hinge, 70.0),
        exercise("dumbbellStepUp", "Dumbbell Step-up", fixed(10, 3), Dumbbell, Squat, 30.0),
        exercise("seatedDumbbellCalfRaise", "Seated Dumbbell Calf Raise", fixed(20, 4), Dumbbell, Isolation, 45.0),
        exercise("hangingLegRaise", "Hanging Leg Raise", fixed(8, 5), Bodyweight, Core, 0.0),
        // Full
        exercise("chinUps", "Chin-ups", fixed(10, 2), Bodyweight, Pull, 0.0),
    ];

    let day_lists: [(DayType, &[&str]); 6] = [
        (
            DayType::Push,
            &[
                "dumbbellBenchPress",
                "larsenPress",
                "standingArnoldPress",
                "deficitPushups",
                "lateralRaises",
                "skullCrushers",
                "tricepKickback",
            ],
        ),
        (
            DayType::Pull,
            &[
                "pullUps",
                "rearDeltRaises",
                "latPulldowns",
                "hammerCurls",
                "preacherCurls",
            ],
        ),
        (
            DayType::Legs,
            &[
                "bulgarianSplitSquats",
                "bulgarianSplitSquatsPause",
                "romanianDeadlifts",
                "dumbbellGobletSquat",
                "calfRaises",
                "weightedCrunches",
            ],
        ),
        (
            DayType::Upper,
            &[
                "pullUps",
                "closeGripInclineDumbbellPress",
                "singleArmDumbbellRow",
                "dumbbellLateralRaise",
                "dumbbellBicepCurl",
                "diamondPushups",
            ],
        ),
        (
            DayType::Lower,
            &[
                "trapBarDeadlift",
                "romanianDeadlifts",
                "dumbbellGobletSquat",
                "dumbbellStepUp",
                "seatedDumbbellCalfRaise",
                "hangingLegRaise",
            ],
        ),
        (
            DayType::Full,
            &[
                "trapBarDeadlift",
                "romanianDeadlifts",
                "closeGripInclineDumbbellPress",
                "chinUps",
                "dumbbellGobletSquat",
                "singleArmDumbbellRow",
                "diamondPushups",
            ],
        ),
    ];

    let exercises = definitions
        .into_iter()
        .map(|def| (def.id.clone(), def))
        .collect();

    let days = day_lists
        .iter()
        .map(|(day, ids)| (*day, ids.iter().map(|id| id.to_string()).collect()))
        .collect();

    Catalog { exercises, days }
}

impl Catalog {
    /// Look up an exercise by ID or alias
    pub fn get(&self, exercise_id: &str) -> Option<&ExerciseDefinition> {
        self.exercises.get(canonicalize_exercise_id(exercise_id))
    }

    /// Like `get`, but an unknown ID is an error
    pub fn require(&self, exercise_id: &str) -> Result<&ExerciseDefinition> {
        self.get(exercise_id)
            .ok_or_else(|| Error::UnknownExercise(exercise_id.to_string()))
    }

    /// Exercises trained on `day`, in plan order. Rest days have none.
    pub fn exercises_for_day(&self, day: DayType) -> Vec<&ExerciseDefinition> {
        self.days
            .get(&day)
            .map(|ids| ids.iter().filter_map(|id| self.get(id)).collect())
            .unwrap_or_default()
    }

    /// Add or replace exercises from the config file
    pub fn extend_with(&mut self, custom: &[CustomExercise]) {
        for entry in custom {
            let id = entry.definition.id.clone();
            for day in &entry.days {
                let list = self.days.entry(*day).or_default();
                if !list.contains(&id) {
                    list.push(id.clone());
                }
            }
            if self.exercises.insert(id.clone(), entry.definition.clone()).is_some() {
                tracing::info!("Custom exercise '{}' replaces the built-in definition", id);
            }
        }
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, def) in &self.exercises {
            if id.is_empty() || def.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if id != &def.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match definition.id '{}'",
                    id, def.id
                ));
            }
            if def.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", id));
            }
            if !def.increment.is_finite() || def.increment < 0.0 {
                errors.push(format!(
                    "Exercise '{}': increment {} must be a non-negative number",
                    id, def.increment
                ));
            }
            if !def.rounding_step.is_finite() || def.rounding_step < 0.0 {
                errors.push(format!(
                    "Exercise '{}': rounding step {} must be a non-negative number",
                    id, def.rounding_step
                ));
            }
            if !def.starting_weight.is_finite() || def.starting_weight < 0.0 {
                errors.push(format!(
                    "Exercise '{}': starting weight {} must be a non-negative number",
                    id, def.starting_weight
                ));
            }

            let policy = &def.failure_policy;
            if policy.repeat_failures_threshold == 0 {
                errors.push(format!(
                    "Exercise '{}': repeat failure threshold must be at least 1",
                    id
                ));
            }
            if !(0.0..1.0).contains(&policy.deload_fraction) {
                errors.push(format!(
                    "Exercise '{}': deload fraction {} outside [0, 1)",
                    id, policy.deload_fraction
                ));
            }

            match &def.rep_scheme {
                RepScheme::Fixed { target_reps, sets } => {
                    if *target_reps == 0 || *sets == 0 {
                        errors.push(format!("Exercise '{}': fixed scheme needs reps and sets", id));
                    }
                }
                RepScheme::Range {
                    min_reps,
                    max_reps,
                    sets,
                } => {
                    if *min_reps == 0 || *sets == 0 {
                        errors.push(format!("Exercise '{}': range scheme needs reps and sets", id));
                    }
                    if min_reps > max_reps {
                        errors.push(format!(
                            "Exercise '{}': min reps {} > max {}",
                            id, min_reps, max_reps
                        ));
                    }
                }
                RepScheme::Custom { reps_per_set } => {
                    if reps_per_set.is_empty() || reps_per_set.contains(&0) {
                        errors.push(format!(
                            "Exercise '{}': custom scheme needs a positive rep count per set",
                            id
                        ));
                    }
                }
                RepScheme::Amrap { sets } => {
                    if *sets == 0 {
                        errors.push(format!("Exercise '{}': AMRAP scheme has no sets", id));
                    }
                }
                RepScheme::Unrecognized => {
                    errors.push(format!("Exercise '{}' has an unrecognized rep scheme", id));
                }
            }
        }

        for (day, ids) in &self.days {
            if *day == DayType::Rest && !ids.is_empty() {
                errors.push("Rest day lists exercises".to_string());
            }
            for exercise_id in ids {
                if self.get(exercise_id).is_none() {
                    errors.push(format!(
                        "Day '{}' references non-existent exercise '{}'",
                        day, exercise_id
                    ));
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_every_training_day_has_exercises() {
        let catalog = get_default_catalog();
        for day in DayType::TRAINING_DAYS {
            assert!(
                !catalog.exercises_for_day(day).is_empty(),
                "No exercises for {}",
                day
            );
        }
        assert!(catalog.exercises_for_day(DayType::Rest).is_empty());
    }

    #[test]
    fn test_aliases_resolve() {
        let catalog = get_default_catalog();
        assert_eq!(catalog.get("pullUp").unwrap().id, "pullUps");
        assert_eq!(catalog.get("dumbbellRDL").unwrap().id, "romanianDeadlifts");
        assert_eq!(catalog.get("diamondPushUp").unwrap().id, "diamondPushups");
        assert_eq!(canonicalize_exercise_id("larsenPress"), "larsenPress");
    }

    #[test]
    fn test_require_unknown() {
        let catalog = get_default_catalog();
        assert!(matches!(
            catalog.require("zercherSquat"),
            Err(Error::UnknownExercise(_))
        ));
    }

    #[test]
    fn test_bodyweight_pulls_flagged() {
        let catalog = get_default_catalog();
        assert!(catalog.get("pullUps").unwrap().is_bodyweight_pull());
        assert!(catalog.get("chinUps").unwrap().is_bodyweight_pull());
        assert!(!catalog.get("latPulldowns").unwrap().is_bodyweight_pull());
    }

    #[test]
    fn test_validate_catches_bad_range() {
        let mut catalog = build_default_catalog();
        let def = catalog.exercises.get_mut("hammerCurls").unwrap();
        def.rep_scheme = range(12, 10, 3);
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("min reps 12 > max 10")));
    }

    #[test]
    fn test_validate_catches_dangling_day_entry() {
        let mut catalog = build_default_catalog();
        catalog
            .days
            .get_mut(&DayType::Push)
            .unwrap()
            .push("ghostPress".into());
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("ghostPress")));
    }

    #[test]
    fn test_extend_with_custom_exercise() {
        let mut catalog = build_default_catalog();
        let custom = CustomExercise {
            definition: exercise(
                "landminePress",
                "Landmine Press",
                fixed(8, 3),
                Modality::Barbell,
                MovementPattern::Press,
                45.0,
            ),
            days: vec![DayType::Push],
        };
        catalog.extend_with(&[custom]);

        assert!(catalog.get("landminePress").is_some());
        let push_ids: Vec<_> = catalog
            .exercises_for_day(DayType::Push)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(push_ids.last(), Some(&"landminePress"));
        assert!(catalog.validate().is_empty());
    }
}
