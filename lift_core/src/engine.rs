//! Progression engine: what should the lifter do next time for one exercise.
//!
//! A pure function of the exercise definition and its session history:
//!
//! 1. **No history**: start weight with the scheme's baseline prescription
//! 2. **AMRAP**: bodyweight, aim to match the best recent set
//! 3. **Target met**: progress by scheme (RPE-scaled load, double progression,
//!    or equal-effort custom sequence)
//! 4. **Target missed**: hold, or deload after repeated misses; high-rep near
//!    misses inside the tolerance band are held without penalty
//! 5. **Per-limb cap** (dumbbell-class): a load above the cap is clamped and
//!    the lost stimulus is given back as reps, or as an extra set once reps
//!    are at the ceiling
//!
//! The engine never fails. Bad numbers are coerced and logged.

use crate::config::ProgressionConfig;
use crate::one_rep_max::{convert_between_rep_counts, floor_to, round_to};
use crate::streak::compute_failure_streak;
use crate::summary::{summarize_session, SessionSummary};
use crate::{
    ExerciseDefinition, History, PlannedSet, Recommendation, RecommendationMeta, RepScheme,
    SessionTarget,
};

/// Average RPE at or above this progresses at half the increment
pub const RPE_CONSERVATIVE: f64 = 9.5;
/// Average RPE at or below this progresses at one and a half increments
pub const RPE_AGGRESSIVE: f64 = 7.5;

/// Weight step for a successful fixed-scheme session, scaled by effort.
///
/// Without an RPE the unscaled increment applies.
pub fn rpe_scaled_increment(increment: f64, average_rpe: Option<f64>) -> f64 {
    match average_rpe {
        Some(rpe) if rpe >= RPE_CONSERVATIVE => increment * 0.5,
        Some(rpe) if rpe <= RPE_AGGRESSIVE => increment * 1.5,
        _ => increment,
    }
}

/// Prescription being assembled before the cap check
#[derive(Debug)]
struct Draft {
    weight: f64,
    reps: u32,
    sets: u32,
    reason: String,
}

/// Definition values after non-finite coercion
struct Params {
    increment: f64,
    rounding: f64,
    deload_fraction: f64,
}

impl Params {
    fn from_definition(def: &ExerciseDefinition) -> Self {
        let increment = finite_or(def.increment, 0.0, &def.id, "increment");
        let rounding = finite_or(def.rounding_step, 0.0, &def.id, "rounding step");
        let deload_fraction = finite_or(
            def.failure_policy.deload_fraction,
            0.0,
            &def.id,
            "deload fraction",
        )
        .clamp(0.0, 1.0);
        Self {
            increment,
            rounding,
            deload_fraction,
        }
    }
}

fn finite_or(value: f64, fallback: f64, exercise_id: &str, what: &str) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!(
            "Exercise '{}' has non-finite {} ({}), using {}",
            exercise_id,
            what,
            value,
            fallback
        );
        fallback
    }
}

/// Format a load without trailing ".0"
fn fmt_load(weight: f64) -> String {
    let trimmed = (weight * 100.0).round() / 100.0;
    if trimmed.fract().abs() < 1e-9 {
        format!("{:.0}", trimmed)
    } else {
        format!("{}", trimmed)
    }
}

/// Recommend the next session using default progression settings
pub fn recommend(def: &ExerciseDefinition, history: &History) -> Recommendation {
    recommend_with(def, history, &ProgressionConfig::default())
}

/// Recommend the next session for `def` given its history (oldest first)
pub fn recommend_with(
    def: &ExerciseDefinition,
    history: &History,
    config: &ProgressionConfig,
) -> Recommendation {
    let params = Params::from_definition(def);
    let scheme = &def.rep_scheme;

    if *scheme == RepScheme::Unrecognized {
        tracing::warn!(
            "Exercise '{}' has an unrecognized rep scheme, falling back to {}x{}",
            def.id,
            crate::FALLBACK_SETS,
            crate::FALLBACK_REPS
        );
    }

    let cap = cap_for(def, &params, config);
    let (draft, failure_streak, last_average_rpe) = match history.last() {
        None => (start_without_history(def, &params), 0, None),
        Some(last) => {
            let summary = summarize_session(scheme, last);
            let streak = compute_failure_streak(scheme, history);
            let draft = match scheme {
                RepScheme::Amrap { sets } => amrap(history, *sets, config),
                _ if summary.met_target => match cap {
                    Some(cap)
                        if summary.last_target_weight >= cap
                            && !matches!(scheme, RepScheme::Custom { .. }) =>
                    {
                        progress_at_cap(def, cap, &last.target, config)
                    }
                    _ => progress(def, &summary, &params, cap),
                },
                _ => after_miss(def, &summary, streak, &last.target, &params),
            };
            (draft, streak, summary.average_rpe)
        }
    };

    let draft = apply_per_limb_cap(def, draft, &params, config);
    let weight = round_to(draft.weight, params.rounding);
    let reps = match scheme {
        RepScheme::Amrap { .. } => draft.reps,
        _ => draft.reps.max(1),
    };
    let sets = draft.sets.max(1);
    let plan = build_plan(def, weight, reps, sets, &params, config);

    tracing::debug!(
        exercise = %def.id,
        weight,
        reps,
        sets,
        failure_streak,
        "{}",
        draft.reason
    );

    Recommendation {
        exercise_id: def.id.clone(),
        weight,
        reps,
        sets,
        plan,
        reason: draft.reason,
        metadata: RecommendationMeta {
            increment: params.increment,
            rounding: params.rounding,
            failure_streak,
            last_average_rpe,
        },
    }
}

fn start_without_history(def: &ExerciseDefinition, params: &Params) -> Draft {
    let start = finite_or(def.starting_weight, 0.0, &def.id, "starting weight");
    let weight = round_to(start, params.rounding);
    let (reps, sets) = def.rep_scheme.baseline();
    Draft {
        weight,
        reps,
        sets,
        reason: format!(
            "No history found. Starting at {} with the base scheme ({}).",
            fmt_load(weight),
            def.rep_scheme.label()
        ),
    }
}

/// Match the best single set from the recent sessions
fn amrap(history: &History, sets: u32, config: &ProgressionConfig) -> Draft {
    let lookback = config.amrap_lookback.max(1);
    let recent: Vec<_> = history.iter().rev().take(lookback).collect();
    let observed = recent
        .iter()
        .map(|session| {
            if session.performed_sets.is_empty() {
                session.target.reps.unwrap_or(0)
            } else {
                session
                    .performed_sets
                    .iter()
                    .map(|s| s.reps)
                    .max()
                    .unwrap_or(0)
            }
        })
        .max()
        .unwrap_or(0);
    let (baseline_reps, _) = RepScheme::Amrap { sets }.baseline();
    let reps = observed.max(baseline_reps);

    Draft {
        weight: 0.0,
        reps,
        sets,
        reason: format!(
            "AMRAP: aim for {}+ reps (best set over the last {} sessions).",
            reps,
            recent.len()
        ),
    }
}

/// Target met last session
fn progress(
    def: &ExerciseDefinition,
    summary: &SessionSummary,
    params: &Params,
    cap: Option<f64>,
) -> Draft {
    let over_cap = |weight: f64| cap.is_some_and(|c| weight > c);
    let last = summary.last_target_weight;
    let scheme = &def.rep_scheme;
    let (base_reps, base_sets) = scheme.baseline();

    match scheme {
        RepScheme::Fixed { target_reps, sets } => {
            if def.is_bodyweight_pull() && last <= 0.0 {
                let weight = round_to(params.increment, params.rounding);
                return Draft {
                    weight,
                    reps: *target_reps,
                    sets: *sets,
                    reason: format!(
                        "Hit all reps at bodyweight. Add {} of load.",
                        fmt_load(weight)
                    ),
                };
            }

            let delta = rpe_scaled_increment(params.increment, summary.average_rpe);
            let weight = round_to(last + delta, params.rounding);
            let rpe_note = summary
                .average_rpe
                .map(|rpe| format!(" (avg RPE {:.1})", rpe))
                .unwrap_or_default();
            let reason = if over_cap(weight) {
                format!("Hit target reps last time{}.", rpe_note)
            } else {
                format!(
                    "Hit target reps last time{}. +{} progression.",
                    rpe_note,
                    fmt_load(round_to(weight - last, params.rounding))
                )
            };
            Draft {
                weight,
                reps: *target_reps,
                sets: *sets,
                reason,
            }
        }

        RepScheme::Range {
            min_reps,
            max_reps,
            sets,
        } => {
            if summary.topped_out {
                let weight = round_to(last + params.increment, params.rounding);
                let reason = if over_cap(weight) {
                    format!("Reached the top of the range ({} reps).", max_reps)
                } else {
                    format!(
                        "Reached the top of the range ({} reps). +{} and reset reps to {}.",
                        max_reps,
                        fmt_load(params.increment),
                        min_reps
                    )
                };
                Draft {
                    weight,
                    reps: *min_reps,
                    sets: *sets,
                    reason,
                }
            } else {
                let achieved = summary.achieved_reps.unwrap_or(*min_reps);
                let reps = (achieved + 1).min(*max_reps).max(*min_reps);
                Draft {
                    weight: round_to(last, params.rounding),
                    reps,
                    sets: *sets,
                    reason: format!(
                        "Progress within the range: {} reps at {}. Add weight once sets reach {}.",
                        reps,
                        fmt_load(last),
                        max_reps
                    ),
                }
            }
        }

        RepScheme::Custom { .. } => Draft {
            weight: round_to(last, params.rounding),
            reps: base_reps,
            sets: base_sets,
            reason: format!(
                "Custom sequence {}. Holding {} for {} reps; other sets are matched to the same effort.",
                scheme.label(),
                fmt_load(last),
                base_reps
            ),
        },

        RepScheme::Amrap { .. } | RepScheme::Unrecognized => Draft {
            weight: round_to(last, params.rounding),
            reps: base_reps,
            sets: base_sets,
            reason: format!(
                "Unrecognized rep scheme. Repeat {} for {}x{}.",
                fmt_load(last),
                base_sets,
                base_reps
            ),
        },
    }
}

/// Reps and sets last prescribed, never below the scheme's own prescription
fn held_volume(scheme: &RepScheme, last_target: &SessionTarget) -> (u32, u32) {
    let (base_reps, base_sets) = scheme.baseline();
    (
        last_target.reps.unwrap_or(base_reps).max(base_reps),
        last_target.sets.unwrap_or(base_sets).max(base_sets),
    )
}

/// Target met while already loaded at the per-limb cap: add a rep, or a set
/// once reps are at the ceiling
fn progress_at_cap(
    def: &ExerciseDefinition,
    cap: f64,
    last_target: &SessionTarget,
    config: &ProgressionConfig,
) -> Draft {
    let (last_reps, last_sets) = held_volume(&def.rep_scheme, last_target);
    let ceiling = config.substitution_rep_ceiling;

    if last_reps < ceiling {
        let reps = last_reps + 1;
        Draft {
            weight: cap,
            reps,
            sets: last_sets,
            reason: format!(
                "Hit target reps at the {}/hand cap. Increase reps to {}.",
                fmt_load(cap),
                reps
            ),
        }
    } else {
        let sets = last_sets + 1;
        Draft {
            weight: cap,
            reps: last_reps,
            sets,
            reason: format!(
                "Hit target reps at the {}/hand cap with reps at {}: add a set ({}x{}).",
                fmt_load(cap),
                ceiling,
                sets,
                last_reps
            ),
        }
    }
}

/// Target missed last session
fn after_miss(
    def: &ExerciseDefinition,
    summary: &SessionSummary,
    failure_streak: u32,
    last_target: &SessionTarget,
    params: &Params,
) -> Draft {
    let last = summary.last_target_weight;
    let (reps, sets) = held_volume(&def.rep_scheme, last_target);

    if summary.within_tolerance {
        let achieved = summary.achieved_reps.unwrap_or(0);
        return Draft {
            weight: round_to(last, params.rounding),
            reps,
            sets,
            reason: format!(
                "Near miss ({} reps) is within the high-rep tolerance. Repeat {}.",
                achieved,
                fmt_load(last)
            ),
        };
    }

    if failure_streak >= def.failure_policy.repeat_failures_threshold {
        let mut weight = round_to(last * (1.0 - params.deload_fraction), params.rounding);
        // Rounding must not swallow the deload
        if params.deload_fraction > 0.0 && last > 0.0 && weight >= last {
            weight = round_to(last - params.rounding, params.rounding);
        }
        let (base_reps, base_sets) = def.rep_scheme.baseline();
        return Draft {
            weight,
            reps: base_reps,
            sets: base_sets,
            reason: format!(
                "Missed target {} times in a row. Deload {}% to {}.",
                failure_streak,
                (params.deload_fraction * 100.0).round(),
                fmt_load(weight)
            ),
        };
    }

    Draft {
        weight: round_to(last, params.rounding),
        reps,
        sets,
        reason: format!("Missed target. Repeat {}.", fmt_load(last)),
    }
}

/// Heaviest load allowed for this definition, as a multiple of its rounding step
fn cap_for(def: &ExerciseDefinition, params: &Params, config: &ProgressionConfig) -> Option<f64> {
    def.is_dumbbell_class()
        .then(|| floor_to(config.per_limb_cap, params.rounding))
}

/// Clamp dumbbell-class loads to the per-limb cap, trading weight for reps or sets
fn apply_per_limb_cap(
    def: &ExerciseDefinition,
    draft: Draft,
    params: &Params,
    config: &ProgressionConfig,
) -> Draft {
    let Some(cap) = cap_for(def, params, config) else {
        return draft;
    };
    if draft.weight <= cap {
        return draft;
    }

    let ceiling = config.substitution_rep_ceiling;
    if draft.reps < ceiling {
        // Fewest extra reps at the cap that match the uncapped effort
        let reps = (draft.reps + 1..=ceiling)
            .find(|r| convert_between_rep_counts(draft.weight, draft.reps, *r, params.rounding) <= cap)
            .unwrap_or(ceiling);
        tracing::debug!(
            exercise = %def.id,
            "Per-limb cap: {} -> {} at {} reps (was {})",
            draft.weight,
            cap,
            reps,
            draft.reps
        );
        Draft {
            weight: cap,
            reps,
            sets: draft.sets,
            reason: format!(
                "{} {} exceeds the {}/hand cap: use {} for {} reps instead of {}.",
                draft.reason,
                fmt_load(draft.weight),
                fmt_load(cap),
                fmt_load(cap),
                reps,
                draft.reps
            ),
        }
    } else {
        let sets = draft.sets + 1;
        tracing::debug!(
            exercise = %def.id,
            "Per-limb cap: {} -> {}, reps at ceiling, {} sets",
            draft.weight,
            cap,
            sets
        );
        Draft {
            weight: cap,
            reps: draft.reps,
            sets,
            reason: format!(
                "{} {} exceeds the {}/hand cap and reps are already at {}: add a set ({}x{} at {}).",
                draft.reason,
                fmt_load(draft.weight),
                fmt_load(cap),
                ceiling,
                sets,
                draft.reps,
                fmt_load(cap)
            ),
        }
    }
}

/// Per-set loads. Custom sequences convert the base load to each set's rep count.
fn build_plan(
    def: &ExerciseDefinition,
    weight: f64,
    reps: u32,
    sets: u32,
    params: &Params,
    config: &ProgressionConfig,
) -> Vec<PlannedSet> {
    match &def.rep_scheme {
        RepScheme::Custom { .. } => {
            let cap = cap_for(def, params, config);
            (0..sets as usize)
                .map(|i| {
                    let set_reps = if i == 0 {
                        reps
                    } else {
                        def.rep_scheme.reps_for_set(i)
                    };
                    let mut set_weight = if set_reps == reps {
                        weight
                    } else {
                        convert_between_rep_counts(weight, reps, set_reps, params.rounding)
                    };
                    if let Some(cap) = cap {
                        set_weight = set_weight.min(cap);
                    }
                    PlannedSet {
                        reps: set_reps,
                        weight: set_weight,
                    }
                })
                .collect()
        }
        _ => vec![PlannedSet { reps, weight }; sets as usize],
    }
}
