//! Per-session evaluation against a rep scheme.
//!
//! Decides whether a logged session met its prescription. Prescriptions of
//! more than five sets are judged on every performed set; five or fewer are
//! judged on the best ("top") set only, treating the rest as back-off work.

use crate::one_rep_max::TABLE_MAX_REPS;
use crate::{RepScheme, SessionRecord};

/// Above this many prescribed sets every set must hit its rep target
pub const TOP_SET_RULE_MAX_SETS: u32 = 5;

/// Baseline rep targets above this are "high-rep" and get a miss tolerance
pub const HIGH_REP_THRESHOLD: u32 = 5;

/// Acceptable shortfall for high-rep targets
pub const TOLERANCE_REPS: u32 = 2;

/// Acceptable shortfall when the target sits at the top of the 1RM table
pub const TOLERANCE_REPS_AT_TABLE_MAX: u32 = 3;

/// Outcome of one session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSummary {
    pub met_target: bool,
    /// Range schemes only: the top of the range was reached
    pub topped_out: bool,
    pub average_rpe: Option<f64>,
    pub last_target_weight: f64,
    /// A high-rep miss close enough to the target to not count against progress
    pub within_tolerance: bool,
    /// Reps of the set the verdict was based on
    pub achieved_reps: Option<u32>,
}

/// Rep count set `index` had to reach for the session to count
fn required_reps(scheme: &RepScheme, session: &SessionRecord, index: usize) -> u32 {
    match scheme {
        // Capped prescriptions can ask for more reps than the scheme does
        RepScheme::Fixed { target_reps, .. } => session
            .target
            .reps
            .map_or(*target_reps, |r| r.max(*target_reps)),
        RepScheme::Range {
            min_reps, max_reps, ..
        } => match session.target.reps {
            Some(r) if r > *max_reps => r,
            _ => *min_reps,
        },
        RepScheme::Custom { .. } => scheme.reps_for_set(index),
        // An AMRAP set counts once it matches what was asked for (at least one rep)
        RepScheme::Amrap { .. } => session.target.reps.unwrap_or(0).max(1),
        RepScheme::Unrecognized => session
            .target
            .reps
            .unwrap_or_else(|| scheme.baseline().0),
    }
}

/// Index and margin (reps minus requirement) of the set a verdict rests on.
///
/// Under the all-sets rule that is the weakest set; otherwise the strongest.
fn deciding_set(margins: &[i64], all_sets: bool) -> Option<(usize, i64)> {
    let iter = margins.iter().copied().enumerate();
    if all_sets {
        iter.min_by_key(|(_, m)| *m)
    } else {
        // max_by_key keeps the last maximum; reverse so ties go to the earliest set
        iter.rev().max_by_key(|(_, m)| *m)
    }
}

fn coerce_weight(weight: f64, what: &str) -> f64 {
    if weight.is_finite() {
        weight
    } else {
        tracing::warn!("Non-finite {} ({}), treating as 0", what, weight);
        0.0
    }
}

/// Summarize one session under `scheme`
pub fn summarize_session(scheme: &RepScheme, session: &SessionRecord) -> SessionSummary {
    let sets = &session.performed_sets;
    let prescribed_sets = scheme
        .prescribed_sets()
        .max(session.target.sets.unwrap_or(0));
    let all_sets = prescribed_sets > TOP_SET_RULE_MAX_SETS;

    let rpes: Vec<f64> = sets
        .iter()
        .filter_map(|s| s.rpe)
        .filter(|r| r.is_finite())
        .collect();
    let average_rpe = if rpes.is_empty() {
        None
    } else {
        Some(rpes.iter().sum::<f64>() / rpes.len() as f64)
    };

    let last_target_weight = match session.target.weight {
        Some(w) => coerce_weight(w, "target weight"),
        None => sets
            .first()
            .map(|s| coerce_weight(s.weight, "set weight"))
            .unwrap_or(0.0),
    };

    let margins: Vec<i64> = sets
        .iter()
        .enumerate()
        .map(|(i, s)| s.reps as i64 - required_reps(scheme, session, i) as i64)
        .collect();

    let deciding = deciding_set(&margins, all_sets);
    let met_target = matches!(deciding, Some((_, margin)) if margin >= 0);
    let achieved_reps = deciding.map(|(i, _)| sets[i].reps);

    let topped_out = match scheme {
        RepScheme::Range { max_reps, .. } if !sets.is_empty() => {
            if all_sets {
                sets.iter().all(|s| s.reps >= *max_reps)
            } else {
                sets.iter().any(|s| s.reps >= *max_reps)
            }
        }
        _ => false,
    };

    let baseline_reps = scheme.baseline().0;
    let within_tolerance = match deciding {
        Some((i, margin)) if !met_target && baseline_reps > HIGH_REP_THRESHOLD => {
            let target = required_reps(scheme, session, i);
            let allowed = if target == TABLE_MAX_REPS {
                TOLERANCE_REPS_AT_TABLE_MAX
            } else {
                TOLERANCE_REPS
            };
            (-margin) as u32 <= allowed
        }
        _ => false,
    };

    tracing::trace!(
        met_target,
        topped_out,
        within_tolerance,
        ?average_rpe,
        "Summarized session at {}",
        session.performed_at
    );

    SessionSummary {
        met_target,
        topped_out,
        average_rpe,
        last_target_weight,
        within_tolerance,
        achieved_reps,
    }
}
