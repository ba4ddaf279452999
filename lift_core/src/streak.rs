//! Consecutive-miss counting.

use crate::summary::summarize_session;
use crate::{History, RepScheme};

/// Count consecutive missed sessions, newest first.
///
/// Stops at the first session that met its target. Recomputed from the full
/// history on every call; nothing is cached between calls.
pub fn compute_failure_streak(scheme: &RepScheme, history: &History) -> u32 {
    let streak = history
        .iter()
        .rev()
        .take_while(|session| !summarize_session(scheme, session).met_target)
        .count() as u32;

    tracing::trace!("Failure streak over {} sessions: {}", history.len(), streak);
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PerformedSet, SessionRecord, SessionTarget};
    use chrono::{Duration, Utc};

    fn session(days_ago: i64, reps: u32) -> SessionRecord {
        SessionRecord {
            performed_at: Utc::now() - Duration::days(days_ago),
            target: SessionTarget {
                weight: Some(100.0),
                reps: Some(5),
                sets: Some(3),
            },
            performed_sets: vec![
                PerformedSet {
                    reps,
                    weight: 100.0,
                    rpe: None,
                };
                3
            ],
        }
    }

    const SCHEME: RepScheme = RepScheme::Fixed {
        target_reps: 5,
        sets: 3,
    };

    #[test]
    fn test_empty_history() {
        assert_eq!(compute_failure_streak(&SCHEME, &[]), 0);
    }

    #[test]
    fn test_counts_trailing_misses() {
        let history = vec![session(9, 5), session(6, 4), session(3, 3), session(1, 4)];
        assert_eq!(compute_failure_streak(&SCHEME, &history), 3);
    }

    #[test]
    fn test_success_resets() {
        let history = vec![session(6, 4), session(3, 4), session(1, 5)];
        assert_eq!(compute_failure_streak(&SCHEME, &history), 0);
    }

    #[test]
    fn test_all_misses() {
        let history = vec![session(3, 2), session(1, 2)];
        assert_eq!(compute_failure_streak(&SCHEME, &history), 2);
    }
}
