use chrono::{Duration, TimeZone, Utc};
use lift_core::*;
use proptest::prelude::*;

fn definition(rep_scheme: RepScheme, modality: Modality) -> ExerciseDefinition {
    ExerciseDefinition {
        id: "subject".into(),
        name: "Subject".into(),
        increment: 5.0,
        rounding_step: 2.5,
        starting_weight: 45.0,
        rep_scheme,
        failure_policy: FailurePolicy::default(),
        modality,
        movement: MovementPattern::Press,
    }
}

fn session(day: i64, weight: f64, target_reps: u32, reps: &[u32], rpe: Option<f64>) -> SessionRecord {
    SessionRecord {
        performed_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(day),
        target: SessionTarget {
            weight: Some(weight),
            reps: Some(target_reps),
            sets: Some(reps.len() as u32),
        },
        performed_sets: reps
            .iter()
            .map(|&r| PerformedSet {
                reps: r,
                weight,
                rpe,
            })
            .collect(),
    }
}

fn fixed(target_reps: u32, sets: u32) -> RepScheme {
    RepScheme::Fixed { target_reps, sets }
}

fn is_multiple(value: f64, step: f64) -> bool {
    let ratio = value / step;
    (ratio - ratio.round()).abs() < 1e-6
}

proptest! {
    #[test]
    fn recommendation_is_deterministic(
        steps in 8u32..200,
        reps in prop::collection::vec(0u32..8, 1..6),
        rpe in prop::option::of(6.0f64..10.0),
    ) {
        let def = definition(fixed(5, 3), Modality::Dumbbell);
        let history = vec![session(0, steps as f64 * 2.5, 5, &reps, rpe)];
        prop_assert_eq!(recommend(&def, &history), recommend(&def, &history));
    }

    #[test]
    fn weight_is_a_multiple_of_rounding(
        steps in 0u32..200,
        reps in prop::collection::vec(0u32..15, 1..6),
        rpe in prop::option::of(5.0f64..10.0),
        misses in 0usize..4,
    ) {
        let def = definition(
            RepScheme::Range { min_reps: 8, max_reps: 12, sets: 3 },
            Modality::Barbell,
        );
        let weight = steps as f64 * 2.5;
        let mut history: Vec<_> = (0..misses as i64)
            .map(|d| session(d, weight, 8, &[4, 4, 4], None))
            .collect();
        history.push(session(misses as i64, weight, 8, &reps, rpe));

        let rec = recommend(&def, &history);
        prop_assert!(is_multiple(rec.weight, 2.5), "weight {} not a multiple of 2.5", rec.weight);
        prop_assert!(rec.weight >= 0.0);
        prop_assert!((8..=12).contains(&rec.reps));
    }

    #[test]
    fn dumbbell_cap_trades_weight_for_volume(
        steps in 36u32..120,
        target_reps in 5u32..=12,
    ) {
        let def = definition(fixed(target_reps, 3), Modality::Dumbbell);
        let weight = steps as f64 * 2.5;
        let history = vec![session(0, weight, target_reps, &[target_reps; 3], Some(8.0))];

        let rec = recommend(&def, &history);
        prop_assert!(rec.weight <= 90.0, "weight {} over the cap", rec.weight);
        prop_assert!(rec.plan.iter().all(|p| p.weight <= 90.0));
        prop_assert!(
            rec.reps > target_reps || rec.sets > 3,
            "capped without extra volume: {}x{}",
            rec.sets,
            rec.reps
        );
    }

    #[test]
    fn dumbbell_cap_holds_through_misses(
        steps in 37u32..120,
        target_reps in 5u32..=12,
        shortfall in 1u32..5,
        misses in 1usize..4,
    ) {
        let def = definition(fixed(target_reps, 3), Modality::Dumbbell);
        let weight = steps as f64 * 2.5;
        let performed = [target_reps.saturating_sub(shortfall); 3];
        let history: Vec<_> = (0..misses as i64)
            .map(|d| session(d, weight, target_reps, &performed, None))
            .collect();

        let rec = recommend(&def, &history);
        prop_assert_eq!(rec.metadata.failure_streak, misses as u32);
        prop_assert!(rec.weight <= 90.0, "weight {} over the cap", rec.weight);
        prop_assert!(rec.plan.iter().all(|p| p.weight <= 90.0));
        if misses == 1 {
            prop_assert!(
                rec.reps > target_reps || rec.sets > 3,
                "capped repeat without extra volume: {}x{}",
                rec.sets,
                rec.reps
            );
        }
    }

    #[test]
    fn deload_lowers_weight(
        steps in 8u32..200,
        misses in 2usize..6,
        top_reps in 0u32..5,
    ) {
        let def = definition(fixed(5, 3), Modality::Barbell);
        let weight = steps as f64 * 2.5;
        let history: Vec<_> = (0..misses as i64)
            .map(|d| session(d, weight, 5, &[top_reps, top_reps, top_reps], None))
            .collect();

        let rec = recommend(&def, &history);
        prop_assert!(rec.weight < weight, "{} not below {}", rec.weight, weight);
        prop_assert_eq!(rec.metadata.failure_streak, misses as u32);
    }

    #[test]
    fn lower_rpe_never_progresses_slower(
        steps in 8u32..200,
        low in 5.0f64..7.5,
        mid in 7.6f64..9.4,
        high in 9.5f64..10.0,
    ) {
        let def = definition(fixed(5, 3), Modality::Barbell);
        let weight = steps as f64 * 2.5;
        let at = |rpe: f64| recommend(&def, &[session(0, weight, 5, &[5, 5, 5], Some(rpe))]).weight;

        let (easy, normal, hard) = (at(low), at(mid), at(high));
        prop_assert!(easy >= normal && normal >= hard, "{} >= {} >= {}", easy, normal, hard);
        prop_assert!(hard > weight);
    }
}
