//! One-rep-max model and weight rounding.
//!
//! Numeric primitives shared by the summarizer and the engine:
//! - Epley 1RM estimate
//! - Percentage-of-max lookup for 1-15 reps
//! - Conversion of a load between rep counts at equal relative difficulty

/// Highest rep count in the percentage table; anything above clamps to it
pub const TABLE_MAX_REPS: u32 = 15;

/// Fraction of 1RM typically liftable for 1..=15 reps
const PERCENT_OF_MAX: [f64; TABLE_MAX_REPS as usize] = [
    1.0, 0.97, 0.94, 0.92, 0.89, 0.86, 0.83, 0.81, 0.78, 0.75, 0.73, 0.71, 0.70, 0.68, 0.67,
];

/// Round to the nearest multiple of `step`.
///
/// Non-finite values become 0 and negatives clamp to 0. A `step` that is zero,
/// negative or non-finite means "no rounding" (bodyweight movements).
pub fn round_to(value: f64, step: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = if step.is_finite() && step > 0.0 {
        (value / step).round() * step
    } else {
        value
    };
    trim_noise(rounded.max(0.0))
}

/// Largest multiple of `step` that does not exceed `value`
pub fn floor_to(value: f64, step: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let floored = if step.is_finite() && step > 0.0 {
        // Tolerate 89.99999 style representations of an exact multiple
        ((value / step) + 1e-9).floor() * step
    } else {
        value
    };
    trim_noise(floored.max(0.0))
}

fn trim_noise(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Epley estimate: `weight × (1 + reps/30)`
///
/// Returns `None` when either input is not finite.
pub fn estimate_1rm(weight: f64, reps: f64) -> Option<f64> {
    if !weight.is_finite() || !reps.is_finite() {
        return None;
    }
    Some(weight * (1.0 + reps / 30.0))
}

/// Fraction of 1RM liftable for `reps` repetitions.
///
/// Non-integer reps round to the nearest integer. Below 1 clamps to 100%,
/// 15 and above clamps to 67%.
pub fn percentage_of_max(reps: f64) -> f64 {
    let r = if reps.is_finite() { reps.round() } else { 0.0 };
    if r <= 1.0 {
        return PERCENT_OF_MAX[0];
    }
    if r >= TABLE_MAX_REPS as f64 {
        return PERCENT_OF_MAX[TABLE_MAX_REPS as usize - 1];
    }
    PERCENT_OF_MAX[r as usize - 1]
}

/// Load for `reps` repetitions given a 1RM, rounded to `rounding_step`
pub fn weight_for_reps(one_rm: f64, reps: u32, rounding_step: f64) -> f64 {
    let one_rm = if one_rm.is_finite() { one_rm } else { 0.0 };
    round_to(one_rm * percentage_of_max(reps as f64), rounding_step)
}

/// Convert a load prescribed at `from_reps` into the equivalent load at `to_reps`.
///
/// The implied 1RM comes from inverting the percentage table, not from Epley,
/// so converting back and forth is stable up to rounding.
pub fn convert_between_rep_counts(
    weight: f64,
    from_reps: u32,
    to_reps: u32,
    rounding_step: f64,
) -> f64 {
    let weight = if weight.is_finite() { weight } else { 0.0 };
    let implied_max = weight / percentage_of_max(from_reps as f64);
    weight_for_reps(implied_max, to_reps, rounding_step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_epley() {
        let est = estimate_1rm(100.0, 5.0).unwrap();
        assert!(approx(est, 100.0 * (1.0 + 5.0 / 30.0)));
        assert!(approx(estimate_1rm(100.0, 0.0).unwrap(), 100.0));
    }

    #[test]
    fn test_epley_rejects_non_finite() {
        assert!(estimate_1rm(f64::NAN, 5.0).is_none());
        assert!(estimate_1rm(100.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_percentage_table_monotonic() {
        let mut previous = f64::MAX;
        for reps in 1..=TABLE_MAX_REPS {
            let pct = percentage_of_max(reps as f64);
            assert!(pct < previous, "table not decreasing at {} reps", reps);
            previous = pct;
        }
        assert_eq!(percentage_of_max(1.0), 1.0);
        assert_eq!(percentage_of_max(15.0), 0.67);
    }

    #[test]
    fn test_percentage_clamps_and_rounds() {
        assert_eq!(percentage_of_max(0.0), 1.0);
        assert_eq!(percentage_of_max(-3.0), 1.0);
        assert_eq!(percentage_of_max(20.0), 0.67);
        assert_eq!(percentage_of_max(4.6), 0.89);
        assert_eq!(percentage_of_max(f64::NAN), 1.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(51.0, 2.5), 50.0);
        assert_eq!(round_to(51.3, 2.5), 52.5);
        assert_eq!(round_to(f64::NAN, 2.5), 0.0);
        assert_eq!(round_to(-4.0, 2.5), 0.0);
        // Bodyweight: no rounding
        assert_eq!(round_to(7.3, 0.0), 7.3);
    }

    #[test]
    fn test_floor_to() {
        assert_eq!(floor_to(90.0, 2.5), 90.0);
        assert_eq!(floor_to(90.0, 4.0), 88.0);
        assert_eq!(floor_to(89.99999999, 2.5), 90.0);
    }

    #[test]
    fn test_weight_for_reps() {
        assert_eq!(weight_for_reps(100.0, 10, 2.5), 75.0);
        assert_eq!(weight_for_reps(100.0, 1, 2.5), 100.0);
    }

    #[test]
    fn test_convert_between_rep_counts() {
        // 100 × 5 implies ~112.36 max; 71% of that is ~79.8
        assert_eq!(convert_between_rep_counts(100.0, 5, 12, 2.5), 80.0);
        // Same rep count is identity up to rounding
        assert_eq!(convert_between_rep_counts(80.0, 8, 8, 2.5), 80.0);
        // Fewer reps means more weight
        assert!(convert_between_rep_counts(80.0, 8, 5, 2.5) > 80.0);
    }
}
