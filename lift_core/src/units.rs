//! Weight unit conversion for display and input.
//!
//! All stored weights are pounds. Only the presentation layer converts.

use serde::{Deserialize, Serialize};

pub const LBS_PER_KG: f64 = 2.204_622_621_85;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Lb,
    Kg,
}

impl WeightUnit {
    pub fn label(&self) -> &'static str {
        match self {
            WeightUnit::Lb => "lb",
            WeightUnit::Kg => "kg",
        }
    }
}

/// Convert a typed value in `unit` to pounds
pub fn to_lbs(value: f64, unit: WeightUnit) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    match unit {
        WeightUnit::Lb => value,
        WeightUnit::Kg => value * LBS_PER_KG,
    }
}

/// Convert stored pounds to `unit`
pub fn from_lbs(lbs: f64, unit: WeightUnit) -> f64 {
    if !lbs.is_finite() {
        return 0.0;
    }
    match unit {
        WeightUnit::Lb => lbs,
        WeightUnit::Kg => lbs / LBS_PER_KG,
    }
}

/// kg under 10 → nearest 1; kg 10+ → nearest 2.5; lb → one decimal
pub fn round_for_display(value: f64, unit: WeightUnit) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    match unit {
        WeightUnit::Kg => {
            let step = if value < 10.0 { 1.0 } else { 2.5 };
            ((value / step).round() * step * 10.0).round() / 10.0
        }
        WeightUnit::Lb => (value * 10.0).round() / 10.0,
    }
}

/// "130 lb" or "59 kg"
pub fn format_weight(lbs: f64, unit: WeightUnit) -> String {
    if !lbs.is_finite() {
        return "-".to_string();
    }
    let display = round_for_display(from_lbs(lbs, unit), unit);
    format!("{} {}", display, unit.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lb_passthrough() {
        assert_eq!(to_lbs(135.0, WeightUnit::Lb), 135.0);
        assert_eq!(format_weight(130.0, WeightUnit::Lb), "130 lb");
        assert_eq!(format_weight(52.5, WeightUnit::Lb), "52.5 lb");
    }

    #[test]
    fn test_kg_display_rounding() {
        // 130 lb ≈ 58.97 kg → nearest 2.5
        assert_eq!(format_weight(130.0, WeightUnit::Kg), "60 kg");
        // 100 lb ≈ 45.36 kg
        assert_eq!(format_weight(100.0, WeightUnit::Kg), "45 kg");
        // 17.6 lb ≈ 7.98 kg → nearest 1
        assert_eq!(format_weight(17.6, WeightUnit::Kg), "8 kg");
    }

    #[test]
    fn test_kg_input_roundtrip() {
        let lbs = to_lbs(20.0, WeightUnit::Kg);
        assert!((from_lbs(lbs, WeightUnit::Kg) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(to_lbs(f64::NAN, WeightUnit::Kg), 0.0);
        assert_eq!(format_weight(f64::INFINITY, WeightUnit::Lb), "-");
    }
}
