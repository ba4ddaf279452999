//! Weekly day-type scheduling.
//!
//! PPL-5x plan, weeks starting Sunday:
//! Sun rest, Mon push, Tue pull, Wed legs, Thu rest, Fri upper,
//! Sat lower or full depending on what the week has covered so far.

use crate::history::workouts_between;
use crate::{DayType, WorkoutSession};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Sessions each region should get per week before Saturday can be lower
const MIN_WEEKLY_COVERAGE: u32 = 2;

/// Region coverage for the current week
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    pub pushish: u32,
    pub pullish: u32,
    pub legs: u32,
    pub has_upper: bool,
}

impl Coverage {
    pub fn from_days(days: impl IntoIterator<Item = DayType>) -> Self {
        let mut cov = Coverage::default();
        for day in days {
            match day {
                DayType::Push => cov.pushish += 1,
                DayType::Pull => cov.pullish += 1,
                DayType::Legs | DayType::Lower => cov.legs += 1,
                DayType::Upper => {
                    cov.pushish += 1;
                    cov.pullish += 1;
                    cov.has_upper = true;
                }
                DayType::Full => {
                    cov.pushish += 1;
                    cov.pullish += 1;
                    cov.legs += 1;
                }
                DayType::Rest => {}
            }
        }
        cov
    }

    fn is_broad(&self) -> bool {
        self.has_upper
            && self.pushish >= MIN_WEEKLY_COVERAGE
            && self.pullish >= MIN_WEEKLY_COVERAGE
            && self.legs >= MIN_WEEKLY_COVERAGE
    }
}

/// Sunday on or before `day`
pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_sunday() as i64)
}

/// Pick the day type for `today` given everything logged so far
pub fn recommend_day_type(today: NaiveDate, workouts: &[WorkoutSession]) -> DayType {
    let day = match today.weekday() {
        Weekday::Sun | Weekday::Thu => DayType::Rest,
        Weekday::Mon => DayType::Push,
        Weekday::Tue => DayType::Pull,
        Weekday::Wed => DayType::Legs,
        Weekday::Fri => DayType::Upper,
        Weekday::Sat => {
            let week = workouts_between(workouts, start_of_week(today), today);
            let coverage = Coverage::from_days(week.iter().map(|w| w.day_type));
            tracing::debug!("Week coverage before Saturday: {:?}", coverage);
            if coverage.is_broad() {
                DayType::Lower
            } else {
                DayType::Full
            }
        }
    };
    tracing::debug!("Scheduled {} for {}", day, today);
    day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    // 2024-06-02 is a Sunday
    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn logged(day: u32, day_type: DayType) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            performed_at: Utc.with_ymd_and_hms(2024, 6, day, 7, 30, 0).unwrap(),
            day_type,
            exercises: vec![],
        }
    }

    #[test]
    fn test_fixed_weekdays() {
        assert_eq!(recommend_day_type(date(2), &[]), DayType::Rest);
        assert_eq!(recommend_day_type(date(3), &[]), DayType::Push);
        assert_eq!(recommend_day_type(date(4), &[]), DayType::Pull);
        assert_eq!(recommend_day_type(date(5), &[]), DayType::Legs);
        assert_eq!(recommend_day_type(date(6), &[]), DayType::Rest);
        assert_eq!(recommend_day_type(date(7), &[]), DayType::Upper);
    }

    #[test]
    fn test_start_of_week() {
        assert_eq!(start_of_week(date(8)), date(2));
        assert_eq!(start_of_week(date(2)), date(2));
    }

    #[test]
    fn test_saturday_full_week_goes_lower() {
        let week = vec![
            logged(3, DayType::Push),
            logged(4, DayType::Pull),
            logged(5, DayType::Legs),
            logged(7, DayType::Upper),
            logged(8, DayType::Lower),
        ];
        // Legs already at 2 thanks to an early Saturday lower session
        assert_eq!(recommend_day_type(date(8), &week), DayType::Lower);
    }

    #[test]
    fn test_saturday_missing_upper_goes_full() {
        let week = vec![
            logged(3, DayType::Push),
            logged(4, DayType::Pull),
            logged(5, DayType::Legs),
        ];
        assert_eq!(recommend_day_type(date(8), &week), DayType::Full);
    }

    #[test]
    fn test_saturday_thin_legs_goes_full() {
        let week = vec![
            logged(3, DayType::Push),
            logged(4, DayType::Pull),
            logged(5, DayType::Legs),
            logged(7, DayType::Upper),
        ];
        assert_eq!(recommend_day_type(date(8), &week), DayType::Full);
    }

    #[test]
    fn test_previous_week_ignored() {
        let last_week = vec![
            logged(1, DayType::Lower),
            logged(3, DayType::Push),
            logged(4, DayType::Pull),
            logged(5, DayType::Legs),
            logged(7, DayType::Upper),
        ];
        // June 1 falls in the prior week, so legs stay at 1
        assert_eq!(recommend_day_type(date(8), &last_week), DayType::Full);
    }

    #[test]
    fn test_coverage_counts() {
        let cov = Coverage::from_days([DayType::Full, DayType::Upper, DayType::Rest]);
        assert_eq!(
            cov,
            Coverage {
                pushish: 2,
                pullish: 2,
                legs: 1,
                has_upper: true
            }
        );
    }
}
