//! Hijri conversions.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Julian day number of 0001-01-01 (proleptic Gregorian) minus one.
const CE_TO_JULIAN_DAY: i64 = 1_721_425;

/// Julian day number of 1 Muharram 1 AH (civil epoch).
const HIJRI_EPOCH_JULIAN_DAY: i64 = 1_948_440;

/// Gregorian year of the Hijra used by the linear approximation.
const HIJRA_YEAR: i64 = 622;

/// Lunar/solar year ratio scaled by 10_000 (1.0307).
const YEAR_RATIO_SCALED: i64 = 10_307;

const MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Thani",
    "Jumada al-Ula",
    "Jumada al-Akhirah",
    "Rajab",
    "Shaban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qadah",
    "Dhu al-Hijjah",
];

/// A date in the parallel (Hijri) calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelDate {
    /// Hijri year.
    pub year: i64,
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-30.
    pub day: u32,
}

impl ParallelDate {
    /// Returns the month name.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        let index = usize::try_from(self.month.saturating_sub(1)).unwrap_or(0);
        MONTH_NAMES.get(index).copied().unwrap_or(MONTH_NAMES[0])
    }
}

impl fmt::Display for ParallelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} H", self.day, self.month_name(), self.year)
    }
}

/// Approximates the Hijri year for a Gregorian year.
///
/// `round((year - 622) * 1.0307)`, rounding halves away from zero.
#[must_use]
pub fn hijri_year_approximation(gregorian_year: i32) -> i64 {
    let scaled = (i64::from(gregorian_year) - HIJRA_YEAR) * YEAR_RATIO_SCALED;
    if scaled >= 0 {
        (scaled + 5_000) / 10_000
    } else {
        (scaled - 5_000) / 10_000
    }
}

/// Last two digits of a year, zero padded.
#[must_use]
pub fn two_digit_year(year: i64) -> String {
    format!("{:02}", year.rem_euclid(100))
}

/// Converts a Gregorian date with the tabular Hijri arithmetic.
#[must_use]
pub fn to_parallel_date(date: NaiveDate) -> ParallelDate {
    let julian_day = i64::from(date.num_days_from_ce()) + CE_TO_JULIAN_DAY;

    let mut l = julian_day - HIJRI_EPOCH_JULIAN_DAY + 10_632;
    let n = (l - 1) / 10_631;
    l = l - 10_631 * n + 354;
    let j = ((10_985 - l) / 5_316) * ((50 * l) / 17_719) + (l / 5_670) * ((43 * l) / 15_238);
    l = l - ((30 - j) / 15) * ((17_719 * j) / 50) - (j / 16) * ((15_238 * j) / 43) + 29;
    let month = (24 * l) / 709;
    let day = l - (709 * month) / 24;

    ParallelDate {
        year: 30 * n + j - 30,
        month: u32::try_from(month).unwrap_or(1),
        day: u32::try_from(day).unwrap_or(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2000, 1420)]
    #[case(2024, 1445)]
    #[case(2025, 1446)]
    #[case(622, 0)]
    fn test_year_approximation(#[case] gregorian: i32, #[case] expected: i64) {
        assert_eq!(hijri_year_approximation(gregorian), expected);
    }

    #[test]
    fn test_year_approximation_before_hijra_rounds_away_from_zero() {
        // (612 - 622) * 1.0307 = -10.307
        assert_eq!(hijri_year_approximation(612), -10);
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(two_digit_year(2024), "24");
        assert_eq!(two_digit_year(1405), "05");
        assert_eq!(two_digit_year(2000), "00");
    }

    #[test]
    fn test_known_tabular_date() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let parallel = to_parallel_date(date);

        assert_eq!(
            parallel,
            ParallelDate {
                year: 1420,
                month: 9,
                day: 24
            }
        );
        assert_eq!(parallel.to_string(), "24 Ramadan 1420 H");
    }

    #[test]
    fn test_epoch_maps_to_first_of_muharram() {
        let epoch = NaiveDate::from_num_days_from_ce_opt(
            i32::try_from(HIJRI_EPOCH_JULIAN_DAY - CE_TO_JULIAN_DAY).unwrap(),
        )
        .unwrap();
        let parallel = to_parallel_date(epoch);

        assert_eq!(parallel.year, 1);
        assert_eq!(parallel.month, 1);
        assert_eq!(parallel.day, 1);
        assert_eq!(parallel.month_name(), "Muharram");
    }

    #[test]
    fn test_consecutive_days_advance() {
        let first = to_parallel_date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        let second = to_parallel_date(NaiveDate::from_ymd_opt(2000, 1, 2).unwrap());

        assert_eq!(second.day, first.day + 1);
        assert_eq!(second.month, first.month);
    }
}
