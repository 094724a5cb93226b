//! Inclusive reporting windows.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// A date window, inclusive on both ends.
///
/// The end date covers the whole day (through 23:59:59.999), so a
/// transaction stamped at any time on `end` is inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWindow> for DateWindow {
    type Error = LedgerError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidWindow` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// A single-day window.
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The calendar month containing `date`.
    #[must_use]
    pub fn month_containing(date: NaiveDate) -> Self {
        let start = date - Days::new(u64::from(date.day0()));
        let mut end = date;
        while let Some(next) = end.succ_opt() {
            if next.month() != date.month() {
                break;
            }
            end = next;
        }
        Self { start, end }
    }

    /// First day of the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if the date falls inside the window.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns true if the timestamp falls inside the window (end-of-day inclusive).
    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.contains_date(at.date())
    }

    /// Returns true if the timestamp is strictly before the window opens.
    #[must_use]
    pub fn precedes(&self, at: NaiveDateTime) -> bool {
        at.date() < self.start
    }

    /// Every date in the window, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |day| *day <= self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_inverted_window() {
        let err = DateWindow::new(date(2024, 3, 10), date(2024, 3, 1)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidWindow {
                start: date(2024, 3, 10),
                end: date(2024, 3, 1)
            }
        );
    }

    #[test]
    fn test_end_is_inclusive_through_end_of_day() {
        let window = DateWindow::new(date(2024, 3, 1), date(2024, 3, 8)).unwrap();
        let late = date(2024, 3, 8).and_hms_milli_opt(23, 59, 59, 999).unwrap();
        let next_day = date(2024, 3, 9).and_hms_opt(0, 0, 0).unwrap();

        assert!(window.contains(late));
        assert!(!window.contains(next_day));
    }

    #[test]
    fn test_start_boundary_is_inside_not_before() {
        let window = DateWindow::new(date(2024, 3, 3), date(2024, 3, 8)).unwrap();
        let at_start = date(2024, 3, 3).and_hms_opt(0, 0, 0).unwrap();
        let just_before = date(2024, 3, 2).and_hms_opt(23, 59, 59).unwrap();

        assert!(window.contains(at_start));
        assert!(!window.precedes(at_start));
        assert!(window.precedes(just_before));
    }

    #[test]
    fn test_month_containing() {
        let window = DateWindow::month_containing(date(2024, 2, 17));
        assert_eq!(window.start(), date(2024, 2, 1));
        assert_eq!(window.end(), date(2024, 2, 29));

        let december = DateWindow::month_containing(date(2023, 12, 31));
        assert_eq!(december.start(), date(2023, 12, 1));
        assert_eq!(december.end(), date(2023, 12, 31));
    }

    #[test]
    fn test_days_iterates_inclusive_range() {
        let window = DateWindow::new(date(2024, 3, 30), date(2024, 4, 2)).unwrap();
        let days: Vec<_> = window.days().collect();
        assert_eq!(
            days,
            vec![
                date(2024, 3, 30),
                date(2024, 3, 31),
                date(2024, 4, 1),
                date(2024, 4, 2)
            ]
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: DateWindow =
            serde_json::from_str(r#"{"start":"2024-03-01","end":"2024-03-31"}"#).unwrap();
        assert_eq!(ok.end(), date(2024, 3, 31));

        let bad =
            serde_json::from_str::<DateWindow>(r#"{"start":"2024-04-01","end":"2024-03-31"}"#);
        assert!(bad.is_err());
    }
}
