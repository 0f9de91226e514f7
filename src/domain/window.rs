use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive calendar-date range used by every aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Build a window; fails when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidRangeError> {
        if start > end {
            return Err(InvalidRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// The whole calendar year.
    pub fn year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self { start, end })
    }

    /// The whole calendar month.
    pub fn month(month: MonthRef) -> Option<Self> {
        let start = month.first_day()?;
        let end = month.next().first_day()?.pred_opt()?;
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Returned when a window's start falls after its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl std::fmt::Display for InvalidRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid date range: start {} is after end {}",
            self.start, self.end
        )
    }
}

impl std::error::Error for InvalidRangeError {}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    /// 1-based month number
    pub month: u32,
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month), "month out of range: {}", month);
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The month `n` months after this one.
    pub fn plus(&self, n: u32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + n as i64;
        Self::new(index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Short label such as `Jan 2024`.
    pub fn label(&self) -> String {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("???");
        format!("{} {}", name, self.year)
    }
}

impl std::fmt::Display for MonthRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_is_inclusive() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 2, 28)).unwrap();
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 2, 28)));
        assert!(!window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2023, 12, 31)));
    }

    #[test]
    fn test_single_day_window() {
        let day = date(2024, 5, 5);
        assert!(DateWindow::new(day, day).unwrap().contains(day));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let err = DateWindow::new(date(2024, 3, 1), date(2024, 2, 1)).unwrap_err();
        assert_eq!(err.start, date(2024, 3, 1));
        assert!(err.to_string().contains("2024-03-01"));
    }

    #[test]
    fn test_month_window_handles_leap_year() {
        let feb = DateWindow::month(MonthRef::new(2024, 2)).unwrap();
        assert_eq!(feb.end(), date(2024, 2, 29));
        let dec = DateWindow::month(MonthRef::new(2023, 12)).unwrap();
        assert_eq!(dec.end(), date(2023, 12, 31));
    }

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(MonthRef::new(2024, 12).next(), MonthRef::new(2025, 1));
        assert_eq!(MonthRef::new(2024, 1).prev(), MonthRef::new(2023, 12));
        assert_eq!(MonthRef::new(2024, 11).plus(3), MonthRef::new(2025, 2));
        assert_eq!(MonthRef::new(2024, 11).plus(0), MonthRef::new(2024, 11));
        assert_eq!(MonthRef::new(2024, 3).label(), "Mar 2024");
    }
}
