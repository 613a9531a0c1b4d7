//! Simulation window.

use crate::portfolio::DAYS_PER_YEAR;
use crate::{Error, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Closed date range `[start, end]` an analysis runs over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawWindow")]
pub struct AnalysisWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
struct RawWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWindow> for AnalysisWindow {
    type Error = Error;

    fn try_from(raw: RawWindow) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl AnalysisWindow {
    /// Create a window. `start` must be strictly before `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidWindow(format!(
                "start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Default window for a given day: `years` back from `today`, ending yesterday.
    pub fn trailing(today: NaiveDate, years: u32) -> Result<Self> {
        let start = today
            .checked_sub_days(Days::new(365 * u64::from(years)))
            .ok_or_else(|| Error::InvalidWindow(format!("{} years before {}", years, today)))?;
        let end = today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| Error::InvalidWindow(format!("day before {}", today)))?;

        Self::new(start, end)
    }

    /// Reject windows that reach past `today`.
    pub fn ending_by(self, today: NaiveDate) -> Result<Self> {
        if self.end > today {
            return Err(Error::InvalidWindow(format!(
                "end {} is after today ({})",
                self.end, today
            )));
        }
        Ok(self)
    }

    /// Calendar days between start and end.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Calendar span in 365.25-day years.
    pub fn years_elapsed(&self) -> f64 {
        self.days() as f64 / DAYS_PER_YEAR
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_and_empty() {
        assert!(AnalysisWindow::new(date(2024, 1, 2), date(2024, 1, 1)).is_err());
        assert!(matches!(
            AnalysisWindow::new(date(2024, 1, 1), date(2024, 1, 1)),
            Err(Error::InvalidWindow(_))
        ));
        assert!(AnalysisWindow::new(date(2024, 1, 1), date(2024, 1, 2)).is_ok());
    }

    #[test]
    fn test_trailing_three_years() {
        let window = AnalysisWindow::trailing(date(2026, 10, 17), 3).unwrap();
        assert_eq!(window.end, date(2026, 10, 16));
        assert_eq!(window.start, date(2026, 10, 17) - Days::new(1095));
        assert!(window.ending_by(date(2026, 10, 17)).is_ok());
    }

    #[test]
    fn test_trailing_zero_years() {
        assert!(AnalysisWindow::trailing(date(2026, 10, 17), 0).is_err());
    }

    #[test]
    fn test_ending_by_rejects_future() {
        let window = AnalysisWindow::new(date(2026, 1, 1), date(2026, 12, 31)).unwrap();
        assert!(window.ending_by(date(2026, 10, 17)).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let window: AnalysisWindow =
            serde_json::from_str(r#"{"start": "2024-01-01", "end": "2024-06-30"}"#).unwrap();
        assert_eq!(window.days(), 181);

        let inverted = serde_json::from_str::<AnalysisWindow>(
            r#"{"start": "2024-06-30", "end": "2024-01-01"}"#,
        );
        assert!(inverted.is_err());
    }

    #[test]
    fn test_years_elapsed() {
        // 2020-01-01 .. 2024-01-01 spans 1461 days, exactly four 365.25-day years
        let window = AnalysisWindow::new(date(2020, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(window.days(), 1461);
        assert_eq!(window.years_elapsed(), 4.0);
        assert!(window.contains(date(2022, 6, 1)));
        assert!(!window.contains(date(2024, 1, 2)));
    }
}
