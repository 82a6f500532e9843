use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::ticker::DateBounds;

/// Selected backtest window plus the bounds it must stay inside.
///
/// Invariant: `min_date <= start_date < end_date <= max_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl DateRange {
    /// One-day window starting at `today`, with a day of slack on either side.
    /// Used before any ticker has been validated.
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            start_date: today,
            end_date: add_days(today, 1),
            min_date: sub_days(today, 1),
            max_date: add_days(today, 2),
        }
    }

    /// Full available history of a validated ticker.
    pub fn from_bounds(bounds: DateBounds) -> Self {
        Self {
            start_date: bounds.min,
            end_date: bounds.max,
            min_date: bounds.min,
            max_date: bounds.max,
        }
    }

    /// Range of days the start picker accepts: `[min, max - 1 day]`.
    #[must_use]
    pub fn start_limits(&self) -> (NaiveDate, NaiveDate) {
        (self.min_date, sub_days(self.max_date, 1))
    }

    /// Range of days the end picker accepts: `[start + 1 day, max]`.
    #[must_use]
    pub fn end_limits(&self) -> (NaiveDate, NaiveDate) {
        (add_days(self.start_date, 1), self.max_date)
    }

    /// Move the start of the window. If it lands on or after the current end,
    /// the end is pushed to the following day.
    pub fn select_start(&mut self, date: NaiveDate) -> Result<(), CoreError> {
        let (lo, hi) = self.start_limits();
        if date < lo || date > hi {
            return Err(CoreError::InvalidDateRange(format!(
                "start date {date} must be between {lo} and {hi}"
            )));
        }
        self.start_date = date;
        if date >= self.end_date {
            self.end_date = add_days(date, 1);
        }
        Ok(())
    }

    /// Move the end of the window.
    pub fn select_end(&mut self, date: NaiveDate) -> Result<(), CoreError> {
        let (lo, hi) = self.end_limits();
        if date < lo || date > hi {
            return Err(CoreError::InvalidDateRange(format!(
                "end date {date} must be between {lo} and {hi}"
            )));
        }
        self.end_date = date;
        Ok(())
    }

    /// Whether the range satisfies its ordering invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.min_date <= self.start_date
            && self.start_date < self.end_date
            && self.end_date <= self.max_date
    }
}

// NaiveDate arithmetic only fails at the edges of the representable calendar.
fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

fn sub_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}
