//! Shared calendar utilities and interval arithmetic for forecasting primitives.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    /// Returns the amount, normalised so that malformed values contribute zero.
    fn amount(&self) -> f64;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Enumerates time units used by `TimeInterval`.
pub enum TimeUnit {
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Represents a time unit and multiplier for recurrence calculations.
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    pub const fn new(every: u32, unit: TimeUnit) -> Self {
        Self { every, unit }
    }

    /// Returns the date `steps` intervals after `anchor`.
    ///
    /// Occurrences are always computed from the anchor rather than chained from the previous
    /// occurrence, so a series seeded on the 31st lands on the last day of shorter months
    /// without drifting to the 28th for the rest of the year. Returns `None` once the result
    /// leaves chrono's representable range.
    pub fn nth_after(&self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate> {
        let count = self.every.checked_mul(steps)?;
        match self.unit {
            TimeUnit::Week => anchor.checked_add_days(Days::new(u64::from(count) * 7)),
            TimeUnit::Month => anchor.checked_add_months(Months::new(count)),
            TimeUnit::Year => anchor.checked_add_months(Months::new(count.checked_mul(12)?)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// A calendar month with inclusive boundaries.
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Builds the window of the calendar month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = first_of_month(date);
        Self {
            start,
            end: last_of_month(start),
        }
    }

    /// Builds the window `months` calendar months after the month containing `reference`.
    pub fn offset_from(reference: NaiveDate, months: u32) -> Option<Self> {
        first_of_month(reference)
            .checked_add_months(Months::new(months))
            .map(Self::containing)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Short month label such as `Mar 2025`.
    pub fn label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }
}

/// Returns the first day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.day0())))
        .unwrap_or(date)
}

/// Returns the last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Parses the date encodings produced by the upstream data layer.
///
/// Accepts plain ISO dates (`2025-03-15`), RFC 3339 timestamps, and any string whose first ten
/// characters form an ISO date. Anything else yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            trimmed
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}
