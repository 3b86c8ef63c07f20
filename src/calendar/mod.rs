//! Calendar helpers for monthly reporting: half-open date windows, month
//! arithmetic and aging-bucket classification.
//!
//! All dates are timezone-naive. A month runs from its first day inclusive to
//! the first day of the following month exclusive.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// A half-open reporting window `[start, end)`.
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateWindowError> {
        if end <= start {
            return Err(DateWindowError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let start = month_start(date);
        Self {
            start,
            end: next_month_start(start),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Last day that still belongs to the window.
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }

    pub fn day_count(&self) -> i64 {
        days_between(self.start, self.end)
    }

    /// Number of calendar months the window touches, never less than one.
    pub fn month_count(&self) -> u32 {
        let span = month_index(self.last_day()) - month_index(self.start) + 1;
        span.max(1) as u32
    }

    /// First day of every calendar month the window touches, oldest first.
    pub fn month_starts(&self) -> Vec<NaiveDate> {
        months_from_to(month_start(self.start), month_start(self.last_day()))
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange { start, end } => {
                write!(f, "date window end {end} must be after start {start}")
            }
        }
    }
}

impl std::error::Error for DateWindowError {}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    month_start(shift_month(month_start(date), 1))
}

/// First day of the month before the one containing `date`.
pub fn previous_month_start(date: NaiveDate) -> NaiveDate {
    month_start(shift_month(month_start(date), -1))
}

/// First day of the same calendar month one year earlier.
pub fn same_month_previous_year(date: NaiveDate) -> NaiveDate {
    month_start(shift_month(month_start(date), -12))
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Months elapsed since year zero; handy for month arithmetic and regression x-values.
pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month() as i32 - 1
}

/// Month starts from `first` to `last` inclusive.
pub fn months_from_to(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut cursor = Some(month_start(first));
    let last = month_start(last);
    while let Some(month) = cursor.filter(|month| *month <= last) {
        months.push(month);
        cursor = checked_shift_month(month, 1);
    }
    months
}

/// Moves `date` by `months`, clamping the day to the target month's length.
/// Stays on `date` when the target falls outside the calendar.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    checked_shift_month(date, months).unwrap_or(date)
}

/// Like [`shift_month`], but `None` past the representable calendar.
pub fn checked_shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = month_index(date).checked_add(months)?;
    let year = total.div_euclid(12);
    let month = (total.rem_euclid(12) + 1) as u32;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Index of the aging bucket for a receivable `days_overdue` past due.
///
/// Lower bounds are inclusive: with boundaries `[30, 60, 90]`, 29 days falls
/// into bucket 0, exactly 30 days into bucket 1 and 90 or more into the
/// open-ended last bucket.
pub fn aging_bucket_index(days_overdue: i64, boundaries: &[i64]) -> usize {
    boundaries
        .iter()
        .take_while(|bound| days_overdue >= **bound)
        .count()
}

/// Human-readable labels for the buckets produced by [`aging_bucket_index`].
pub fn aging_bucket_labels(boundaries: &[i64]) -> Vec<String> {
    let mut labels = Vec::with_capacity(boundaries.len() + 1);
    let mut lower = 0;
    for (idx, bound) in boundaries.iter().enumerate() {
        let start = if idx == 0 { lower } else { lower + 1 };
        labels.push(format!("{start}-{bound}"));
        lower = *bound;
    }
    labels.push(format!(">{lower}"));
    labels
}
