//! Inclusive calendar date ranges.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::{Result, SubscriptionError};

/// Inclusive range of calendar days, `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start` through `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::InvalidDateRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(SubscriptionError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, counting both ends.
    #[must_use]
    pub fn num_days(&self) -> u64 {
        // start <= end is guaranteed by the constructor
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// Iterates over every day of the range in chronological order.
    #[must_use]
    pub fn iter(&self) -> DateRangeIter {
        DateRangeIter { next: Some(self.start), end: self.end }
    }
}

impl IntoIterator for DateRange {
    type IntoIter = DateRangeIter;
    type Item = NaiveDate;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateRangeIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateRangeIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.checked_add_days(Days::new(1));
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .filter(|d| *d <= self.end)
            .map_or(0, |d| (self.end - d).num_days().unsigned_abs() + 1);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRangeIter {}
