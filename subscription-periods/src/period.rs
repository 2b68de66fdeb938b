//! A single subscription period.

use chrono::NaiveDate;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    error::Result,
    range::{DateRange, DateRangeIter},
};

/// One contiguous, inclusive span of days within a subscription.
///
/// Periods are produced by [`partition`](crate::partition()) and are immutable.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use subscription_periods::{Interval, partition};
///
/// let first = NaiveDate::from_ymd_opt(2012, 9, 1).unwrap();
/// let periods = partition(first, &Interval::of_days(30)?, first)?;
///
/// let period = &periods[0];
/// assert_eq!(period.first_date(), first);
/// assert_eq!(period.last_date(), NaiveDate::from_ymd_opt(2012, 9, 30).unwrap());
/// assert_eq!(period.num_days(), 30);
/// # Ok::<(), subscription_periods::SubscriptionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    range: DateRange,
}

impl Period {
    pub(crate) fn new(first_date: NaiveDate, last_date: NaiveDate) -> Result<Self> {
        Ok(Self { range: DateRange::new(first_date, last_date)? })
    }

    /// First day of the period.
    #[must_use]
    pub const fn first_date(&self) -> NaiveDate {
        self.range.start()
    }

    /// Last day of the period.
    #[must_use]
    pub const fn last_date(&self) -> NaiveDate {
        self.range.end()
    }

    /// Whether `date` falls within `first_date..=last_date`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range.contains(date)
    }

    /// Length of the period in days.
    #[must_use]
    pub fn num_days(&self) -> u64 {
        self.range.num_days()
    }

    /// Every day of the period, first to last.
    #[must_use]
    pub fn days(&self) -> DateRangeIter {
        self.range.iter()
    }

    /// The underlying date range.
    #[must_use]
    pub const fn as_range(&self) -> &DateRange {
        &self.range
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Period", 2)?;
        state.serialize_field("first_date", &self.first_date())?;
        state.serialize_field("last_date", &self.last_date())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubscriptionError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_bounds() {
        let period = Period::new(date(2012, 10, 31), date(2012, 11, 29)).unwrap();
        assert_eq!(period.first_date(), date(2012, 10, 31));
        assert_eq!(period.last_date(), date(2012, 11, 29));
        assert_eq!(period.num_days(), 30);
    }

    #[test]
    fn test_period_rejects_reversed_bounds() {
        let result = Period::new(date(2012, 9, 2), date(2012, 9, 1));
        assert!(matches!(result, Err(SubscriptionError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_period_days_iteration() {
        let period = Period::new(date(2012, 9, 1), date(2012, 9, 3)).unwrap();
        let days: Vec<_> = period.days().collect();
        assert_eq!(days, vec![date(2012, 9, 1), date(2012, 9, 2), date(2012, 9, 3)]);
    }

    #[test]
    fn test_period_serialization() {
        let period = Period::new(date(2012, 9, 1), date(2012, 9, 30)).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, r#"{"first_date":"2012-09-01","last_date":"2012-09-30"}"#);
    }
}
