//! Read-only view over a subscription's computed periods.

use std::{ops::Index, slice};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{
    error::{Result, SubscriptionError},
    interval::Interval,
    period::Period,
};

/// A subscription partitioned into periods.
///
/// Periods are chronological, contiguous and non-overlapping: index 0 starts on the
/// activation date and the last period contains the day the subscription was built.
/// Instances are produced by [`SubscriptionBuilder`](crate::SubscriptionBuilder) and never
/// change afterwards.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use subscription_periods::{FixedActivationDate, Interval, SubscriptionBuilder};
///
/// let activation = NaiveDate::from_ymd_opt(2012, 9, 1).unwrap();
/// let today = NaiveDate::from_ymd_opt(2012, 12, 12).unwrap().and_hms_opt(9, 0, 0).unwrap();
///
/// let builder = SubscriptionBuilder::new(Interval::of_days(30)?, FixedActivationDate::on(activation));
/// let subscription = builder.build_at(today)?;
///
/// assert_eq!(subscription.count(), 4);
/// assert_eq!(subscription.first_period()?.first_date(), activation);
///
/// let lookup = NaiveDate::from_ymd_opt(2012, 11, 1).unwrap();
/// let period = subscription.period(lookup).expect("inside the schedule");
/// assert_eq!(period.first_date(), NaiveDate::from_ymd_opt(2012, 10, 31).unwrap());
/// # Ok::<(), subscription_periods::SubscriptionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    interval: Interval,
    periods: Vec<Period>,
}

impl Subscription {
    pub(crate) const fn new(interval: Interval, periods: Vec<Period>) -> Self {
        Self { interval, periods }
    }

    /// Recurrence interval the periods were computed with.
    #[must_use]
    pub const fn interval(&self) -> &Interval {
        &self.interval
    }

    /// All periods, earliest first.
    #[must_use]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// The period starting on the activation date.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::EmptySchedule`] if there are no periods.
    pub fn first_period(&self) -> Result<&Period> {
        self.periods.first().ok_or(SubscriptionError::EmptySchedule)
    }

    /// The most recently started period, which may still be in progress.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::EmptySchedule`] if there are no periods.
    pub fn current_period(&self) -> Result<&Period> {
        self.periods.last().ok_or(SubscriptionError::EmptySchedule)
    }

    /// Number of periods.
    #[must_use]
    pub fn count(&self) -> usize {
        self.periods.len()
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count()
    }

    /// Whether the subscription has no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Period at `index`, counting from the earliest.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Period> {
        self.periods.get(index)
    }

    /// The period containing `date`, if any.
    ///
    /// Dates before activation or after the current period's last day are not covered.
    #[must_use]
    pub fn period(&self, date: NaiveDate) -> Option<&Period> {
        self.periods.iter().find(|period| period.contains(date))
    }

    /// The period containing the day of `datetime`, if any.
    #[must_use]
    pub fn period_at(&self, datetime: NaiveDateTime) -> Option<&Period> {
        self.period(datetime.date())
    }

    /// Iterates over periods, earliest first.
    pub fn iter(&self) -> slice::Iter<'_, Period> {
        self.periods.iter()
    }
}

impl Index<usize> for Subscription {
    type Output = Period;

    fn index(&self, index: usize) -> &Self::Output {
        &self.periods[index]
    }
}

impl<'a> IntoIterator for &'a Subscription {
    type IntoIter = slice::Iter<'a, Period>;
    type Item = &'a Period;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
