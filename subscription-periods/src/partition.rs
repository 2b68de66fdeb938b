//! Splitting a subscription's lifetime into periods.

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    error::{Result, SubscriptionError},
    interval::Interval,
    period::Period,
};

/// Partitions the days from `activation_date` up to `today` into consecutive periods.
///
/// Each period starts where the previous one ended and spans exactly one `interval`:
/// a period starting on `first` ends on `first + interval - 1 day`. A new period is
/// started for every interval boundary on or before `today`, so the last period
/// contains `today` and may extend past it.
///
/// The result is chronological and never empty.
///
/// # Errors
///
/// - [`SubscriptionError::InvalidActivationDate`] if `activation_date` is after `today`
/// - [`SubscriptionError::IntervalTooShort`] if the interval fails to advance the calendar
/// - [`SubscriptionError::DateOutOfRange`] if a period boundary leaves the supported calendar
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use subscription_periods::{Interval, partition};
///
/// let activation = NaiveDate::from_ymd_opt(2012, 9, 1).unwrap();
/// let today = NaiveDate::from_ymd_opt(2012, 12, 12).unwrap();
///
/// let periods = partition(activation, &"P30D".parse::<Interval>()?, today)?;
/// assert_eq!(periods.len(), 4);
/// assert_eq!(periods[3].first_date(), NaiveDate::from_ymd_opt(2012, 11, 30).unwrap());
/// assert_eq!(periods[3].last_date(), NaiveDate::from_ymd_opt(2012, 12, 29).unwrap());
/// # Ok::<(), subscription_periods::SubscriptionError>(())
/// ```
pub fn partition(
    activation_date: NaiveDate,
    interval: &Interval,
    today: NaiveDate,
) -> Result<Vec<Period>> {
    if activation_date > today {
        return Err(SubscriptionError::InvalidActivationDate);
    }

    let mut periods = Vec::with_capacity(estimated_count(activation_date, interval, today));
    let mut cursor = activation_date;

    while cursor <= today {
        let next = interval.add_to(cursor)?;
        if next <= cursor {
            return Err(SubscriptionError::IntervalTooShort(interval.to_string()));
        }
        let last_date = next.pred_opt().ok_or_else(|| {
            SubscriptionError::DateOutOfRange(format!("day before {next}"))
        })?;

        periods.push(Period::new(cursor, last_date)?);
        cursor = next;
    }

    debug!(
        activation_date = %activation_date,
        today = %today,
        interval = %interval,
        periods = periods.len(),
        "Partitioned subscription"
    );

    Ok(periods)
}

/// Upper-bound guess for the number of periods, used to size the output once.
fn estimated_count(activation_date: NaiveDate, interval: &Interval, today: NaiveDate) -> usize {
    let elapsed = (today - activation_date).num_days().unsigned_abs();
    let step = if interval.years() > 0 || interval.months() > 0 {
        // at least 28 days per month, plus the days component
        u64::from(interval.days()) + 28
    } else {
        u64::from(interval.days())
    };
    usize::try_from(elapsed / step.max(1) + 1).unwrap_or(usize::MAX).min(4096)
}
