//! Building subscriptions from an activation date provider.

use std::fmt;

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::{
    config::SubscriptionConfig,
    error::{Result, SubscriptionError},
    interval::Interval,
    partition::partition,
    provider::ActivationDateProvider,
    subscription::Subscription,
};

/// Validates provider output and assembles [`Subscription`]s.
///
/// The builder owns the configured interval and the application's activation date
/// provider. Each build asks the provider for the activation date, so a builder can be
/// kept for the lifetime of the application.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use subscription_periods::{FixedActivationDate, Interval, SubscriptionBuilder, SubscriptionError};
///
/// let activation = NaiveDate::from_ymd_opt(2012, 9, 2).unwrap();
/// let builder = SubscriptionBuilder::new(Interval::of_days(30)?, FixedActivationDate::on(activation));
///
/// let today = NaiveDate::from_ymd_opt(2012, 9, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// assert!(matches!(builder.build_at(today), Err(SubscriptionError::InvalidActivationDate)));
/// # Ok::<(), SubscriptionError>(())
/// ```
pub struct SubscriptionBuilder {
    interval: Interval,
    provider: Box<dyn ActivationDateProvider>,
}

impl fmt::Debug for SubscriptionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionBuilder")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl SubscriptionBuilder {
    /// Creates a builder for `interval` backed by `provider`.
    pub fn new(interval: Interval, provider: impl ActivationDateProvider + 'static) -> Self {
        Self { interval, provider: Box::new(provider) }
    }

    /// Creates a builder from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error if the interval is missing, malformed
    /// or shorter than one day.
    pub fn from_config(
        config: &SubscriptionConfig,
        provider: impl ActivationDateProvider + 'static,
    ) -> Result<Self> {
        Ok(Self::new(config.interval()?, provider))
    }

    /// Recurrence interval used for every build.
    #[must_use]
    pub const fn interval(&self) -> &Interval {
        &self.interval
    }

    /// The activation date provider.
    #[must_use]
    pub fn provider(&self) -> &dyn ActivationDateProvider {
        self.provider.as_ref()
    }

    /// Builds a subscription as of the current UTC time.
    ///
    /// The clock is read once; see [`build_at`](Self::build_at).
    ///
    /// # Errors
    ///
    /// See [`build_at`](Self::build_at).
    pub fn build(&self) -> Result<Subscription> {
        self.build_at(Utc::now().naive_utc())
    }

    /// Builds a subscription as of `today`.
    ///
    /// The activation date is compared with `today` including the time of day, then both
    /// are truncated to dates before partitioning.
    ///
    /// # Errors
    ///
    /// - [`SubscriptionError::UnexpectedActivationDateType`] if the provider returned
    ///   nothing or a value that is not a date
    /// - [`SubscriptionError::InvalidActivationDate`] if the activation date is after `today`
    /// - [`SubscriptionError::DateOutOfRange`] if period boundaries overflow the calendar
    #[instrument(skip(self), fields(interval = %self.interval))]
    pub fn build_at(&self, today: NaiveDateTime) -> Result<Subscription> {
        let activation = self.activation_datetime()?;

        if activation > today {
            warn!(%activation, "Activation date is in the future");
            return Err(SubscriptionError::InvalidActivationDate);
        }

        let periods = partition(activation.date(), &self.interval, today.date())?;
        debug!(%activation, periods = periods.len(), "Subscription built");

        Ok(Subscription::new(self.interval, periods))
    }

    fn activation_datetime(&self) -> Result<NaiveDateTime> {
        let Some(value) = self.provider.activation_date() else {
            warn!(kind = "null", "Activation date provider returned no value");
            return Err(SubscriptionError::UnexpectedActivationDateType("null".to_owned()));
        };

        value.as_datetime().ok_or_else(|| {
            warn!(kind = value.kind(), "Activation date provider returned a non-date value");
            SubscriptionError::UnexpectedActivationDateType(value.kind().to_owned())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use chrono::{NaiveDate, TimeDelta};
    use serde_json::json;

    use super::*;
    use crate::provider::{ActivationValue, FixedActivationDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(0, 0, 0).unwrap()
    }

    fn builder(interval_days: u32, activation: NaiveDate) -> SubscriptionBuilder {
        SubscriptionBuilder::new(
            Interval::of_days(interval_days).unwrap(),
            FixedActivationDate::on(activation),
        )
    }

    // ========================================================================
    // Validation Tests
    // ========================================================================

    #[test]
    fn test_rejects_missing_activation_date() {
        let missing = || -> Option<ActivationValue> { None };
        let builder = SubscriptionBuilder::new(Interval::of_days(30).unwrap(), missing);
        let err = builder.build_at(midnight(2012, 9, 1)).unwrap_err();
        assert!(matches!(err, SubscriptionError::UnexpectedActivationDateType(ref k) if k == "null"));
    }

    #[test]
    fn test_rejects_non_date_values() {
        let values = [
            (ActivationValue::Text(String::new()), "string"),
            (ActivationValue::Record(json!({})), "object"),
            (ActivationValue::Record(json!(null)), "null"),
            (ActivationValue::Record(json!(1_346_457_600)), "number"),
        ];

        for (value, expected_kind) in values {
            let builder = SubscriptionBuilder::new(Interval::of_days(30).unwrap(), move || {
                Some(value.clone())
            });
            let err = builder.build_at(midnight(2012, 9, 1)).unwrap_err();
            assert!(
                matches!(err, SubscriptionError::UnexpectedActivationDateType(ref k) if k == expected_kind),
                "expected {expected_kind}, got {err:?}"
            );
            assert!(err.to_string().starts_with("Expected activation date of type DateTime"));
        }
    }

    #[test]
    fn test_rejects_activation_one_second_in_future() {
        let today = midnight(2012, 9, 1);
        let activation = today + TimeDelta::seconds(1);
        let builder =
            SubscriptionBuilder::new(Interval::of_days(30).unwrap(), FixedActivationDate::new(activation));

        let err = builder.build_at(today).unwrap_err();
        assert!(matches!(err, SubscriptionError::InvalidActivationDate));
        assert!(err.to_string().contains("should not be in the future"));
    }

    #[test]
    fn test_rejects_activation_one_day_in_future() {
        let err = builder(30, date(2012, 9, 2)).build_at(midnight(2012, 9, 1)).unwrap_err();
        assert!(matches!(err, SubscriptionError::InvalidActivationDate));
    }

    #[test]
    fn test_earlier_time_same_day_is_accepted() {
        let activation = date(2012, 9, 1).and_hms_opt(8, 0, 0).unwrap();
        let today = date(2012, 9, 1).and_hms_opt(17, 0, 0).unwrap();
        let builder =
            SubscriptionBuilder::new(Interval::of_days(30).unwrap(), FixedActivationDate::new(activation));

        let sub = builder.build_at(today).unwrap();
        assert_eq!(sub.count(), 1);
        assert_eq!(sub.first_period().unwrap().first_date(), date(2012, 9, 1));
    }

    // ========================================================================
    // Assembly Tests
    // ========================================================================

    #[test]
    fn test_same_day_subscription() {
        let sub = builder(30, date(2012, 9, 1)).build_at(midnight(2012, 9, 1)).unwrap();
        assert_eq!(sub.count(), 1);
        assert_eq!(sub.current_period().unwrap().first_date(), date(2012, 9, 1));
        assert_eq!(sub.current_period().unwrap().last_date(), date(2012, 9, 30));
    }

    #[test]
    fn test_time_of_day_is_truncated() {
        let activation = date(2012, 9, 1).and_hms_opt(23, 59, 59).unwrap();
        let builder =
            SubscriptionBuilder::new(Interval::of_days(1).unwrap(), FixedActivationDate::new(activation));

        let sub = builder.build_at(date(2012, 9, 12).and_hms_opt(0, 0, 1).unwrap()).unwrap();
        assert_eq!(sub.count(), 12);
        assert_eq!(sub.first_period().unwrap().first_date(), date(2012, 9, 1));
    }

    #[test]
    fn test_interval_is_carried_into_subscription() {
        let builder = builder(30, date(2012, 9, 1));
        let sub = builder.build_at(midnight(2012, 12, 12)).unwrap();
        assert_eq!(sub.interval(), builder.interval());
        assert_eq!(sub.count(), 4);
    }

    #[test]
    fn test_provider_consulted_once_per_build() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let builder = SubscriptionBuilder::new(Interval::of_days(7).unwrap(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(ActivationValue::Date(NaiveDate::from_ymd_opt(2012, 9, 1).unwrap()))
        });

        builder.build_at(midnight(2012, 10, 1)).unwrap();
        builder.build_at(midnight(2012, 10, 1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(builder.provider().activation_date().is_some());
    }

    #[test]
    fn test_build_uses_current_time() {
        let sub = builder(30, date(2012, 9, 1)).build().unwrap();
        let today = Utc::now().date_naive();
        assert!(sub.current_period().unwrap().first_date() <= today);
        assert!(sub.period(today).is_some());
    }

    #[test]
    fn test_debug_hides_provider() {
        let debug = format!("{:?}", builder(30, date(2012, 9, 1)));
        assert!(debug.contains("SubscriptionBuilder"));
        assert!(debug.contains("interval"));
    }
}
