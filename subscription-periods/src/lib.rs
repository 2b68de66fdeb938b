//! Subscription Periods: Partition a Subscription's Lifetime into Billing Periods
//!
//! Given the date a subscription was activated, a recurrence interval and "today", this
//! crate splits the elapsed time into consecutive, fixed-length periods and answers the
//! questions billing code usually asks: which period is current, when did the first one
//! start, and which period does a given date fall into.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │  ActivationDateProvider  │  implemented by the application
//! └────────────┬─────────────┘
//!              │ Option<ActivationValue> (untrusted)
//! ┌────────────▼─────────────────────────────────────┐
//! │               SubscriptionBuilder                │
//! │  validate kind ─► reject future ─► truncate days │
//! └────────────┬─────────────────────────────────────┘
//!              │ activation date, interval, today
//! ┌────────────▼─────────────┐
//! │        partition         │  pure, deterministic
//! └────────────┬─────────────┘
//!              │ Vec<Period>
//! ┌────────────▼─────────────┐
//! │       Subscription       │  read-only queries
//! └──────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Build a Subscription
//!
//! ```rust
//! use chrono::NaiveDate;
//! use subscription_periods::{FixedActivationDate, Interval, SubscriptionBuilder};
//!
//! # fn example() -> subscription_periods::Result<()> {
//! let activation = NaiveDate::from_ymd_opt(2012, 9, 1).unwrap();
//! let builder = SubscriptionBuilder::new("P30D".parse::<Interval>()?, FixedActivationDate::on(activation));
//!
//! let today = NaiveDate::from_ymd_opt(2012, 12, 12).unwrap().and_hms_opt(10, 0, 0).unwrap();
//! let subscription = builder.build_at(today)?;
//!
//! for period in &subscription {
//!     println!("{} .. {}", period.first_date(), period.last_date());
//! }
//! assert_eq!(subscription.count(), 4);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## 2. Load the Interval from Configuration
//!
//! ```rust
//! use subscription_periods::{SubscriptionBuilder, SubscriptionConfig};
//!
//! # fn example() -> subscription_periods::Result<()> {
//! let config = SubscriptionConfig::from_toml(
//!     r#"
//!     interval = "P1W"
//!     activation_date = "2012-09-01"
//!     "#,
//! )?;
//!
//! let provider = config.activation_provider().expect("activation_date is configured");
//! let subscription = SubscriptionBuilder::from_config(&config, provider)?.build()?;
//! println!("current period: {:?}", subscription.current_period()?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## 3. Partition Without a Provider
//!
//! ```rust
//! use chrono::NaiveDate;
//! use subscription_periods::{Interval, partition};
//!
//! # fn example() -> subscription_periods::Result<()> {
//! let day = NaiveDate::from_ymd_opt(2012, 9, 1).unwrap();
//! let periods = partition(day, &Interval::of_days(1)?, day + chrono::Days::new(11))?;
//! assert_eq!(periods.len(), 12);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Module Organization
//!
//! - [`interval`]: ISO-8601 recurrence intervals
//! - [`range`]: inclusive date ranges
//! - [`period`]: a single subscription period
//! - [`partition`](mod@partition): the period generation algorithm
//! - [`subscription`]: the read-only subscription aggregate
//! - [`builder`]: provider validation and subscription assembly
//! - [`provider`]: the activation date provider trait and stock providers
//! - [`config`]: TOML configuration
//! - [`error`]: error types
//!
//! # Error Handling
//!
//! All operations return [`Result<T, SubscriptionError>`](error::Result):
//!
//! ```rust
//! use chrono::NaiveDate;
//! use subscription_periods::{ActivationValue, Interval, SubscriptionBuilder, SubscriptionError};
//!
//! let provider = || Some(ActivationValue::Text("next tuesday".to_owned()));
//! let builder = SubscriptionBuilder::new(Interval::of_days(30).unwrap(), provider);
//!
//! match builder.build() {
//!     Ok(subscription) => println!("{} periods", subscription.count()),
//!     Err(SubscriptionError::UnexpectedActivationDateType(kind)) => {
//!         eprintln!("provider returned a {kind}");
//!     }
//!     Err(SubscriptionError::InvalidActivationDate) => eprintln!("activation is in the future"),
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod builder;
pub mod config;
pub mod error;
pub mod interval;
pub mod partition;
pub mod period;
pub mod provider;
pub mod range;
pub mod subscription;

pub use builder::SubscriptionBuilder;
pub use config::SubscriptionConfig;
pub use error::{Result, SubscriptionError};
pub use interval::Interval;
pub use partition::partition;
pub use period::Period;
pub use provider::{
    ActivationDateProvider, ActivationValue, ConfiguredActivationDate, FixedActivationDate,
};
pub use range::DateRange;
pub use subscription::Subscription;

#[cfg(test)]
mod tests {
    mod proptest_partition;

    use super::*;

    #[test]
    fn test_builder_matches_partition() {
        let day = chrono::NaiveDate::from_ymd_opt(2012, 9, 1).unwrap();
        let today = chrono::NaiveDate::from_ymd_opt(2012, 10, 1).unwrap();
        let interval: Interval = "P1W".parse().unwrap();

        let periods = partition(day, &interval, today).unwrap();
        let subscription = SubscriptionBuilder::new(interval, FixedActivationDate::on(day))
            .build_at(today.and_hms_opt(9, 0, 0).unwrap())
            .unwrap();

        assert_eq!(subscription.periods(), periods.as_slice());
        assert_eq!(subscription.count(), 5);
        let first: &DateRange = subscription[0].as_range();
        assert_eq!(first.num_days(), 7);
    }

    #[test]
    fn test_config_errors_surface_as_subscription_errors() {
        let err = SubscriptionConfig::from_toml(r#"interval = "P1M""#).unwrap_err();
        assert!(matches!(err, SubscriptionError::IntervalTooShort(_)));
    }

    #[test]
    fn test_subscription_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Subscription>();
        assert_send_sync::<Period>();
        assert_send_sync::<Interval>();
        assert_send_sync::<SubscriptionBuilder>();
    }
}
