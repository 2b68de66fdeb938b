//! Error types for subscription period calculation.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Activation Errors** ([`SubscriptionError::UnexpectedActivationDateType`],
//!   [`SubscriptionError::InvalidActivationDate`]): the activation date provider handed back
//!   something unusable
//! - **Interval Errors** ([`SubscriptionError::InvalidInterval`],
//!   [`SubscriptionError::IntervalTooShort`]): the recurrence interval cannot drive a schedule
//! - **Calendar Errors** ([`SubscriptionError::InvalidDateRange`],
//!   [`SubscriptionError::DateOutOfRange`]): date arithmetic failures
//! - **Schedule Errors** ([`SubscriptionError::EmptySchedule`]): querying a subscription with no
//!   periods
//! - **Configuration Errors** ([`SubscriptionError::Config`]): unreadable or malformed TOML
//!
//! # Examples
//!
//! ```
//! use subscription_periods::error::{Result, SubscriptionError};
//!
//! fn require_spec(spec: &str) -> Result<&str> {
//!     if spec.is_empty() {
//!         return Err(SubscriptionError::Config("interval cannot be empty".to_owned()));
//!     }
//!     Ok(spec)
//! }
//!
//! assert!(require_spec("").is_err());
//! ```

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for subscription operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, SubscriptionError>;

/// Errors that can occur while building or querying a subscription.
///
/// # Error Recovery
///
/// None of these errors are retried internally. The builder either returns a complete
/// [`Subscription`](crate::Subscription) or one of these errors:
///
/// - **Activation errors**: fix the provider's data and build again
/// - **Interval errors**: fix the configured interval specification
/// - [`EmptySchedule`](Self::EmptySchedule): indicates a programming error, since built
///   subscriptions always hold at least one period
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// The activation date provider returned something other than a date.
    ///
    /// Carries the kind of value that was received (`"null"`, `"string"`, `"object"`, ...).
    ///
    /// # Examples
    ///
    /// ```
    /// use subscription_periods::SubscriptionError;
    ///
    /// let err = SubscriptionError::UnexpectedActivationDateType("string".to_owned());
    /// assert_eq!(err.to_string(), "Expected activation date of type DateTime, string given.");
    /// ```
    #[error("Expected activation date of type DateTime, {0} given.")]
    UnexpectedActivationDateType(String),

    /// The activation date lies strictly after "today".
    #[error("Activation date is invalid: should not be in the future.")]
    InvalidActivationDate,

    /// First or current period requested on a subscription without periods.
    #[error("Subscription schedule is empty: no periods have been computed")]
    EmptySchedule,

    /// The interval specification could not be parsed.
    #[error("The interval {0} is not a valid interval specification.")]
    InvalidInterval(String),

    /// The interval does not advance the calendar by at least one whole day.
    #[error("The interval {0} should be at least 1 day long.")]
    IntervalTooShort(String),

    /// A date range was constructed with its start after its end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested first day.
        start: NaiveDate,
        /// Requested last day.
        end: NaiveDate,
    },

    /// Date arithmetic overflowed the supported calendar range.
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for SubscriptionError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
