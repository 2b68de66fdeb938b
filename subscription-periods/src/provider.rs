//! Activation date providers.
//!
//! The application decides where a subscription starts: a persisted record, a payment
//! callback, a configured constant. That knowledge lives behind
//! [`ActivationDateProvider`]. Whatever a provider returns is treated as untrusted input
//! and validated by [`SubscriptionBuilder`](crate::SubscriptionBuilder).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Value handed back by an activation date provider.
///
/// Only [`Date`](Self::Date) and [`DateTime`](Self::DateTime) are accepted by the builder.
/// The other variants let loosely typed sources pass their raw data through so the
/// builder can report exactly what it received.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationValue {
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time of day.
    DateTime(NaiveDateTime),
    /// Text that is not a recognizable date.
    Text(String),
    /// Loosely typed record, e.g. a JSON column.
    Record(Value),
}

impl ActivationValue {
    /// Parses text into a date value.
    ///
    /// Recognizes RFC 3339 timestamps (converted to UTC), `YYYY-MM-DDTHH:MM:SS`,
    /// `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`. Anything else is kept as
    /// [`Text`](Self::Text).
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use subscription_periods::ActivationValue;
    ///
    /// let value = ActivationValue::parse("2012-09-01");
    /// assert_eq!(value, ActivationValue::Date(NaiveDate::from_ymd_opt(2012, 9, 1).unwrap()));
    ///
    /// assert_eq!(ActivationValue::parse("soon").kind(), "string");
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::DateTime(dt.with_timezone(&Utc).naive_utc());
        }
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Self::DateTime(dt);
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Self::Date(date);
        }

        Self::Text(text.to_owned())
    }

    /// Name of the kind of value received, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Text(_) => "string",
            Self::Record(value) => match value {
                Value::Null => "null",
                Value::Bool(_) => "boolean",
                Value::Number(_) => "number",
                Value::String(_) => "string",
                Value::Array(_) => "array",
                Value::Object(_) => "object",
            },
        }
    }

    /// The value as a date-time, if it is a genuine date.
    ///
    /// Plain dates are taken at midnight.
    #[must_use]
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(date) => Some(date.and_time(chrono::NaiveTime::MIN)),
            Self::DateTime(dt) => Some(*dt),
            Self::Text(_) | Self::Record(_) => None,
        }
    }
}

impl From<NaiveDate> for ActivationValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for ActivationValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for ActivationValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt.naive_utc())
    }
}

impl From<Value> for ActivationValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::parse(&text),
            other => Self::Record(other),
        }
    }
}

/// Supplies the date a subscription was activated.
///
/// Implemented by the consuming application. Returning `None` means no activation date is
/// known, which the builder rejects.
///
/// Closures returning `Option<ActivationValue>` implement this trait:
///
/// ```
/// use chrono::NaiveDate;
/// use subscription_periods::{ActivationDateProvider, ActivationValue};
///
/// let provider = || Some(ActivationValue::from(NaiveDate::from_ymd_opt(2012, 9, 1).unwrap()));
/// assert_eq!(provider.activation_date().unwrap().kind(), "date");
/// ```
pub trait ActivationDateProvider: Send + Sync {
    /// Returns the activation date, or whatever raw value the source holds.
    fn activation_date(&self) -> Option<ActivationValue>;
}

impl<F> ActivationDateProvider for F
where
    F: Fn() -> Option<ActivationValue> + Send + Sync,
{
    fn activation_date(&self) -> Option<ActivationValue> {
        self()
    }
}

/// Provider that always returns the same date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedActivationDate(NaiveDateTime);

impl FixedActivationDate {
    /// Creates a provider for a fixed date-time.
    #[must_use]
    pub const fn new(activation: NaiveDateTime) -> Self {
        Self(activation)
    }

    /// Creates a provider for a fixed date, at midnight.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl ActivationDateProvider for FixedActivationDate {
    fn activation_date(&self) -> Option<ActivationValue> {
        Some(ActivationValue::DateTime(self.0))
    }
}

/// Provider backed by the raw `activation_date` text of a configuration file.
///
/// The text is parsed on every call with [`ActivationValue::parse`]; unparseable text is
/// passed through so the builder can reject it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredActivationDate {
    raw: String,
}

impl ConfiguredActivationDate {
    /// Wraps configured text.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The configured text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl ActivationDateProvider for ConfiguredActivationDate {
    fn activation_date(&self) -> Option<ActivationValue> {
        Some(ActivationValue::parse(&self.raw))
    }
}
