//! Subscription configuration.
//!
//! TOML-deserializable settings that feed [`SubscriptionBuilder`](crate::SubscriptionBuilder):
//!
//! ```toml
//! # required: ISO-8601 date duration, at least one day long
//! interval = "P30D"
//!
//! # optional: static activation date, used when the application has no provider of its own
//! activation_date = "2012-09-01"
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Result, SubscriptionError},
    interval::Interval,
    provider::ConfiguredActivationDate,
};

/// Root subscription configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionConfig {
    /// Interval specification, e.g. `"P30D"`.
    #[serde(default)]
    pub interval: String,

    /// Raw activation date text.
    #[serde(default)]
    pub activation_date: Option<String>,
}

impl SubscriptionConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::Config`] for malformed TOML, or the validation error
    /// described in [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use subscription_periods::SubscriptionConfig;
    ///
    /// let config = SubscriptionConfig::from_toml(r#"interval = "P30D""#).unwrap();
    /// assert_eq!(config.interval().unwrap().days(), 30);
    ///
    /// assert!(SubscriptionConfig::from_toml(r#"interval = "P1M""#).is_err());
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::Config`] if the file cannot be read, plus every error of
    /// [`from_toml`](Self::from_toml).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file without validating it.
    ///
    /// Lets callers layer overrides on top of a partial file before calling
    /// [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::Config`] if the file cannot be read or is not valid TOML.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            SubscriptionError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "Loaded subscription configuration");
        Ok(toml::from_str(&text)?)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`SubscriptionError::Config`] if `interval` is missing or empty
    /// - [`SubscriptionError::InvalidInterval`] if it is not an interval specification
    /// - [`SubscriptionError::IntervalTooShort`] if it is shorter than one day
    pub fn validate(&self) -> Result<()> {
        self.interval().map(|_| ())
    }

    /// The parsed interval.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn interval(&self) -> Result<Interval> {
        let spec = self.interval.trim();
        if spec.is_empty() {
            return Err(SubscriptionError::Config("interval cannot be empty".into()));
        }
        spec.parse()
    }

    /// Provider for the configured activation date, if one is set.
    #[must_use]
    pub fn activation_provider(&self) -> Option<ConfiguredActivationDate> {
        self.activation_date.as_deref().map(ConfiguredActivationDate::new)
    }
}
