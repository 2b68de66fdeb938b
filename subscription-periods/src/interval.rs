//! Recurrence interval between subscription periods.
//!
//! Intervals are written as ISO-8601 durations: `P30D`, `P2W`, `P1M1D`, `P1Y`.
//! A time section (`T...`) is parsed but must be zero, because period boundaries are
//! whole days. A duration without a whole day, such as `P0DT10M`, is too short.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SubscriptionError};

/// Calendar-aware recurrence length.
///
/// The `days` component is always at least one, so adding an interval to a date
/// moves the calendar forward by at least one whole day.
///
/// # Examples
///
/// ```
/// use subscription_periods::Interval;
///
/// let interval: Interval = "P30D".parse().unwrap();
/// assert_eq!(interval.days(), 30);
/// assert_eq!(interval.to_string(), "P30D");
///
/// let weekly: Interval = "P2W".parse().unwrap();
/// assert_eq!(weekly.days(), 14);
///
/// assert!("P1M".parse::<Interval>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    years: u32,
    months: u32,
    days: u32,
}

impl Interval {
    /// Creates an interval from its calendar components.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::IntervalTooShort`] if `days` is zero.
    pub fn new(years: u32, months: u32, days: u32) -> Result<Self> {
        let interval = Self { years, months, days };
        if days == 0 {
            return Err(SubscriptionError::IntervalTooShort(interval.to_string()));
        }
        Ok(interval)
    }

    /// Creates an interval of a whole number of days.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::IntervalTooShort`] if `days` is zero.
    pub fn of_days(days: u32) -> Result<Self> {
        Self::new(0, 0, days)
    }

    /// Years component.
    #[must_use]
    pub const fn years(&self) -> u32 {
        self.years
    }

    /// Months component.
    #[must_use]
    pub const fn months(&self) -> u32 {
        self.months
    }

    /// Days component (weeks are folded in at seven days each).
    #[must_use]
    pub const fn days(&self) -> u32 {
        self.days
    }

    /// Adds this interval to `date`.
    ///
    /// Years and months move the month, keeping the day of month. A day past the end of
    /// the target month rolls over into the next one (January 31 plus one month is
    /// March 2 or 3). The days component is added last.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::DateOutOfRange`] if the result is outside the
    /// supported calendar.
    pub fn add_to(&self, date: NaiveDate) -> Result<NaiveDate> {
        let out_of_range = || SubscriptionError::DateOutOfRange(format!("{date} + {self}"));

        let month_index = i64::from(date.year()) * 12
            + i64::from(date.month0())
            + i64::from(self.years) * 12
            + i64::from(self.months);
        let year = i32::try_from(month_index.div_euclid(12)).map_err(|_| out_of_range())?;
        let month = u32::try_from(month_index.rem_euclid(12)).map_err(|_| out_of_range())? + 1;

        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| {
                first.checked_add_days(Days::new(u64::from(date.day0()) + u64::from(self.days)))
            })
            .ok_or_else(out_of_range)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("P")?;
        if self.years > 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months > 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days > 0 || (self.years == 0 && self.months == 0) {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}

impl FromStr for Interval {
    type Err = SubscriptionError;

    fn from_str(spec: &str) -> Result<Self> {
        let invalid = || SubscriptionError::InvalidInterval(spec.to_owned());

        let body = spec.strip_prefix('P').ok_or_else(invalid)?;
        let (date_part, time_part) = match body.split_once('T') {
            Some((_, "")) => return Err(invalid()),
            Some((date, time)) => (date, Some(time)),
            None if body.is_empty() => return Err(invalid()),
            None => (body, None),
        };

        let [years, months, weeks, days] =
            parse_section(date_part, ['Y', 'M', 'W', 'D']).ok_or_else(invalid)?;
        let time = match time_part {
            Some(time) => parse_section(time, ['H', 'M', 'S']).ok_or_else(invalid)?,
            None => [0; 3],
        };

        let days = weeks.checked_mul(7).and_then(|w| w.checked_add(days)).ok_or_else(invalid)?;
        if days == 0 {
            return Err(SubscriptionError::IntervalTooShort(spec.to_owned()));
        }
        if time.iter().any(|&v| v > 0) {
            return Err(invalid());
        }

        Self::new(years, months, days)
    }
}

/// Parses `<n><designator>` pairs. Each designator appears at most once, in the
/// order given. Returns `None` on malformed input.
fn parse_section<const N: usize>(section: &str, designators: [char; N]) -> Option<[u32; N]> {
    let mut values = [0_u32; N];
    let mut next_slot = 0;
    let mut digits = String::new();

    for c in section.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return None;
        }
        let slot = next_slot + designators[next_slot..].iter().position(|&d| d == c)?;
        values[slot] = digits.parse().ok()?;
        digits.clear();
        next_slot = slot + 1;
    }

    digits.is_empty().then_some(values)
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let spec = String::deserialize(deserializer)?;
        spec.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ========================================================================
    // Parsing Tests
    // ========================================================================

    #[test]
    fn test_parse_days() {
        let interval: Interval = "P30D".parse().unwrap();
        assert_eq!((interval.years(), interval.months(), interval.days()), (0, 0, 30));
    }

    #[test]
    fn test_parse_weeks_fold_into_days() {
        let interval: Interval = "P2W".parse().unwrap();
        assert_eq!(interval.days(), 14);

        let interval: Interval = "P1W3D".parse().unwrap();
        assert_eq!(interval.days(), 10);
    }

    #[test]
    fn test_parse_calendar_components() {
        let interval: Interval = "P1Y2M3D".parse().unwrap();
        assert_eq!((interval.years(), interval.months(), interval.days()), (1, 2, 3));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for spec in ["", "P", "30D", "PD", "P3X", "P1D2M", "P1D1D", "P30", "p30d", "P-1D"] {
            let result = spec.parse::<Interval>();
            assert!(
                matches!(result, Err(SubscriptionError::InvalidInterval(_))),
                "{spec:?} should be rejected as malformed"
            );
        }
    }

    #[test]
    fn test_parse_rejects_time_of_day_on_whole_days() {
        for spec in ["P1DT12H", "P1DT10M", "P1DT", "P1DT1D"] {
            let result = spec.parse::<Interval>();
            assert!(
                matches!(result, Err(SubscriptionError::InvalidInterval(_))),
                "{spec:?} should be rejected as malformed"
            );
        }
    }

    #[test]
    fn test_parse_accepts_zero_time_section() {
        let interval: Interval = "P30DT0H".parse().unwrap();
        assert_eq!(interval, Interval::of_days(30).unwrap());
    }

    #[test]
    fn test_parse_rejects_zero_days() {
        for spec in ["P0D", "P1M", "P1Y", "P0W", "P0DT10M", "PT36H"] {
            let err = spec.parse::<Interval>().unwrap_err();
            assert!(matches!(err, SubscriptionError::IntervalTooShort(ref s) if s == spec));
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let result = "P99999999999D".parse::<Interval>();
        assert!(matches!(result, Err(SubscriptionError::InvalidInterval(_))));
    }

    #[test]
    fn test_constructor_rejects_zero_days() {
        assert!(matches!(Interval::of_days(0), Err(SubscriptionError::IntervalTooShort(_))));
        assert!(Interval::of_days(1).is_ok());
    }

    // ========================================================================
    // Display / Serde Tests
    // ========================================================================

    #[test]
    fn test_display() {
        assert_eq!(Interval::of_days(30).unwrap().to_string(), "P30D");
        assert_eq!(Interval::new(1, 2, 3).unwrap().to_string(), "P1Y2M3D");
        assert_eq!(Interval { years: 0, months: 1, days: 0 }.to_string(), "P1M");
        assert_eq!(Interval { years: 0, months: 0, days: 0 }.to_string(), "P0D");
    }

    #[test]
    fn test_serde_as_string() {
        let interval = Interval::of_days(30).unwrap();
        assert_eq!(serde_json::to_string(&interval).unwrap(), "\"P30D\"");

        let parsed: Interval = serde_json::from_str("\"P1M1D\"").unwrap();
        assert_eq!(parsed, Interval::new(0, 1, 1).unwrap());

        let rejected: std::result::Result<Interval, _> = serde_json::from_str("\"P1M\"");
        assert!(rejected.is_err());
    }

    // ========================================================================
    // Date Arithmetic Tests
    // ========================================================================

    #[test]
    fn test_add_days() {
        let interval = Interval::of_days(30).unwrap();
        assert_eq!(interval.add_to(date(2012, 9, 1)).unwrap(), date(2012, 10, 1));
        assert_eq!(interval.add_to(date(2012, 10, 31)).unwrap(), date(2012, 11, 30));
    }

    #[test]
    fn test_add_months_rolls_over_short_months() {
        let interval = Interval::new(0, 1, 1).unwrap();
        assert_eq!(interval.add_to(date(2012, 1, 31)).unwrap(), date(2012, 3, 3));
        assert_eq!(interval.add_to(date(2013, 1, 31)).unwrap(), date(2013, 3, 4));
        assert_eq!(interval.add_to(date(2012, 1, 15)).unwrap(), date(2012, 2, 16));
    }

    #[test]
    fn test_add_months_across_year_end() {
        let interval = Interval::new(0, 13, 1).unwrap();
        assert_eq!(interval.add_to(date(2012, 12, 10)).unwrap(), date(2014, 1, 11));
    }

    #[test]
    fn test_add_years() {
        let interval = Interval::new(1, 0, 1).unwrap();
        assert_eq!(interval.add_to(date(2012, 2, 29)).unwrap(), date(2013, 3, 2));
    }

    #[test]
    fn test_add_out_of_range() {
        let interval = Interval::of_days(1).unwrap();
        let result = interval.add_to(NaiveDate::MAX);
        assert!(matches!(result, Err(SubscriptionError::DateOutOfRange(_))));
    }
}
