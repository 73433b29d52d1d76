//! Resampling frequency definitions.
//!
//! This module defines [`ReturnFrequency`], the calendar bucket used to turn
//! irregular daily observations into a fixed-frequency period series, and
//! [`ReturnConfig`], the per-session resampling configuration.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DropsError;

/// Calendar period used to resample daily prices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnFrequency {
    /// Calendar months, labelled by the last day of the month.
    #[default]
    Monthly,
    /// Calendar weeks ending on Sunday, labelled by that Sunday.
    Weekly,
}

impl ReturnFrequency {
    /// Returns the short code for this frequency ("M" or "W").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Monthly => "M",
            Self::Weekly => "W",
        }
    }

    /// Number of periods in a calendar year, used for annualisation.
    #[must_use]
    pub const fn periods_per_year(&self) -> u32 {
        match self {
            Self::Monthly => 12,
            Self::Weekly => 52,
        }
    }

    /// Returns the label of the period containing `date`.
    ///
    /// The label is the inclusive end of the period: the last calendar day of
    /// the month, or the Sunday closing the week.
    #[must_use]
    pub fn period_end(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Monthly => month_end(date),
            Self::Weekly => {
                let to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
                date.checked_add_days(Days::new(to_sunday)).unwrap_or(date)
            }
        }
    }
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

impl fmt::Display for ReturnFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReturnFrequency {
    type Err = DropsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "monthly" => Ok(Self::Monthly),
            "w" | "weekly" => Ok(Self::Weekly),
            other => Err(DropsError::InvalidParameter(format!(
                "unknown return frequency '{other}'"
            ))),
        }
    }
}

/// Resampling configuration for one analysis session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnConfig {
    /// Period used to resample prices.
    pub frequency: ReturnFrequency,
    /// Expected minimum history in months. Informational only.
    pub min_history_months: u32,
}

impl ReturnConfig {
    /// Creates a config for the given frequency with the default history expectation.
    #[must_use]
    pub const fn new(frequency: ReturnFrequency) -> Self {
        Self {
            frequency,
            min_history_months: 12,
        }
    }

    /// Sets the documented minimum history length.
    #[must_use]
    pub const fn with_min_history_months(mut self, months: u32) -> Self {
        self.min_history_months = months;
        self
    }
}

impl Default for ReturnConfig {
    fn default() -> Self {
        Self::new(ReturnFrequency::Monthly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_end_labels() {
        let freq = ReturnFrequency::Monthly;
        assert_eq!(freq.period_end(ymd(2020, 1, 15)), ymd(2020, 1, 31));
        assert_eq!(freq.period_end(ymd(2020, 2, 3)), ymd(2020, 2, 29));
        assert_eq!(freq.period_end(ymd(2021, 2, 28)), ymd(2021, 2, 28));
        assert_eq!(freq.period_end(ymd(2020, 12, 1)), ymd(2020, 12, 31));
    }

    #[test]
    fn test_week_end_labels() {
        let freq = ReturnFrequency::Weekly;
        // 2024-01-01 is a Monday.
        assert_eq!(freq.period_end(ymd(2024, 1, 1)), ymd(2024, 1, 7));
        assert_eq!(freq.period_end(ymd(2024, 1, 5)), ymd(2024, 1, 7));
        assert_eq!(freq.period_end(ymd(2024, 1, 7)), ymd(2024, 1, 7));
        assert_eq!(freq.period_end(ymd(2024, 1, 8)), ymd(2024, 1, 14));
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!("M".parse::<ReturnFrequency>().unwrap(), ReturnFrequency::Monthly);
        assert_eq!("weekly".parse::<ReturnFrequency>().unwrap(), ReturnFrequency::Weekly);
        assert!("Q".parse::<ReturnFrequency>().is_err());
    }

    #[test]
    fn test_return_config_defaults() {
        let cfg = ReturnConfig::default();
        assert_eq!(cfg.frequency, ReturnFrequency::Monthly);
        assert_eq!(cfg.min_history_months, 12);
        assert_eq!(cfg.with_min_history_months(24).min_history_months, 24);
    }
}
