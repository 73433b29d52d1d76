//! Session configuration.
//!
//! [`AnalysisConfig`] carries the inputs collected by the front end: which
//! tickers to analyse, how much history to load, the resampling frequency,
//! the return threshold and where the prices come from.

use serde::{Deserialize, Serialize};

use crate::{
    error::{DropsError, Result},
    frequency::{ReturnConfig, ReturnFrequency},
    types::Symbol,
};

/// Where raw price tables come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSourceKind {
    /// A programmatic market-data feed.
    #[default]
    Feed,
    /// A CSV file supplied by the user.
    Csv,
}

/// Configuration for one analysis session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Tickers to analyse, in display order.
    pub tickers: Vec<Symbol>,
    /// Years of history to request from a feed.
    pub years: u32,
    /// Resampling frequency.
    pub frequency: ReturnFrequency,
    /// Return threshold as a fraction (e.g. -0.05 for -5%).
    pub threshold: f64,
    /// Data source selector.
    pub source: DataSourceKind,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tickers: vec![Symbol::new("SPY")],
            years: 20,
            frequency: ReturnFrequency::Monthly,
            threshold: -0.05,
            source: DataSourceKind::Feed,
        }
    }
}

impl AnalysisConfig {
    /// Creates a config for the given tickers with default settings.
    #[must_use]
    pub fn new(tickers: Vec<Symbol>) -> Self {
        Self {
            tickers,
            ..Default::default()
        }
    }

    /// Sets the history length in years.
    #[must_use]
    pub const fn with_years(mut self, years: u32) -> Self {
        self.years = years;
        self
    }

    /// Sets the resampling frequency.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: ReturnFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the return threshold (fraction).
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the data source.
    #[must_use]
    pub const fn with_source(mut self, source: DataSourceKind) -> Self {
        self.source = source;
        self
    }

    /// Threshold as a whole percentage, truncated toward zero.
    #[must_use]
    pub fn threshold_pct(&self) -> i32 {
        (self.threshold * 100.0) as i32
    }

    /// Resampling configuration derived from this session config.
    #[must_use]
    pub const fn return_config(&self) -> ReturnConfig {
        ReturnConfig::new(self.frequency)
    }

    /// Checks the values that would make every downstream computation meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.tickers.is_empty() && self.source == DataSourceKind::Feed {
            return Err(DropsError::InvalidParameter(
                "at least one ticker is required".to_string(),
            ));
        }
        if !self.threshold.is_finite() {
            return Err(DropsError::InvalidParameter(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if self.years == 0 {
            return Err(DropsError::InvalidParameter(
                "history length must be at least one year".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses a comma separated ticker list, dropping blank entries.
///
/// Symbols are trimmed and uppercased.
#[must_use]
pub fn parse_tickers(input: &str) -> Vec<Symbol> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Symbol::new)
        .collect()
}
