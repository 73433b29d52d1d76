//! Threshold and streak statistics over period returns.
//!
//! Breach counting is inclusive on the low side (`ret <= threshold`) and the
//! share of periods at or above a threshold is inclusive on the high side
//! (`ret >= threshold`). A return exactly equal to the threshold therefore
//! counts on both sides.

use chrono::NaiveDate;
use drops_core::{
    PeriodReturn, PeriodReturnSeries, Result, Symbol,
    frame::{date_column, frame_err},
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::streak::{RunReduction, streak_length};

/// Number of periods whose return is at or below `threshold`.
#[must_use]
pub fn count_threshold_breaches(returns: &PeriodReturnSeries, threshold: f64) -> usize {
    returns.iter().filter(|p| p.ret <= threshold).count()
}

/// Longest run of consecutive periods with a strictly negative return.
#[must_use]
pub fn max_red_streak(returns: &PeriodReturnSeries) -> usize {
    streak_length(returns.iter().map(|p| p.ret < 0.0), RunReduction::Longest)
}

/// The `n` lowest returns in ascending order.
///
/// The sort is stable, so equal returns keep their chronological order.
#[must_use]
pub fn top_n_worst(returns: &PeriodReturnSeries, n: usize) -> Vec<PeriodReturn> {
    let mut sorted = returns.points().to_vec();
    sorted.sort_by(|a, b| a.ret.total_cmp(&b.ret));
    sorted.truncate(n);
    sorted
}

/// Fraction of periods whose return is at or above `threshold`.
///
/// Returns 0.0 for an empty series or a NaN threshold.
#[must_use]
pub fn pct_above_threshold(returns: &PeriodReturnSeries, threshold: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let above = returns.iter().filter(|p| p.ret >= threshold).count();
    above as f64 / returns.len() as f64
}

/// One period at or below the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEvent {
    /// Period-end date.
    pub date: NaiveDate,
    /// Fractional return of the period.
    pub ret: f64,
}

impl ThresholdEvent {
    /// Return as a percentage rounded to two decimals.
    #[must_use]
    pub fn return_pct(&self) -> f64 {
        (self.ret * 10_000.0).round() / 100.0
    }
}

/// Periods whose return breached a threshold, in date order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThresholdEventSet {
    /// Threshold the events were selected with.
    pub threshold: f64,
    events: Vec<ThresholdEvent>,
}

/// Selects the periods whose return is at or below `threshold`.
#[must_use]
pub fn threshold_events(returns: &PeriodReturnSeries, threshold: f64) -> ThresholdEventSet {
    let events = returns
        .iter()
        .filter(|p| p.ret <= threshold)
        .map(|p| ThresholdEvent {
            date: p.date,
            ret: p.ret,
        })
        .collect();
    ThresholdEventSet { threshold, events }
}

impl ThresholdEventSet {
    /// Returns the number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no period breached the threshold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the events in date order.
    #[must_use]
    pub fn events(&self) -> &[ThresholdEvent] {
        &self.events
    }

    /// Returns an iterator over the events.
    pub fn iter(&self) -> impl Iterator<Item = &ThresholdEvent> {
        self.events.iter()
    }

    /// Count, worst and mean return of the events. `None` when there are none.
    #[must_use]
    pub fn summary(&self) -> Option<EventSummary> {
        if self.events.is_empty() {
            return None;
        }
        let worst = self.iter().map(|e| e.ret).fold(f64::INFINITY, f64::min);
        let mean = self.iter().map(|e| e.ret).sum::<f64>() / self.len() as f64;
        Some(EventSummary {
            count: self.len(),
            worst,
            mean,
        })
    }

    /// Export table with columns `date` and `return_pct`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let pct: Vec<f64> = self.iter().map(ThresholdEvent::return_pct).collect();
        DataFrame::new(vec![
            date_column("date", self.iter().map(|e| e.date))?,
            Column::new("return_pct".into(), pct),
        ])
        .map_err(frame_err)
    }

    /// Comma-delimited export with a header row, one row per event.
    pub fn to_csv(&self) -> Result<String> {
        let mut df = self.to_dataframe()?;
        let mut buf: Vec<u8> = Vec::new();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .finish(&mut df)
            .map_err(frame_err)?;
        String::from_utf8(buf).map_err(|e| drops_core::DropsError::Other(e.to_string()))
    }
}

/// Aggregate view of a threshold event set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Number of events.
    pub count: usize,
    /// Lowest event return.
    pub worst: f64,
    /// Mean event return.
    pub mean: f64,
}

/// File name used when exporting events for a ticker and threshold percentage.
#[must_use]
pub fn export_file_name(symbol: &Symbol, threshold_pct: i32) -> String {
    format!("{symbol}_events_threshold_{threshold_pct}.csv")
}
