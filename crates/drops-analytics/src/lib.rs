#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/drops/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Period return, drawdown and seasonality analytics.
//!
//! Data flows from a [`RawPriceTable`](drops_core::RawPriceTable) through
//! [`to_period_returns`](returns::to_period_returns) into the threshold,
//! streak and seasonality statistics, and through
//! [`compute_drawdown`](drawdown::compute_drawdown) into the drawdown curve.
//! Several tables can be compared with
//! [`align_by_period`](align::align_by_period).

/// Cross-ticker alignment.
pub mod align;
/// Drawdown engine.
pub mod drawdown;
/// Period return engine.
pub mod returns;
/// Seasonality aggregator.
pub mod seasonality;
/// Distribution statistics.
pub mod stats;
/// Run-length streak utility.
pub mod streak;
/// Headline figures.
pub mod summary;
/// Threshold and streak statistics.
pub mod threshold;

#[cfg(test)]
pub(crate) mod testing;

pub use align::{PanelRow, PricePanel, align_by_period};
pub use drawdown::{DrawdownCurve, DrawdownPoint, compute_drawdown, drawdown_duration, max_drawdown};
pub use returns::{resample_prices, returns_from_prices, to_period_returns, to_period_returns_from_frame};
pub use seasonality::{
    MonthStats, SeasonalityPivot, SeasonalitySummary, monthly_stats, seasonality_table,
};
pub use stats::ReturnStats;
pub use streak::{RunReduction, streak_length};
pub use summary::OverviewSummary;
pub use threshold::{
    EventSummary, ThresholdEvent, ThresholdEventSet, count_threshold_breaches, export_file_name,
    max_red_streak, pct_above_threshold, threshold_events, top_n_worst,
};
