#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/drops/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for equity drawdown and seasonality analytics.
//!
//! This crate provides the foundational abstractions shared by the analytics,
//! the caching service and the data sources:
//!
//! - [`RawPriceTable`](types::RawPriceTable) - Daily adjusted-close history
//! - [`PeriodReturnSeries`](types::PeriodReturnSeries) - Resampled period returns
//! - [`ReturnFrequency`](frequency::ReturnFrequency) - Calendar resampling period
//! - [`AnalysisConfig`](config::AnalysisConfig) - Session configuration
//! - [`PriceSource`](source::PriceSource) - Acquisition abstraction

/// Session configuration.
pub mod config;
/// Error types for analytics operations.
pub mod error;
/// DataFrame boundary conversions.
pub mod frame;
/// Resampling frequency definitions.
pub mod frequency;
/// Price source trait.
pub mod source;
/// Core value types (Symbol, price tables, period series).
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AnalysisConfig, DataSourceKind, parse_tickers};
pub use error::{DropsError, Result};
pub use frequency::{ReturnConfig, ReturnFrequency};
pub use source::PriceSource;
pub use types::{
    PeriodPriceSeries, PeriodReturn, PeriodReturnSeries, PriceDataset, PriceObservation,
    PricePoint, RawPriceTable, Symbol,
};
