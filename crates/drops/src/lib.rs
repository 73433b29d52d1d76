#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/drops/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Drawdown, threshold and seasonality analytics for price series.
//!
//! This crate re-exports the core types, the analytics and the caching
//! service, and provides a [`DatasetLoader`] that assembles a
//! [`PriceDataset`] from a price feed or an uploaded CSV file.
//!
//! # Features
//!
//! - `yahoo` - Yahoo Finance price feed

// Core types and traits
pub use drops_core::*;

// Analytics
pub use drops_analytics::*;

// Caching service
pub use drops_cache::AnalysisService;

// Price feeds
#[cfg(feature = "yahoo")]
pub use drops_yahoo::YahooSource;

/// Uploaded CSV price files.
pub mod csv;
mod loader;

pub use csv::{CSV_TICKER, load_csv, read_csv_table};
pub use loader::DatasetLoader;
