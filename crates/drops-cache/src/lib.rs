#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/drops/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching service for derived price series.
//!
//! [`AnalysisService`] sits in front of the period return engine and the
//! drawdown engine from `drops-analytics`, keyed by ticker within one
//! configuration scope.

/// Memoizing analysis service.
pub mod service;

pub use service::AnalysisService;
