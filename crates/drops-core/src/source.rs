//! Price source trait for the data-acquisition layer.
//!
//! The analytics never fetch anything themselves. A [`PriceSource`] turns a
//! symbol and a history length into a [`RawPriceTable`]; the loader in the
//! `drops` crate drives one per session.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{RawPriceTable, Symbol},
};

/// Producer of daily adjusted-close histories.
#[async_trait]
pub trait PriceSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "Yahoo Finance").
    fn name(&self) -> &str;

    /// Fetches up to `years` of daily history for a symbol.
    ///
    /// Returns [`DropsError::DataNotAvailable`](crate::DropsError::DataNotAvailable)
    /// when the source has no observations for the symbol.
    async fn fetch_prices(&self, symbol: &Symbol, years: u32) -> Result<RawPriceTable>;
}
