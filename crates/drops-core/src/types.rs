//! Core value types for price analytics.
//!
//! This module defines the time series that flow through the analytics:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`RawPriceTable`] - Irregular daily adjusted-close observations
//! - [`PriceDataset`] - Ordered ticker to raw table mapping
//! - [`PeriodPriceSeries`] - Last observed price per calendar period
//! - [`PeriodReturnSeries`] - Simple period-over-period returns

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One daily adjusted-close observation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Trading date.
    pub date: NaiveDate,
    /// Split/dividend adjusted closing price.
    pub adjusted_close: f64,
}

impl PriceObservation {
    /// Creates a new observation.
    #[must_use]
    pub const fn new(date: NaiveDate, adjusted_close: f64) -> Self {
        Self {
            date,
            adjusted_close,
        }
    }
}

/// Sorts rows by date and keeps the last row for each repeated date.
fn sort_dedup_by_date<T>(mut rows: Vec<T>, date: impl Fn(&T) -> NaiveDate) -> Vec<T> {
    // Stable, so input order decides which duplicate comes last.
    rows.sort_by_key(&date);

    let mut deduped: Vec<T> = Vec::with_capacity(rows.len());
    for row in rows {
        match deduped.last_mut() {
            Some(last) if date(last) == date(&row) => *last = row,
            _ => deduped.push(row),
        }
    }
    deduped
}

/// Daily price history for one ticker.
///
/// Observations are sorted by date, dates are unique and every price is
/// finite. The table is immutable once built. Deserialization goes through
/// [`RawPriceTable::new`], so serialized tables are plain observation lists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PriceObservation>", into = "Vec<PriceObservation>")]
pub struct RawPriceTable {
    observations: Vec<PriceObservation>,
}

impl RawPriceTable {
    /// Builds a table from observations in any order.
    ///
    /// Non-finite prices are dropped. When a date repeats, the observation
    /// that came last in the input wins.
    #[must_use]
    pub fn new(observations: impl IntoIterator<Item = PriceObservation>) -> Self {
        let rows: Vec<PriceObservation> = observations
            .into_iter()
            .filter(|o| o.adjusted_close.is_finite())
            .collect();
        let observations = sort_dedup_by_date(rows, |o| o.date);
        trace!(rows = observations.len(), "Built raw price table");

        Self { observations }
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Returns the observations in date order.
    #[must_use]
    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    /// Returns an iterator over the observations.
    pub fn iter(&self) -> impl Iterator<Item = &PriceObservation> {
        self.observations.iter()
    }

    /// Returns the first and last observation dates.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.observations.first()?.date, self.observations.last()?.date))
    }
}

impl FromIterator<PriceObservation> for RawPriceTable {
    fn from_iter<I: IntoIterator<Item = PriceObservation>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<PriceObservation>> for RawPriceTable {
    fn from(observations: Vec<PriceObservation>) -> Self {
        Self::new(observations)
    }
}

impl From<RawPriceTable> for Vec<PriceObservation> {
    fn from(table: RawPriceTable) -> Self {
        table.observations
    }
}

/// Raw price tables keyed by ticker, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceDataset {
    tables: Vec<(Symbol, RawPriceTable)>,
}

impl PriceDataset {
    /// Creates an empty dataset.
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds a table, replacing any existing table for the same symbol.
    pub fn insert(&mut self, symbol: Symbol, table: RawPriceTable) {
        match self.tables.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, existing)) => *existing = table,
            None => self.tables.push((symbol, table)),
        }
    }

    /// Returns the table for a symbol.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&RawPriceTable> {
        self.tables
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, t)| t)
    }

    /// Returns the symbols in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.tables.iter().map(|(s, _)| s)
    }

    /// Returns an iterator over `(symbol, table)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &RawPriceTable)> {
        self.tables.iter().map(|(s, t)| (s, t))
    }

    /// Returns the number of tickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the dataset holds no tickers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<(Symbol, RawPriceTable)> for PriceDataset {
    fn from_iter<I: IntoIterator<Item = (Symbol, RawPriceTable)>>(iter: I) -> Self {
        let mut dataset = Self::new();
        for (symbol, table) in iter {
            dataset.insert(symbol, table);
        }
        dataset
    }
}

/// Last observed price of one calendar period.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Period-end label.
    pub date: NaiveDate,
    /// Price observed last within the period.
    pub price: f64,
}

/// Prices resampled to one row per non-empty calendar period.
///
/// Dates are strictly increasing and every price is finite.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PeriodPriceSeries {
    points: Vec<PricePoint>,
}

impl PeriodPriceSeries {
    /// Creates a series from points in any order.
    ///
    /// Non-finite prices are dropped and a repeated date keeps its last point.
    #[must_use]
    pub fn from_points(points: Vec<PricePoint>) -> Self {
        let points = points.into_iter().filter(|p| p.price.is_finite()).collect();
        Self {
            points: sort_dedup_by_date(points, |p| p.date),
        }
    }

    /// Returns the number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points in date order.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Returns an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}

/// Simple return of one period relative to the previous non-empty period.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturn {
    /// Period-end label.
    pub date: NaiveDate,
    /// Price at the end of this period.
    pub price: f64,
    /// Fractional return, `price / previous_price - 1`.
    pub ret: f64,
}

/// Period-over-period returns in strictly increasing date order. Every
/// return is finite.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PeriodReturn>", into = "Vec<PeriodReturn>")]
pub struct PeriodReturnSeries {
    points: Vec<PeriodReturn>,
}

impl PeriodReturnSeries {
    /// Creates a series from points in any order.
    ///
    /// Non-finite returns are dropped and a repeated date keeps its last point.
    #[must_use]
    pub fn from_points(points: Vec<PeriodReturn>) -> Self {
        let points = points.into_iter().filter(|p| p.ret.is_finite()).collect();
        Self {
            points: sort_dedup_by_date(points, |p| p.date),
        }
    }

    /// Returns the number of returns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no returns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points in date order.
    #[must_use]
    pub fn points(&self) -> &[PeriodReturn] {
        &self.points
    }

    /// Returns an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &PeriodReturn> {
        self.points.iter()
    }

    /// Returns the return values in date order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ret).collect()
    }
}

impl From<Vec<PricePoint>> for PeriodPriceSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::from_points(points)
    }
}

impl From<PeriodPriceSeries> for Vec<PricePoint> {
    fn from(series: PeriodPriceSeries) -> Self {
        series.points
    }
}

impl From<Vec<PeriodReturn>> for PeriodReturnSeries {
    fn from(points: Vec<PeriodReturn>) -> Self {
        Self::from_points(points)
    }
}

impl From<PeriodReturnSeries> for Vec<PeriodReturn> {
    fn from(series: PeriodReturnSeries) -> Self {
        series.points
    }
}

impl<'a> IntoIterator for &'a PeriodReturnSeries {
    type Item = &'a PeriodReturn;
    type IntoIter = std::slice::Iter<'a, PeriodReturn>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
