//! Cross-ticker alignment.
//!
//! Each ticker is resampled on its own to the shared calendar boundaries and
//! the results are outer-joined on the period-end date. A row survives as
//! long as at least one ticker has a price for it.

use chrono::NaiveDate;
use drops_core::{
    PeriodPriceSeries, PricePoint, RawPriceTable, Result, ReturnFrequency, Symbol,
    frame::{date_column, frame_err},
};
use polars::prelude::{Column, DataFrame};
use std::collections::BTreeMap;

use crate::returns::resample_prices;

/// One period of the comparison panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelRow {
    /// Period-end date.
    pub date: NaiveDate,
    /// Price per ticker, in the panel's ticker order; `None` where the ticker has no data.
    pub values: Vec<Option<f64>>,
}

/// Wide table of period prices, one column per ticker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PricePanel {
    tickers: Vec<Symbol>,
    rows: Vec<PanelRow>,
}

impl PricePanel {
    /// Column order of the panel.
    #[must_use]
    pub fn tickers(&self) -> &[Symbol] {
        &self.tickers
    }

    /// Rows in ascending date order.
    #[must_use]
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the panel has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cells present for one ticker, as a period price series.
    #[must_use]
    pub fn series(&self, symbol: &Symbol) -> Option<PeriodPriceSeries> {
        let col = self.tickers.iter().position(|s| s == symbol)?;
        let points = self
            .rows
            .iter()
            .filter_map(|row| {
                let price = row.values.get(col).copied().flatten()?;
                Some(PricePoint {
                    date: row.date,
                    price,
                })
            })
            .collect();
        Some(PeriodPriceSeries::from_points(points))
    }

    /// Converts the panel to a DataFrame: `date` plus one nullable column per ticker.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = vec![date_column("date", self.rows.iter().map(|r| r.date))?];
        for (i, symbol) in self.tickers.iter().enumerate() {
            let values: Vec<Option<f64>> = self
                .rows
                .iter()
                .map(|r| r.values.get(i).copied().flatten())
                .collect();
            columns.push(Column::new(symbol.as_str().into(), values));
        }
        DataFrame::new(columns).map_err(frame_err)
    }
}

/// Aligns several raw tables on a common period index.
///
/// Tickers keep the order in which the iterator yields them. Rows where every
/// ticker is missing are dropped; rows with partial coverage are kept.
pub fn align_by_period<'a, I>(tables: I, frequency: ReturnFrequency) -> PricePanel
where
    I: IntoIterator<Item = (&'a Symbol, &'a RawPriceTable)>,
{
    let mut tickers: Vec<Symbol> = Vec::new();
    let mut resampled: Vec<PeriodPriceSeries> = Vec::new();
    for (symbol, table) in tables {
        tickers.push(symbol.clone());
        resampled.push(resample_prices(table, frequency));
    }

    let mut grid: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
    for (col, series) in resampled.iter().enumerate() {
        for point in series.iter() {
            grid.entry(point.date).or_insert_with(|| vec![None; tickers.len()])[col] =
                Some(point.price);
        }
    }

    let rows = grid
        .into_iter()
        .filter(|(_, values)| values.iter().any(Option::is_some))
        .map(|(date, values)| PanelRow { date, values })
        .collect();

    PricePanel { tickers, rows }
}
