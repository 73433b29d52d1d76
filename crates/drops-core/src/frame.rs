//! Conversions between polars DataFrames and the typed series.
//!
//! Price tables arrive from the acquisition layer as DataFrames and derived
//! series leave for the rendering layer as DataFrames. Everything in between
//! works on the typed series from [`crate::types`].

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::{trace, warn};

use crate::{
    error::{DropsError, Result},
    types::{PeriodPriceSeries, PeriodReturnSeries, PriceObservation, RawPriceTable},
};

/// Accepted names for the adjusted-close column, in lookup order.
pub const PRICE_COLUMNS: [&str; 3] = ["adjusted_close", "Adj Close", "adj_close"];

/// Accepted names for the time-axis column, in lookup order.
pub const DATE_COLUMNS: [&str; 2] = ["date", "Date"];

/// Accepted date layouts for string time axes, tried in order.
///
/// Slash dates are month first.
pub const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y", "%Y%m%d"];

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts a date to polars' physical date representation (days since epoch).
#[must_use]
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Converts days since the Unix epoch back to a date.
#[must_use]
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

/// Maps a polars error into [`DropsError::Frame`].
pub fn frame_err(err: PolarsError) -> DropsError {
    DropsError::Frame(err.to_string())
}

/// Builds a `Date` typed column from a sequence of dates.
pub fn date_column(name: &str, dates: impl IntoIterator<Item = NaiveDate>) -> Result<Column> {
    let days: Vec<i32> = dates.into_iter().map(date_to_days).collect();
    Column::new(name.into(), days)
        .cast(&DataType::Date)
        .map_err(frame_err)
}

/// Parses a date in one of [`DATE_FORMATS`], ignoring any trailing time part.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let day = value.split([' ', 'T']).next().unwrap_or(value);
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(day, format).ok())
}

fn find_named(df: &DataFrame, candidates: &[&'static str]) -> Option<String> {
    candidates
        .iter()
        .find(|name| df.get_column_index(name).is_some())
        .map(|name| (*name).to_string())
}

/// Finds the time axis: a named date column, else the first temporal column.
fn find_time_axis(df: &DataFrame) -> Option<String> {
    find_named(df, &DATE_COLUMNS).or_else(|| {
        df.get_columns()
            .iter()
            .find(|c| matches!(c.dtype(), DataType::Date | DataType::Datetime(_, _)))
            .map(|c| c.name().to_string())
    })
}

fn read_dates(column: &Column) -> Result<Vec<Option<NaiveDate>>> {
    if matches!(column.dtype(), DataType::String) {
        let values = column.str().map_err(frame_err)?;
        return Ok(values.into_iter().map(|v| v.and_then(parse_date)).collect());
    }

    let dates = column.cast(&DataType::Date).map_err(frame_err)?;
    let dates = dates.date().map_err(frame_err)?;
    // Physical i32 days since epoch.
    let days = &dates.0;
    Ok(days
        .into_iter()
        .map(|d| d.and_then(days_to_date))
        .collect())
}

impl RawPriceTable {
    /// Builds a table from a DataFrame produced by the acquisition layer.
    ///
    /// The price is read from the first column named in [`PRICE_COLUMNS`].
    /// The time axis is the first column named in [`DATE_COLUMNS`], or else
    /// the first `Date`/`Datetime` column. Rows with a missing or unparsable
    /// date or price are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DropsError::Schema`] naming `adjusted_close` or `date` when
    /// the corresponding field is absent, and [`DropsError::Parse`] when the
    /// frame has rows but none of their dates can be read.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let price_name =
            find_named(df, &PRICE_COLUMNS).ok_or_else(|| DropsError::missing_field("adjusted_close"))?;
        let date_name = find_time_axis(df).ok_or_else(|| DropsError::missing_field("date"))?;

        let dates = read_dates(df.column(&date_name).map_err(frame_err)?)?;
        let unparsed = dates.iter().filter(|d| d.is_none()).count();
        if unparsed > 0 && unparsed == dates.len() {
            return Err(DropsError::Parse(format!(
                "no parsable dates in column '{date_name}'"
            )));
        }
        if unparsed > 0 {
            warn!(column = %date_name, rows = unparsed, "Dropping rows with unparsable dates");
        }
        let prices = df
            .column(&price_name)
            .map_err(frame_err)?
            .cast(&DataType::Float64)
            .map_err(frame_err)?;
        let prices = prices.f64().map_err(frame_err)?;

        let observations: Vec<PriceObservation> = dates
            .into_iter()
            .zip(prices.into_iter())
            .filter_map(|(date, price)| Some(PriceObservation::new(date?, price?)))
            .collect();
        trace!(
            rows = df.height(),
            kept = observations.len(),
            price = %price_name,
            date = %date_name,
            "Read price table from DataFrame"
        );

        Ok(Self::new(observations))
    }

    /// Converts the table to a DataFrame with columns `date`, `adjusted_close`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let prices: Vec<f64> = self.iter().map(|o| o.adjusted_close).collect();
        DataFrame::new(vec![
            date_column("date", self.iter().map(|o| o.date))?,
            Column::new("adjusted_close".into(), prices),
        ])
        .map_err(frame_err)
    }
}

impl PeriodPriceSeries {
    /// Converts the series to a DataFrame with columns `date`, `price`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let prices: Vec<f64> = self.iter().map(|p| p.price).collect();
        DataFrame::new(vec![
            date_column("date", self.iter().map(|p| p.date))?,
            Column::new("price".into(), prices),
        ])
        .map_err(frame_err)
    }
}

impl PeriodReturnSeries {
    /// Converts the series to a DataFrame with columns `date`, `price`, `ret`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let prices: Vec<f64> = self.iter().map(|p| p.price).collect();
        DataFrame::new(vec![
            date_column("date", self.iter().map(|p| p.date))?,
            Column::new("price".into(), prices),
            Column::new("ret".into(), self.values()),
        ])
        .map_err(frame_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_conversion() {
        assert_eq!(date_to_days(ymd(1970, 1, 1)), 0);
        assert_eq!(date_to_days(ymd(1970, 1, 2)), 1);
        assert_eq!(days_to_date(0), Some(ymd(1970, 1, 1)));
        assert_eq!(days_to_date(date_to_days(ymd(2024, 2, 29))), Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn test_from_dataframe_string_dates() {
        let df = DataFrame::new(vec![
            Column::new("Date".into(), vec!["2024-01-03", "2024-01-02 00:00:00-05:00", "bad"]),
            Column::new("Adj Close".into(), vec![Some(11.0), Some(10.0), Some(9.0)]),
            Column::new("volume".into(), vec![1.0, 2.0, 3.0]),
        ])
        .unwrap();

        let table = RawPriceTable::from_dataframe(&df).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.observations()[0].date, ymd(2024, 1, 2));
        assert_eq!(table.observations()[1].adjusted_close, 11.0);
    }

    #[test]
    fn test_from_dataframe_other_date_layouts() {
        let df = DataFrame::new(vec![
            Column::new(
                "Date".into(),
                vec!["01/31/2024", "2/29/2024", "2024-03-28T00:00:00", "30-Apr-2024"],
            ),
            Column::new("Adj Close".into(), vec![10.0, 11.0, 12.0, 13.0]),
        ])
        .unwrap();

        let table = RawPriceTable::from_dataframe(&df).unwrap();
        let dates: Vec<NaiveDate> = table.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![ymd(2024, 1, 31), ymd(2024, 2, 29), ymd(2024, 3, 28), ymd(2024, 4, 30)]
        );
    }

    #[test]
    fn test_from_dataframe_unreadable_dates() {
        let df = DataFrame::new(vec![
            Column::new("date".into(), vec!["Q1 2024", "Q2 2024"]),
            Column::new("adjusted_close".into(), vec![10.0, 11.0]),
        ])
        .unwrap();

        let err = RawPriceTable::from_dataframe(&df).unwrap_err();
        assert!(matches!(err, DropsError::Parse(ref msg) if msg.contains("'date'")));

        // An empty frame is not a parse failure.
        let empty = df.head(Some(0));
        assert!(RawPriceTable::from_dataframe(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_from_dataframe_typed_axis_without_name() {
        let df = DataFrame::new(vec![
            date_column("timestamp", vec![ymd(2024, 1, 2), ymd(2024, 1, 3)]).unwrap(),
            Column::new("adjusted_close".into(), vec![Some(10.0), None]),
        ])
        .unwrap();

        let table = RawPriceTable::from_dataframe(&df).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.observations()[0].date, ymd(2024, 1, 2));
    }

    #[test]
    fn test_from_dataframe_missing_price() {
        let df = DataFrame::new(vec![
            Column::new("date".into(), vec!["2024-01-02"]),
            Column::new("close".into(), vec![10.0]),
        ])
        .unwrap();

        let err = RawPriceTable::from_dataframe(&df).unwrap_err();
        assert!(matches!(err, DropsError::Schema { ref field } if field == "adjusted_close"));
    }

    #[test]
    fn test_from_dataframe_missing_time_axis() {
        let df = DataFrame::new(vec![Column::new("adjusted_close".into(), vec![10.0])]).unwrap();

        let err = RawPriceTable::from_dataframe(&df).unwrap_err();
        assert!(matches!(err, DropsError::Schema { ref field } if field == "date"));
    }

    #[test]
    fn test_raw_table_round_trips_through_frame() {
        let table = RawPriceTable::new(vec![
            PriceObservation::new(ymd(2024, 1, 2), 10.0),
            PriceObservation::new(ymd(2024, 1, 3), 10.5),
        ]);
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(RawPriceTable::from_dataframe(&df).unwrap(), table);
    }
}
