//! Uploaded CSV price files.

use std::io::Cursor;

use drops_core::{DropsError, PriceDataset, RawPriceTable, Result, Symbol};
use polars::prelude::{CsvReadOptions, SerReader};
use tracing::debug;

/// Ticker assigned to an uploaded file when none is configured.
pub const CSV_TICKER: &str = "CSV";

/// Reads a daily price table from CSV bytes.
///
/// The file needs a header row with a date column (`date` or `Date`) and an
/// adjusted close column (`adjusted_close`, `Adj Close` or `adj_close`).
/// Other columns are ignored.
pub fn read_csv_table(bytes: &[u8]) -> Result<RawPriceTable> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| DropsError::Parse(e.to_string()))?;
    debug!(rows = df.height(), "Read CSV price file");

    RawPriceTable::from_dataframe(&df)
}

/// Loads an uploaded CSV file as a one-ticker dataset.
///
/// The table is stored under `ticker`, or under [`CSV_TICKER`] when none is given.
pub fn load_csv(bytes: &[u8], ticker: Option<Symbol>) -> Result<PriceDataset> {
    let table = read_csv_table(bytes)?;
    let symbol = ticker.unwrap_or_else(|| Symbol::new(CSV_TICKER));

    let mut dataset = PriceDataset::new();
    dataset.insert(symbol, table);
    Ok(dataset)
}
