//! Fixtures shared by the unit tests.

use chrono::NaiveDate;
use drops_core::{
    PeriodReturn, PeriodReturnSeries, PriceObservation, PricePoint, RawPriceTable, ReturnConfig,
};

pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn month_end(year: i32, month: u32) -> NaiveDate {
    drops_core::ReturnFrequency::Monthly.period_end(ymd(year, month, 1))
}

/// Month-end dates starting at 2020-01-31.
fn month_ends(n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| {
            let offset = u32::try_from(i).unwrap();
            let year = 2020 + i32::try_from(offset / 12).unwrap();
            month_end(year, offset % 12 + 1)
        })
        .collect()
}

/// One observation per month-end, starting at 2020-01-31.
pub(crate) fn monthly_table(prices: &[f64]) -> RawPriceTable {
    month_ends(prices.len())
        .into_iter()
        .zip(prices)
        .map(|(date, price)| PriceObservation::new(date, *price))
        .collect()
}

/// Price points at month-ends starting at 2020-01-31.
pub(crate) fn price_points(prices: &[f64]) -> Vec<PricePoint> {
    month_ends(prices.len())
        .into_iter()
        .zip(prices)
        .map(|(date, price)| PricePoint {
            date,
            price: *price,
        })
        .collect()
}

/// Returns at month-ends starting at 2020-01-31; prices are not meaningful.
pub(crate) fn return_series(values: &[f64]) -> PeriodReturnSeries {
    dated_returns(
        &month_ends(values.len())
            .into_iter()
            .zip(values.iter().copied())
            .collect::<Vec<_>>(),
    )
}

pub(crate) fn dated_returns(points: &[(NaiveDate, f64)]) -> PeriodReturnSeries {
    PeriodReturnSeries::from_points(
        points
            .iter()
            .map(|(date, ret)| PeriodReturn {
                date: *date,
                price: 0.0,
                ret: *ret,
            })
            .collect(),
    )
}

/// Returns of the monthly prices `[100, 105, 80, 81, 79, 90]`.
pub(crate) fn scenario_returns() -> PeriodReturnSeries {
    let raw = monthly_table(&[100.0, 105.0, 80.0, 81.0, 79.0, 90.0]);
    crate::returns::to_period_returns(&raw, &ReturnConfig::default())
}
