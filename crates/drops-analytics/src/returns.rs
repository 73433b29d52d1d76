//! Period return engine.
//!
//! Daily observations are bucketed into calendar periods, the last price of
//! each non-empty period is kept, and simple returns are taken between
//! consecutive kept periods. Empty periods are skipped, never filled.

use drops_core::{
    PeriodPriceSeries, PeriodReturn, PeriodReturnSeries, PricePoint, RawPriceTable, Result,
    ReturnConfig, ReturnFrequency,
};
use polars::prelude::DataFrame;
use tracing::trace;

/// Resamples a raw table to the last observed price of each calendar period.
///
/// Each point is labelled with the period end (see
/// [`ReturnFrequency::period_end`]). Periods without observations produce
/// no point.
#[must_use]
pub fn resample_prices(raw: &RawPriceTable, frequency: ReturnFrequency) -> PeriodPriceSeries {
    let mut points: Vec<PricePoint> = Vec::new();
    for obs in raw.iter() {
        let date = frequency.period_end(obs.date);
        match points.last_mut() {
            // Observations are date ordered, so a later row in the same period overwrites.
            Some(last) if last.date == date => last.price = obs.adjusted_close,
            _ => points.push(PricePoint {
                date,
                price: obs.adjusted_close,
            }),
        }
    }
    PeriodPriceSeries::from_points(points)
}

/// Computes simple returns between consecutive points of a period series.
///
/// The first point has no reference and yields no return. A pair whose
/// previous price is zero, or whose return is not finite, is dropped.
#[must_use]
pub fn returns_from_prices(prices: &PeriodPriceSeries) -> PeriodReturnSeries {
    let points: Vec<PeriodReturn> = prices
        .points()
        .windows(2)
        .filter_map(|pair| {
            let (prev, cur) = (pair[0], pair[1]);
            if prev.price == 0.0 {
                return None;
            }
            let ret = cur.price / prev.price - 1.0;
            ret.is_finite().then_some(PeriodReturn {
                date: cur.date,
                price: cur.price,
                ret,
            })
        })
        .collect();
    trace!(periods = prices.len(), returns = points.len(), "Derived period returns");
    PeriodReturnSeries::from_points(points)
}

/// Converts a raw daily table into a fixed-frequency period return series.
///
/// Deterministic: the same table and config always give the same series.
#[must_use]
pub fn to_period_returns(raw: &RawPriceTable, cfg: &ReturnConfig) -> PeriodReturnSeries {
    returns_from_prices(&resample_prices(raw, cfg.frequency))
}

/// Same as [`to_period_returns`], reading the raw table from a DataFrame.
///
/// # Errors
///
/// Returns [`DropsError::Schema`](drops_core::DropsError::Schema) if the frame
/// lacks an adjusted-close column or a time axis.
pub fn to_period_returns_from_frame(df: &DataFrame, cfg: &ReturnConfig) -> Result<PeriodReturnSeries> {
    let raw = RawPriceTable::from_dataframe(df)?;
    Ok(to_period_returns(&raw, cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{monthly_table, ymd};
    use drops_core::{DropsError, PriceObservation};
    use polars::prelude::*;

    #[test]
    fn test_scenario_monthly_returns() {
        let raw = monthly_table(&[100.0, 105.0, 80.0, 81.0, 79.0, 90.0]);
        let ret = to_period_returns(&raw, &ReturnConfig::default());

        let rounded: Vec<f64> = ret
            .values()
            .iter()
            .map(|r| (r * 10_000.0).round() / 10_000.0)
            .collect();
        assert_eq!(rounded, vec![0.05, -0.2381, 0.0125, -0.0247, 0.1392]);
        assert_eq!(ret.points()[0].date, ymd(2020, 2, 29));
        assert_eq!(ret.points()[4].date, ymd(2020, 6, 30));
    }

    #[test]
    fn test_last_observation_per_month() {
        let raw = RawPriceTable::new(vec![
            PriceObservation::new(ymd(2024, 1, 2), 10.0),
            PriceObservation::new(ymd(2024, 1, 30), 12.0),
            PriceObservation::new(ymd(2024, 2, 1), 13.0),
            PriceObservation::new(ymd(2024, 2, 15), 15.0),
        ]);
        let prices = resample_prices(&raw, ReturnFrequency::Monthly);

        assert_eq!(prices.len(), 2);
        assert_eq!(prices.points()[0], PricePoint { date: ymd(2024, 1, 31), price: 12.0 });
        assert_eq!(prices.points()[1], PricePoint { date: ymd(2024, 2, 29), price: 15.0 });

        let ret = returns_from_prices(&prices);
        assert_eq!(ret.len(), 1);
        assert!((ret.points()[0].ret - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_periods_are_skipped() {
        // No observations in March or April.
        let raw = RawPriceTable::new(vec![
            PriceObservation::new(ymd(2024, 1, 10), 10.0),
            PriceObservation::new(ymd(2024, 2, 10), 11.0),
            PriceObservation::new(ymd(2024, 5, 10), 22.0),
        ]);
        let prices = resample_prices(&raw, ReturnFrequency::Monthly);
        let ret = returns_from_prices(&prices);

        assert_eq!(prices.len(), 3);
        assert_eq!(ret.len(), prices.len() - 1);
        assert_eq!(ret.points()[1].date, ymd(2024, 5, 31));
        assert!((ret.points()[1].ret - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weekly_resampling() {
        // 2024-01-01 is a Monday.
        let raw = RawPriceTable::new(vec![
            PriceObservation::new(ymd(2024, 1, 1), 10.0),
            PriceObservation::new(ymd(2024, 1, 5), 11.0),
            PriceObservation::new(ymd(2024, 1, 8), 12.0),
            PriceObservation::new(ymd(2024, 1, 12), 9.9),
        ]);
        let ret = to_period_returns(&raw, &ReturnConfig::new(ReturnFrequency::Weekly));

        assert_eq!(ret.len(), 1);
        assert_eq!(ret.points()[0].date, ymd(2024, 1, 14));
        assert!((ret.points()[0].ret - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_prior_price_is_dropped() {
        let raw = monthly_table(&[0.0, 10.0, 11.0]);
        let ret = to_period_returns(&raw, &ReturnConfig::default());

        assert_eq!(ret.len(), 1);
        assert!(ret.values().iter().all(|r| r.is_finite()));
    }

    #[test]
    fn test_length_is_periods_minus_one() {
        for n in 1..8 {
            let prices: Vec<f64> = (0..n).map(|i| 100.0 + f64::from(i)).collect();
            let raw = monthly_table(&prices);
            let periods = resample_prices(&raw, ReturnFrequency::Monthly).len();
            let ret = to_period_returns(&raw, &ReturnConfig::default());
            assert_eq!(ret.len(), periods - 1);
        }
        assert!(to_period_returns(&RawPriceTable::default(), &ReturnConfig::default()).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let raw = monthly_table(&[100.0, 105.0, 80.0, 81.0]);
        let cfg = ReturnConfig::default();
        assert_eq!(to_period_returns(&raw, &cfg), to_period_returns(&raw, &cfg));
    }

    #[test]
    fn test_from_frame_requires_schema() {
        let df = DataFrame::new(vec![Column::new("close".into(), vec![1.0])]).unwrap();
        let err = to_period_returns_from_frame(&df, &ReturnConfig::default()).unwrap_err();
        assert!(matches!(err, DropsError::Schema { .. }));

        let df = DataFrame::new(vec![
            Column::new("Date".into(), vec!["2024-01-31", "2024-02-29"]),
            Column::new("Adj Close".into(), vec![10.0, 12.0]),
        ])
        .unwrap();
        let ret = to_period_returns_from_frame(&df, &ReturnConfig::default()).unwrap();
        assert_eq!(ret.len(), 1);
    }
}
