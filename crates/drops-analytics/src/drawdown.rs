//! Drawdown engine.
//!
//! Converts a price series into its running peak and the fractional decline
//! from that peak, and summarises the curve.

use chrono::NaiveDate;
use drops_core::{
    PricePoint, Result,
    frame::{date_column, frame_err},
};
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};

use crate::streak::{RunReduction, streak_length};

/// One point of a drawdown curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    /// Observation or period-end date.
    pub date: NaiveDate,
    /// Price at this date.
    pub price: f64,
    /// Highest price seen at or before this date.
    pub peak: f64,
    /// `price / peak - 1`; never positive.
    pub drawdown: f64,
}

/// Running-peak and drawdown curve of a price series.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DrawdownCurve {
    points: Vec<DrawdownPoint>,
}

impl DrawdownCurve {
    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the curve is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the points in date order.
    #[must_use]
    pub fn points(&self) -> &[DrawdownPoint] {
        &self.points
    }

    /// Returns an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &DrawdownPoint> {
        self.points.iter()
    }

    /// Converts the curve to a DataFrame with columns `date`, `price`, `peak`, `dd`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let prices: Vec<f64> = self.iter().map(|p| p.price).collect();
        let peaks: Vec<f64> = self.iter().map(|p| p.peak).collect();
        let dds: Vec<f64> = self.iter().map(|p| p.drawdown).collect();
        DataFrame::new(vec![
            date_column("date", self.iter().map(|p| p.date))?,
            Column::new("price".into(), prices),
            Column::new("peak".into(), peaks),
            Column::new("dd".into(), dds),
        ])
        .map_err(frame_err)
    }
}

/// Computes the drawdown curve of a date-ordered price series.
///
/// Non-finite prices are dropped first. The peak is the cumulative maximum
/// including the current point, so the drawdown is exactly 0 at every new
/// peak.
#[must_use]
pub fn compute_drawdown(prices: &[PricePoint]) -> DrawdownCurve {
    let mut peak = f64::NEG_INFINITY;
    let points = prices
        .iter()
        .filter(|p| p.price.is_finite())
        .map(|p| {
            peak = peak.max(p.price);
            // A zero peak can only come from a zero price; treat it as no decline.
            let drawdown = if peak == 0.0 { 0.0 } else { p.price / peak - 1.0 };
            DrawdownPoint {
                date: p.date,
                price: p.price,
                peak,
                drawdown,
            }
        })
        .collect();
    DrawdownCurve { points }
}

/// Most negative drawdown of the curve; 0.0 when the curve never declines or is empty.
#[must_use]
pub fn max_drawdown(curve: &DrawdownCurve) -> f64 {
    curve.iter().map(|p| p.drawdown).fold(0.0, f64::min)
}

/// Number of consecutive periods below the peak, counted back from the last point.
///
/// This is the length of the decline still in progress at the end of the
/// series, not the longest historical one. A series that ends at a peak
/// reports 0.
#[must_use]
pub fn drawdown_duration(curve: &DrawdownCurve) -> usize {
    streak_length(curve.iter().map(|p| p.drawdown < 0.0), RunReduction::Trailing)
}
