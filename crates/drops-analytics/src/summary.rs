//! Headline figures for one ticker.

use drops_core::{PeriodReturnSeries, ReturnFrequency};
use serde::{Deserialize, Serialize};

use crate::{
    drawdown::{DrawdownCurve, drawdown_duration, max_drawdown},
    stats::{mean, sample_std},
    threshold::{count_threshold_breaches, max_red_streak, pct_above_threshold},
};

/// Key figures shown for a ticker at a given threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverviewSummary {
    /// Number of period returns analysed.
    pub periods: usize,
    /// Periods with a return at or below the threshold.
    pub breaches: usize,
    /// Fraction of periods with a return at or above the threshold.
    pub pct_above: f64,
    /// Mean period return.
    pub mean_return: f64,
    /// Sample standard deviation of period returns.
    pub volatility: f64,
    /// Lowest period return; 0.0 when there are no returns.
    pub worst_period: f64,
    /// Most negative drawdown.
    pub max_drawdown: f64,
    /// Length of the decline in progress at the end of the curve.
    pub drawdown_duration: usize,
    /// Longest run of negative periods.
    pub longest_red_streak: usize,
    /// `mean / volatility * sqrt(periods per year)`; 0.0 without volatility.
    ///
    /// Annualised at the series' own frequency (12 monthly, 52 weekly), not
    /// with a fixed `sqrt(12)`. A weekly figure is therefore `sqrt(52 / 12)`
    /// times what a monthly-style annualisation of the same returns gives.
    pub sharpe: f64,
}

impl OverviewSummary {
    /// Computes the summary from a ticker's returns and drawdown at the same frequency.
    #[must_use]
    pub fn compute(
        returns: &PeriodReturnSeries,
        drawdown: &DrawdownCurve,
        threshold: f64,
        frequency: ReturnFrequency,
    ) -> Self {
        let values = returns.values();
        let mean_return = mean(&values);
        let volatility = sample_std(&values);
        let sharpe = if volatility > 0.0 {
            mean_return / volatility * f64::from(frequency.periods_per_year()).sqrt()
        } else {
            0.0
        };
        let worst_period = values.iter().copied().reduce(f64::min).unwrap_or(0.0);

        Self {
            periods: returns.len(),
            breaches: count_threshold_breaches(returns, threshold),
            pct_above: pct_above_threshold(returns, threshold),
            mean_return,
            volatility,
            worst_period,
            max_drawdown: max_drawdown(drawdown),
            drawdown_duration: drawdown_duration(drawdown),
            longest_red_streak: max_red_streak(returns),
            sharpe,
        }
    }
}
