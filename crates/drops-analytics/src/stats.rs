//! Distribution statistics of a return series.
//!
//! Sample statistics follow the usual bias-corrected estimators (n-1
//! denominator for the standard deviation, adjusted Fisher-Pearson skewness,
//! unbiased excess kurtosis). Where an estimator is undefined the result is
//! 0.0 rather than NaN.

use drops_core::PeriodReturnSeries;
use serde::{Deserialize, Serialize};

/// Arithmetic mean; 0.0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator); 0.0 with fewer than two values.
#[must_use]
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Median; 0.0 for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sums of squared, cubed and fourth-power deviations from the mean.
fn central_sums(values: &[f64]) -> (f64, f64, f64) {
    let m = mean(values);
    values.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), v| {
        let d = v - m;
        (s2 + d * d, s3 + d.powi(3), s4 + d.powi(4))
    })
}

/// Adjusted Fisher-Pearson skewness; 0.0 below three values or with zero variance.
#[must_use]
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let (s2, s3, _) = central_sums(values);
    if s2 <= f64::EPSILON * f64::EPSILON {
        return 0.0;
    }
    let nf = n as f64;
    (nf * (nf - 1.0).sqrt() / (nf - 2.0)) * (s3 / s2.powf(1.5))
}

/// Unbiased excess kurtosis; 0.0 below four values or with zero variance.
#[must_use]
pub fn excess_kurtosis(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 4 {
        return 0.0;
    }
    let (s2, _, s4) = central_sums(values);
    if s2 <= f64::EPSILON * f64::EPSILON {
        return 0.0;
    }
    let nf = n as f64;
    let adj = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    let numer = nf * (nf + 1.0) * (nf - 1.0) * s4;
    let denom = (nf - 2.0) * (nf - 3.0) * s2 * s2;
    numer / denom - adj
}

/// Summary of the distribution of period returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnStats {
    /// Mean return.
    pub mean: f64,
    /// Median return.
    pub median: f64,
    /// Sample standard deviation.
    pub std: f64,
    /// Sample skewness.
    pub skew: f64,
    /// Excess kurtosis.
    pub kurtosis: f64,
    /// Number of returns.
    pub count: usize,
}

impl ReturnStats {
    /// Computes the distribution statistics of a return series.
    ///
    /// An empty series gives all zeros.
    #[must_use]
    pub fn compute(returns: &PeriodReturnSeries) -> Self {
        let values = returns.values();
        Self {
            mean: mean(&values),
            median: median(&values),
            std: sample_std(&values),
            skew: skewness(&values),
            kurtosis: excess_kurtosis(&values),
            count: values.len(),
        }
    }
}
