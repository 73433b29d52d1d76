//! Seasonality aggregator.
//!
//! Pivots period returns into a year x calendar-month table and summarises
//! each calendar month across years. Cells with no observations are absent,
//! which is different from a zero return.

use chrono::Datelike;
use drops_core::{PeriodReturnSeries, Result, frame::frame_err};
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stats::{mean, sample_std};

/// English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of a calendar month (1-12).
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(index).copied()
}

/// Mean period return per (year, calendar month).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeasonalityPivot {
    cells: BTreeMap<(i32, u32), f64>,
}

impl SeasonalityPivot {
    /// Mean return for a cell, or `None` if no period fell in it.
    #[must_use]
    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        self.cells.get(&(year, month)).copied()
    }

    /// Years with at least one observation, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.cells.keys().map(|(y, _)| *y).collect();
        years.dedup();
        years
    }

    /// Calendar months with at least one observation in any year, ascending.
    #[must_use]
    pub fn months(&self) -> Vec<u32> {
        let mut months: Vec<u32> = self.cells.keys().map(|(_, m)| *m).collect();
        months.sort_unstable();
        months.dedup();
        months
    }

    /// All twelve cells of a year, January first.
    #[must_use]
    pub fn row(&self, year: i32) -> [Option<f64>; 12] {
        let mut row = [None; 12];
        for (month, cell) in (1u32..=12).zip(row.iter_mut()) {
            *cell = self.get(year, month);
        }
        row
    }

    /// Number of defined cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no cell is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Wide table: a `year` column plus one nullable column per observed month
    /// (named `"1"`..`"12"`).
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let years = self.years();
        let mut columns = vec![Column::new("year".into(), years.clone())];
        for month in self.months() {
            let values: Vec<Option<f64>> = years.iter().map(|y| self.get(*y, month)).collect();
            columns.push(Column::new(month.to_string().into(), values));
        }
        DataFrame::new(columns).map_err(frame_err)
    }
}

/// Groups returns by (year, month) of their period-end date and averages each cell.
///
/// Monthly series give one entry per cell; weekly series average the weeks
/// ending in that month.
#[must_use]
pub fn seasonality_table(returns: &PeriodReturnSeries) -> SeasonalityPivot {
    let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for p in returns {
        groups
            .entry((p.date.year(), p.date.month()))
            .or_default()
            .push(p.ret);
    }
    let cells = groups
        .into_iter()
        .map(|(key, values)| (key, mean(&values)))
        .collect();
    SeasonalityPivot { cells }
}

/// Statistics of one calendar month across all years.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthStats {
    /// Calendar month (1-12).
    pub month: u32,
    /// Mean return.
    pub mean: f64,
    /// Sample standard deviation; `None` with a single observation.
    pub std: Option<f64>,
    /// Number of observations.
    pub count: usize,
}

impl MonthStats {
    /// English name of the month.
    #[must_use]
    pub fn name(&self) -> &'static str {
        month_name(self.month).unwrap_or("Unknown")
    }
}

/// Per calendar month statistics, ascending by month. Months without data are omitted.
#[must_use]
pub fn monthly_stats(returns: &PeriodReturnSeries) -> Vec<MonthStats> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for p in returns {
        groups.entry(p.date.month()).or_default().push(p.ret);
    }
    groups
        .into_iter()
        .map(|(month, values)| MonthStats {
            month,
            mean: mean(&values),
            std: (values.len() > 1).then(|| sample_std(&values)),
            count: values.len(),
        })
        .collect()
}

/// Converts per-month statistics to a DataFrame with columns
/// `month`, `name`, `mean`, `std`, `count`.
pub fn monthly_stats_frame(stats: &[MonthStats]) -> Result<DataFrame> {
    let months: Vec<u32> = stats.iter().map(|s| s.month).collect();
    let names: Vec<&str> = stats.iter().map(MonthStats::name).collect();
    let means: Vec<f64> = stats.iter().map(|s| s.mean).collect();
    let stds: Vec<Option<f64>> = stats.iter().map(|s| s.std).collect();
    let counts: Vec<u64> = stats.iter().map(|s| s.count as u64).collect();
    DataFrame::new(vec![
        Column::new("month".into(), months),
        Column::new("name".into(), names),
        Column::new("mean".into(), means),
        Column::new("std".into(), stds),
        Column::new("count".into(), counts),
    ])
    .map_err(frame_err)
}

/// Best, worst and most volatile calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonalitySummary {
    /// Month with the highest mean return.
    pub best: MonthStats,
    /// Month with the lowest mean return.
    pub worst: MonthStats,
    /// Month with the highest standard deviation, if any month has one.
    pub most_volatile: Option<MonthStats>,
}

impl SeasonalitySummary {
    /// Picks extremes from per-month statistics. The earliest month wins ties.
    #[must_use]
    pub fn from_stats(stats: &[MonthStats]) -> Option<Self> {
        let first = *stats.first()?;
        let mut best = first;
        let mut worst = first;
        let mut most_volatile: Option<MonthStats> = None;

        for s in stats {
            if s.mean > best.mean {
                best = *s;
            }
            if s.mean < worst.mean {
                worst = *s;
            }
            if let Some(std) = s.std {
                if most_volatile.and_then(|m| m.std).is_none_or(|top| std > top) {
                    most_volatile = Some(*s);
                }
            }
        }

        Some(Self {
            best,
            worst,
            most_volatile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dated_returns, scenario_returns, ymd};

    #[test]
    fn test_two_years_monthly_pivot() {
        // Feb 2020 .. Nov 2021, one return per month.
        let mut points = Vec::new();
        let mut year = 2020;
        let mut month = 2;
        for i in 0..22 {
            let end = crate::testing::month_end(year, month);
            points.push((end, f64::from(i) / 100.0));
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
        let pivot = seasonality_table(&dated_returns(&points));

        assert_eq!(pivot.years(), vec![2020, 2021]);
        assert_eq!(pivot.months().len(), 12);
        assert_eq!(pivot.get(2020, 1), None);
        assert_eq!(pivot.get(2021, 12), None);
        assert_eq!(pivot.get(2020, 2), Some(0.0));
        assert_eq!(pivot.row(2020)[0], None);
        assert_eq!(pivot.row(2021)[10], Some(0.21));

        let df = pivot.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 13);
    }

    #[test]
    fn test_weekly_entries_are_averaged() {
        let ret = dated_returns(&[
            (ymd(2024, 1, 7), 0.01),
            (ymd(2024, 1, 14), 0.03),
            (ymd(2024, 2, 4), -0.02),
        ]);
        let pivot = seasonality_table(&ret);

        assert_eq!(pivot.len(), 2);
        assert!((pivot.get(2024, 1).unwrap() - 0.02).abs() < 1e-12);
        assert_eq!(pivot.get(2024, 2), Some(-0.02));
        assert_eq!(pivot.months(), vec![1, 2]);
    }

    #[test]
    fn test_monthly_stats_and_summary() {
        let ret = dated_returns(&[
            (ymd(2020, 1, 31), 0.02),
            (ymd(2021, 1, 31), 0.04),
            (ymd(2020, 3, 31), -0.10),
            (ymd(2021, 3, 31), 0.00),
            (ymd(2020, 5, 31), 0.05),
        ]);
        let stats = monthly_stats(&ret);

        assert_eq!(stats.iter().map(|s| s.month).collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(stats[0].count, 2);
        assert!((stats[0].mean - 0.03).abs() < 1e-12);
        assert!((stats[0].std.unwrap() - 0.0002_f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats[2].std, None);

        let summary = SeasonalitySummary::from_stats(&stats).unwrap();
        assert_eq!(summary.best.month, 5);
        assert_eq!(summary.worst.month, 3);
        assert_eq!(summary.most_volatile.map(|m| m.month), Some(3));
        assert_eq!(summary.best.name(), "May");

        let df = monthly_stats_frame(&stats).unwrap();
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        let empty = PeriodReturnSeries::default();
        assert!(seasonality_table(&empty).is_empty());
        assert!(monthly_stats(&empty).is_empty());
        assert!(SeasonalitySummary::from_stats(&[]).is_none());
    }

    #[test]
    fn test_scenario_pivot_single_year() {
        let pivot = seasonality_table(&scenario_returns());
        assert_eq!(pivot.years(), vec![2020]);
        assert_eq!(pivot.months(), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
