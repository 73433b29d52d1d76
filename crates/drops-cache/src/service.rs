//! Memoizing analysis service.

use drops_analytics::{
    DrawdownCurve, OverviewSummary, PricePanel, ThresholdEventSet, align_by_period,
    compute_drawdown, count_threshold_breaches, resample_prices, threshold_events,
    to_period_returns,
};
use drops_core::{
    DropsError, PeriodReturnSeries, PriceDataset, RawPriceTable, Result, ReturnConfig, Symbol,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Lazily computed, per-ticker derived series for one dataset and one config.
///
/// Returns and drawdowns are computed on first request and handed out as
/// shared immutable values afterwards. Entries are never evicted or
/// invalidated; use [`AnalysisService::rescoped`] to analyse the same dataset
/// under another configuration.
///
/// Accessors take `&mut self` because they fill the cache. A host that serves
/// concurrent requests from one service must serialize them, e.g. behind a
/// `Mutex`.
#[derive(Debug)]
pub struct AnalysisService {
    dataset: Arc<PriceDataset>,
    config: ReturnConfig,
    returns: HashMap<Symbol, Arc<PeriodReturnSeries>>,
    drawdowns: HashMap<Symbol, Arc<DrawdownCurve>>,
}

impl AnalysisService {
    /// Create a service scope over a dataset.
    #[must_use]
    pub fn new(dataset: PriceDataset, config: ReturnConfig) -> Self {
        Self::with_shared(Arc::new(dataset), config)
    }

    /// Create a service scope over a dataset shared with other scopes.
    #[must_use]
    pub fn with_shared(dataset: Arc<PriceDataset>, config: ReturnConfig) -> Self {
        Self {
            dataset,
            config,
            returns: HashMap::new(),
            drawdowns: HashMap::new(),
        }
    }

    /// A fresh scope over the same dataset with another configuration.
    ///
    /// Nothing computed in `self` is carried over.
    #[must_use]
    pub fn rescoped(&self, config: ReturnConfig) -> Self {
        Self::with_shared(Arc::clone(&self.dataset), config)
    }

    /// The configuration of this scope.
    #[must_use]
    pub const fn config(&self) -> &ReturnConfig {
        &self.config
    }

    /// The dataset of this scope.
    #[must_use]
    pub fn dataset(&self) -> &PriceDataset {
        &self.dataset
    }

    /// Number of tickers whose returns are cached.
    #[must_use]
    pub fn cached_returns(&self) -> usize {
        self.returns.len()
    }

    /// Number of tickers whose drawdown curves are cached.
    #[must_use]
    pub fn cached_drawdowns(&self) -> usize {
        self.drawdowns.len()
    }

    fn raw(&self, symbol: &Symbol) -> Result<&RawPriceTable> {
        self.dataset
            .get(symbol)
            .ok_or_else(|| DropsError::SymbolNotFound(symbol.to_string()))
    }

    /// Period returns for a ticker, computed once per scope.
    #[instrument(skip(self), fields(symbol = %symbol))]
    pub fn get_returns(&mut self, symbol: &Symbol) -> Result<Arc<PeriodReturnSeries>> {
        if let Some(cached) = self.returns.get(symbol) {
            debug!("Cache hit for period returns");
            return Ok(Arc::clone(cached));
        }

        debug!("Cache miss for period returns");
        let series = Arc::new(to_period_returns(self.raw(symbol)?, &self.config));
        self.returns.insert(symbol.clone(), Arc::clone(&series));
        debug!("Cached {} period returns", series.len());
        Ok(series)
    }

    /// Drawdown curve for a ticker at the scope's frequency, computed once per scope.
    ///
    /// The curve is built from the resampled period prices so that it lines
    /// up with the return series.
    #[instrument(skip(self), fields(symbol = %symbol))]
    pub fn get_drawdown(&mut self, symbol: &Symbol) -> Result<Arc<DrawdownCurve>> {
        if let Some(cached) = self.drawdowns.get(symbol) {
            debug!("Cache hit for drawdown curve");
            return Ok(Arc::clone(cached));
        }

        debug!("Cache miss for drawdown curve");
        let prices = resample_prices(self.raw(symbol)?, self.config.frequency);
        let curve = Arc::new(compute_drawdown(prices.points()));
        self.drawdowns.insert(symbol.clone(), Arc::clone(&curve));
        debug!("Cached drawdown curve with {} points", curve.len());
        Ok(curve)
    }

    /// Breach counts at `threshold` for every ticker, through the cached returns.
    ///
    /// Tickers come out in dataset order, like [`all_returns`](Self::all_returns).
    #[instrument(skip(self))]
    pub fn get_threshold_counts(&mut self, threshold: f64) -> Result<Vec<(Symbol, usize)>> {
        let symbols: Vec<Symbol> = self.dataset.symbols().cloned().collect();
        let mut counts = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let returns = self.get_returns(&symbol)?;
            let count = count_threshold_breaches(&returns, threshold);
            counts.push((symbol, count));
        }
        Ok(counts)
    }

    /// Returns for every ticker, in dataset order.
    pub fn all_returns(&mut self) -> Result<Vec<(Symbol, Arc<PeriodReturnSeries>)>> {
        let symbols: Vec<Symbol> = self.dataset.symbols().cloned().collect();
        symbols
            .into_iter()
            .map(|symbol| {
                let returns = self.get_returns(&symbol)?;
                Ok((symbol, returns))
            })
            .collect()
    }

    /// Periods of a ticker at or below `threshold`.
    pub fn threshold_events(&mut self, symbol: &Symbol, threshold: f64) -> Result<ThresholdEventSet> {
        let returns = self.get_returns(symbol)?;
        Ok(threshold_events(&returns, threshold))
    }

    /// Headline figures for a ticker from its cached returns and drawdown.
    pub fn overview(&mut self, symbol: &Symbol, threshold: f64) -> Result<OverviewSummary> {
        let returns = self.get_returns(symbol)?;
        let drawdown = self.get_drawdown(symbol)?;
        Ok(OverviewSummary::compute(
            &returns,
            &drawdown,
            threshold,
            self.config.frequency,
        ))
    }

    /// Period prices of every ticker on a shared index. Not cached.
    #[must_use]
    pub fn comparison_panel(&self) -> PricePanel {
        align_by_period(self.dataset.iter(), self.config.frequency)
    }
}
