//! Dataset loading for an analysis session.

use std::sync::Arc;

use drops_cache::AnalysisService;
use drops_core::{AnalysisConfig, DataSourceKind, DropsError, PriceDataset, PriceSource, Result};
use tracing::{debug, warn};

use crate::csv::load_csv;

/// Builds the [`PriceDataset`] of a session from the configured data source.
///
/// In feed mode tickers are fetched one at a time from the registered
/// [`PriceSource`]. In CSV mode the uploaded file is parsed instead and no
/// source is needed.
#[derive(Default)]
pub struct DatasetLoader {
    source: Option<Arc<dyn PriceSource>>,
}

impl std::fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetLoader")
            .field("source", &self.source.as_ref().map(|s| s.name()))
            .finish()
    }
}

impl DatasetLoader {
    /// Create a loader without a price feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `source` as the price feed.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        debug!(source = source.name(), "Registering price source");
        self.source = Some(source);
        self
    }

    /// Use Yahoo Finance as the price feed.
    #[cfg(feature = "yahoo")]
    #[must_use]
    pub fn with_yahoo(self) -> Self {
        self.with_source(Arc::new(drops_yahoo::YahooSource::new()))
    }

    /// Name of the registered price feed, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.name())
    }

    /// Load the dataset described by `config`.
    ///
    /// Tickers for which the feed reports no data are skipped with a warning,
    /// so the dataset may hold fewer tickers than requested. Any other feed
    /// failure aborts the load. CSV mode without a file yields an empty
    /// dataset.
    pub async fn load(&self, config: &AnalysisConfig, csv: Option<&[u8]>) -> Result<PriceDataset> {
        config.validate()?;

        match config.source {
            DataSourceKind::Csv => match csv {
                Some(bytes) => load_csv(bytes, config.tickers.first().cloned()),
                None => {
                    debug!("No CSV file supplied");
                    Ok(PriceDataset::new())
                }
            },
            DataSourceKind::Feed => self.load_feed(config).await,
        }
    }

    /// Load the dataset and open an [`AnalysisService`] scope over it.
    pub async fn load_service(
        &self,
        config: &AnalysisConfig,
        csv: Option<&[u8]>,
    ) -> Result<AnalysisService> {
        let dataset = self.load(config, csv).await?;
        Ok(AnalysisService::new(dataset, config.return_config()))
    }

    async fn load_feed(&self, config: &AnalysisConfig) -> Result<PriceDataset> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| DropsError::NotSupported("No price source registered".to_string()))?;

        let mut dataset = PriceDataset::new();
        for symbol in &config.tickers {
            debug!(source = source.name(), symbol = %symbol, "Fetching prices");

            match source.fetch_prices(symbol, config.years).await {
                Ok(table) if table.is_empty() => {
                    warn!(source = source.name(), symbol = %symbol, "Empty price history, skipping");
                }
                Ok(table) => dataset.insert(symbol.clone(), table),
                Err(e) if e.is_no_data() => {
                    warn!(source = source.name(), symbol = %symbol, error = %e, "No data, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            loaded = dataset.len(),
            requested = config.tickers.len(),
            "Loaded price dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use drops_core::{PriceObservation, RawPriceTable, ReturnFrequency, Symbol, parse_tickers};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct StaticSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch_prices(&self, symbol: &Symbol, _years: u32) -> Result<RawPriceTable> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            match symbol.as_str() {
                "DOWN" => Err(DropsError::Network("connection reset".to_string())),
                "EMPTY" => Ok(RawPriceTable::default()),
                "SPY" | "QQQ" => Ok((1..=3)
                    .map(|m| {
                        let date = NaiveDate::from_ymd_opt(2024, m, 15).unwrap();
                        PriceObservation::new(date, 100.0 + f64::from(m))
                    })
                    .collect()),
                other => Err(DropsError::SymbolNotFound(other.to_string())),
            }
        }
    }

    fn loader() -> (DatasetLoader, Arc<StaticSource>) {
        let source = Arc::new(StaticSource::default());
        let loader = DatasetLoader::new().with_source(source.clone());
        (loader, source)
    }

    #[tokio::test]
    async fn test_feed_skips_missing_tickers() {
        let (loader, source) = loader();
        let config = AnalysisConfig::new(parse_tickers("spy, nope, empty, qqq"));

        let dataset = loader.load(&config, None).await.unwrap();

        let symbols: Vec<&str> = dataset.symbols().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["SPY", "QQQ"]);
        assert_eq!(source.calls.load(Ordering::Relaxed), 4);
    }

    #[tokio::test]
    async fn test_feed_propagates_other_errors() {
        let (loader, _) = loader();
        let config = AnalysisConfig::new(parse_tickers("SPY,DOWN"));

        let err = loader.load(&config, None).await.unwrap_err();
        assert!(matches!(err, DropsError::Network(_)));
    }

    #[tokio::test]
    async fn test_feed_without_source() {
        let config = AnalysisConfig::default();
        let err = DatasetLoader::new().load(&config, None).await.unwrap_err();
        assert!(matches!(err, DropsError::NotSupported(_)));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let (loader, source) = loader();
        let config = AnalysisConfig::new(Vec::new());

        let err = loader.load(&config, None).await.unwrap_err();
        assert!(matches!(err, DropsError::InvalidParameter(_)));
        assert_eq!(source.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_csv_mode() {
        let (loader, source) = loader();
        let config = AnalysisConfig::new(Vec::new()).with_source(DataSourceKind::Csv);

        let empty = loader.load(&config, None).await.unwrap();
        assert!(empty.is_empty());

        let body = "date,adjusted_close\n2024-01-31,10.0\n2024-02-29,11.0\n";
        let dataset = loader.load(&config, Some(body.as_bytes())).await.unwrap();
        assert_eq!(dataset.get(&Symbol::new("CSV")).map(RawPriceTable::len), Some(2));
        assert_eq!(source.calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_load_service_uses_config_frequency() {
        let (loader, _) = loader();
        let config = AnalysisConfig::new(parse_tickers("SPY"))
            .with_frequency(ReturnFrequency::Weekly)
            .with_threshold(-0.5);

        let mut service = loader.load_service(&config, None).await.unwrap();
        assert_eq!(service.config().frequency, ReturnFrequency::Weekly);

        let counts = service.get_threshold_counts(config.threshold).unwrap();
        assert_eq!(counts, vec![(Symbol::new("SPY"), 0)]);
        assert_eq!(service.get_returns(&Symbol::new("SPY")).unwrap().len(), 2);
    }

    #[test]
    fn test_debug_lists_source() {
        let (loader, _) = loader();
        assert_eq!(loader.source_name(), Some("static"));
        assert!(format!("{loader:?}").contains("static"));
        assert_eq!(DatasetLoader::new().source_name(), None);
    }
}
