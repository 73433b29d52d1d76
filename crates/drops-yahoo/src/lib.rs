#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/drops/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance price feed.
//!
//! [`YahooSource`] implements [`PriceSource`] using Yahoo Finance's chart
//! API and returns daily adjusted closes as a [`RawPriceTable`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use drops_core::{DropsError, PriceObservation, PriceSource, RawPriceTable, Result, Symbol};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Yahoo Finance chart API base URL.
const CHART_API_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Default rate limit delay in milliseconds.
const DEFAULT_RATE_LIMIT_MS: u64 = 1000;

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance daily price feed.
#[derive(Debug)]
pub struct YahooSource {
    client: reqwest::Client,
    rate_limit_ms: u64,
    last_request_time: AtomicU64,
}

impl YahooSource {
    /// Create a feed with the default rate limit of one request per second.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(Duration::from_millis(DEFAULT_RATE_LIMIT_MS))
    }

    /// Create a feed around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            last_request_time: AtomicU64::new(0),
        }
    }

    /// Create a feed with a custom delay between requests.
    ///
    /// Falls back to a default client if the configured one cannot be built.
    #[must_use]
    pub fn with_rate_limit(rate_limit: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            rate_limit_ms: u64::try_from(rate_limit.as_millis()).unwrap_or(u64::MAX),
            last_request_time: AtomicU64::new(0),
        }
    }

    fn now_ms() -> u64 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }

    async fn apply_rate_limit(&self) {
        let elapsed = Self::now_ms().saturating_sub(self.last_request_time.load(Ordering::Relaxed));

        if elapsed < self.rate_limit_ms {
            let wait_time = self.rate_limit_ms - elapsed;
            debug!("Rate limiting: waiting {}ms", wait_time);
            sleep(Duration::from_millis(wait_time)).await;
        }

        self.last_request_time.store(Self::now_ms(), Ordering::Relaxed);
    }

    fn build_chart_url(symbol: &Symbol, years: u32) -> String {
        format!(
            "{}/{}?range={}y&interval=1d&includeAdjustedClose=true",
            CHART_API_URL,
            symbol.as_str(),
            years
        )
    }
}

impl Default for YahooSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for YahooSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn fetch_prices(&self, symbol: &Symbol, years: u32) -> Result<RawPriceTable> {
        if years == 0 {
            return Err(DropsError::InvalidParameter(
                "history length must be at least one year".to_string(),
            ));
        }

        self.apply_rate_limit().await;

        let url = Self::build_chart_url(symbol, years);
        debug!("Fetching prices: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DropsError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DropsError::RateLimited {
                provider: PROVIDER.to_string(),
                retry_after: Some(Duration::from_secs(60)),
            });
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DropsError::SymbolNotFound(symbol.to_string()));
        }

        if !response.status().is_success() {
            return Err(DropsError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| DropsError::Parse(e.to_string()))?;

        parse_chart_response(symbol, chart)
    }
}

/// Turns a chart payload into a price table.
///
/// Bars with a missing price are skipped.
fn parse_chart_response(symbol: &Symbol, response: ChartResponse) -> Result<RawPriceTable> {
    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            return Err(DropsError::SymbolNotFound(symbol.to_string()));
        }
        return Err(DropsError::Other(format!(
            "{}: {}",
            error.code, error.description
        )));
    }

    let no_data = |detail: &str| DropsError::DataNotAvailable {
        symbol: symbol.to_string(),
        detail: detail.to_string(),
    };

    let result = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| no_data("empty chart result"))?;

    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Err(no_data("no timestamps"));
    }

    let adjusted = result
        .indicators
        .adjclose
        .and_then(|ac| ac.into_iter().next())
        .map(|ac| ac.adjclose)
        .filter(|prices| prices.len() == timestamps.len());

    let prices = match adjusted {
        Some(prices) => prices,
        None => {
            debug!("Adjusted close missing, using close");
            result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|q| q.close)
                .ok_or_else(|| DropsError::Parse("Missing quote data".to_string()))?
        }
    };

    let table: RawPriceTable = timestamps
        .iter()
        .zip(prices)
        .filter_map(|(&ts, price)| {
            let date = Utc.timestamp_opt(ts, 0).single()?.date_naive();
            Some(PriceObservation::new(date, price?))
        })
        .collect();

    if table.is_empty() {
        return Err(no_data("no priced bars"));
    }

    debug!("Parsed {} daily prices", table.len());
    Ok(table)
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Vec<Option<f64>>,
}
