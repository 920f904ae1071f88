//! Multi-source market data coordinator.
//!
//! Owns the provider clients, the primary/fallback decision, and the
//! response caches. The engine itself never performs I/O; this service
//! hands it fully normalized inputs.

use crate::config::Config;
use crate::error::Result;
use crate::services::cache::Cache;
use crate::services::normalizer;
use crate::sources::{BinanceClient, BlockchainClient, CoinGeckoClient};
use crate::types::{ExternalMetrics, PricePeriod};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const METRICS_CACHE_KEY: &str = "network";

/// Coordinates price and mining-metric providers for the signal pipeline.
pub struct MarketDataService {
    binance: BinanceClient,
    coingecko: CoinGeckoClient,
    blockchain: BlockchainClient,
    period_cache: Cache<Vec<PricePeriod>>,
    metrics_cache: Cache<ExternalMetrics>,
}

impl MarketDataService {
    /// Create a new coordinator from the application config.
    pub fn new(config: &Config) -> Arc<Self> {
        let binance = BinanceClient::new(
            config.binance_api_key.clone(),
            config.kline_interval.clone(),
            config.kline_limit,
        );
        let coingecko = CoinGeckoClient::new(config.coingecko_api_key.clone());
        let blockchain = BlockchainClient::new();

        Arc::new(Self {
            binance,
            coingecko,
            blockchain,
            period_cache: Cache::new(Duration::from_secs(config.price_cache_ttl_secs)),
            metrics_cache: Cache::new(Duration::from_secs(config.metrics_cache_ttl_secs)),
        })
    }

    /// Get normalized price periods for a symbol.
    ///
    /// Tries the primary candlestick provider first; a transport failure
    /// falls back to the single-price source, which still lets a run
    /// produce a (single-record) report. A malformed payload from either
    /// provider fails the call.
    pub async fn price_periods(&self, symbol: &str) -> Result<Vec<PricePeriod>> {
        if let Some(periods) = self.period_cache.get(symbol) {
            return Ok(periods);
        }

        let raw = match self.binance.fetch_klines(symbol).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Primary price source failed for {}: {}", symbol, e);
                info!("Falling back to CoinGecko spot price for {}", symbol);
                self.coingecko.fetch_fallback(symbol).await?
            }
        };

        let periods = normalizer::normalize(&raw)?;
        self.period_cache.set(symbol.to_string(), periods.clone());

        Ok(periods)
    }

    /// Get the current mining metrics snapshot.
    ///
    /// A provider failure degrades to the explicit unavailable sentinel
    /// (mining pressure collapses to zero) instead of failing the run.
    pub async fn external_metrics(&self) -> ExternalMetrics {
        if let Some(metrics) = self.metrics_cache.get(METRICS_CACHE_KEY) {
            return metrics;
        }

        match self.blockchain.fetch_metrics().await {
            Ok(metrics) if metrics.is_available() => {
                self.metrics_cache
                    .set(METRICS_CACHE_KEY.to_string(), metrics);
                metrics
            }
            Ok(metrics) => {
                warn!(
                    "Mining metrics snapshot not usable (hash_rate={}, difficulty={})",
                    metrics.hash_rate, metrics.difficulty
                );
                ExternalMetrics::unavailable()
            }
            Err(e) => {
                warn!("Mining metrics unavailable: {}", e);
                ExternalMetrics::unavailable()
            }
        }
    }
}
