use crate::types::SignalParameters;
use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Binance API key (optional, public endpoints work without).
    pub binance_api_key: Option<String>,
    /// CoinGecko API key (optional, for pro tier).
    pub coingecko_api_key: Option<String>,
    /// Candlestick interval requested from the primary provider.
    pub kline_interval: String,
    /// Number of candlesticks requested per run.
    pub kline_limit: u32,
    /// TTL for cached price payloads (seconds).
    pub price_cache_ttl_secs: u64,
    /// TTL for cached mining metrics (seconds).
    pub metrics_cache_ttl_secs: u64,
    /// Default signal parameters, overridable per request.
    pub default_params: SignalParameters,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = SignalParameters::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            binance_api_key: env::var("BINANCE_API_KEY").ok(),
            coingecko_api_key: env::var("COINGECKO_API_KEY").ok(),
            kline_interval: env::var("KLINE_INTERVAL").unwrap_or_else(|_| "1h".to_string()),
            kline_limit: env::var("KLINE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            price_cache_ttl_secs: env::var("PRICE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            metrics_cache_ttl_secs: env::var("METRICS_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            default_params: SignalParameters {
                volume_weight: parse_env("VOLUME_WEIGHT", defaults.volume_weight),
                price_weight: parse_env("PRICE_WEIGHT", defaults.price_weight),
                mining_weight: parse_env("MINING_WEIGHT", defaults.mining_weight),
                momentum_threshold: parse_env("MOMENTUM_THRESHOLD", defaults.momentum_threshold),
                scalp_sensitivity: parse_env("SCALP_SENSITIVITY", defaults.scalp_sensitivity),
            },
        }
    }
}

fn parse_env(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        // Reads real env vars; these defaults only hold when none are set,
        // which is the case in CI.
        let config = Config::from_env();
        assert_eq!(config.kline_interval, "1h");
        assert_eq!(config.kline_limit, 100);
        assert!(config.default_params.validate().is_ok());
    }
}
