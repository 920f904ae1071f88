use crate::error::{AppError, Result};
use crate::types::RawPeriod;
use reqwest::Client;
use tracing::{debug, warn};

const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";

/// Symbol mapping for Binance (symbol -> Binance trading pair).
pub const SYMBOL_PAIRS: &[(&str, &str)] = &[
    ("btc", "BTCUSDT"),
    ("eth", "ETHUSDT"),
    ("sol", "SOLUSDT"),
    ("xrp", "XRPUSDT"),
    ("doge", "DOGEUSDT"),
    ("ltc", "LTCUSDT"),
];

/// Binance REST client for candlestick (kline) data.
///
/// Klines come back as 12-field arrays; they are passed through as
/// [`RawPeriod`] entries and parsed by the normalizer, so a malformed
/// payload fails there, not here.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    api_key: Option<String>,
    interval: String,
    limit: u32,
}

impl BinanceClient {
    /// Create a new Binance client.
    pub fn new(api_key: Option<String>, interval: String, limit: u32) -> Self {
        let client = Client::builder()
            .user_agent("Pickaxe/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            interval,
            limit,
        }
    }

    /// Fetch candlesticks for a symbol.
    pub async fn fetch_klines(&self, symbol: &str) -> Result<Vec<RawPeriod>> {
        let pair = SYMBOL_PAIRS
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, p)| *p)
            .ok_or_else(|| AppError::NotFound(format!("unknown symbol: {}", symbol)))?;

        let url = format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            BINANCE_API_URL, pair, self.interval, self.limit
        );

        let mut request = self.client.get(&url);
        if let Some(ref key) = self.api_key {
            request = request.header("X-MBX-APIKEY", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Binance API returned {}: {}",
                status,
                super::truncate_body(&text, 200)
            );
            return Err(AppError::ExternalApi(format!(
                "Binance API error: {}",
                status
            )));
        }

        let klines: Vec<RawPeriod> = response.json().await?;
        debug!("Fetched {} klines for {}", klines.len(), symbol);

        Ok(klines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_pairs_contains_btc() {
        let btc = SYMBOL_PAIRS.iter().find(|(s, _)| *s == "btc");
        assert!(btc.is_some());
        assert_eq!(btc.unwrap().1, "BTCUSDT");
    }

    #[test]
    fn test_symbol_pairs_lowercase_symbols() {
        for (symbol, _) in SYMBOL_PAIRS {
            assert_eq!(*symbol, symbol.to_lowercase());
        }
    }

    #[test]
    fn test_symbol_pairs_all_usdt() {
        for (_, pair) in SYMBOL_PAIRS {
            assert!(pair.ends_with("USDT"));
        }
    }

    #[test]
    fn test_kline_payload_deserialization() {
        let json = r#"[
            [1499040000000, "0.01634790", "0.80000000", "0.01575800",
             "0.01577100", "148976.11427815", 1499644799999, "2434.19055334",
             308, "1756.87402397", "28.46694368", "17928899.62484339"]
        ]"#;

        let klines: Vec<RawPeriod> = serde_json::from_str(json).unwrap();
        assert_eq!(klines.len(), 1);
        assert!(matches!(&klines[0], RawPeriod::Candle(fields) if fields.len() == 12));
    }
}
