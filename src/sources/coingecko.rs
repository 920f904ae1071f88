use crate::error::{AppError, Result};
use crate::types::RawPeriod;
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, warn};

const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Symbol mapping for CoinGecko (symbol -> CoinGecko coin id).
pub const SYMBOL_TO_ID: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("sol", "solana"),
    ("xrp", "ripple"),
    ("doge", "dogecoin"),
    ("ltc", "litecoin"),
];

/// CoinGecko REST client, used as the fallback price source when the
/// primary candlestick provider is unavailable. Only a single spot price
/// is available here, so the payload degrades to one bare close record.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Create a new CoinGecko client.
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .user_agent("Pickaxe/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Fetch the current spot price for a symbol as a fallback payload.
    pub async fn fetch_fallback(&self, symbol: &str) -> Result<Vec<RawPeriod>> {
        let id = SYMBOL_TO_ID
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, id)| *id)
            .ok_or_else(|| AppError::NotFound(format!("unknown symbol: {}", symbol)))?;

        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            COINGECKO_API_URL, id
        );

        let mut request = self.client.get(&url);
        if let Some(ref key) = self.api_key {
            request = request.header("x-cg-pro-api-key", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("CoinGecko API returned {}", status);
            return Err(AppError::ExternalApi(format!(
                "CoinGecko API error: {}",
                status
            )));
        }

        let body: HashMap<String, HashMap<String, f64>> = response.json().await?;
        let price = body
            .get(id)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| {
                AppError::DataFormat(format!("CoinGecko response missing {}/usd price", id))
            })?;

        debug!("CoinGecko fallback price for {}: {}", symbol, price);

        Ok(vec![RawPeriod::Fallback {
            close: serde_json::json!(price),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_to_id_contains_btc() {
        let btc = SYMBOL_TO_ID.iter().find(|(s, _)| *s == "btc");
        assert!(btc.is_some());
        assert_eq!(btc.unwrap().1, "bitcoin");
    }

    #[test]
    fn test_simple_price_payload_shape() {
        let json = r#"{"bitcoin": {"usd": 43500.5}}"#;
        let body: HashMap<String, HashMap<String, f64>> = serde_json::from_str(json).unwrap();
        assert_eq!(body["bitcoin"]["usd"], 43500.5);
    }
}
