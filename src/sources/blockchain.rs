use crate::error::{AppError, Result};
use crate::types::ExternalMetrics;
use reqwest::Client;
use tracing::debug;

const BLOCKCHAIN_API_URL: &str = "https://blockchain.info";

/// Blockchain.info client for network mining metrics.
///
/// The `/q` endpoints return bare numbers as plain text: hash rate in
/// GH/s and the current difficulty. One snapshot is taken per run and
/// applied uniformly across the price series.
#[derive(Clone)]
pub struct BlockchainClient {
    client: Client,
}

impl BlockchainClient {
    /// Create a new blockchain.info client.
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("Pickaxe/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Fetch the current hash rate and difficulty snapshot.
    pub async fn fetch_metrics(&self) -> Result<ExternalMetrics> {
        let hash_rate = self.fetch_scalar("hashrate").await?;
        let difficulty = self.fetch_scalar("getdifficulty").await?;

        debug!(
            "Network metrics: hash_rate={} GH/s, difficulty={}",
            hash_rate, difficulty
        );

        Ok(ExternalMetrics::new(hash_rate, difficulty))
    }

    async fn fetch_scalar(&self, query: &str) -> Result<f64> {
        let url = format!("{}/q/{}", BLOCKCHAIN_API_URL, query);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "blockchain.info {} error: {}",
                query,
                response.status()
            )));
        }

        let text = response.text().await?;
        text.trim().parse::<f64>().map_err(|_| {
            AppError::DataFormat(format!(
                "blockchain.info {} returned non-numeric body: {:?}",
                query,
                super::truncate_body(&text, 80)
            ))
        })
    }
}

impl Default for BlockchainClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_plain_text_scalar_parsing() {
        // The /q endpoints ship bare numbers, sometimes with whitespace.
        assert_eq!("95672703408164.09\n".trim().parse::<f64>().unwrap(), 95672703408164.09);
        assert!("<html>rate limited</html>".trim().parse::<f64>().is_err());
    }
}
