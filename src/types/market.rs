use serde::{Deserialize, Serialize};

/// One raw entry from a price provider.
///
/// The primary provider returns 12-field candlestick arrays
/// `[open_time, open, high, low, close, volume, close_time,
/// quote_asset_volume, num_trades, taker_buy_base, taker_buy_quote, ignore]`
/// with numeric fields encoded as either JSON numbers or numeric strings.
/// The fallback provider returns bare close-price records.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPeriod {
    Candle(Vec<serde_json::Value>),
    Fallback { close: serde_json::Value },
}

/// A single normalized sampling period.
///
/// `price` is the parsed close value. Immutable once created; the ordered
/// collection these come in is significant because rolling windows depend
/// on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePeriod {
    /// Ordinal timestamp, strictly increasing within one run.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    /// Close price, >= 0.
    pub price: f64,
    /// Traded volume, >= 0. Zero for fallback single-price records.
    pub volume: f64,
}

/// Network-level mining metrics, one scalar snapshot per run.
///
/// Applied uniformly across all periods of a run; the base design does not
/// time-align hash rate history with the price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalMetrics {
    pub hash_rate: f64,
    pub difficulty: f64,
}

impl ExternalMetrics {
    pub fn new(hash_rate: f64, difficulty: f64) -> Self {
        Self {
            hash_rate,
            difficulty,
        }
    }

    /// Explicit sentinel for "metrics provider down".
    ///
    /// Zero difficulty makes mining pressure collapse to 0 in the engine,
    /// so a run degrades gracefully instead of failing.
    pub fn unavailable() -> Self {
        Self {
            hash_rate: 0.0,
            difficulty: 0.0,
        }
    }

    /// Whether the snapshot carries usable provider data.
    pub fn is_available(&self) -> bool {
        self.hash_rate > 0.0 && self.difficulty > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_period_candle_deserialization() {
        let json = r#"[1499040000000, "0.01634790", "0.80000000", "0.01575800",
            "0.01577100", "148976.11427815", 1499644799999, "2434.19055334",
            308, "1756.87402397", "28.46694368", "17928899.62484339"]"#;

        let raw: RawPeriod = serde_json::from_str(json).unwrap();
        match raw {
            RawPeriod::Candle(fields) => assert_eq!(fields.len(), 12),
            RawPeriod::Fallback { .. } => panic!("expected candle"),
        }
    }

    #[test]
    fn test_raw_period_fallback_deserialization() {
        let json = r#"{"close": 43500.5}"#;

        let raw: RawPeriod = serde_json::from_str(json).unwrap();
        match raw {
            RawPeriod::Fallback { close } => assert_eq!(close.as_f64(), Some(43500.5)),
            RawPeriod::Candle(_) => panic!("expected fallback"),
        }
    }

    #[test]
    fn test_external_metrics_unavailable() {
        let metrics = ExternalMetrics::unavailable();
        assert!(!metrics.is_available());
        assert_eq!(metrics.hash_rate, 0.0);
        assert_eq!(metrics.difficulty, 0.0);
    }

    #[test]
    fn test_external_metrics_available() {
        let metrics = ExternalMetrics::new(50.0, 100.0);
        assert!(metrics.is_available());
    }

    #[test]
    fn test_external_metrics_partial_snapshot_not_available() {
        // A provider that reports only one of the two scalars is as
        // unusable as one that reports neither.
        assert!(!ExternalMetrics::new(50.0, 0.0).is_available());
        assert!(!ExternalMetrics::new(0.0, 100.0).is_available());
    }
}
