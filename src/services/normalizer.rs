//! Metrics normalizer.
//!
//! Converts raw provider payloads (candlestick arrays or bare fallback
//! prices) into a uniform ordered sequence of [`PricePeriod`] records.
//! Pure transformation, no I/O.

use crate::error::{AppError, Result};
use crate::types::{PricePeriod, RawPeriod};

/// Candlestick array indices of interest.
const IDX_OPEN_TIME: usize = 0;
const IDX_OPEN: usize = 1;
const IDX_HIGH: usize = 2;
const IDX_LOW: usize = 3;
const IDX_CLOSE: usize = 4;
const IDX_VOLUME: usize = 5;

/// Minimum candlestick width we accept (through the volume field).
const MIN_CANDLE_FIELDS: usize = 6;

/// Normalize a raw provider payload into ordered price periods.
///
/// Any malformed or missing numeric field fails the whole normalization
/// with [`AppError::DataFormat`]; the caller decides whether to abort or
/// retry with a fallback source. Empty input yields an empty sequence.
pub fn normalize(raw: &[RawPeriod]) -> Result<Vec<PricePeriod>> {
    raw.iter()
        .enumerate()
        .map(|(ordinal, entry)| normalize_entry(ordinal, entry))
        .collect()
}

fn normalize_entry(ordinal: usize, entry: &RawPeriod) -> Result<PricePeriod> {
    match entry {
        RawPeriod::Candle(fields) => {
            if fields.len() < MIN_CANDLE_FIELDS {
                return Err(AppError::DataFormat(format!(
                    "candlestick entry {} has {} fields, expected at least {}",
                    ordinal,
                    fields.len(),
                    MIN_CANDLE_FIELDS
                )));
            }

            let timestamp = fields[IDX_OPEN_TIME].as_i64().ok_or_else(|| {
                AppError::DataFormat(format!("entry {}: open_time is not an integer", ordinal))
            })?;
            let open = numeric_field(ordinal, "open", &fields[IDX_OPEN])?;
            let high = numeric_field(ordinal, "high", &fields[IDX_HIGH])?;
            let low = numeric_field(ordinal, "low", &fields[IDX_LOW])?;
            let price = numeric_field(ordinal, "close", &fields[IDX_CLOSE])?;
            let volume = numeric_field(ordinal, "volume", &fields[IDX_VOLUME])?;

            if price < 0.0 || volume < 0.0 {
                return Err(AppError::DataFormat(format!(
                    "entry {}: negative close or volume",
                    ordinal
                )));
            }

            Ok(PricePeriod {
                timestamp,
                open,
                high,
                low,
                price,
                volume,
            })
        }
        RawPeriod::Fallback { close } => {
            let price = numeric_field(ordinal, "close", close)?;
            if price < 0.0 {
                return Err(AppError::DataFormat(format!(
                    "entry {}: negative close",
                    ordinal
                )));
            }

            // Fallback records carry no timestamp or volume.
            Ok(PricePeriod {
                timestamp: ordinal as i64,
                open: price,
                high: price,
                low: price,
                price,
                volume: 0.0,
            })
        }
    }
}

/// Coerce a JSON value to f64. Providers ship numeric fields both as JSON
/// numbers and as decimal strings.
fn numeric_field(ordinal: usize, name: &str, value: &serde_json::Value) -> Result<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().ok_or_else(|| {
            AppError::DataFormat(format!("entry {}: {} is not a finite number", ordinal, name))
        }),
        serde_json::Value::String(s) => s.parse::<f64>().map_err(|_| {
            AppError::DataFormat(format!(
                "entry {}: {} is not numeric: {:?}",
                ordinal, name, s
            ))
        }),
        other => Err(AppError::DataFormat(format!(
            "entry {}: {} has unexpected type: {}",
            ordinal, name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(json: &str) -> RawPeriod {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_candle_entry() {
        let raw = vec![candle(
            r#"[1499040000000, "100.0", "110.0", "95.0", "105.5", "42.0",
                1499644799999, "4400.0", 308, "20.0", "2100.0", "0"]"#,
        )];

        let periods = normalize(&raw).unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].timestamp, 1499040000000);
        assert_eq!(periods[0].open, 100.0);
        assert_eq!(periods[0].high, 110.0);
        assert_eq!(periods[0].low, 95.0);
        assert_eq!(periods[0].price, 105.5);
        assert_eq!(periods[0].volume, 42.0);
    }

    #[test]
    fn test_normalize_candle_numeric_fields_as_numbers() {
        let raw = vec![candle(r#"[1, 100, 110, 95, 105.5, 42, 2, 0, 0, 0, 0, 0]"#)];

        let periods = normalize(&raw).unwrap();
        assert_eq!(periods[0].price, 105.5);
        assert_eq!(periods[0].volume, 42.0);
    }

    #[test]
    fn test_normalize_fallback_entry() {
        let raw: Vec<RawPeriod> =
            serde_json::from_str(r#"[{"close": 43500.5}, {"close": "43600.0"}]"#).unwrap();

        let periods = normalize(&raw).unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].timestamp, 0);
        assert_eq!(periods[1].timestamp, 1);
        assert_eq!(periods[0].price, 43500.5);
        assert_eq!(periods[1].price, 43600.0);
        assert_eq!(periods[0].volume, 0.0);
    }

    #[test]
    fn test_normalize_empty_input_is_ok() {
        let periods = normalize(&[]).unwrap();
        assert!(periods.is_empty());
    }

    #[test]
    fn test_normalize_rejects_short_candle() {
        let raw = vec![candle(r#"[1499040000000, "100.0", "110.0"]"#)];

        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_normalize_rejects_non_numeric_close() {
        let raw = vec![candle(
            r#"[1, "100.0", "110.0", "95.0", "abc", "42.0", 2, "0", 0, "0", "0", "0"]"#,
        )];

        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_normalize_rejects_negative_volume() {
        let raw = vec![candle(
            r#"[1, "100.0", "110.0", "95.0", "105.0", "-42.0", 2, "0", 0, "0", "0", "0"]"#,
        )];

        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn test_normalize_fails_whole_batch_on_one_bad_entry() {
        let raw = vec![
            candle(r#"[1, "100.0", "110.0", "95.0", "105.0", "42.0", 2, "0", 0, "0", "0", "0"]"#),
            candle(r#"[3, "100.0", "110.0", "95.0", null, "42.0", 4, "0", 0, "0", "0", "0"]"#),
        ];

        assert!(normalize(&raw).is_err());
    }

    #[test]
    fn test_normalize_preserves_order() {
        let raw = vec![
            candle(r#"[10, "1", "1", "1", "1", "1", 0, "0", 0, "0", "0", "0"]"#),
            candle(r#"[20, "2", "2", "2", "2", "2", 0, "0", 0, "0", "0", "0"]"#),
            candle(r#"[30, "3", "3", "3", "3", "3", 0, "0", 0, "0", "0", "0"]"#),
        ];

        let periods = normalize(&raw).unwrap();
        let timestamps: Vec<i64> = periods.iter().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, vec![10, 20, 30]);
    }
}
