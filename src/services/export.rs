//! CSV export for signal records.

use crate::error::{AppError, Result};
use crate::types::SignalRecord;

/// Serialize a record set to CSV with a header row matching the
/// [`SignalRecord`] field names. Empty input still produces the header.
pub fn to_csv(records: &[SignalRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if records.is_empty() {
        // serde-driven headers only appear once a record is written, so
        // emit them by hand for the empty case.
        writer.write_record([
            "timestamp",
            "price",
            "volume",
            "mining_pressure",
            "probability",
            "momentum",
            "scalp_long",
            "scalp_short",
            "long_signal",
            "short_signal",
            "buy_signal",
            "sell_signal",
        ])?;
    }

    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV is not UTF-8: {}", e)))
}
