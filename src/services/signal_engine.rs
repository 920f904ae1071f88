//! Signal engine.
//!
//! The one authoritative implementation of the derived-indicator formulas:
//! mining pressure, weighted probability, trailing momentum, scalp
//! proximity, and the buy/sell conjunctions. Every front-end surface goes
//! through [`compute`]; none re-embeds formula logic.
//!
//! The engine is a pure function of its three inputs: no I/O, no shared
//! state, safe to call repeatedly or concurrently with different inputs.

use crate::error::{AppError, Result};
use crate::types::{ExternalMetrics, PricePeriod, SignalParameters, SignalRecord};

/// Trailing window of price diffs averaged for momentum.
pub const MOMENTUM_WINDOW: usize = 5;

/// Trailing window for the rolling min/max used by scalp signals. The
/// longest window in the pipeline; records before it fills carry no
/// actionable signal.
pub const EXTREMUM_WINDOW: usize = 14;

/// Compute derived signals for an ordered price series.
///
/// Output has the same length and order as `periods`. Empty input yields
/// empty output. Invalid parameters fail the whole run with
/// [`AppError::Configuration`] before anything is computed.
pub fn compute(
    periods: &[PricePeriod],
    metrics: ExternalMetrics,
    params: &SignalParameters,
) -> Result<Vec<SignalRecord>> {
    params.validate()?;

    let mining_pressure = calculate_mining_pressure(metrics);
    let weight_sum = params.weight_sum();
    let prices: Vec<f64> = periods.iter().map(|p| p.price).collect();

    let records = periods
        .iter()
        .enumerate()
        .map(|(i, period)| {
            let probability = (params.volume_weight * period.volume
                + params.price_weight * period.price
                + params.mining_weight * mining_pressure)
                / weight_sum;

            let momentum = trailing_momentum(&prices, i);
            let min14 = trailing_extremum(&prices, i, f64::min);
            let max14 = trailing_extremum(&prices, i, f64::max);

            let scalp_long = scalp_condition(period.price, min14, params.scalp_sensitivity);
            let scalp_short = scalp_condition(period.price, max14, params.scalp_sensitivity);

            // Strict comparisons: momentum exactly at the threshold is no
            // signal. None momentum (warm-up or zero price) is no signal.
            let long_signal = momentum.is_some_and(|m| m > params.momentum_threshold);
            let short_signal = momentum.is_some_and(|m| m < -params.momentum_threshold);

            SignalRecord {
                timestamp: period.timestamp,
                price: period.price,
                volume: period.volume,
                mining_pressure,
                probability,
                momentum,
                scalp_long,
                scalp_short,
                long_signal,
                short_signal,
                buy_signal: long_signal && scalp_long,
                sell_signal: short_signal && scalp_short,
            }
        })
        .collect();

    Ok(records)
}

/// Hash rate over difficulty, or 0 when difficulty is not positive.
pub fn calculate_mining_pressure(metrics: ExternalMetrics) -> f64 {
    if metrics.difficulty > 0.0 {
        metrics.hash_rate / metrics.difficulty
    } else {
        0.0
    }
}

/// The most recent record whose rolling windows were fully formed.
///
/// The engine itself tolerates short series and returns warm-up records
/// with false signals; surfaces that need one actionable record call this
/// instead and get an explicit [`AppError::InsufficientData`].
pub fn latest_actionable(records: &[SignalRecord]) -> Result<&SignalRecord> {
    if records.len() < EXTREMUM_WINDOW {
        return Err(AppError::InsufficientData(format!(
            "need at least {} periods, got {}",
            EXTREMUM_WINDOW,
            records.len()
        )));
    }
    records
        .last()
        .ok_or_else(|| AppError::Internal("non-empty slice had no last element".to_string()))
}

/// Mean of the trailing `MOMENTUM_WINDOW` price diffs divided by the
/// current price. `None` until enough diffs exist (the first diff only
/// exists at index 1) or when the current price is zero.
fn trailing_momentum(prices: &[f64], i: usize) -> Option<f64> {
    if i < MOMENTUM_WINDOW {
        return None;
    }
    if prices[i] == 0.0 {
        return None;
    }

    let diff_sum: f64 = (i - MOMENTUM_WINDOW + 1..=i)
        .map(|j| prices[j] - prices[j - 1])
        .sum();

    Some(diff_sum / MOMENTUM_WINDOW as f64 / prices[i])
}

/// Rolling extremum over the trailing `EXTREMUM_WINDOW` prices, selected
/// by `pick` (`f64::min` or `f64::max`). `None` until the window fills.
fn trailing_extremum(prices: &[f64], i: usize, pick: fn(f64, f64) -> f64) -> Option<f64> {
    if i + 1 < EXTREMUM_WINDOW {
        return None;
    }

    prices[i + 1 - EXTREMUM_WINDOW..=i].iter().copied().reduce(pick)
}

/// Proximity of `price` to a rolling extremum, strictly under the
/// sensitivity. An unformed window or a non-positive extremum (which
/// would divide by zero) means the condition is not met, never NaN.
fn scalp_condition(price: f64, extremum: Option<f64>, sensitivity: f64) -> bool {
    match extremum {
        Some(e) if e > 0.0 => (price - e).abs() / e < sensitivity,
        _ => false,
    }
}
