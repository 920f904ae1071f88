//! Signal API endpoints.
//!
//! Thin adapters over the one engine surface; no formula logic lives here.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::services::{export, signal_engine};
use crate::types::{SignalParameters, SignalRecord, SignalReport};
use crate::AppState;

/// Per-request overrides for the configured signal parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ParamsQuery {
    /// Volume weight.
    pub vw: Option<f64>,
    /// Price weight.
    pub pw: Option<f64>,
    /// Mining-pressure weight.
    pub bw: Option<f64>,
    /// Momentum threshold.
    pub mt: Option<f64>,
    /// Scalp sensitivity.
    pub ss: Option<f64>,
}

impl ParamsQuery {
    fn resolve(&self, defaults: SignalParameters) -> SignalParameters {
        SignalParameters {
            volume_weight: self.vw.unwrap_or(defaults.volume_weight),
            price_weight: self.pw.unwrap_or(defaults.price_weight),
            mining_weight: self.bw.unwrap_or(defaults.mining_weight),
            momentum_threshold: self.mt.unwrap_or(defaults.momentum_threshold),
            scalp_sensitivity: self.ss.unwrap_or(defaults.scalp_sensitivity),
        }
    }
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_signals))
        .route("/:symbol/latest", get(get_latest))
        .route("/:symbol/export", get(export_csv))
}

async fn run_pipeline(
    state: &AppState,
    symbol: &str,
    query: &ParamsQuery,
) -> Result<Vec<SignalRecord>> {
    let params = query.resolve(state.config.default_params);
    let periods = state.market_data.price_periods(symbol).await?;
    let metrics = state.market_data.external_metrics().await;

    signal_engine::compute(&periods, metrics, &params)
}

/// Get the full signal report for a symbol.
async fn get_signals(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ParamsQuery>,
) -> Result<Json<SignalReport>> {
    let symbol = symbol.to_lowercase();
    let records = run_pipeline(&state, &symbol, &query).await?;
    let mining_pressure = records.first().map(|r| r.mining_pressure).unwrap_or(0.0);

    Ok(Json(SignalReport {
        symbol,
        mining_pressure,
        records,
        timestamp: chrono::Utc::now().timestamp_millis(),
    }))
}

/// Get the most recent fully-formed signal record for a symbol.
async fn get_latest(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ParamsQuery>,
) -> Result<Json<SignalRecord>> {
    let symbol = symbol.to_lowercase();
    let records = run_pipeline(&state, &symbol, &query).await?;
    let latest = signal_engine::latest_actionable(&records)?;

    Ok(Json(latest.clone()))
}

/// Export the full record set as CSV.
async fn export_csv(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ParamsQuery>,
) -> Result<impl IntoResponse> {
    let symbol = symbol.to_lowercase();
    let records = run_pipeline(&state, &symbol, &query).await?;
    let body = export::to_csv(&records)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}-signals.csv\"", symbol),
            ),
        ],
        body,
    ))
}
