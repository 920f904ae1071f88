//! Pickaxe - Mining-aware cryptocurrency trading signal server
//!
//! Normalizes heterogeneous market and mining data into a uniform
//! time-indexed record set, then computes rule-based buy/sell/hold
//! signals from momentum, mining pressure, and scalp proximity.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::MarketDataService;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub market_data: Arc<MarketDataService>,
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::*;
