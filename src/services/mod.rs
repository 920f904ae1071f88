//! Core services for the signal pipeline.
//!
//! Provides payload normalization, the signal engine, the multi-source
//! market data coordinator, and CSV export.

pub mod cache;
pub mod export;
pub mod market_data;
pub mod normalizer;
pub mod signal_engine;

pub use cache::Cache;
pub use market_data::MarketDataService;
