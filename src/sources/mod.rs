pub mod binance;
pub mod blockchain;
pub mod coingecko;

pub use binance::BinanceClient;
pub use blockchain::BlockchainClient;
pub use coingecko::CoinGeckoClient;

/// Truncate a provider response body for error reporting without splitting
/// a multibyte character.
pub(crate) fn truncate_body(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
