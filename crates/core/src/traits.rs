use crate::models::*;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Exchange API Trait
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the exchange.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The exchange rejected the request with a numeric code.
    #[error("Exchange API Error [{code}]: {message}")]
    Api { code: i64, message: String },
    /// Transport-level failure before or while reaching the exchange.
    #[error("Exchange Request Error: {0}")]
    Request(String),
    /// Missing or invalid process configuration (credentials).
    #[error("Configuration Error: {0}")]
    Config(String),
    /// Anything else.
    #[error("Error: {0}")]
    Other(String),
}

/// One async method per exchange operation the tool surface exposes.
///
/// Results are the exchange's JSON payloads passed through verbatim; this
/// layer never re-models responses.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    // --- market data (unsigned) ---

    /// Latest price for one symbol.
    async fn ticker_price(&self, symbol: &str) -> Result<Value, ExchangeError>;

    /// Latest prices for all symbols.
    async fn all_ticker_prices(&self) -> Result<Value, ExchangeError>;

    /// 24-hour statistics for one symbol.
    async fn ticker_24h(&self, symbol: &str) -> Result<Value, ExchangeError>;

    /// 24-hour statistics for all symbols.
    async fn all_tickers_24h(&self) -> Result<Value, ExchangeError>;

    /// Order book (market depth).
    async fn order_book(&self, query: &DepthQuery) -> Result<Value, ExchangeError>;

    /// Recent public trades.
    async fn recent_trades(&self, query: &RecentTradesQuery) -> Result<Value, ExchangeError>;

    /// Candlestick data.
    async fn klines(&self, query: &KlinesQuery) -> Result<Value, ExchangeError>;

    /// Current average price.
    async fn avg_price(&self, symbol: &str) -> Result<Value, ExchangeError>;

    /// Exchange trading rules for all symbols.
    async fn exchange_info(&self) -> Result<Value, ExchangeError>;

    /// Exchange trading rules for one symbol.
    async fn symbol_info(&self, symbol: &str) -> Result<Value, ExchangeError>;

    /// Best book price/quantity for all symbols.
    async fn all_book_tickers(&self) -> Result<Value, ExchangeError>;

    // --- account (signed) ---

    /// Account snapshot including balances.
    async fn account(&self) -> Result<Value, ExchangeError>;

    /// Balance entry for a single asset (`null` when the asset is absent).
    async fn asset_balance(&self, asset: &str) -> Result<Value, ExchangeError>;

    /// Trades the account executed on a symbol.
    async fn my_trades(&self, query: &MyTradesQuery) -> Result<Value, ExchangeError>;

    /// Account status (normal, margin, futures).
    async fn account_status(&self) -> Result<Value, ExchangeError>;

    /// Trade fee, for one symbol or all.
    async fn trade_fee(&self, symbol: Option<&str>) -> Result<Value, ExchangeError>;

    /// Asset dividend history.
    async fn asset_dividend_history(&self, query: &DividendQuery) -> Result<Value, ExchangeError>;

    // --- trading (signed) ---

    /// Submit a new order.
    async fn create_order(&self, order: &NewOrder) -> Result<Value, ExchangeError>;

    /// Validate a new order without placing it.
    async fn create_test_order(&self, order: &NewOrder) -> Result<Value, ExchangeError>;

    /// Look up a single order.
    async fn get_order(&self, lookup: &OrderLookup) -> Result<Value, ExchangeError>;

    /// Cancel an active order.
    async fn cancel_order(&self, lookup: &OrderLookup) -> Result<Value, ExchangeError>;

    /// Open orders, for one symbol or all.
    async fn open_orders(&self, symbol: Option<&str>) -> Result<Value, ExchangeError>;

    /// Order history for a symbol.
    async fn all_orders(&self, query: &AllOrdersQuery) -> Result<Value, ExchangeError>;

    /// Cancel every open order on a symbol.
    async fn cancel_open_orders(&self, symbol: &str) -> Result<Value, ExchangeError>;
}

// ---------------------------------------------------------------------------
// Client Provider Trait
// ---------------------------------------------------------------------------

/// Hands out the shared [`ExchangeApi`] instance.
///
/// Implementations may construct the client lazily on first call; after a
/// successful call every subsequent one must return the same instance.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    async fn get(&self) -> Result<Arc<dyn ExchangeApi>, ExchangeError>;
}
