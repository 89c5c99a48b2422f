use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Order vocabulary
// ---------------------------------------------------------------------------

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

/// The type of order, in Binance's spot vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "LIMIT",
            OrderType::Market => "MARKET",
            OrderType::StopLoss => "STOP_LOSS",
            OrderType::StopLossLimit => "STOP_LOSS_LIMIT",
            OrderType::TakeProfit => "TAKE_PROFIT",
            OrderType::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
            OrderType::LimitMaker => "LIMIT_MAKER",
        }
    }
}

/// How long an order stays active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good Till Cancel.
    Gtc,
    /// Immediate or Cancel.
    Ioc,
    /// Fill or Kill.
    Fok,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
        }
    }
}

// ---------------------------------------------------------------------------
// Typed request structs
// ---------------------------------------------------------------------------
//
// Tool arguments are decoded into these once at the catalog boundary, so the
// client works with concrete fields instead of untyped key lookups. Field
// names follow the tool surface (snake_case); the client remaps them to
// Binance's camelCase query parameters.

/// A new order to submit (or test-submit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub symbol: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    /// Forwarded only when present; Binance rejects `timeInForce` on order
    /// types that do not take one (e.g. MARKET).
    pub time_in_force: Option<TimeInForce>,
    pub stop_price: Option<Decimal>,
}

/// Identifies an existing order by exchange id or client id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLookup {
    pub symbol: String,
    pub order_id: Option<u64>,
    pub orig_client_order_id: Option<String>,
}

/// Order-book depth query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthQuery {
    pub symbol: String,
    #[serde(default = "default_depth_limit")]
    pub limit: u32,
}

/// Recent-trades query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentTradesQuery {
    pub symbol: String,
    #[serde(default = "default_page_limit")]
    pub limit: u32,
}

/// Candlestick query. Times are Unix milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KlinesQuery {
    pub symbol: String,
    #[serde(default = "default_kline_interval")]
    pub interval: String,
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
}

/// Account trade history query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyTradesQuery {
    pub symbol: String,
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    pub from_id: Option<u64>,
}

/// Asset dividend history query. Times are Unix milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendQuery {
    pub asset: Option<String>,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
}

/// Full order history query for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllOrdersQuery {
    pub symbol: String,
    /// Order id to start from.
    pub order_id: Option<u64>,
    #[serde(default = "default_page_limit")]
    pub limit: u32,
}

fn default_depth_limit() -> u32 {
    100
}

fn default_page_limit() -> u32 {
    500
}

fn default_kline_interval() -> String {
    "1h".to_string()
}
