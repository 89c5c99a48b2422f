//! Tool catalogs and dispatch for the Binance MCP server.
//!
//! Three fixed catalogs (market, account, trading) declare the tool surface;
//! the [`Dispatcher`] routes invocations to the owning catalog, obtains the
//! shared exchange client lazily, and renders every outcome (result or
//! failure) as text.

pub mod account;
pub mod catalog;
pub mod dispatch;
pub mod market;
pub mod trading;

pub use account::AccountCatalog;
pub use catalog::{ToolCatalog, ToolError};
pub use dispatch::Dispatcher;
pub use market::MarketCatalog;
pub use trading::TradingCatalog;
