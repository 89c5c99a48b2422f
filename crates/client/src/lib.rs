//! Binance spot REST adapter.
//!
//! A thin authenticated client behind the `ExchangeApi` trait: endpoint
//! plumbing and HMAC request signing only. Responses are passed through as
//! raw JSON; rate limiting and business validation stay upstream.

pub mod client;
pub mod config;
pub mod provider;
mod sign;

pub use client::BinanceClient;
pub use config::BinanceConfig;
pub use provider::LazyBinanceClient;
