use async_trait::async_trait;
use binance_mcp_core::{DepthQuery, ExchangeApi, KlinesQuery, RecentTradesQuery};
use rmcp::model::Tool;
use serde_json::{json, Value};

use crate::catalog::{
    decode_args, object_schema, OptionalSymbol, RequiredSymbol, ToolCatalog, ToolError,
};

/// Market data tools (public endpoints, no signing).
pub struct MarketCatalog;

#[async_trait]
impl ToolCatalog for MarketCatalog {
    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "get_ticker_price",
                "Get current price for a symbol or all symbols",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT'). If not provided, returns all symbols"
                        }
                    },
                    "required": []
                })),
            ),
            Tool::new(
                "get_ticker_24h",
                "Get 24-hour price change statistics for a symbol or all symbols",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT'). If not provided, returns all symbols"
                        }
                    },
                    "required": []
                })),
            ),
            Tool::new(
                "get_order_book",
                "Get order book (market depth) for a symbol",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        },
                        "limit": {
                            "type": "number",
                            "description": "Number of orders to retrieve (default: 100, max: 5000)",
                            "default": 100
                        }
                    },
                    "required": ["symbol"]
                })),
            ),
            Tool::new(
                "get_recent_trades",
                "Get recent trades for a symbol",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        },
                        "limit": {
                            "type": "number",
                            "description": "Number of trades to retrieve (default: 500, max: 1000)",
                            "default": 500
                        }
                    },
                    "required": ["symbol"]
                })),
            ),
            Tool::new(
                "get_klines",
                "Get candlestick/kline data for a symbol",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        },
                        "interval": {
                            "type": "string",
                            "description": "Kline interval: 1m, 3m, 5m, 15m, 30m, 1h, 2h, 4h, 6h, 8h, 12h, 1d, 3d, 1w, 1M",
                            "default": "1h"
                        },
                        "limit": {
                            "type": "number",
                            "description": "Number of klines to retrieve (default: 500, max: 1000)",
                            "default": 500
                        },
                        "start_time": {
                            "type": "number",
                            "description": "Start time in milliseconds"
                        },
                        "end_time": {
                            "type": "number",
                            "description": "End time in milliseconds"
                        }
                    },
                    "required": ["symbol"]
                })),
            ),
            Tool::new(
                "get_avg_price",
                "Get current average price for a symbol",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        }
                    },
                    "required": ["symbol"]
                })),
            ),
            Tool::new(
                "get_exchange_info",
                "Get exchange trading rules and symbol information",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT'). If not provided, returns all symbols"
                        }
                    },
                    "required": []
                })),
            ),
            Tool::new(
                "get_symbol_ticker",
                "Get best price/quantity on the order book for a symbol or all symbols",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT'). If not provided, returns all symbols"
                        }
                    },
                    "required": []
                })),
            ),
        ]
    }

    async fn handle(
        &self,
        client: &dyn ExchangeApi,
        name: &str,
        args: Value,
    ) -> Option<Result<Value, ToolError>> {
        match name {
            "get_ticker_price" => Some(ticker_price(client, args).await),
            "get_ticker_24h" => Some(ticker_24h(client, args).await),
            "get_order_book" => Some(order_book(client, args).await),
            "get_recent_trades" => Some(recent_trades(client, args).await),
            "get_klines" => Some(klines(client, args).await),
            "get_avg_price" => Some(avg_price(client, args).await),
            "get_exchange_info" => Some(exchange_info(client, args).await),
            "get_symbol_ticker" => Some(symbol_ticker(client, args).await),
            _ => None,
        }
    }
}

async fn ticker_price(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let args: OptionalSymbol = decode_args(args)?;
    let result = match args.symbol() {
        Some(symbol) => client.ticker_price(symbol).await?,
        None => client.all_ticker_prices().await?,
    };
    Ok(result)
}

async fn ticker_24h(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let args: OptionalSymbol = decode_args(args)?;
    let result = match args.symbol() {
        Some(symbol) => client.ticker_24h(symbol).await?,
        None => client.all_tickers_24h().await?,
    };
    Ok(result)
}

async fn order_book(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let query: DepthQuery = decode_args(args)?;
    Ok(client.order_book(&query).await?)
}

async fn recent_trades(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let query: RecentTradesQuery = decode_args(args)?;
    Ok(client.recent_trades(&query).await?)
}

async fn klines(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let query: KlinesQuery = decode_args(args)?;
    Ok(client.klines(&query).await?)
}

async fn avg_price(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let args: RequiredSymbol = decode_args(args)?;
    Ok(client.avg_price(&args.symbol).await?)
}

async fn exchange_info(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let args: OptionalSymbol = decode_args(args)?;
    let result = match args.symbol() {
        Some(symbol) => client.symbol_info(symbol).await?,
        None => client.exchange_info().await?,
    };
    Ok(result)
}

// With a symbol this returns the price ticker; without one, best book
// prices for every symbol. Matches the historical surface.
async fn symbol_ticker(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let args: OptionalSymbol = decode_args(args)?;
    let result = match args.symbol() {
        Some(symbol) => client.ticker_price(symbol).await?,
        None => client.all_book_tickers().await?,
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::StubExchange;
    use serde_json::json;

    #[tokio::test]
    async fn ticker_price_branches_on_symbol_presence() {
        let stub = StubExchange::ok();

        let with = MarketCatalog
            .handle(&stub, "get_ticker_price", json!({"symbol": "BTCUSDT"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(with["symbol"], "BTCUSDT");

        let without = MarketCatalog
            .handle(&stub, "get_ticker_price", json!({}))
            .await
            .unwrap()
            .unwrap();
        assert!(without.is_array());

        // empty string counts as absent
        let empty = MarketCatalog
            .handle(&stub, "get_ticker_price", json!({"symbol": ""}))
            .await
            .unwrap()
            .unwrap();
        assert!(empty.is_array());
    }

    #[tokio::test]
    async fn symbol_ticker_uses_book_tickers_when_symbolless() {
        let stub = StubExchange::ok();

        let without = MarketCatalog
            .handle(&stub, "get_symbol_ticker", json!({}))
            .await
            .unwrap()
            .unwrap();
        assert!(without[0].get("bidPrice").is_some());

        let with = MarketCatalog
            .handle(&stub, "get_symbol_ticker", json!({"symbol": "BTCUSDT"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(with["price"], "50000.00");
    }

    #[tokio::test]
    async fn klines_defaults_interval_and_limit() {
        let stub = StubExchange::ok();
        let result = MarketCatalog
            .handle(&stub, "get_klines", json!({"symbol": "BTCUSDT"}))
            .await
            .unwrap()
            .unwrap();
        let candles = result.as_array().unwrap();
        assert!(candles.len() <= 500);
        for candle in candles {
            let fields = candle.as_array().unwrap();
            assert!(fields.len() >= 11);
            for price in &fields[1..5] {
                let parsed: f64 = price.as_str().unwrap().parse().unwrap();
                assert!(parsed > 0.0);
            }
        }
    }

    #[tokio::test]
    async fn avg_price_requires_symbol() {
        let stub = StubExchange::ok();
        let err = MarketCatalog
            .handle(&stub, "get_avg_price", json!({}))
            .await
            .unwrap()
            .unwrap_err();
        assert!(err.to_string().starts_with("Error: invalid arguments"));
    }

    #[tokio::test]
    async fn unowned_names_are_not_claimed() {
        let stub = StubExchange::ok();
        assert!(MarketCatalog
            .handle(&stub, "get_account_info", json!({}))
            .await
            .is_none());
    }
}
