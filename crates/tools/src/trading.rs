use async_trait::async_trait;
use binance_mcp_core::{AllOrdersQuery, ExchangeApi, NewOrder, OrderLookup};
use rmcp::model::Tool;
use serde_json::{json, Value};

use crate::catalog::{
    decode_args, object_schema, OptionalSymbol, RequiredSymbol, ToolCatalog, ToolError,
};

/// Trading tools (signed endpoints). `create_order` places real orders on
/// the configured environment.
pub struct TradingCatalog;

#[async_trait]
impl ToolCatalog for TradingCatalog {
    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "create_order",
                "Create a new order (market, limit, etc.)",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        },
                        "side": {
                            "type": "string",
                            "description": "Order side: BUY or SELL",
                            "enum": ["BUY", "SELL"]
                        },
                        "type": {
                            "type": "string",
                            "description": "Order type: LIMIT, MARKET, STOP_LOSS, STOP_LOSS_LIMIT, TAKE_PROFIT, TAKE_PROFIT_LIMIT, LIMIT_MAKER",
                            "enum": ["LIMIT", "MARKET", "STOP_LOSS", "STOP_LOSS_LIMIT", "TAKE_PROFIT", "TAKE_PROFIT_LIMIT", "LIMIT_MAKER"]
                        },
                        "quantity": {
                            "type": "number",
                            "description": "Order quantity"
                        },
                        "price": {
                            "type": "number",
                            "description": "Order price (required for LIMIT orders)"
                        },
                        "time_in_force": {
                            "type": "string",
                            "description": "Time in force: GTC (Good Till Cancel), IOC (Immediate or Cancel), FOK (Fill or Kill)",
                            "enum": ["GTC", "IOC", "FOK"],
                            "default": "GTC"
                        },
                        "stop_price": {
                            "type": "number",
                            "description": "Stop price (for STOP_LOSS and TAKE_PROFIT orders)"
                        }
                    },
                    "required": ["symbol", "side", "type", "quantity"]
                })),
            ),
            Tool::new(
                "create_test_order",
                "Test new order creation without actually placing it",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        },
                        "side": {
                            "type": "string",
                            "description": "Order side: BUY or SELL",
                            "enum": ["BUY", "SELL"]
                        },
                        "type": {
                            "type": "string",
                            "description": "Order type: LIMIT, MARKET, etc.",
                            "enum": ["LIMIT", "MARKET", "STOP_LOSS", "STOP_LOSS_LIMIT", "TAKE_PROFIT", "TAKE_PROFIT_LIMIT", "LIMIT_MAKER"]
                        },
                        "quantity": {
                            "type": "number",
                            "description": "Order quantity"
                        },
                        "price": {
                            "type": "number",
                            "description": "Order price (required for LIMIT orders)"
                        },
                        "time_in_force": {
                            "type": "string",
                            "description": "Time in force",
                            "enum": ["GTC", "IOC", "FOK"],
                            "default": "GTC"
                        }
                    },
                    "required": ["symbol", "side", "type", "quantity"]
                })),
            ),
            Tool::new(
                "get_order",
                "Get details of a specific order",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        },
                        "order_id": {
                            "type": "number",
                            "description": "Order ID"
                        },
                        "orig_client_order_id": {
                            "type": "string",
                            "description": "Original client order ID"
                        }
                    },
                    "required": ["symbol"]
                })),
            ),
            Tool::new(
                "cancel_order",
                "Cancel an active order",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        },
                        "order_id": {
                            "type": "number",
                            "description": "Order ID"
                        },
                        "orig_client_order_id": {
                            "type": "string",
                            "description": "Original client order ID"
                        }
                    },
                    "required": ["symbol"]
                })),
            ),
            Tool::new(
                "get_open_orders",
                "Get all open orders for a symbol or all symbols",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT'). If not provided, returns all open orders"
                        }
                    },
                    "required": []
                })),
            ),
            Tool::new(
                "get_all_orders",
                "Get all orders (active, canceled, or filled) for a symbol",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        },
                        "order_id": {
                            "type": "number",
                            "description": "Order ID to start from"
                        },
                        "limit": {
                            "type": "number",
                            "description": "Number of orders to retrieve (default: 500, max: 1000)",
                            "default": 500
                        }
                    },
                    "required": ["symbol"]
                })),
            ),
            Tool::new(
                "cancel_all_open_orders",
                "Cancel all open orders for a symbol",
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
        ]
    }

    async fn handle(
        &self,
        client: &dyn ExchangeApi,
        name: &str,
        args: Value,
    ) -> Option<Result<Value, ToolError>> {
        match name {
            "create_order" => Some(create_order(client, args).await),
            "create_test_order" => Some(create_test_order(client, args).await),
            "get_order" => Some(get_order(client, args).await),
            "cancel_order" => Some(cancel_order(client, args).await),
            "get_open_orders" => Some(open_orders(client, args).await),
            "get_all_orders" => Some(all_orders(client, args).await),
            "cancel_all_open_orders" => Some(cancel_all(client, args).await),
            _ => None,
        }
    }
}

async fn create_order(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let order: NewOrder = decode_args(args)?;
    Ok(client.create_order(&order).await?)
}

async fn create_test_order(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let order: NewOrder = decode_args(args)?;
    Ok(client.create_test_order(&order).await?)
}

async fn get_order(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let lookup: OrderLookup = decode_args(args)?;
    Ok(client.get_order(&lookup).await?)
}

async fn cancel_order(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let lookup: OrderLookup = decode_args(args)?;
    Ok(client.cancel_order(&lookup).await?)
}

async fn open_orders(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let args: OptionalSymbol = decode_args(args)?;
    Ok(client.open_orders(args.symbol()).await?)
}

async fn all_orders(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let query: AllOrdersQuery = decode_args(args)?;
    Ok(client.all_orders(&query).await?)
}

async fn cancel_all(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let args: RequiredSymbol = decode_args(args)?;
    Ok(client.cancel_open_orders(&args.symbol).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::StubExchange;
    use serde_json::json;

    #[tokio::test]
    async fn create_order_forwards_typed_fields() {
        let stub = StubExchange::ok();
        let result = TradingCatalog
            .handle(
                &stub,
                "create_order",
                json!({
                    "symbol": "BTCUSDT",
                    "side": "BUY",
                    "type": "STOP_LOSS_LIMIT",
                    "quantity": 0.001,
                    "price": 50000,
                    "time_in_force": "IOC",
                    "stop_price": 49500,
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result["side"], "BUY");
        assert_eq!(result["type"], "STOP_LOSS_LIMIT");
        assert_eq!(result["quantity"], "0.001");
        assert_eq!(result["time_in_force"], "IOC");
        assert_eq!(result["stop_price"], "49500");
    }

    #[tokio::test]
    async fn create_order_omits_absent_optionals() {
        let stub = StubExchange::ok();
        let result = TradingCatalog
            .handle(
                &stub,
                "create_order",
                json!({
                    "symbol": "BTCUSDT",
                    "side": "SELL",
                    "type": "MARKET",
                    "quantity": 1,
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result["price"], Value::Null);
        assert_eq!(result["time_in_force"], Value::Null);
        assert_eq!(result["stop_price"], Value::Null);
    }

    #[tokio::test]
    async fn create_order_rejects_missing_required_fields() {
        let stub = StubExchange::ok();
        for missing in ["symbol", "side", "type", "quantity"] {
            let mut args = json!({
                "symbol": "BTCUSDT",
                "side": "BUY",
                "type": "LIMIT",
                "quantity": 1,
            });
            args.as_object_mut().unwrap().remove(missing);
            let err = TradingCatalog
                .handle(&stub, "create_order", args)
                .await
                .unwrap()
                .unwrap_err();
            assert!(
                err.to_string().starts_with("Error: invalid arguments"),
                "field {} should be required",
                missing
            );
        }
    }

    #[tokio::test]
    async fn create_order_rejects_unknown_enum_values() {
        let stub = StubExchange::ok();
        let err = TradingCatalog
            .handle(
                &stub,
                "create_order",
                json!({
                    "symbol": "BTCUSDT",
                    "side": "HOLD",
                    "type": "LIMIT",
                    "quantity": 1,
                }),
            )
            .await
            .unwrap()
            .unwrap_err();
        assert!(err.to_string().starts_with("Error: invalid arguments"));
    }

    #[tokio::test]
    async fn order_lookup_forwards_either_id() {
        let stub = StubExchange::ok();
        let by_id = TradingCatalog
            .handle(
                &stub,
                "cancel_order",
                json!({"symbol": "BTCUSDT", "order_id": 42}),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_id["order_id"], 42);
        assert_eq!(by_id["orig_client_order_id"], Value::Null);

        let by_client_id = TradingCatalog
            .handle(
                &stub,
                "get_order",
                json!({"symbol": "BTCUSDT", "orig_client_order_id": "my-order-1"}),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_client_id["orig_client_order_id"], "my-order-1");
    }

    #[tokio::test]
    async fn all_orders_defaults_limit() {
        let stub = StubExchange::ok();
        let result = TradingCatalog
            .handle(&stub, "get_all_orders", json!({"symbol": "BTCUSDT"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result["limit"], 500);
    }

    #[tokio::test]
    async fn open_orders_branches_on_symbol() {
        let stub = StubExchange::ok();
        let all = TradingCatalog
            .handle(&stub, "get_open_orders", json!({}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(all["symbol"], Value::Null);
    }
}
