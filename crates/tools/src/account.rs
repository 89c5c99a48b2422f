use async_trait::async_trait;
use binance_mcp_core::{DividendQuery, ExchangeApi, MyTradesQuery};
use rmcp::model::Tool;
use serde_json::{json, Value};

use crate::catalog::{
    decode_args, object_schema, OptionalSymbol, RequiredAsset, ToolCatalog, ToolError,
};

/// Account management tools (signed endpoints).
pub struct AccountCatalog;

#[async_trait]
impl ToolCatalog for AccountCatalog {
    fn tools(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "get_account_info",
                "Get current account information including balances",
                object_schema(json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                })),
            ),
            Tool::new(
                "get_asset_balance",
                "Get balance for a specific asset",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "asset": {
                            "type": "string",
                            "description": "Asset symbol (e.g., 'BTC', 'USDT')"
                        }
                    },
                    "required": ["asset"]
                })),
            ),
            Tool::new(
                "get_account_trades",
                "Get trades for a specific symbol",
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
                        },
                        "from_id": {
                            "type": "number",
                            "description": "Trade ID to fetch from"
                        }
                    },
                    "required": ["symbol"]
                })),
            ),
            Tool::new(
                "get_account_status",
                "Get account status (normal, margin, futures)",
                object_schema(json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                })),
            ),
            Tool::new(
                "get_trade_fee",
                "Get trade fee for a symbol",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "symbol": {
                            "type": "string",
                            "description": "Trading pair symbol (e.g., 'BTCUSDT')"
                        }
                    },
                    "required": []
                })),
            ),
            Tool::new(
                "get_asset_dividend_history",
                "Get asset dividend history",
                object_schema(json!({
                    "type": "object",
                    "properties": {
                        "asset": {
                            "type": "string",
                            "description": "Asset symbol (e.g., 'BTC')"
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
            "get_account_info" => Some(client.account().await.map_err(ToolError::from)),
            "get_asset_balance" => Some(asset_balance(client, args).await),
            "get_account_trades" => Some(account_trades(client, args).await),
            "get_account_status" => Some(client.account_status().await.map_err(ToolError::from)),
            "get_trade_fee" => Some(trade_fee(client, args).await),
            "get_asset_dividend_history" => Some(dividend_history(client, args).await),
            _ => None,
        }
    }
}

async fn asset_balance(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let args: RequiredAsset = decode_args(args)?;
    Ok(client.asset_balance(&args.asset).await?)
}

async fn account_trades(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let query: MyTradesQuery = decode_args(args)?;
    Ok(client.my_trades(&query).await?)
}

async fn trade_fee(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let args: OptionalSymbol = decode_args(args)?;
    Ok(client.trade_fee(args.symbol()).await?)
}

async fn dividend_history(client: &dyn ExchangeApi, args: Value) -> Result<Value, ToolError> {
    let query: DividendQuery = decode_args(args)?;
    Ok(client.asset_dividend_history(&query).await?)
}
