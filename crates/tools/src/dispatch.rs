use binance_mcp_core::ClientProvider;
use rmcp::model::Tool;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::account::AccountCatalog;
use crate::catalog::ToolCatalog;
use crate::market::MarketCatalog;
use crate::trading::TradingCatalog;

/// Routes tool invocations to the owning catalog and normalizes every
/// outcome to text.
///
/// Catalogs register in fixed order (market, account, trading); a routing
/// map built from their descriptor lists replaces per-call linear scans.
/// Tool names are unique across catalogs by construction.
pub struct Dispatcher {
    catalogs: Vec<Box<dyn ToolCatalog>>,
    routes: HashMap<String, usize>,
    provider: Arc<dyn ClientProvider>,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn ClientProvider>) -> Self {
        Self::with_catalogs(
            provider,
            vec![
                Box::new(MarketCatalog),
                Box::new(AccountCatalog),
                Box::new(TradingCatalog),
            ],
        )
    }

    fn with_catalogs(provider: Arc<dyn ClientProvider>, catalogs: Vec<Box<dyn ToolCatalog>>) -> Self {
        let mut routes = HashMap::new();
        for (index, catalog) in catalogs.iter().enumerate() {
            for tool in catalog.tools() {
                let previous = routes.insert(tool.name.to_string(), index);
                debug_assert!(previous.is_none(), "duplicate tool name: {}", tool.name);
            }
        }
        Self {
            catalogs,
            routes,
            provider,
        }
    }

    /// Concatenation of all catalogs' descriptors, in catalog order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.catalogs.iter().flat_map(|c| c.tools()).collect()
    }

    /// Run a tool by name. Never fails: unknown names, bad arguments, and
    /// exchange errors all come back as diagnostic text.
    pub async fn invoke(&self, name: &str, arguments: Value) -> String {
        let Some(&index) = self.routes.get(name) else {
            return format!("Unknown tool: {}", name);
        };

        let client = match self.provider.get().await {
            Ok(client) => client,
            Err(e) => {
                warn!(tool = name, error = %e, "client unavailable");
                return e.to_string();
            }
        };

        // Hosts may send no arguments at all; treat that as an empty map.
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        debug!(tool = name, "invoking tool");
        match self.catalogs[index].handle(client.as_ref(), name, arguments).await {
            Some(Ok(result)) => format_response(&result),
            Some(Err(e)) => {
                warn!(tool = name, error = %e, "tool call failed");
                e.to_string()
            }
            None => format!("Unknown tool: {}", name),
        }
    }
}

/// Pretty-printed JSON, matching what hosts show verbatim to the model.
fn format_response(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{MissingConfigProvider, StubExchange, StubProvider};
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(StubProvider(Arc::new(StubExchange::ok()))))
    }

    /// Minimal valid arguments per tool, used to sweep the whole surface.
    fn minimal_args(name: &str) -> Value {
        match name {
            "get_order_book" | "get_recent_trades" | "get_klines" | "get_avg_price"
            | "get_account_trades" | "get_all_orders" | "cancel_all_open_orders"
            | "get_order" | "cancel_order" => json!({"symbol": "BTCUSDT"}),
            "get_asset_balance" => json!({"asset": "BTC"}),
            "create_order" | "create_test_order" => json!({
                "symbol": "BTCUSDT",
                "side": "BUY",
                "type": "MARKET",
                "quantity": 0.001,
            }),
            _ => json!({}),
        }
    }

    #[test]
    fn tool_names_are_unique_across_catalogs() {
        let tools = dispatcher().list_tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 21);
    }

    #[test]
    fn list_tools_is_idempotent() {
        let d = dispatcher();
        let first = serde_json::to_value(d.list_tools()).unwrap();
        let second = serde_json::to_value(d.list_tools()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn every_listed_tool_is_claimed() {
        let d = dispatcher();
        for tool in d.list_tools() {
            let name = tool.name.to_string();
            let out = d.invoke(&name, minimal_args(&name)).await;
            assert!(
                !out.starts_with("Unknown tool:"),
                "{} was not claimed: {}",
                name,
                out
            );
        }
    }

    #[tokio::test]
    async fn unregistered_name_returns_fixed_text() {
        let out = dispatcher().invoke("definitely_not_a_tool", json!({})).await;
        assert_eq!(out, "Unknown tool: definitely_not_a_tool");
    }

    #[tokio::test]
    async fn missing_credentials_surface_as_configuration_error() {
        let d = Dispatcher::new(Arc::new(MissingConfigProvider));
        let out = d.invoke("get_account_info", json!({})).await;
        assert!(out.starts_with("Configuration Error:"), "{}", out);
    }

    #[tokio::test]
    async fn api_errors_are_classified_with_code_and_message() {
        let d = Dispatcher::new(Arc::new(StubProvider(Arc::new(StubExchange::failing(
            -1121,
        )))));
        let out = d
            .invoke("get_ticker_price", json!({"symbol": "NOTREAL"}))
            .await;
        assert!(out.starts_with("Exchange API Error"), "{}", out);
        assert!(out.contains("-1121"));
        assert!(out.contains("Invalid symbol"));
    }

    #[tokio::test]
    async fn ticker_price_renders_symbol_and_price() {
        let out = dispatcher()
            .invoke("get_ticker_price", json!({"symbol": "BTCUSDT"}))
            .await;
        assert!(out.contains("\"symbol\": \"BTCUSDT\""), "{}", out);
        assert!(out.contains("\"price\": \"50000.00\""), "{}", out);
    }

    #[tokio::test]
    async fn order_book_respects_requested_limit() {
        let out = dispatcher()
            .invoke("get_order_book", json!({"symbol": "BTCUSDT", "limit": 10}))
            .await;
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert!(parsed["bids"].as_array().unwrap().len() <= 10);
    }

    #[tokio::test]
    async fn null_arguments_are_treated_as_empty() {
        let out = dispatcher().invoke("get_account_info", Value::Null).await;
        assert!(out.contains("balances"), "{}", out);
    }

    #[tokio::test]
    async fn missing_required_field_is_an_error_not_a_call() {
        let out = dispatcher().invoke("create_order", json!({"side": "BUY"})).await;
        assert!(out.starts_with("Error: invalid arguments"), "{}", out);
    }
}
