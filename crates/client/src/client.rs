use async_trait::async_trait;
use binance_mcp_core::*;
use chrono::Utc;
use reqwest::{Method, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::BinanceConfig;
use crate::sign::sign;

/// Error payload Binance returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

/// Binance spot REST client.
///
/// Signed endpoints get a millisecond `timestamp`, an HMAC-SHA256
/// `signature` over the encoded query string, and the `X-MBX-APIKEY`
/// header. Parameters always travel in the query string, for POST and
/// DELETE included, which is what the exchange expects.
pub struct BinanceClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
    api_secret: String,
}

impl BinanceClient {
    pub fn new(config: BinanceConfig) -> Result<Self, ExchangeError> {
        let base = config.base_url().to_string();
        Self::with_base_url(config, base)
    }

    /// Point the client at an explicit base URL (used by tests).
    pub fn with_base_url(
        config: BinanceConfig,
        base_url: impl AsRef<str>,
    ) -> Result<Self, ExchangeError> {
        let base = Url::parse(base_url.as_ref())
            .map_err(|e| ExchangeError::Other(format!("invalid base URL: {}", e)))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ExchangeError::Other(format!("HTTP client init failed: {}", e)))?;
        Ok(Self {
            http,
            base,
            api_key: config.api_key,
            api_secret: config.api_secret,
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ExchangeError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| ExchangeError::Other(format!("invalid endpoint path: {}", e)))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// Unsigned market-data request.
    async fn public_get(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ExchangeError> {
        let url = self.url(path, params)?;
        debug!(%url, "GET (public)");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ExchangeError::Request(e.to_string()))?;
        decode_response(resp).await
    }

    /// Signed request: timestamp + signature in the query string, API key in
    /// the header.
    async fn signed_request(
        &self,
        method: Method,
        path: &str,
        mut params: Vec<(&str, String)>,
    ) -> Result<Value, ExchangeError> {
        params.push(("timestamp", Utc::now().timestamp_millis().to_string()));
        let mut url = self.url(path, &params)?;
        let query = url.query().unwrap_or_default().to_string();
        let signature = sign(&self.api_secret, &query);
        url.query_pairs_mut().append_pair("signature", &signature);

        debug!(%method, path, "signed request");
        let resp = self
            .http
            .request(method, url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await
            .map_err(|e| ExchangeError::Request(e.to_string()))?;
        decode_response(resp).await
    }
}

async fn decode_response(resp: reqwest::Response) -> Result<Value, ExchangeError> {
    let status = resp.status();
    let body = resp
        .bytes()
        .await
        .map_err(|e| ExchangeError::Request(e.to_string()))?;

    if status.is_success() {
        return serde_json::from_slice(&body)
            .map_err(|e| ExchangeError::Request(format!("invalid JSON response: {}", e)));
    }

    // Binance error bodies carry a numeric code and message; anything else
    // is a transport-level failure.
    match serde_json::from_slice::<ApiErrorBody>(&body) {
        Ok(err) => Err(ExchangeError::Api {
            code: err.code,
            message: err.msg,
        }),
        Err(_) => Err(ExchangeError::Request(format!(
            "HTTP {}: {}",
            status,
            String::from_utf8_lossy(&body)
        ))),
    }
}

/// Render a decimal without trailing zeros, the way Binance wants amounts.
fn decimal_param(value: Decimal) -> String {
    value.normalize().to_string()
}

fn order_params(order: &NewOrder, include_stop_price: bool) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("symbol", order.symbol.clone()),
        ("side", order.side.as_str().to_string()),
        ("type", order.order_type.as_str().to_string()),
        ("quantity", decimal_param(order.quantity)),
    ];
    if let Some(price) = order.price {
        params.push(("price", decimal_param(price)));
    }
    if let Some(tif) = order.time_in_force {
        params.push(("timeInForce", tif.as_str().to_string()));
    }
    if include_stop_price {
        if let Some(stop) = order.stop_price {
            params.push(("stopPrice", decimal_param(stop)));
        }
    }
    params
}

fn lookup_params(lookup: &OrderLookup) -> Vec<(&'static str, String)> {
    let mut params = vec![("symbol", lookup.symbol.clone())];
    if let Some(id) = lookup.order_id {
        params.push(("orderId", id.to_string()));
    }
    if let Some(ref id) = lookup.orig_client_order_id {
        params.push(("origClientOrderId", id.clone()));
    }
    params
}

#[async_trait]
impl ExchangeApi for BinanceClient {
    async fn ticker_price(&self, symbol: &str) -> Result<Value, ExchangeError> {
        self.public_get("/api/v3/ticker/price", &[("symbol", symbol.to_string())])
            .await
    }

    async fn all_ticker_prices(&self) -> Result<Value, ExchangeError> {
        self.public_get("/api/v3/ticker/price", &[]).await
    }

    async fn ticker_24h(&self, symbol: &str) -> Result<Value, ExchangeError> {
        self.public_get("/api/v3/ticker/24hr", &[("symbol", symbol.to_string())])
            .await
    }

    async fn all_tickers_24h(&self) -> Result<Value, ExchangeError> {
        self.public_get("/api/v3/ticker/24hr", &[]).await
    }

    async fn order_book(&self, query: &DepthQuery) -> Result<Value, ExchangeError> {
        self.public_get(
            "/api/v3/depth",
            &[
                ("symbol", query.symbol.clone()),
                ("limit", query.limit.to_string()),
            ],
        )
        .await
    }

    async fn recent_trades(&self, query: &RecentTradesQuery) -> Result<Value, ExchangeError> {
        self.public_get(
            "/api/v3/trades",
            &[
                ("symbol", query.symbol.clone()),
                ("limit", query.limit.to_string()),
            ],
        )
        .await
    }

    async fn klines(&self, query: &KlinesQuery) -> Result<Value, ExchangeError> {
        let mut params = vec![
            ("symbol", query.symbol.clone()),
            ("interval", query.interval.clone()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(start) = query.start_time {
            params.push(("startTime", start.to_string()));
        }
        if let Some(end) = query.end_time {
            params.push(("endTime", end.to_string()));
        }
        self.public_get("/api/v3/klines", &params).await
    }

    async fn avg_price(&self, symbol: &str) -> Result<Value, ExchangeError> {
        self.public_get("/api/v3/avgPrice", &[("symbol", symbol.to_string())])
            .await
    }

    async fn exchange_info(&self) -> Result<Value, ExchangeError> {
        self.public_get("/api/v3/exchangeInfo", &[]).await
    }

    async fn symbol_info(&self, symbol: &str) -> Result<Value, ExchangeError> {
        self.public_get("/api/v3/exchangeInfo", &[("symbol", symbol.to_string())])
            .await
    }

    async fn all_book_tickers(&self) -> Result<Value, ExchangeError> {
        self.public_get("/api/v3/ticker/bookTicker", &[]).await
    }

    async fn account(&self) -> Result<Value, ExchangeError> {
        self.signed_request(Method::GET, "/api/v3/account", Vec::new())
            .await
    }

    async fn asset_balance(&self, asset: &str) -> Result<Value, ExchangeError> {
        // Resolved from the account snapshot; there is no per-asset endpoint.
        let account = self.account().await?;
        let found = account
            .get("balances")
            .and_then(Value::as_array)
            .and_then(|balances| {
                balances
                    .iter()
                    .find(|b| b.get("asset").and_then(Value::as_str) == Some(asset))
            })
            .cloned();
        Ok(found.unwrap_or(Value::Null))
    }

    async fn my_trades(&self, query: &MyTradesQuery) -> Result<Value, ExchangeError> {
        let mut params = vec![
            ("symbol", query.symbol.clone()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(from_id) = query.from_id {
            params.push(("fromId", from_id.to_string()));
        }
        self.signed_request(Method::GET, "/api/v3/myTrades", params)
            .await
    }

    async fn account_status(&self) -> Result<Value, ExchangeError> {
        self.signed_request(Method::GET, "/sapi/v1/account/status", Vec::new())
            .await
    }

    async fn trade_fee(&self, symbol: Option<&str>) -> Result<Value, ExchangeError> {
        let mut params = Vec::new();
        if let Some(symbol) = symbol {
            params.push(("symbol", symbol.to_string()));
        }
        self.signed_request(Method::GET, "/sapi/v1/asset/tradeFee", params)
            .await
    }

    async fn asset_dividend_history(&self, query: &DividendQuery) -> Result<Value, ExchangeError> {
        let mut params = Vec::new();
        if let Some(ref asset) = query.asset {
            params.push(("asset", asset.clone()));
        }
        if let Some(start) = query.start_time {
            params.push(("startTime", start.to_string()));
        }
        if let Some(end) = query.end_time {
            params.push(("endTime", end.to_string()));
        }
        self.signed_request(Method::GET, "/sapi/v1/asset/assetDividend", params)
            .await
    }

    async fn create_order(&self, order: &NewOrder) -> Result<Value, ExchangeError> {
        self.signed_request(Method::POST, "/api/v3/order", order_params(order, true))
            .await
    }

    async fn create_test_order(&self, order: &NewOrder) -> Result<Value, ExchangeError> {
        // The test endpoint takes the same shape minus stopPrice.
        self.signed_request(
            Method::POST,
            "/api/v3/order/test",
            order_params(order, false),
        )
        .await
    }

    async fn get_order(&self, lookup: &OrderLookup) -> Result<Value, ExchangeError> {
        self.signed_request(Method::GET, "/api/v3/order", lookup_params(lookup))
            .await
    }

    async fn cancel_order(&self, lookup: &OrderLookup) -> Result<Value, ExchangeError> {
        self.signed_request(Method::DELETE, "/api/v3/order", lookup_params(lookup))
            .await
    }

    async fn open_orders(&self, symbol: Option<&str>) -> Result<Value, ExchangeError> {
        let mut params = Vec::new();
        if let Some(symbol) = symbol {
            params.push(("symbol", symbol.to_string()));
        }
        self.signed_request(Method::GET, "/api/v3/openOrders", params)
            .await
    }

    async fn all_orders(&self, query: &AllOrdersQuery) -> Result<Value, ExchangeError> {
        let mut params = vec![
            ("symbol", query.symbol.clone()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(id) = query.order_id {
            params.push(("orderId", id.to_string()));
        }
        self.signed_request(Method::GET, "/api/v3/allOrders", params)
            .await
    }

    async fn cancel_open_orders(&self, symbol: &str) -> Result<Value, ExchangeError> {
        self.signed_request(
            Method::DELETE,
            "/api/v3/openOrders",
            vec![("symbol", symbol.to_string())],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base: &str) -> BinanceClient {
        let config = BinanceConfig::new("test-key", "test-secret", false).unwrap();
        BinanceClient::with_base_url(config, base).unwrap()
    }

    #[tokio::test]
    async fn order_book_sends_symbol_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/depth"))
            .and(query_param("symbol", "BTCUSDT"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "lastUpdateId": 1027024,
                "bids": [["50000.00", "1.0"]],
                "asks": [["50001.00", "2.0"]],
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let book = client
            .order_book(&DepthQuery {
                symbol: "BTCUSDT".to_string(),
                limit: 10,
            })
            .await
            .unwrap();
        assert_eq!(book["bids"][0][0], "50000.00");
    }

    #[tokio::test]
    async fn error_body_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/avgPrice"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.avg_price("NOTREAL").await.unwrap_err();
        match err {
            ExchangeError::Api { code, ref message } => {
                assert_eq!(code, -1121);
                assert_eq!(message, "Invalid symbol.");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_json_error_maps_to_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.all_ticker_prices().await.unwrap_err();
        assert!(matches!(err, ExchangeError::Request(_)));
        assert!(err.to_string().starts_with("Exchange Request Error:"));
    }

    #[tokio::test]
    async fn signed_request_carries_key_timestamp_and_signature() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/account"))
            .and(header_exists("X-MBX-APIKEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balances": []})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.account().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let query: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(query.iter().any(|(k, _)| k == "timestamp"));
        // signature must be the last pair so it signs everything before it
        assert_eq!(query.last().unwrap().0, "signature");
    }

    #[tokio::test]
    async fn asset_balance_filters_account_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "balances": [
                    {"asset": "BTC", "free": "0.5", "locked": "0.0"},
                    {"asset": "USDT", "free": "1000.0", "locked": "0.0"},
                ],
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let btc = client.asset_balance("BTC").await.unwrap();
        assert_eq!(btc["free"], "0.5");

        let missing = client.asset_balance("DOGE").await.unwrap();
        assert!(missing.is_null());
    }

    #[tokio::test]
    async fn test_order_omits_stop_price() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/order/test"))
            .and(query_param("symbol", "BTCUSDT"))
            .and(query_param("quantity", "0.001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let order = NewOrder {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            quantity: Decimal::new(1, 3),
            price: None,
            time_in_force: None,
            stop_price: Some(Decimal::new(45000, 0)),
        };
        client.create_test_order(&order).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let query = requests[0].url.query().unwrap_or_default();
        assert!(!query.contains("stopPrice"));
        assert!(!query.contains("timeInForce"));
    }
}
