use binance_mcp_core::ExchangeError;
use serde::{Deserialize, Serialize};

/// Production spot REST endpoint.
pub const MAINNET_URL: &str = "https://api.binance.com";
/// Spot testnet REST endpoint.
pub const TESTNET_URL: &str = "https://testnet.binance.vision";

/// Configuration for connecting to Binance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinanceConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Target the spot testnet instead of production.
    pub testnet: bool,
}

impl BinanceConfig {
    /// Build a config, failing fast when either credential is empty.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        testnet: bool,
    ) -> Result<Self, ExchangeError> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();
        if api_key.is_empty() || api_secret.is_empty() {
            return Err(ExchangeError::Config(missing_credentials_message()));
        }
        Ok(Self {
            api_key,
            api_secret,
            testnet,
        })
    }

    /// Read credentials from `BINANCE_API_KEY` / `BINANCE_API_SECRET` and the
    /// optional `BINANCE_TESTNET` flag (default false).
    pub fn from_env() -> Result<Self, ExchangeError> {
        let api_key = std::env::var("BINANCE_API_KEY").unwrap_or_default();
        let api_secret = std::env::var("BINANCE_API_SECRET").unwrap_or_default();
        let testnet = std::env::var("BINANCE_TESTNET")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self::new(api_key, api_secret, testnet)
    }

    /// REST endpoint for the configured environment.
    pub fn base_url(&self) -> &'static str {
        if self.testnet {
            TESTNET_URL
        } else {
            MAINNET_URL
        }
    }
}

fn missing_credentials_message() -> String {
    "BINANCE_API_KEY and BINANCE_API_SECRET environment variables are required. \
     Get your API keys from: https://www.binance.com/en/my/settings/api-management"
        .to_string()
}
