use async_trait::async_trait;
use binance_mcp_core::{ClientProvider, ExchangeApi, ExchangeError};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use crate::client::BinanceClient;
use crate::config::BinanceConfig;

/// Constructs the shared [`BinanceClient`] on first use.
///
/// Credentials are read from the environment at first `get`, not at process
/// start, so discovery-only sessions never need them. Racing first calls
/// settle on a single instance via `OnceCell`; a failed construction (e.g.
/// missing credentials) is not cached and every later call fails the same
/// way until the environment changes.
#[derive(Default)]
pub struct LazyBinanceClient {
    cell: OnceCell<Arc<BinanceClient>>,
}

impl LazyBinanceClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientProvider for LazyBinanceClient {
    async fn get(&self) -> Result<Arc<dyn ExchangeApi>, ExchangeError> {
        let client = self
            .cell
            .get_or_try_init(|| async {
                let config = BinanceConfig::from_env()?;
                info!(testnet = config.testnet, "Initializing Binance client");
                Ok::<_, ExchangeError>(Arc::new(BinanceClient::new(config)?))
            })
            .await?;
        let shared: Arc<dyn ExchangeApi> = client.clone();
        Ok(shared)
    }
}
