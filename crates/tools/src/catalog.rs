use async_trait::async_trait;
use binance_mcp_core::{ExchangeApi, ExchangeError};
use rmcp::model::{JsonObject, Tool};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Tool Catalog Trait
// ---------------------------------------------------------------------------

/// Errors raised by catalog handlers.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments failed to decode against the tool's contract (missing
    /// required field, wrong type, unknown enum value).
    #[error("Error: invalid arguments: {0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

/// A fixed group of related tools sharing one dispatch function.
#[async_trait]
pub trait ToolCatalog: Send + Sync {
    /// Descriptor list, in stable order, identical on every call.
    fn tools(&self) -> Vec<Tool>;

    /// `None` when `name` does not belong to this catalog; otherwise the
    /// outcome of exactly one exchange call with the decoded arguments.
    async fn handle(
        &self,
        client: &dyn ExchangeApi,
        name: &str,
        args: Value,
    ) -> Option<Result<Value, ToolError>>;
}

// ---------------------------------------------------------------------------
// Shared argument shapes and helpers
// ---------------------------------------------------------------------------

/// Decode tool arguments into a typed struct once, at the boundary.
/// Unknown extra fields are ignored; missing required ones are errors.
pub(crate) fn decode_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Tools that take an optional `symbol` and fall back to the all-symbols
/// variant of the operation.
#[derive(Debug, Deserialize)]
pub(crate) struct OptionalSymbol {
    symbol: Option<String>,
}

impl OptionalSymbol {
    /// An empty string counts as absent, matching the pass-through surface.
    pub(crate) fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RequiredSymbol {
    pub(crate) symbol: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RequiredAsset {
    pub(crate) asset: String,
}

/// Wrap a `json!` object literal for a tool's `inputSchema`.
pub(crate) fn object_schema(value: Value) -> Arc<JsonObject> {
    match value {
        Value::Object(map) => Arc::new(map),
        _ => unreachable!("tool schemas are object literals"),
    }
}
