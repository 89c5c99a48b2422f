//! MCP host wiring.
//!
//! Bridges the tool dispatcher onto an MCP stdio transport. The dispatcher
//! already renders every outcome as text, so `call_tool` never surfaces a
//! protocol-level error for tool failures.

use binance_mcp_tools::Dispatcher;
use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    transport::stdio,
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};
use serde_json::Value;
use tracing::info;

/// The MCP server: session metadata plus the dispatcher behind
/// `tools/list` and `tools/call`.
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Binance spot exchange tools: market data, account information, and trading."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.dispatcher.list_tools(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request.arguments.map(Value::Object).unwrap_or(Value::Null);
        let text = self.dispatcher.invoke(&request.name, arguments).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

/// Serve the dispatcher over stdio until the host closes the session.
pub async fn serve_stdio(dispatcher: Dispatcher) -> anyhow::Result<()> {
    let service = McpServer::new(dispatcher).serve(stdio()).await?;
    info!("MCP server ready on stdio");
    service.waiting().await?;
    Ok(())
}
