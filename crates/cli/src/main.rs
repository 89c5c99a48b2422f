use anyhow::Result;
use binance_mcp_client::LazyBinanceClient;
use binance_mcp_tools::Dispatcher;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "binance-mcp")]
#[command(about = "MCP server exposing Binance spot market data, account, and trading tools")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the tool surface to an MCP host over stdio (the default)
    Serve,
    /// List the available tools
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads BINANCE_* or RUST_LOG.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the MCP transport.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let dispatcher = Dispatcher::new(Arc::new(LazyBinanceClient::new()));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!("Starting Binance MCP server");
            binance_mcp_server::serve_stdio(dispatcher).await?;
        }
        Commands::Tools => {
            println!("Available tools:");
            for tool in dispatcher.list_tools() {
                println!(
                    "  {:<26} - {}",
                    tool.name,
                    tool.description.as_deref().unwrap_or("")
                );
            }
        }
    }

    Ok(())
}
