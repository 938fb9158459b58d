//! SplitLedger MCP Server
//!
//! Serves the Splitwise tools to an MCP client over stdio.
//!
//! # Tools
//!
//! - `fetch_friends_data` - friends with their net balances
//! - `get_expenses_last_n_days` - expenses from the last N days
//! - `create_splitwise_expense` - add an expense split equally among participants
//! - `create_splitwise_group` - create a group and add members
//!
//! # Configuration
//!
//! Environment variables (a `.env` file in the working directory is loaded first):
//! - `API_KEY`, `CONSUMER_KEY`, `CONSUMER_SECRET`: Splitwise credentials
//! - `SPLITLEDGER_CONFIG`: Path to config file (default: ~/.config/splitledger/config.yaml)
//! - `RUST_LOG`: Log filter (default: splitledger=info), logs go to stderr
//!
//! # Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "splitwise": {
//!       "command": "splitledger-mcp"
//!     }
//!   }
//! }
//! ```

use std::path::PathBuf;

use rmcp::transport::stdio;
use rmcp::ServiceExt;

use splitledger::config::Config;
use splitledger::logging;
use splitledger::tools::SplitLedgerService;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    logging::init("splitledger=info,splitledger_core=info");

    let config_path = std::env::var("SPLITLEDGER_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path)?;

    if !config.credentials().is_complete() {
        tracing::warn!("Splitwise credentials are incomplete - every tool call will fail");
    }
    tracing::info!("Ledger API: {}", config.base_url.value);

    let service = SplitLedgerService::new(config.build_ledger()?);
    tracing::info!("Starting SplitLedger MCP server");

    let server = service.serve(stdio()).await?;
    server.waiting().await?;

    tracing::info!("SplitLedger MCP server stopped");
    Ok(())
}
