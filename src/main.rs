//! BTCPayServer MCP server
//!
//! Three MCP tools in front of the BTCPayServer Greenfield API.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use btcpay_mcp::{
    capability::{Arguments, CapabilityDirectory},
    cli::{CapCommand, Cli, Command},
    config::Config,
    gateway::{Dispatcher, McpServer},
    setup_tracing, transport,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    match cli.command {
        Some(Command::Cap(ref cap_cmd)) => run_cap_command(&cli, cap_cmd).await,
        Some(Command::Serve) | None => run_server(&cli).await,
    }
}

/// Run capability inspection and execution commands
async fn run_cap_command(cli: &Cli, cmd: &CapCommand) -> ExitCode {
    match cmd {
        CapCommand::List { category } => {
            let directory = CapabilityDirectory::offline("listing only");
            let groups = match category {
                Some(c) => directory.list_by_category(c),
                None => directory
                    .categories()
                    .into_iter()
                    .flat_map(|c| directory.list_by_category(c))
                    .collect(),
            };
            if groups.is_empty() {
                println!("No capability groups found");
                return ExitCode::SUCCESS;
            }
            println!("Found {} capability groups:\n", groups.len());
            for group in groups {
                let d = group.describe();
                println!(
                    "  {} [{}] - {} ({} operations)",
                    d.name,
                    d.category,
                    d.description,
                    d.operations.len()
                );
            }
            ExitCode::SUCCESS
        }

        CapCommand::Describe { group, operation } => {
            let directory = CapabilityDirectory::offline("describe only");
            let dispatcher = Dispatcher::new(Arc::new(directory));
            let reply = match operation {
                Some(op) => dispatcher.describe_operation(group, op),
                None => dispatcher.list_capabilities(Some(group)),
            };
            if reply.is_error {
                eprintln!("❌ {}", reply.text);
                return ExitCode::FAILURE;
            }
            println!("{}", reply.text);
            ExitCode::SUCCESS
        }

        CapCommand::Exec {
            group,
            operation,
            args,
        } => {
            let arguments: Arguments = match serde_json::from_str(args) {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("❌ Invalid JSON arguments (expected an object): {e}");
                    return ExitCode::FAILURE;
                }
            };

            let config = match Config::load(cli.config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("❌ Failed to load configuration: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let directory = match CapabilityDirectory::connect(&config.btcpay) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("❌ {e}");
                    return ExitCode::FAILURE;
                }
            };

            let dispatcher = Dispatcher::new(Arc::new(directory))
                .with_default_store(config.btcpay.default_store().map(str::to_string));
            let reply = dispatcher.execute(group, operation, arguments).await;
            if reply.is_error {
                eprintln!("❌ {}", reply.text);
                ExitCode::FAILURE
            } else {
                println!("✅ {}", reply.text);
                ExitCode::SUCCESS
            }
        }
    }
}

/// Run the MCP server on stdio
async fn run_server(cli: &Cli) -> ExitCode {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let server = match CapabilityDirectory::connect(&config.btcpay) {
        Ok(directory) => {
            info!(
                version = env!("CARGO_PKG_VERSION"),
                base_url = %config.btcpay.base_url,
                groups = directory.len(),
                default_store = config.btcpay.default_store().unwrap_or("-"),
                "Starting BTCPayServer MCP server"
            );
            let dispatcher = Dispatcher::new(Arc::new(directory))
                .with_default_store(config.btcpay.default_store().map(str::to_string));
            McpServer::new(dispatcher)
        }
        Err(e) => {
            // Keep serving so the client sees the problem on its first tool call.
            warn!(error = %e, "BTCPayServer is not configured; tool calls will fail");
            let reason = match e {
                btcpay_mcp::Error::Config(message) => message,
                other => other.to_string(),
            };
            McpServer::unconfigured(reason)
        }
    };

    if let Err(e) = transport::serve_stdio(&server).await {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Server shutdown complete");
    ExitCode::SUCCESS
}
