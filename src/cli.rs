//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// BTCPayServer MCP server - service discovery and dispatch over stdio
#[derive(Parser, Debug)]
#[command(name = "btcpay-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "BTCPAY_MCP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        default_value = "warn",
        env = "BTCPAY_MCP_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "BTCPAY_MCP_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand (optional - defaults to server mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve MCP over stdin/stdout (default)
    Serve,

    /// Inspect and run capability groups without an MCP client
    #[command(subcommand)]
    Cap(CapCommand),
}

/// Capability subcommands
#[derive(Subcommand, Debug)]
pub enum CapCommand {
    /// List capability groups
    List {
        /// Only groups in this category
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// Describe a group, or one of its operations
    Describe {
        /// Group name (e.g. "invoices")
        #[arg(required = true)]
        group: String,

        /// Operation name (e.g. "create")
        operation: Option<String>,
    },

    /// Execute an operation against the configured BTCPayServer
    Exec {
        /// Group name
        #[arg(required = true)]
        group: String,

        /// Operation name
        #[arg(required = true)]
        operation: String,

        /// JSON arguments to pass to the operation
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}
