//! BTCPayServer MCP server library
//!
//! Exposes the BTCPayServer Greenfield API to MCP clients through three tools
//! instead of one tool per endpoint.
//!
//! # Features
//!
//! - **Capability directory**: 21 capability groups, each a data-driven table
//!   of operation descriptors with parameter specs and examples
//! - **Discovery tools**: `get_service_info` and `get_method_info` describe
//!   groups and operations on demand
//! - **Dispatch**: `btcpay_request` validates required parameters, applies
//!   defaults and the configured default store, then calls the API
//! - **Stdio transport**: newline-delimited JSON-RPC 2.0
//!
//! # Protocol Version
//!
//! Negotiates MCP protocol versions 2024-11-05 through 2025-11-25.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod capability;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod remote;
pub mod services;
pub mod transport;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging.
///
/// Logs go to stderr; stdout carries the protocol.
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
