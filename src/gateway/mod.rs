//! Tool surface: dispatcher, MCP request handling and text renderings

mod dispatcher;
mod helpers;
mod server;

pub use dispatcher::{Dispatcher, Reply};
pub use helpers::{TOOL_METHOD_INFO, TOOL_REQUEST, TOOL_SERVICE_INFO};
pub use server::McpServer;
