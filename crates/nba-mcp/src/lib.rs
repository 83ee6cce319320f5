//! MCP Server for NBA data
//!
//! This crate exposes a fixed set of read-only NBA lookups (scoreboard,
//! teams, rosters, schedules, players, stats, news) as Model Context Protocol
//! tools. Each call is forwarded to the ESPN public site API and the JSON
//! body is relayed back unchanged apart from pretty-printing.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ server ]  --tools/list-->  [ tools::ToolRegistry ]
//!        |
//!        | tools/call
//!        v
//! [ handlers::Dispatcher ] -- validate --> [ endpoint::Endpoint ] -- URL
//!        |
//!        v
//! [ upstream::UpstreamClient ] --GET--> [ ESPN API ]
//! ```
//!
//! Nothing is cached or persisted; every call is one GET.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod upstream;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use handlers::Dispatcher;
pub use server::NbaMcpServer;
pub use tools::{ToolContent, ToolDefinition, ToolRegistry, ToolResult, get_tool_definitions};
