//! MCP Server implementation
//!
//! Routes JSON-RPC messages to the tool registry and dispatcher, and runs
//! the line-delimited stdio loop.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::handlers::Dispatcher;
use crate::protocol::{
    INVALID_PARAMS, INVALID_REQUEST, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, ServerCapabilities,
    ServerInfo, ToolCallParams, ToolsCapability,
};
use crate::tools::{ToolDefinition, ToolRegistry};
use crate::upstream::UpstreamClient;
use crate::{Error, Result};

/// MCP Server for NBA data lookups
///
/// Stateless between calls: the registry is immutable and the dispatcher
/// holds no per-call data, so one instance serves concurrent requests.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use nba_mcp::{NbaMcpServer, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = Arc::new(NbaMcpServer::new(&ServerConfig::default())?);
///     server.run().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct NbaMcpServer {
    registry: Arc<ToolRegistry>,
    dispatcher: Dispatcher,
}

impl NbaMcpServer {
    /// Create a server with the built-in tool catalogue
    pub fn new(config: &ServerConfig) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(ToolRegistry::default());
        let upstream = UpstreamClient::new(config)?;
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::clone(&registry), upstream),
            registry,
        })
    }

    /// Run the MCP server on stdin/stdout until stdin closes
    pub async fn run(self: Arc<Self>) -> Result<()> {
        info!("MCP server ready, listening on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve line-delimited JSON-RPC from `reader`, writing responses to `writer`.
    ///
    /// Every message is handled on its own task, so a slow upstream call does
    /// not hold up the ones behind it. Responses are written by this task
    /// only, one per line, in completion order. When `reader` is exhausted
    /// the in-flight calls are awaited and their responses flushed.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut lines = reader.lines();
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    debug!(request = %line, "Received message");

                    let server = Arc::clone(&self);
                    let tx = tx.clone();
                    tasks.spawn(async move {
                        match server.handle_message(&line).await {
                            Ok(response) if !response.is_empty() => {
                                let _ = tx.send(response);
                            }
                            Ok(_) => {} // No response needed (notifications)
                            Err(e) => warn!(error = %e, "Failed to encode response"),
                        }
                    });
                }
                Some(response) = rx.recv() => {
                    write_line(&mut writer, &response).await?;
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Request task aborted");
                    }
                }
            }
        }

        drop(tx);
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Request task aborted");
            }
        }
        while let Some(response) = rx.recv().await {
            write_line(&mut writer, &response).await?;
        }

        info!("stdin closed, MCP server stopping");
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Parses the JSON-RPC request and dispatches to the appropriate handler.
    ///
    /// # Returns
    ///
    /// The JSON-RPC response as a string, or empty string for notifications.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                return encode(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").cloned().filter(|id| !id.is_null());
        let request = match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) if request.jsonrpc == "2.0" => request,
            Ok(request) => {
                return encode(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid Request: unsupported jsonrpc version '{}'", request.jsonrpc),
                ));
            }
            Err(e) => {
                warn!(error = %e, "Malformed request");
                return encode(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid Request: {}", e),
                ));
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "Notification");
            return Ok(String::new());
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        encode(response)
    }

    /// Handle the initialize request
    ///
    /// Returns server capabilities and info.
    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        if let Ok(params) = serde_json::from_value::<InitializeParams>(params) {
            let client = params.client_info.as_ref().map(|c| format!("{} {}", c.name, c.version));
            info!(
                protocol_version = %params.protocol_version,
                client = client.as_deref().unwrap_or("unknown"),
                "Client initializing"
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "nba-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<Value> = self.registry.list().iter().map(|t| t.to_listing()).collect();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Handle tools/call request
    ///
    /// Tool failures become JSON-RPC errors carrying the code of their kind.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        match self.dispatcher.invoke(&call.name, call.arguments).await {
            Ok(result) => Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?)),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                Ok(JsonRpcResponse::error(id, e.rpc_code(), e.to_string()))
            }
        }
    }

    /// Get available tools
    pub fn tools(&self) -> &[ToolDefinition] {
        self.registry.list()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

fn encode(response: JsonRpcResponse) -> Result<String> {
    serde_json::to_string(&response).map_err(Error::from)
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
