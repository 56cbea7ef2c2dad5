use async_trait::async_trait;
use jsonschema::JSONSchema;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::tools::to_tool_catalog;
use super::types::{
    InitializeResult, McpTool, McpToolCall, McpToolResult, ServerInfo, ToolListResponse,
};
use super::ToolSession;
use crate::config::ServerCommand;
use crate::error::{ChatError, Result};
use crate::models::ToolCatalog;

// MCP Protocol constants
const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const CLIENT_NAME: &str = "mcp-chat";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP client speaking JSON-RPC 2.0 over the stdio of a spawned server.
pub struct McpClient {
    connection: Mutex<Connection>,
    server_info: ServerInfo,
    // Schemas from the last tools/list, used to validate arguments.
    tools: RwLock<HashMap<String, McpTool>>,
}

struct Connection {
    process: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl McpClient {
    /// Spawn the server and run the initialize handshake.
    pub async fn connect(server: &ServerCommand) -> Result<Self> {
        debug!(command = %server.command, args = ?server.args, "spawning MCP server");

        let mut cmd = Command::new(&server.command);
        cmd.args(&server.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // Values may hold credentials, so only keys are logged.
        for (key, value) in &server.env {
            debug!(key = %key, "setting server env var (value hidden)");
            cmd.env(key, value);
        }

        let mut process = cmd.spawn().map_err(|e| {
            ChatError::ServerCommand(format!("failed to start '{}': {}", server.command, e))
        })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| ChatError::Mcp("server stdin unavailable".to_string()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| ChatError::Mcp("server stdout unavailable".to_string()))?;

        let mut connection = Connection {
            process,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 1,
        };

        let init_params = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": CLIENT_NAME,
                "version": CLIENT_VERSION
            }
        });

        let response = connection.request("initialize", Some(init_params)).await?;
        let init_result: InitializeResult = serde_json::from_value(response)?;
        debug!(
            server = %init_result.server_info.name,
            version = %init_result.server_info.version,
            protocol = %init_result.protocol_version,
            "MCP server initialized"
        );
        match &init_result.capabilities.tools {
            Some(tools) => debug!(
                list_changed = tools.list_changed.unwrap_or(false),
                "server advertises tools"
            ),
            None => warn!(
                server = %init_result.server_info.name,
                "server does not advertise the tools capability; tools/list may fail"
            ),
        }

        connection
            .notify("notifications/initialized", None)
            .await?;

        Ok(Self {
            connection: Mutex::new(connection),
            server_info: init_result.server_info,
            tools: RwLock::new(HashMap::new()),
        })
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    async fn fetch_tools(&self) -> Result<Vec<McpTool>> {
        let mut connection = self.connection.lock().await;
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let params = cursor.as_ref().map(|c| json!({ "cursor": c }));
            let response = connection.request("tools/list", params).await?;
            let page: ToolListResponse = serde_json::from_value(response)?;
            tools.extend(page.tools);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(tools)
    }

    fn validate_tool_arguments(&self, tool: &McpTool, arguments: &Value) -> std::result::Result<(), String> {
        let schema = match JSONSchema::compile(&tool.input_schema) {
            Ok(s) => s,
            Err(e) => return Err(format!("Invalid tool schema: {}", e)),
        };

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(error_messages.join("; "));
        }

        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        let mut connection = self.connection.lock().await;
        if let Err(e) = connection.process.kill().await {
            warn!("failed to stop MCP server: {}", e);
        }
        Ok(())
    }
}

#[async_trait]
impl ToolSession for McpClient {
    async fn list_tools(&self) -> Result<ToolCatalog> {
        let tools = self.fetch_tools().await?;
        let catalog = to_tool_catalog(&tools);

        let mut cached = self.tools.write().await;
        cached.clear();
        cached.extend(tools.into_iter().map(|tool| (tool.name.clone(), tool)));

        Ok(catalog)
    }

    async fn call_tool(&self, name: &str, arguments: &Value) -> Result<McpToolResult> {
        {
            let tools = self.tools.read().await;
            if let Some(tool) = tools.get(name) {
                if let Err(validation_errors) = self.validate_tool_arguments(tool, arguments) {
                    return Err(ChatError::Mcp(format!(
                        "Tool '{}' argument validation failed: {}",
                        name, validation_errors
                    )));
                }
            }
        }

        let tool_call = McpToolCall {
            name: name.to_string(),
            arguments: arguments.clone(),
        };

        let mut connection = self.connection.lock().await;
        let response = connection
            .request("tools/call", Some(serde_json::to_value(&tool_call)?))
            .await?;
        let result: McpToolResult = serde_json::from_value(response)?;
        Ok(result)
    }
}

impl Connection {
    async fn request(&mut self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;

        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params.unwrap_or(json!({}))
        });
        self.write_line(&request).await?;

        while let Some(line) = self.stdout.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let response: Value = match serde_json::from_str(&line) {
                Ok(value) => value,
                Err(e) => {
                    warn!("ignoring non-JSON line from MCP server: {}", e);
                    continue;
                }
            };

            // Requests from the server share the id space with our replies.
            if let Some(server_method) = response.get("method").and_then(|m| m.as_str()) {
                self.answer_server_message(server_method, &response).await?;
                continue;
            }

            // Stale replies are skipped.
            if response.get("id") != Some(&json!(id)) {
                continue;
            }

            if let Some(error) = response.get("error") {
                return Err(ChatError::Mcp(error.to_string()));
            }
            return Ok(response.get("result").cloned().unwrap_or(Value::Null));
        }

        Err(ChatError::Mcp(format!(
            "server closed the connection before answering '{}'",
            method
        )))
    }

    /// Answer `ping` with an empty result and anything else with
    /// method-not-found. Notifications get no reply.
    async fn answer_server_message(&mut self, method: &str, message: &Value) -> Result<()> {
        let Some(request_id) = message.get("id").cloned() else {
            debug!(method, "ignoring server notification");
            return Ok(());
        };

        let reply = if method == "ping" {
            json!({ "jsonrpc": "2.0", "id": request_id, "result": {} })
        } else {
            debug!(method, "rejecting unsupported server request");
            json!({
                "jsonrpc": "2.0",
                "id": request_id,
                "error": { "code": -32601, "message": format!("Method not found: {}", method) }
            })
        };
        self.write_line(&reply).await
    }

    async fn notify(&mut self, method: &str, params: Option<Value>) -> Result<()> {
        let notification = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params.unwrap_or(json!({}))
        });
        self.write_line(&notification).await
    }

    async fn write_line(&mut self, message: &Value) -> Result<()> {
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }
}
