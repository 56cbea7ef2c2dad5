pub mod client;
pub mod tools;
pub mod types;

pub use client::McpClient;
pub use types::{McpToolCall, McpToolResult};

use crate::error::Result;
use crate::models::ToolCatalog;
use async_trait::async_trait;
use serde_json::Value;

/// A live connection to a tool server.
#[async_trait]
pub trait ToolSession: Send + Sync {
    /// Current tool catalog. Must be asked again before every model call
    /// since the server may change its tools between turns.
    async fn list_tools(&self) -> Result<ToolCatalog>;

    /// Run one tool with the arguments exactly as the model produced them.
    async fn call_tool(&self, name: &str, arguments: &Value) -> Result<McpToolResult>;
}
