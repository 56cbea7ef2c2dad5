mod message;
mod response;
mod tool;

pub use message::{ContentBlock, Message, ToolOutput, ToolRequest, ToolResult};
pub use response::{ModelResponse, StopReason};
pub use tool::{ToolCatalog, ToolDefinition};
