use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the transcript. Order is significant: it is the context the
/// model sees on the next call.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    User(String),
    Assistant(Vec<ContentBlock>),
    /// Every result for the tool requests of the preceding assistant message,
    /// in request order.
    ToolResults(Vec<ToolResult>),
}

impl Message {
    pub fn role(&self) -> &'static str {
        match self {
            Message::User(_) | Message::ToolResults(_) => "user",
            Message::Assistant(_) => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ToolUse(ToolRequest),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_tool_request(&self) -> Option<&ToolRequest> {
        match self {
            ContentBlock::ToolUse(request) => Some(request),
            ContentBlock::Text { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub id: String,
    pub name: String,
    pub input: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "tool_result")]
pub struct ToolResult {
    pub tool_use_id: String,
    pub content: Vec<ToolOutput>,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn error(tool_use_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: vec![ToolOutput::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// All text payloads joined by newlines, for display.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|output| match output {
                ToolOutput::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolOutput {
    Text { text: String },
}
