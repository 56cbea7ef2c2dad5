use super::{ContentBlock, ToolRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    ToolUse,
    EndTurn,
    MaxTokens,
    StopSequence,
    Other(String),
}

impl StopReason {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("tool_use") => StopReason::ToolUse,
            Some("end_turn") => StopReason::EndTurn,
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            Some(other) => StopReason::Other(other.to_string()),
            None => StopReason::Other("missing".to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StopReason::ToolUse => "tool_use",
            StopReason::EndTurn => "end_turn",
            StopReason::MaxTokens => "max_tokens",
            StopReason::StopSequence => "stop_sequence",
            StopReason::Other(other) => other,
        }
    }
}

/// A single completion returned by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub stop_reason: StopReason,
    pub content: Vec<ContentBlock>,
}

impl ModelResponse {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::ToolUse(_) => None,
        })
    }

    pub fn tool_requests(&self) -> Vec<&ToolRequest> {
        self.content
            .iter()
            .filter_map(ContentBlock::as_tool_request)
            .collect()
    }

    /// True when the model stopped to use tools and actually asked for at
    /// least one.
    pub fn wants_tools(&self) -> bool {
        self.stop_reason == StopReason::ToolUse
            && self.content.iter().any(|block| block.as_tool_request().is_some())
    }
}
