use super::types::{McpTool, McpToolResult, ToolContent};
use crate::models::{ToolCatalog, ToolDefinition, ToolOutput};
use serde_json::Value;

pub fn to_tool_definition(tool: &McpTool) -> ToolDefinition {
    ToolDefinition {
        name: tool.name.clone(),
        description: tool.description.clone().unwrap_or_default(),
        input_schema: tool.input_schema.clone(),
    }
}

pub fn to_tool_catalog(tools: &[McpTool]) -> ToolCatalog {
    tools.iter().map(to_tool_definition).collect::<Vec<_>>().into()
}

/// Convert a tool result's content into what goes back to the model,
/// untruncated.
pub fn to_tool_outputs(result: &McpToolResult) -> Vec<ToolOutput> {
    result.content.iter().map(to_tool_output).collect()
}

fn to_tool_output(content: &ToolContent) -> ToolOutput {
    match (&content.text, content.content_type.as_str()) {
        (Some(text), "text") => ToolOutput::Text { text: text.clone() },
        _ => {
            let raw = serde_json::to_value(content)
                .map(|value| value.to_string())
                .unwrap_or_else(|_| Value::Null.to_string());
            ToolOutput::Text { text: raw }
        }
    }
}
