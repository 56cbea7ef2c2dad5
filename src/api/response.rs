use crate::error::{ChatError, Result};
use crate::models::{ContentBlock, ModelResponse, StopReason, ToolRequest};
use serde_json::Value;
use tracing::warn;

/// Parse a Messages API response body.
///
/// An explicit error body or a body that is not a JSON object is rejected.
/// Anything else that is merely incomplete is salvaged: unknown blocks are skipped, tool_use blocks
/// without an id or name are dropped and a missing stop reason counts as a
/// non-tool stop, so the turn ends with whatever text was present.
pub fn parse_model_response(response_json: &Value) -> Result<ModelResponse> {
    if !response_json.is_object() {
        return Err(ChatError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(response_json)
        )));
    }

    if response_json.get("type").and_then(|t| t.as_str()) == Some("error") {
        let message = response_json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        return Err(ChatError::ApiError {
            status: 200,
            message,
        });
    }

    let stop_reason = StopReason::parse(response_json.get("stop_reason").and_then(|s| s.as_str()));

    let content = match response_json.get("content").and_then(|c| c.as_array()) {
        Some(blocks) => blocks.iter().filter_map(parse_content_block).collect(),
        None => {
            warn!("model response has no content array");
            Vec::new()
        }
    };

    Ok(ModelResponse {
        stop_reason,
        content,
    })
}

fn parse_content_block(block: &Value) -> Option<ContentBlock> {
    match block.get("type").and_then(|t| t.as_str()) {
        Some("text") => block
            .get("text")
            .and_then(|t| t.as_str())
            .map(ContentBlock::text),
        Some("tool_use") => {
            let id = block.get("id").and_then(|i| i.as_str());
            let name = block.get("name").and_then(|n| n.as_str());
            match (id, name) {
                (Some(id), Some(name)) => Some(ContentBlock::ToolUse(ToolRequest {
                    id: id.to_string(),
                    name: name.to_string(),
                    input: block
                        .get("input")
                        .cloned()
                        .unwrap_or_else(|| Value::Object(Default::default())),
                })),
                _ => {
                    warn!(?id, ?name, "dropping tool_use block without id or name");
                    None
                }
            }
        }
        other => {
            warn!(block_type = ?other, "skipping unsupported content block");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
