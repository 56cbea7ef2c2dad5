use tracing::{debug, warn};

use crate::error::ChatError;
use crate::mcp::tools::to_tool_outputs;
use crate::mcp::ToolSession;
use crate::models::{ToolCatalog, ToolRequest, ToolResult};
use crate::ui::preview;

const ARGS_PREVIEW_CHARS: usize = 100;
const RESULT_PREVIEW_CHARS: usize = 200;

/// Runs tool requests against the protocol session. Never fails: unknown
/// tools, transport errors and tool-reported errors all come back as an
/// error-tagged [`ToolResult`] the model can react to.
pub struct ToolInvoker<'a, T: ToolSession + ?Sized> {
    session: &'a T,
    catalog: &'a ToolCatalog,
}

impl<'a, T: ToolSession + ?Sized> ToolInvoker<'a, T> {
    pub fn new(session: &'a T, catalog: &'a ToolCatalog) -> Self {
        Self { session, catalog }
    }

    pub async fn invoke(&self, request: &ToolRequest) -> ToolResult {
        debug!(
            tool = %request.name,
            id = %request.id,
            args = %preview(&request.input.to_string(), ARGS_PREVIEW_CHARS),
            "invoking tool"
        );

        if !self.catalog.contains(&request.name) {
            let err = ChatError::UnknownTool(request.name.clone());
            warn!(tool = %request.name, "model requested a tool outside the catalog");
            return ToolResult::error(&request.id, format!("Error: {}", err));
        }

        match self.session.call_tool(&request.name, &request.input).await {
            Ok(result) => {
                let is_error = result.is_error();
                let tool_result = ToolResult {
                    tool_use_id: request.id.clone(),
                    content: to_tool_outputs(&result),
                    is_error,
                };
                debug!(
                    tool = %request.name,
                    is_error,
                    result = %preview(&tool_result.text(), RESULT_PREVIEW_CHARS),
                    "tool finished"
                );
                tool_result
            }
            Err(e) => {
                warn!(tool = %request.name, "tool call failed: {}", e);
                ToolResult::error(&request.id, format!("Error: {}", e))
            }
        }
    }
}
