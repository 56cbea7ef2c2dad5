#![allow(dead_code)]

use async_trait::async_trait;
use mcp_chat::api::ModelClient;
use mcp_chat::mcp::types::{McpToolResult, ToolContent};
use mcp_chat::mcp::ToolSession;
use mcp_chat::models::{
    ContentBlock, Message, ModelResponse, StopReason, ToolCatalog, ToolDefinition, ToolRequest,
};
use mcp_chat::orchestrator::{Orchestrator, OrchestratorSettings};
use mcp_chat::{ChatError, Result};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

pub enum Scripted {
    Reply(ModelResponse),
    Fail(String),
}

/// Model that replays a fixed script and records every transcript it was sent.
#[derive(Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<(Vec<Message>, Vec<String>)>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replies(responses: Vec<ModelResponse>) -> Self {
        Self::new(responses.into_iter().map(Scripted::Reply).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Transcript sent on the `index`-th call.
    pub fn transcript(&self, index: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[index].0.clone()
    }

    /// Tool names offered on the `index`-th call.
    pub fn offered_tools(&self, index: usize) -> Vec<String> {
        self.requests.lock().unwrap()[index].1.clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn create_message(
        &self,
        transcript: &[Message],
        tools: &ToolCatalog,
    ) -> Result<ModelResponse> {
        self.requests.lock().unwrap().push((
            transcript.to_vec(),
            tools.names().into_iter().map(String::from).collect(),
        ));
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(ChatError::ApiError {
                status: 500,
                message,
            }),
            None => Err(ChatError::Other("model script exhausted".to_string())),
        }
    }
}

#[derive(Clone)]
pub enum ToolBehavior {
    Ok(String),
    ToolError(String),
    Transport(String),
}

/// Tool server with canned per-tool behaviour and a log of calls.
pub struct FakeTools {
    catalog: Vec<ToolDefinition>,
    behaviors: HashMap<String, ToolBehavior>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, Value)>>,
    list_calls: Mutex<usize>,
}

impl FakeTools {
    pub fn new(tools: &[(&str, ToolBehavior)]) -> Self {
        Self {
            catalog: tools
                .iter()
                .map(|(name, _)| ToolDefinition {
                    name: name.to_string(),
                    description: format!("{} tool", name),
                    input_schema: json!({"type": "object"}),
                })
                .collect(),
            behaviors: tools
                .iter()
                .map(|(name, behavior)| (name.to_string(), behavior.clone()))
                .collect(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
        }
    }

    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|(name, _)| name).collect()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

fn text_content(text: &str) -> ToolContent {
    ToolContent {
        content_type: "text".to_string(),
        text: Some(text.to_string()),
        extra: Map::new(),
    }
}

#[async_trait]
impl ToolSession for FakeTools {
    async fn list_tools(&self) -> Result<ToolCatalog> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(ToolCatalog::new(self.catalog.clone()))
    }

    async fn call_tool(&self, name: &str, arguments: &Value) -> Result<McpToolResult> {
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments.clone()));

        match self.behaviors.get(name) {
            Some(ToolBehavior::Ok(text)) => Ok(McpToolResult {
                content: vec![text_content(text)],
                is_error: None,
            }),
            Some(ToolBehavior::ToolError(text)) => Ok(McpToolResult {
                content: vec![text_content(text)],
                is_error: Some(true),
            }),
            Some(ToolBehavior::Transport(message)) => Err(ChatError::Mcp(message.clone())),
            None => Err(ChatError::UnknownTool(name.to_string())),
        }
    }
}

pub fn text(text: &str) -> ContentBlock {
    ContentBlock::text(text)
}

pub fn tool_use(id: &str, name: &str, input: Value) -> ContentBlock {
    ContentBlock::ToolUse(ToolRequest {
        id: id.to_string(),
        name: name.to_string(),
        input,
    })
}

pub fn end_turn(blocks: Vec<ContentBlock>) -> ModelResponse {
    ModelResponse {
        stop_reason: StopReason::EndTurn,
        content: blocks,
    }
}

pub fn wants_tools(blocks: Vec<ContentBlock>) -> ModelResponse {
    ModelResponse {
        stop_reason: StopReason::ToolUse,
        content: blocks,
    }
}

pub fn orchestrator(
    model: ScriptedModel,
    tools: FakeTools,
) -> Orchestrator<ScriptedModel, FakeTools> {
    Orchestrator::new(model, tools, OrchestratorSettings::default())
}

pub fn clickhouse_tools() -> FakeTools {
    FakeTools::new(&[
        ("list_tables", ToolBehavior::Ok("events, users".to_string())),
        ("run_query", ToolBehavior::Ok("[[42]]".to_string())),
    ])
}
