use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::ModelClient;
use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::invoker::ToolInvoker;
use crate::mcp::ToolSession;
use crate::models::{Message, ModelResponse, StopReason, ToolCatalog, ToolRequest, ToolResult};
use crate::session::Session;
use crate::ui::preview;

const TEXT_PREVIEW_CHARS: usize = 150;
const RESULT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct OrchestratorSettings {
    /// Pause before every model call.
    pub request_delay: Duration,
    /// Invoke all tool requests of one response concurrently.
    pub parallel_tools: bool,
    /// Add a `[Tool: name | Args: ...]` line to the output per executed tool.
    pub tool_markers: bool,
}

impl From<&Config> for OrchestratorSettings {
    fn from(config: &Config) -> Self {
        Self {
            request_delay: config.request_delay,
            parallel_tools: config.parallel_tools,
            tool_markers: config.tool_markers,
        }
    }
}

/// What one query produced.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    /// All text the model produced, in order, newline-joined.
    pub output: String,
    pub tool_calls: usize,
    pub model_calls: u32,
    pub calls_used: u32,
    pub calls_limit: u32,
    pub calls_remaining: u32,
}

enum TurnState {
    AwaitingModel(ModelResponse),
    DispatchingTools(ModelResponse),
    Done,
}

#[derive(Default)]
struct Turn {
    output: Vec<String>,
    tool_calls: usize,
    model_calls: u32,
    // Catalog the latest model call was made with.
    catalog: ToolCatalog,
}

/// Drives the model through tool use until it stops asking for tools.
pub struct Orchestrator<M, T> {
    model: M,
    tools: T,
    settings: OrchestratorSettings,
}

impl<M: ModelClient, T: ToolSession> Orchestrator<M, T> {
    pub fn new(model: M, tools: T, settings: OrchestratorSettings) -> Self {
        Self {
            model,
            tools,
            settings,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Answer one query from a fresh transcript.
    ///
    /// Every tool request in a response is answered, in request order, by a
    /// single tool-result message before the model is called again. Only
    /// [`ChatError::BudgetExceeded`] and model transport failures escape;
    /// the former carries the text produced so far.
    pub async fn process_query(&self, session: &mut Session, query: &str) -> Result<QueryOutcome> {
        info!(session = %session.id, "processing query: {}", preview(query, TEXT_PREVIEW_CHARS));
        session.begin_query(query);

        let mut turn = Turn::default();
        let first = self.call_model(session, &mut turn).await?;
        let mut state = TurnState::AwaitingModel(first);

        loop {
            state = match state {
                TurnState::AwaitingModel(response) => {
                    debug!(stop_reason = response.stop_reason.as_str(), "model responded");
                    for text in response.texts() {
                        info!("model says: {}", preview(text, TEXT_PREVIEW_CHARS));
                        turn.output.push(text.to_string());
                    }

                    if response.wants_tools() {
                        TurnState::DispatchingTools(response)
                    } else {
                        if response.stop_reason == StopReason::ToolUse {
                            warn!("stop reason is tool_use but no tool requests were sent; ending turn");
                        }
                        TurnState::Done
                    }
                }
                TurnState::DispatchingTools(response) => {
                    let requests = response.tool_requests();
                    let results = self.dispatch(&requests, &mut turn).await;

                    session.push(Message::Assistant(response.content));
                    session.push(Message::ToolResults(results));

                    info!("sending tool results back to the model");
                    TurnState::AwaitingModel(self.call_model(session, &mut turn).await?)
                }
                TurnState::Done => break,
            };
        }

        let outcome = QueryOutcome {
            output: turn.output.join("\n"),
            tool_calls: turn.tool_calls,
            model_calls: turn.model_calls,
            calls_used: session.budget.used(),
            calls_limit: session.budget.limit(),
            calls_remaining: session.budget.remaining(),
        };
        info!(
            tool_calls = outcome.tool_calls,
            model_calls = outcome.model_calls,
            "query completed, session calls {}/{}",
            outcome.calls_used,
            outcome.calls_limit
        );
        Ok(outcome)
    }

    /// Charge the budget, refresh the catalog and ask the model.
    async fn call_model(&self, session: &mut Session, turn: &mut Turn) -> Result<ModelResponse> {
        if let Err(err) = session.budget.check_and_increment() {
            return Err(match err {
                ChatError::BudgetExceeded { limit, .. } => ChatError::BudgetExceeded {
                    limit,
                    partial_output: turn.output.join("\n"),
                },
                other => other,
            });
        }
        turn.model_calls += 1;
        info!(
            "API call count: {}/{}",
            session.budget.used(),
            session.budget.limit()
        );

        turn.catalog = self.tools.list_tools().await?;
        debug!(tools = ?turn.catalog.names(), "tool catalog refreshed");

        if !self.settings.request_delay.is_zero() {
            tokio::time::sleep(self.settings.request_delay).await;
        }

        self.model
            .create_message(session.transcript(), &turn.catalog)
            .await
    }

    async fn dispatch(&self, requests: &[&ToolRequest], turn: &mut Turn) -> Vec<ToolResult> {
        let invoker = ToolInvoker::new(&self.tools, &turn.catalog);

        // join_all yields results in input order, not completion order.
        let results = if self.settings.parallel_tools {
            join_all(requests.iter().map(|request| invoker.invoke(request))).await
        } else {
            let mut results = Vec::with_capacity(requests.len());
            for request in requests {
                results.push(invoker.invoke(request).await);
            }
            results
        };

        for (request, result) in requests.iter().zip(&results) {
            turn.tool_calls += 1;
            let status = if result.is_error { "failed" } else { "ok" };
            info!(
                "[Tool Call #{}] {} {}: {}",
                turn.tool_calls,
                request.name,
                status,
                preview(&result.text(), RESULT_PREVIEW_CHARS)
            );
            if self.settings.tool_markers {
                turn.output
                    .push(format!("[Tool: {} | Args: {}]", request.name, request.input));
            }
        }

        results
    }
}
