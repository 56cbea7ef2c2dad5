use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info, warn};

use crate::api::ModelClient;
use crate::error::{ChatError, Result};
use crate::mcp::ToolSession;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use crate::ui::{
    display_banner, display_budget_exhausted, display_error, display_final_response,
    display_partial_output, display_query_header, display_query_summary,
};

/// Why the chat loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
    BudgetExhausted,
}

/// Reads queries line by line and answers each one from a fresh transcript
/// until the user quits, input ends or the call budget runs out.
pub struct ChatLoop<'a, M, T> {
    orchestrator: &'a Orchestrator<M, T>,
    quit_token: String,
}

impl<'a, M: ModelClient, T: ToolSession> ChatLoop<'a, M, T> {
    pub fn new(orchestrator: &'a Orchestrator<M, T>, quit_token: impl Into<String>) -> Self {
        Self {
            orchestrator,
            quit_token: quit_token.into(),
        }
    }

    pub async fn run<R, W>(
        &self,
        session: &mut Session,
        mut input: R,
        out: &mut W,
    ) -> Result<SessionEnd>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        display_banner(out, session.budget.limit(), &self.quit_token)?;

        let mut buf = Vec::new();
        let mut query_count = 0usize;

        loop {
            if session.budget.is_exhausted() {
                display_budget_exhausted(out, session.budget.limit())?;
                return Ok(SessionEnd::BudgetExhausted);
            }

            write!(out, "\nQuery: ")?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                writeln!(out)?;
                return Ok(SessionEnd::EndOfInput);
            }

            // A line that is not UTF-8 is rejected on its own; the session goes on.
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    warn!("discarding input line that is not valid UTF-8: {}", e);
                    display_error(out, "Input is not valid UTF-8; query ignored.")?;
                    continue;
                }
            };

            let query = line.trim();
            if query.eq_ignore_ascii_case(&self.quit_token) {
                writeln!(out, "\nShutting down...")?;
                return Ok(SessionEnd::Quit);
            }
            if query.is_empty() {
                continue;
            }

            query_count += 1;
            display_query_header(out, query_count, query)?;

            match self.orchestrator.process_query(session, query).await {
                Ok(outcome) => {
                    display_final_response(out, &outcome.output)?;
                    display_query_summary(out, &outcome)?;
                }
                Err(e) if e.is_session_fatal() => {
                    if let ChatError::BudgetExceeded { partial_output, .. } = &e {
                        display_partial_output(out, partial_output)?;
                    }
                    info!("{}; ending session", e);
                    display_budget_exhausted(out, session.budget.limit())?;
                    return Ok(SessionEnd::BudgetExhausted);
                }
                Err(e) => {
                    error!(query = query_count, "query failed: {}", e);
                    display_error(out, &e.to_string())?;
                }
            }
        }
    }
}
