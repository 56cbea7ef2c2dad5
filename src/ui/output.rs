use colored::*;
use std::io::{self, Write};

use crate::orchestrator::QueryOutcome;

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Shorten `text` to at most `max_chars` characters for logs and console
/// previews. Never applied to anything sent to the model.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn display_banner<W: Write>(out: &mut W, max_calls: u32, quit_token: &str) -> io::Result<()> {
    writeln!(out, "{}", rule().dimmed())?;
    writeln!(out, "{}", "MCP Client Started!".green().bold())?;
    writeln!(out, "Type your queries or '{}' to exit.", quit_token)?;
    writeln!(
        out,
        "{}",
        format!("API Call Limit: {} calls per session", max_calls).yellow()
    )?;
    writeln!(out, "{}", rule().dimmed())
}

pub fn display_query_header<W: Write>(out: &mut W, number: usize, query: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", format!("[Query #{}] {}", number, query).cyan())
}

pub fn display_final_response<W: Write>(out: &mut W, response: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule().dimmed())?;
    writeln!(out, "{}", "FINAL RESPONSE:".green().bold())?;
    writeln!(out, "{}", rule().dimmed())?;
    writeln!(out, "{}", response)
}

pub fn display_query_summary<W: Write>(out: &mut W, outcome: &QueryOutcome) -> io::Result<()> {
    writeln!(out, "{}", rule().dimmed())?;
    writeln!(
        out,
        "{}",
        format!(
            "Query completed. Tool calls: {} | Model calls: {} | Session: {}/{}",
            outcome.tool_calls, outcome.model_calls, outcome.calls_used, outcome.calls_limit
        )
        .dimmed()
    )?;

    if outcome.calls_remaining > 0 {
        writeln!(
            out,
            "{}",
            format!("Remaining API calls: {}", outcome.calls_remaining).yellow()
        )?;
    } else {
        writeln!(
            out,
            "{}",
            "No more API calls available! Session will end after this query.".red()
        )?;
    }
    writeln!(out, "{}", rule().dimmed())
}

/// Text the model produced before the session hit its call limit.
pub fn display_partial_output<W: Write>(out: &mut W, partial: &str) -> io::Result<()> {
    if partial.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{}", "PARTIAL RESPONSE:".yellow().bold())?;
    writeln!(out, "{}", partial)
}

pub fn display_budget_exhausted<W: Write>(out: &mut W, max_calls: u32) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule().dimmed())?;
    writeln!(out, "{}", "API call limit reached!".red().bold())?;
    writeln!(
        out,
        "Maximum of {} API calls per session reached. Session ending. Restart to continue.",
        max_calls
    )?;
    writeln!(out, "{}", rule().dimmed())
}

pub fn display_error<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} {}", "Error:".red(), message)
}
