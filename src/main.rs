use clap::Parser;
use colored::*;
use std::io;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mcp_chat::api::AnthropicClient;
use mcp_chat::chat::{ChatLoop, SessionEnd};
use mcp_chat::cli::Args;
use mcp_chat::config::{Config, FileConfig};
use mcp_chat::mcp::{McpClient, ToolSession};
use mcp_chat::orchestrator::{Orchestrator, OrchestratorSettings};
use mcp_chat::session::Session;

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "mcp_chat=debug"
    } else {
        "mcp_chat=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.config_init {
        match FileConfig::init_user_config() {
            Ok(path) => {
                println!("{}", format!("Wrote example config to {}", path.display()).green());
                return;
            }
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red(), e);
                process::exit(1);
            }
        }
    }

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    };

    init_logging(config.verbose);

    if let Err(e) = run(config).await {
        error!("{}", e);
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }
}

async fn run(config: Config) -> mcp_chat::Result<()> {
    println!(
        "{}",
        format!("Connecting to MCP server: {}", config.server.display()).cyan()
    );
    let tools = McpClient::connect(&config.server).await?;

    let catalog = tools.list_tools().await?;
    let server_info = tools.server_info();
    println!(
        "{}",
        format!(
            "Connected to {} v{}. Available tools ({}):",
            server_info.name,
            server_info.version,
            catalog.len()
        )
        .green()
    );
    for tool in catalog.tools() {
        println!("  - {}: {}", tool.name.bold(), tool.description.dimmed());
    }

    let model = AnthropicClient::new(&config)?;
    let orchestrator = Orchestrator::new(model, tools, OrchestratorSettings::from(&config));
    let mut session = Session::new(config.max_calls);
    info!(session = %session.id, model = %config.model, "session started");

    let chat = ChatLoop::new(&orchestrator, config.quit_token.clone());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    let result = chat.run(&mut session, stdin, &mut stdout).await;

    println!("{}", "Cleaning up resources...".dimmed());
    orchestrator.tools().shutdown().await?;

    match result? {
        SessionEnd::BudgetExhausted => info!("session ended: call budget exhausted"),
        SessionEnd::Quit | SessionEnd::EndOfInput => info!("session ended"),
    }
    Ok(())
}
