use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "mcp-chat")]
#[command(about = "Chat with a model that can call tools on an MCP server", long_about = None)]
pub struct Args {
    #[arg(help = "MCP server script to launch (.py runs with python, .js with node)")]
    pub server: Option<String>,

    #[arg(long = "model", help = "Model to use")]
    pub model: Option<String>,

    #[arg(
        long = "max-calls",
        help = "Maximum number of model calls for the whole session"
    )]
    pub max_calls: Option<u32>,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        long = "parallel-tools",
        help = "Run the tool calls of one model response concurrently"
    )]
    pub parallel_tools: bool,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:8080/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "config-init", help = "Write an example config file and exit")]
    pub config_init: bool,
}
