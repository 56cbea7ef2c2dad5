pub const DEFAULT_API_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";

pub const DEFAULT_SERVER_SCRIPT: &str = "clickhouse_mcp_server.py";

pub fn default_max_tokens() -> u32 {
    1000
}

pub fn default_request_delay_ms() -> u64 {
    1000 // Pace model calls to stay clear of rate limits
}

pub fn default_quit_token() -> String {
    "quit".to_string()
}
