mod api;
mod defaults;
mod server;
mod validation;

use crate::budget::DEFAULT_MAX_CALLS;
use crate::cli::Args;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub use api::{normalize_endpoint, ApiConfig};
pub use defaults::{DEFAULT_API_ENDPOINT, DEFAULT_MODEL, DEFAULT_SERVER_SCRIPT};
pub use server::{ServerCommand, ServerConfig};
pub use validation::{expand_env_var_in_string, expand_env_vars};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub max_calls: Option<u32>,
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub parallel_tools: Option<bool>,
    #[serde(default)]
    pub tool_markers: Option<bool>,
    #[serde(default)]
    pub quit_token: Option<String>,
}

/// Contents of a config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub system_prompt: Option<String>,
    pub request_delay: Duration,
    pub max_calls: u32,
    pub verbose: bool,
    pub parallel_tools: bool,
    pub tool_markers: bool,
    pub quit_token: String,
    pub server: ServerCommand,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::resolve(args, &file_config, |key| env::var(key).ok())
    }

    /// Merge the sources: CLI args > env vars > config file > defaults.
    pub fn resolve<F>(args: &Args, file_config: &FileConfig, env_var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Only ever read from the environment, never from files
        let api_key = env_var("ANTHROPIC_API_KEY")
            .filter(|key| !key.is_empty())
            .context("ANTHROPIC_API_KEY environment variable not set")?;

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_var("MCP_CHAT_API_ENDPOINT"))
            .or_else(|| file_config.api.endpoint.clone())
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env_var("MCP_CHAT_MODEL"))
            .or_else(|| file_config.model.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_tokens = parse_env::<u32>(&env_var, "MCP_CHAT_MAX_TOKENS")?
            .or(file_config.model.max_tokens)
            .unwrap_or_else(defaults::default_max_tokens);

        let system_prompt = env_var("MCP_CHAT_SYSTEM_PROMPT")
            .or_else(|| file_config.model.system_prompt.clone());

        let request_delay_ms = parse_env::<u64>(&env_var, "MCP_CHAT_REQUEST_DELAY_MS")?
            .or(file_config.api.request_delay_ms)
            .unwrap_or_else(defaults::default_request_delay_ms);

        let max_calls = match args.max_calls {
            Some(max_calls) => max_calls,
            None => parse_env::<u32>(&env_var, "MCP_CHAT_MAX_CALLS")?
                .or(file_config.session.max_calls)
                .unwrap_or(DEFAULT_MAX_CALLS),
        };
        if max_calls == 0 {
            bail!("the model call limit must be at least 1");
        }

        let verbose = args.verbose
            || env_var("MCP_CHAT_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        let parallel_tools =
            args.parallel_tools || file_config.session.parallel_tools.unwrap_or(false);

        let tool_markers = file_config.session.tool_markers.unwrap_or(false);

        let quit_token = file_config
            .session
            .quit_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .unwrap_or_else(defaults::default_quit_token);

        let override_script = args.server.clone().or_else(|| env_var("MCP_CHAT_SERVER"));
        let server = file_config
            .server
            .resolve(override_script.as_deref(), DEFAULT_SERVER_SCRIPT)?;

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            max_tokens,
            system_prompt,
            request_delay: Duration::from_millis(request_delay_ms),
            max_calls,
            verbose,
            parallel_tools,
            tool_markers,
            quit_token,
            server,
        })
    }
}

/// Read a numeric env var. Unset is `None`; set but unparsable is an error.
fn parse_env<T>(env_var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{} is not a number: {}", key, raw))
        })
        .transpose()
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // Current directory first, as a local override
            PathBuf::from(".mcp-chat.yaml"),
            PathBuf::from(".mcp-chat.yml"),
            PathBuf::from(".mcp-chat.json"),
        ];

        if let Some(config_dir) = Self::user_config_dir() {
            paths.push(config_dir.join("mcp-chat.yaml"));
            paths.push(config_dir.join("mcp-chat.yml"));
            paths.push(config_dir.join("mcp-chat.json"));
        }

        paths
    }

    fn user_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("mcp-chat"))
    }

    /// Write an example config to `~/.config/mcp-chat/mcp-chat.yaml`
    /// unless one is already there.
    pub fn init_user_config() -> Result<PathBuf> {
        let config_dir = Self::user_config_dir().context("Could not determine home directory")?;
        let path = config_dir.join("mcp-chat.yaml");
        Self::write_example(&path)?;
        Ok(path)
    }

    pub fn write_example(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            bail!("Config file already exists: {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, EXAMPLE_CONFIG)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

pub const EXAMPLE_CONFIG: &str = r#"# mcp-chat configuration
api:
  endpoint: https://api.anthropic.com/v1
  request_delay_ms: 1000

model:
  default_model: claude-3-5-sonnet-latest
  max_tokens: 1000
  # system_prompt: You are a careful ClickHouse analyst.

session:
  max_calls: 20
  verbose: false
  parallel_tools: false
  tool_markers: false
  quit_token: quit

server:
  script: clickhouse_mcp_server.py
  # command: uv
  # args: ["run", "clickhouse_mcp_server.py"]
  env:
    CLICKHOUSE_HOST: ${CLICKHOUSE_HOST}
"#;
