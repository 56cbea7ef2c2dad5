use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The session ran out of model calls. `partial_output` holds whatever
    /// text the current query had produced before the refused call.
    #[error("API call limit reached! Maximum {limit} calls allowed per session.")]
    BudgetExceeded { limit: u32, partial_output: String },

    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("MCP error: {0}")]
    Mcp(String),

    #[error("Server command error: {0}")]
    ServerCommand(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

impl ChatError {
    /// Only an exhausted budget ends the session; everything else is
    /// reported and the loop moves on to the next query.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, ChatError::BudgetExceeded { .. })
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        ChatError::Other(format!("{:#}", err))
    }
}

impl From<String> for ChatError {
    fn from(msg: String) -> Self {
        ChatError::Other(msg)
    }
}

impl From<&str> for ChatError {
    fn from(msg: &str) -> Self {
        ChatError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
