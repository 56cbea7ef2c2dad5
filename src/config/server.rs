use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::validation::expand_env_vars;
use crate::error::{ChatError, Result};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server script; the interpreter is picked from its extension.
    #[serde(default)]
    pub script: Option<String>,
    /// Explicit launch command. Takes precedence over a script from the
    /// config file, but not over one given on the command line.
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment for the server process, with ${VAR} expansion
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Fully resolved way to start the tool server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerCommand {
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
}

impl ServerCommand {
    /// `.py` scripts run under `python`, `.js` under `node`.
    pub fn for_script(script: &str) -> Result<Self> {
        let extension = Path::new(script)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        let command = match extension {
            "py" => "python",
            "js" => "node",
            _ => {
                return Err(ChatError::ServerCommand(format!(
                    "Server script must be a .py or .js file, got '{}'",
                    script
                )))
            }
        };

        Ok(Self {
            command: command.to_string(),
            args: vec![script.to_string()],
            env: HashMap::new(),
        })
    }

    pub fn display(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ServerConfig {
    /// `override_script` comes from the CLI or environment and wins over
    /// anything in the file.
    pub fn resolve(&self, override_script: Option<&str>, default_script: &str) -> Result<ServerCommand> {
        let mut server = match (override_script, &self.command) {
            (Some(script), _) => ServerCommand::for_script(script)?,
            (None, Some(command)) => ServerCommand {
                command: command.clone(),
                args: self.args.clone(),
                env: HashMap::new(),
            },
            (None, None) => {
                ServerCommand::for_script(self.script.as_deref().unwrap_or(default_script))?
            }
        };

        server.env = expand_env_vars(&self.env);
        Ok(server)
    }
}
