use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub request_delay_ms: Option<u64>,
}

/// Turn a base URL into the full Messages endpoint.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with("/messages") {
        endpoint.to_string()
    } else if endpoint.ends_with("/v1") {
        format!("{}/messages", endpoint)
    } else if endpoint.ends_with("/v1/") {
        format!("{}messages", endpoint)
    } else {
        // Assume it's a base URL without /v1
        format!("{}/v1/messages", endpoint.trim_end_matches('/'))
    }
}
