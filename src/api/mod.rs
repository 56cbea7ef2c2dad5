pub mod client;
pub mod models;
pub mod response;

pub use client::AnthropicClient;
pub use models::RequestBody;

use crate::error::Result;
use crate::models::{Message, ModelResponse, ToolCatalog};
use async_trait::async_trait;

/// The language model the turn processor talks to.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn create_message(
        &self,
        transcript: &[Message],
        tools: &ToolCatalog,
    ) -> Result<ModelResponse>;
}
