use serde::Serialize;

use crate::models::{ContentBlock, Message, ToolCatalog, ToolDefinition, ToolResult};

#[derive(Serialize)]
pub struct RequestBody<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    pub messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<&'a [ToolDefinition]>,
}

impl<'a> RequestBody<'a> {
    pub fn new(
        model: &'a str,
        max_tokens: u32,
        system: Option<&'a str>,
        transcript: &'a [Message],
        tools: &'a ToolCatalog,
    ) -> Self {
        Self {
            model,
            max_tokens,
            system,
            messages: transcript.iter().map(WireMessage::from).collect(),
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.tools())
            },
        }
    }
}

#[derive(Serialize)]
pub struct WireMessage<'a> {
    pub role: &'static str,
    pub content: WireContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum WireContent<'a> {
    Text(&'a str),
    Blocks(&'a [ContentBlock]),
    ToolResults(&'a [ToolResult]),
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        let content = match message {
            Message::User(text) => WireContent::Text(text),
            Message::Assistant(blocks) => WireContent::Blocks(blocks),
            Message::ToolResults(results) => WireContent::ToolResults(results),
        };
        Self {
            role: message.role(),
            content,
        }
    }
}
