use mcp_chat::api::response::parse_model_response;
use mcp_chat::api::RequestBody;
use mcp_chat::models::{
    ContentBlock, Message, StopReason, ToolCatalog, ToolDefinition, ToolRequest, ToolResult,
};
use mcp_chat::ChatError;
use serde_json::json;

#[test]
fn test_parse_text_and_tool_use() {
    let response = json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "stop_reason": "tool_use",
        "content": [
            {"type": "text", "text": "Let me check."},
            {"type": "tool_use", "id": "toolu_1", "name": "get_tables", "input": {}}
        ]
    });

    let parsed = parse_model_response(&response).unwrap();
    assert_eq!(parsed.stop_reason, StopReason::ToolUse);
    assert!(parsed.wants_tools());
    assert_eq!(parsed.texts().collect::<Vec<_>>(), vec!["Let me check."]);
    assert_eq!(parsed.tool_requests()[0].name, "get_tables");
    assert_eq!(parsed.tool_requests()[0].input, json!({}));
}

#[test]
fn test_parse_end_turn() {
    let response = json!({
        "stop_reason": "end_turn",
        "content": [{"type": "text", "text": "Done."}]
    });

    let parsed = parse_model_response(&response).unwrap();
    assert_eq!(parsed.stop_reason, StopReason::EndTurn);
    assert!(!parsed.wants_tools());
}

#[test]
fn test_parse_missing_fields_fails_closed() {
    let response = json!({"type": "message"});

    let parsed = parse_model_response(&response).unwrap();
    assert!(parsed.content.is_empty());
    assert_ne!(parsed.stop_reason, StopReason::ToolUse);
    assert!(!parsed.wants_tools());
}

#[test]
fn test_parse_drops_incomplete_tool_use() {
    let response = json!({
        "stop_reason": "tool_use",
        "content": [
            {"type": "text", "text": "Trying."},
            {"type": "tool_use", "name": "execute_query", "input": {"query": "SELECT 1"}},
            {"type": "thinking", "thinking": "hmm"}
        ]
    });

    let parsed = parse_model_response(&response).unwrap();
    assert_eq!(parsed.content, vec![ContentBlock::text("Trying.")]);
    assert!(!parsed.wants_tools());
}

#[test]
fn test_parse_tool_use_without_input() {
    let response = json!({
        "stop_reason": "tool_use",
        "content": [{"type": "tool_use", "id": "toolu_9", "name": "get_tables"}]
    });

    let parsed = parse_model_response(&response).unwrap();
    assert_eq!(parsed.tool_requests()[0].input, json!({}));
}

#[test]
fn test_parse_error_body() {
    let response = json!({
        "type": "error",
        "error": {"type": "overloaded_error", "message": "Overloaded"}
    });

    match parse_model_response(&response) {
        Err(ChatError::ApiError { message, .. }) => assert_eq!(message, "Overloaded"),
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[test]
fn test_parse_rejects_non_object_body() {
    let response = json!(["not", "a", "message"]);

    match parse_model_response(&response) {
        Err(ChatError::MalformedResponse(message)) => assert!(message.contains("an array")),
        other => panic!("expected MalformedResponse, got {:?}", other),
    }
}

#[test]
fn test_unknown_stop_reason_is_kept() {
    let response = json!({"stop_reason": "refusal", "content": []});

    let parsed = parse_model_response(&response).unwrap();
    assert_eq!(parsed.stop_reason, StopReason::Other("refusal".to_string()));
}

#[test]
fn test_request_body_wire_format() {
    let transcript = vec![
        Message::User("list tables".to_string()),
        Message::Assistant(vec![
            ContentBlock::text("Checking."),
            ContentBlock::ToolUse(ToolRequest {
                id: "toolu_1".to_string(),
                name: "get_tables".to_string(),
                input: json!({}),
            }),
        ]),
        Message::ToolResults(vec![
            ToolResult::error("toolu_1", "Error: connection refused"),
        ]),
    ];
    let catalog = ToolCatalog::new(vec![ToolDefinition {
        name: "get_tables".to_string(),
        description: "Get all tables".to_string(),
        input_schema: json!({"type": "object", "properties": {}}),
    }]);

    let body = RequestBody::new("claude-test", 1000, Some("Be brief."), &transcript, &catalog);
    let value = serde_json::to_value(&body).unwrap();

    assert_eq!(
        value,
        json!({
            "model": "claude-test",
            "max_tokens": 1000,
            "system": "Be brief.",
            "messages": [
                {"role": "user", "content": "list tables"},
                {"role": "assistant", "content": [
                    {"type": "text", "text": "Checking."},
                    {"type": "tool_use", "id": "toolu_1", "name": "get_tables", "input": {}}
                ]},
                {"role": "user", "content": [
                    {
                        "type": "tool_result",
                        "tool_use_id": "toolu_1",
                        "content": [{"type": "text", "text": "Error: connection refused"}],
                        "is_error": true
                    }
                ]}
            ],
            "tools": [
                {
                    "name": "get_tables",
                    "description": "Get all tables",
                    "input_schema": {"type": "object", "properties": {}}
                }
            ]
        })
    );
}

#[test]
fn test_request_body_omits_empty_tools_and_system() {
    let transcript = vec![Message::User("hi".to_string())];
    let catalog = ToolCatalog::default();

    let body = RequestBody::new("claude-test", 1000, None, &transcript, &catalog);
    let value = serde_json::to_value(&body).unwrap();

    assert!(value.get("tools").is_none());
    assert!(value.get("system").is_none());
}
