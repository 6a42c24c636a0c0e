//! Test utilities for integration tests
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{Value, json};

use banter::core::AppConfig;

/// Config pointing at the mock server with small, predictable
/// prompts so request bodies are easy to spell out.
pub fn test_config(server_url: &str) -> AppConfig {
    AppConfig {
        system_message: "S".to_string(),
        bootstrap_message: "ready?".to_string(),
        token_threshold: 3500,
        poll_interval_ms: 10,
        request_timeout_secs: 5,
        ..AppConfig::new(server_url, "test-key")
    }
}

pub fn completion_body(content: &str, total_tokens: u32) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1677652288,
        "usage": {
            "prompt_tokens": total_tokens / 2,
            "completion_tokens": total_tokens - total_tokens / 2,
            "total_tokens": total_tokens
        },
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop",
            "index": 0
        }]
    })
    .to_string()
}

/// Builds the `messages` array from `(role, content)` pairs.
pub fn messages(turns: &[(&str, &str)]) -> Value {
    Value::Array(
        turns
            .iter()
            .map(|(role, content)| json!({"role": role, "content": content}))
            .collect(),
    )
}

/// Mocks exactly one completion call whose request body must be
/// exactly `expected_messages` for the default chat model.
pub async fn mock_completion(
    server: &mut ServerGuard,
    expected_messages: Value,
    reply: &str,
    total_tokens: u32,
) -> Mock {
    server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::Json(json!({
            "model": "gpt-3.5-turbo",
            "messages": expected_messages,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(reply, total_tokens))
        .expect(1)
        .create_async()
        .await
}
