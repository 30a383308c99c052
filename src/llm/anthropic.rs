// Anthropic Messages API adapter
// Supports plain text replies and tool use (tool_use / tool_result blocks)
// API Reference: https://docs.anthropic.com/en/api/messages

use crate::llm::provider::LLMAdapter;
use crate::types::{
    AppError, AppResult, ContentBlock, LLMMessage, LLMRequest, LLMResponse, MessageContent, StopReason, TokenUsage,
    ToolCall, ToolDefinition,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

// Request types for the Messages API
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [LLMMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

// Response types for the Messages API
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct AnthropicErrorResponse {
    error: AnthropicError,
}

#[derive(Deserialize)]
struct AnthropicError {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

impl AnthropicAdapter {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: crate::config::DEFAULT_ANTHROPIC_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn parse_response(api_response: AnthropicResponse) -> LLMResponse {
        let mut texts = Vec::new();
        let mut tool_calls = Vec::new();

        for block in api_response.content {
            match block {
                AnthropicContentBlock::Text { text } => texts.push(text),
                AnthropicContentBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall { id, name, input });
                }
                AnthropicContentBlock::Other => {}
            }
        }

        let content = if texts.is_empty() { None } else { Some(texts.join("\n")) };
        let usage = TokenUsage {
            prompt_tokens: api_response.usage.input_tokens,
            completion_tokens: api_response.usage.output_tokens,
            total_tokens: api_response.usage.input_tokens + api_response.usage.output_tokens,
        };

        LLMResponse {
            content,
            tool_calls,
            stop_reason: StopReason::from_anthropic(api_response.stop_reason.as_deref().unwrap_or("end_turn")),
            usage,
        }
    }
}

/// Rebuild the assistant turn that requested tools, so tool results can follow it
pub fn assistant_turn(response: &LLMResponse) -> LLMMessage {
    let mut blocks = Vec::new();
    if let Some(text) = response.content.as_ref().filter(|t| !t.is_empty()) {
        blocks.push(ContentBlock::text(text.clone()));
    }
    for call in &response.tool_calls {
        blocks.push(ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        });
    }
    if blocks.is_empty() {
        return LLMMessage {
            role: "assistant".to_string(),
            content: MessageContent::Text(String::new()),
        };
    }
    LLMMessage::assistant_blocks(blocks)
}

#[async_trait]
impl LLMAdapter for AnthropicAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let url = format!("{}/v1/messages", self.base_url);

        let body = AnthropicRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: request.system_instruction.as_deref(),
            messages: &request.messages,
            tools: &request.tools,
            temperature: request.temperature,
        };

        debug!(
            model = %request.model,
            message_count = request.messages.len(),
            tool_count = request.tools.len(),
            "Sending Anthropic request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMApi(format!("Anthropic request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<AnthropicErrorResponse>(&error_text) {
                return Err(AppError::LLMApi(format!(
                    "Anthropic API error ({}): {} ({})",
                    status, error_response.error.message, error_response.error.error_type
                )));
            }

            return Err(AppError::LLMApi(format!("Anthropic API error ({}): {}", status, error_text)));
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMApi(format!("Failed to parse Anthropic response: {}", e)))?;

        let parsed = Self::parse_response(api_response);
        debug!(
            stop_reason = ?parsed.stop_reason,
            tool_calls = parsed.tool_calls.len(),
            total_tokens = parsed.usage.total_tokens,
            "Anthropic response received"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tools: Vec<ToolDefinition>) -> LLMRequest {
        LLMRequest {
            model: "claude-3-7-sonnet-latest".to_string(),
            messages: vec![LLMMessage::user("Plan a trip to Jeju Island")],
            tools,
            max_tokens: 1024,
            temperature: None,
            system_instruction: Some("You are a travel researcher.".to_string()),
        }
    }

    #[test]
    fn test_request_body_omits_empty_tools() {
        let req = request(vec![]);
        let body = AnthropicRequest {
            model: &req.model,
            max_tokens: req.max_tokens,
            system: req.system_instruction.as_deref(),
            messages: &req.messages,
            tools: &req.tools,
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("temperature").is_none());
        assert_eq!(json["system"], "You are a travel researcher.");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Plan a trip to Jeju Island");
    }

    #[test]
    fn test_assistant_turn_keeps_tool_use_blocks() {
        let response = LLMResponse {
            content: Some("Let me search.".to_string()),
            tool_calls: vec![ToolCall {
                id: "toolu_1".to_string(),
                name: "tavily_search".to_string(),
                input: serde_json::json!({"query": "Jeju food"}),
            }],
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage::default(),
        };
        let turn = serde_json::to_value(assistant_turn(&response)).unwrap();
        assert_eq!(turn["role"], "assistant");
        assert_eq!(turn["content"][0]["type"], "text");
        assert_eq!(turn["content"][1]["type"], "tool_use");
        assert_eq!(turn["content"][1]["id"], "toolu_1");
    }

    #[tokio::test]
    async fn test_create_chat_completion_parses_tool_use() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "sk-ant-test")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::PartialJson(serde_json::json!({"model": "claude-3-7-sonnet-latest"})),
                mockito::Matcher::Regex(r#""name":"tavily_search""#.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "id": "msg_1",
                    "type": "message",
                    "role": "assistant",
                    "content": [
                        {"type": "text", "text": "Searching now."},
                        {"type": "tool_use", "id": "toolu_1", "name": "tavily_search", "input": {"query": "Jeju"}}
                    ],
                    "stop_reason": "tool_use",
                    "usage": {"input_tokens": 120, "output_tokens": 30}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let adapter = AnthropicAdapter::new("sk-ant-test").with_base_url(&server.url());
        let response = adapter
            .create_chat_completion(&request(vec![crate::search::tool::definition()]))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.content.as_deref(), Some("Searching now."));
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].input["query"], "Jeju");
        assert_eq!(response.usage.total_tokens, 150);
    }

    #[tokio::test]
    async fn test_create_chat_completion_maps_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#)
            .create_async()
            .await;

        let adapter = AnthropicAdapter::new("bad").with_base_url(&server.url());
        let err = adapter.create_chat_completion(&request(vec![])).await.unwrap_err();

        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("invalid x-api-key"));
        assert!(text.contains("authentication_error"));
    }
}
