//! OpenAI 兼容的补全客户端
//!
//! 使用 bearer 认证调用 `POST {base_url}/chat/completions`，OpenAI 及兼容网关均可。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::message::{ChatMessage, CompletionRequest, CompletionResponse, Role, TokenUsage};
use super::provider::LlmProvider;
use super::tool::{ToolCall, ToolDefinition};
use crate::config::config::LlmConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireErrorResponse {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    message: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        let tool_calls = (!msg.tool_calls.is_empty()).then(|| {
            msg.tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    call_type: function_type(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect()
        });

        // 只有工具调用的 assistant 消息 content 为 null
        let content = if msg.role == Role::Assistant && msg.content.is_empty() && tool_calls.is_some()
        {
            None
        } else {
            Some(msg.content.clone())
        };

        Self {
            role: msg.role.as_str(),
            content,
            tool_calls,
            tool_call_id: msg.tool_call_id.clone(),
        }
    }
}

impl From<&ToolDefinition> for WireTool {
    fn from(def: &ToolDefinition) -> Self {
        Self {
            tool_type: "function",
            function: WireFunction {
                name: def.name.clone(),
                description: def.description.clone(),
                parameters: def.parameters.clone(),
            },
        }
    }
}

/// OpenAI 兼容的 LLM provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn build_request(request: &CompletionRequest) -> WireRequest {
        let tools: Vec<WireTool> = request.tools.iter().map(WireTool::from).collect();
        let tool_choice = (!tools.is_empty()).then_some("auto");

        WireRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            tools,
            tool_choice,
        }
    }

    fn parse_error(status: reqwest::StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<WireErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.chars().take(500).collect());
        AppError::Llm(format!("provider returned {}: {}", status, message))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let wire_request = Self::build_request(request);
        debug!(
            model = %wire_request.model,
            messages = wire_request.messages.len(),
            tools = wire_request.tools.len(),
            "sending chat completion request"
        );

        let mut http_request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&wire_request);
        if !self.api_key.is_empty() {
            http_request = http_request.bearer_auth(&self.api_key);
        }

        let response = http_request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, "chat completion request failed");
            return Err(Self::parse_error(status, &body));
        }

        let wire_response: WireResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::Llm(format!("failed to parse provider response: {}", e)))?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("provider returned no choices".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage: wire_response.usage.unwrap_or_default(),
            tool_calls,
            finish_reason: choice.finish_reason,
        })
    }
}
