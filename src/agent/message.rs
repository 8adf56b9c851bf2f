//! 与具体 provider 无关的消息类型

use serde::{Deserialize, Serialize};

use super::tool::{ToolCall, ToolDefinition};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// 单条消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// 仅 `Role::Assistant` 使用
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// 仅 `Role::Tool` 使用，对应的工具调用 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// 发给 provider 的补全请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    /// 按顺序排列，系统提示在最前
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub tools: Vec<ToolDefinition>,
}

/// Token 用量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 补全响应
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// 生成的文本，只请求工具时为空
    pub content: String,
    pub usage: TokenUsage,
    pub tool_calls: Vec<ToolCall>,
    /// 结束原因，如 `"stop"`、`"tool_calls"`
    pub finish_reason: Option<String>,
}

pub fn system_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::System,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: None,
    }
}

pub fn user_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::User,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: None,
    }
}

pub fn assistant_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: None,
    }
}

/// 携带工具调用的 assistant 消息，附带模型同时输出的文本
pub fn assistant_tool_calls_message(content: &str, tool_calls: Vec<ToolCall>) -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: content.to_string(),
        tool_calls,
        tool_call_id: None,
    }
}

pub fn tool_message(tool_call_id: &str, content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::Tool,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: Some(tool_call_id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_message() {
        let msg = tool_message("call_123", "- [ID: 1] Oats");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_123"));
    }

    #[test]
    fn test_assistant_tool_calls_message() {
        let calls = vec![ToolCall {
            id: "call_1".to_string(),
            name: "search_recipes".to_string(),
            arguments: r#"{"min_protein":20}"#.to_string(),
        }];
        let msg = assistant_tool_calls_message("", calls);
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.content.is_empty());
        assert_eq!(msg.tool_calls[0].name, "search_recipes");
    }

    #[test]
    fn test_chat_message_serialization_omits_empty_fields() {
        let json = serde_json::to_string(&user_message("hi")).unwrap();
        assert!(json.contains("\"user\""));
        assert!(!json.contains("tool_calls"));
        assert!(!json.contains("tool_call_id"));
    }
}
