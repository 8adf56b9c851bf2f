//! 工具调用相关类型
//!
//! 工具内部返回 [`ToolOutcome`]，交给模型前才由 [`ToolOutcome::render`] 转成文本。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 发送给模型的工具定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// 工具名，与执行器的分发表一致
    pub name: String,
    pub description: String,
    /// 参数的 JSON Schema
    pub parameters: serde_json::Value,
}

/// 模型请求的一次工具调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// 由 provider 分配
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// 工具调用结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub content: String,
    pub is_error: bool,
}

/// 工具未能返回数据的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolFailure {
    /// 既没有 `recipe_id` 也没有 `recipe_name`
    MissingIdentifier,
    /// 参数无法解析
    InvalidArguments { tool: String, reason: String },
    /// 工具不存在
    UnknownTool(String),
    /// 查询或连接失败
    Database(String),
}

impl ToolFailure {
    pub fn render(&self) -> String {
        match self {
            ToolFailure::MissingIdentifier => {
                "Error: You must provide either a recipe_id or a recipe_name.".to_string()
            }
            ToolFailure::InvalidArguments { tool, reason } => {
                format!("Error: invalid arguments for {}: {}", tool, reason)
            }
            ToolFailure::UnknownTool(name) => format!("Error: unknown tool '{}'", name),
            ToolFailure::Database(message) => format!("Database Error: {}", message),
        }
    }
}

/// 工具可以交给模型的数据
pub trait ToolPayload {
    /// 查询无结果时的固定文本
    const EMPTY: &'static str;

    fn render(&self) -> String;
}

/// 带标签的工具结果
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome<T> {
    Found(T),
    Empty,
    Error(ToolFailure),
}

impl<T: ToolPayload> ToolOutcome<T> {
    pub fn render(&self) -> String {
        match self {
            ToolOutcome::Found(payload) => payload.render(),
            ToolOutcome::Empty => T::EMPTY.to_string(),
            ToolOutcome::Error(failure) => failure.render(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Error(_))
    }

    pub fn into_result(self, tool_call_id: &str) -> ToolResult {
        ToolResult {
            tool_call_id: tool_call_id.to_string(),
            content: self.render(),
            is_error: self.is_error(),
        }
    }
}

impl<T> ToolOutcome<T> {
    pub fn found(&self) -> Option<&T> {
        match self {
            ToolOutcome::Found(payload) => Some(payload),
            _ => None,
        }
    }
}

/// 工具执行器
///
/// 执行不会失败，所有问题都以文本形式写进 [`ToolResult`] 交还给模型。
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    fn definitions(&self) -> Vec<ToolDefinition>;

    async fn execute(&self, call: &ToolCall) -> ToolResult;
}

/// 不带任何工具，测试中用于只对话的 Agent
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTools;

#[cfg(test)]
#[async_trait]
impl ToolExecutor for NoTools {
    fn definitions(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        ToolResult {
            tool_call_id: call.id.clone(),
            content: ToolFailure::UnknownTool(call.name.clone()).render(),
            is_error: true,
        }
    }
}
