//! 会话 Agent
//!
//! 每个会话持有一个 [`Agent`]，Agent 独占自己的对话历史。

use std::sync::Arc;
use tracing::{debug, info};

use super::agentic_loop::agentic_loop;
use super::message::{ChatMessage, CompletionRequest, assistant_message, system_message, user_message};
use super::provider::LlmProvider;
use super::tool::ToolExecutor;
use crate::config::config::LlmConfig;
use crate::error::Result;

/// Agent 运行参数
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub max_tool_iterations: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

impl From<&LlmConfig> for AgentSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_tool_iterations: config.max_tool_iterations,
        }
    }
}

/// 有状态的对话 Agent
pub struct Agent {
    session_id: String,
    history: Vec<ChatMessage>,
    provider: Arc<dyn LlmProvider>,
    tools: Arc<dyn ToolExecutor>,
    settings: AgentSettings,
    turns: usize,
}

impl Agent {
    pub fn new(
        session_id: &str,
        system_prompt: &str,
        provider: Arc<dyn LlmProvider>,
        tools: Arc<dyn ToolExecutor>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            history: vec![system_message(system_prompt)],
            provider,
            tools,
            settings,
            turns: 0,
        }
    }

    /// 对话历史（第一条始终是系统提示词）
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// 已成功完成的轮次数
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// 处理一条用户消息并返回最终回复
    ///
    /// 只有成功的轮次才会写入历史；失败时历史保持不变。
    pub async fn run(&mut self, message: &str) -> Result<String> {
        let mut messages = self.history.clone();
        messages.push(user_message(message));

        let mut request = CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            temperature: Some(self.settings.temperature),
            max_tokens: self.settings.max_tokens,
            tools: self.tools.definitions(),
        };

        let response = agentic_loop(
            self.provider.as_ref(),
            &mut request,
            self.tools.as_ref(),
            self.settings.max_tool_iterations,
        )
        .await?;

        request.messages.push(assistant_message(&response.content));
        self.history = request.messages;
        self.turns += 1;

        debug!(
            session_id = %self.session_id,
            provider = self.provider.name(),
            history_len = self.history.len(),
            total_tokens = response.usage.total_tokens,
            "agent turn committed"
        );
        info!(session_id = %self.session_id, turn = self.turns, "agent replied");

        Ok(response.content)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("session_id", &self.session_id)
            .field("history_len", &self.history.len())
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .field("turns", &self.turns)
            .finish()
    }
}
