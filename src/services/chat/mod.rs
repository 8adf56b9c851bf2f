//! 对话服务
//!
//! 解析会话对应的 Agent，转发用户消息并返回回复。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::services::session::AgentCache;

/// 未提供会话 ID 时使用的默认会话
pub const DEFAULT_SESSION_ID: &str = "default";

/// 对话服务 trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// 发送一条消息并返回 Agent 的回复
    async fn chat(&self, session_id: &str, message: &str) -> Result<String>;
}

/// 对话服务实现
pub struct ChatServiceImpl {
    agents: Arc<AgentCache>,
}

impl ChatServiceImpl {
    /// 创建新的服务实例
    pub fn new(agents: Arc<AgentCache>) -> Self {
        Self { agents }
    }
}

/// 空白会话 ID 归一为默认会话，其余按原样作为会话键
pub fn normalize_session_id(session_id: &str) -> &str {
    if session_id.trim().is_empty() {
        DEFAULT_SESSION_ID
    } else {
        session_id
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn chat(&self, session_id: &str, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(AppError::Validation("message must not be empty".to_string()));
        }

        let session_id = normalize_session_id(session_id);
        info!(session_id, message, "chat message received");

        let agent = self.agents.get_or_create(session_id);
        let mut agent = agent.lock().await;
        let reply = agent.run(message).await?;
        debug!(
            session_id,
            turns = agent.turns(),
            history_len = agent.history().len(),
            sessions = self.agents.session_count(),
            "chat turn completed"
        );

        Ok(reply)
    }
}

/// 创建对话服务
pub fn create_chat_service(agents: Arc<AgentCache>) -> Box<dyn ChatService> {
    Box::new(ChatServiceImpl::new(agents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::conversation::AgentSettings;
    use crate::agent::message::{CompletionRequest, CompletionResponse};
    use crate::agent::provider::LlmProvider;
    use crate::agent::tool::NoTools;
    use crate::services::session::DefaultAgentFactory;

    struct CountingProvider;

    #[async_trait]
    impl LlmProvider for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
            Ok(CompletionResponse {
                content: format!("history={}", request.messages.len()),
                ..CompletionResponse::default()
            })
        }
    }

    fn service() -> (ChatServiceImpl, Arc<AgentCache>) {
        let factory = DefaultAgentFactory::new(
            "sys",
            Arc::new(CountingProvider),
            Arc::new(NoTools),
            AgentSettings::default(),
        );
        let cache = Arc::new(AgentCache::new(16, Arc::new(factory)));
        (ChatServiceImpl::new(cache.clone()), cache)
    }

    #[test]
    fn test_normalize_session_id() {
        assert_eq!(normalize_session_id(""), "default");
        assert_eq!(normalize_session_id("   "), "default");
        assert_eq!(normalize_session_id("user-1"), "user-1");
    }

    #[test]
    fn test_session_id_is_kept_verbatim() {
        assert_eq!(normalize_session_id(" alice"), " alice");
        assert_eq!(normalize_session_id("alice "), "alice ");
    }

    #[tokio::test]
    async fn test_session_context_is_reused() {
        let (service, cache) = service();

        assert_eq!(service.chat("u1", "hi").await.unwrap(), "history=2");
        assert_eq!(service.chat("u1", "more").await.unwrap(), "history=4");
        assert_eq!(service.chat("u2", "hi").await.unwrap(), "history=2");
        assert_eq!(service.chat("", "hi").await.unwrap(), "history=2");

        assert_eq!(cache.session_count(), 3);
        assert_eq!(
            cache.get_or_create(DEFAULT_SESSION_ID).lock().await.turns(),
            1
        );
    }

    #[tokio::test]
    async fn test_padded_session_ids_are_distinct_sessions() {
        let (service, cache) = service();

        assert_eq!(service.chat("alice", "hi").await.unwrap(), "history=2");
        assert_eq!(service.chat(" alice", "hi").await.unwrap(), "history=2");
        assert_eq!(service.chat("alice", "again").await.unwrap(), "history=4");

        assert_eq!(cache.session_count(), 2);
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let (service, cache) = service();
        let err = service.chat("u1", "  ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(cache.session_count(), 0);
    }
}
