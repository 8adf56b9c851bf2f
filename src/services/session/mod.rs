//! 会话 Agent 缓存
//!
//! 会话 ID 到 Agent 的映射，容量有限，超出时淘汰最久未使用的会话。
//! 每个 Agent 带一把独立的异步锁，同一会话的并发请求排队执行，
//! 不同会话互不阻塞。

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

use crate::agent::conversation::{Agent, AgentSettings};
use crate::agent::provider::LlmProvider;
use crate::agent::tool::ToolExecutor;

/// 可在请求间共享的会话 Agent
pub type SharedAgent = Arc<tokio::sync::Mutex<Agent>>;

/// Agent 工厂
pub trait AgentFactory: Send + Sync {
    fn create(&self, session_id: &str) -> Agent;
}

/// 使用固定提示词、工具集和模型服务创建 Agent
pub struct DefaultAgentFactory {
    system_prompt: String,
    provider: Arc<dyn LlmProvider>,
    tools: Arc<dyn ToolExecutor>,
    settings: AgentSettings,
}

impl DefaultAgentFactory {
    pub fn new(
        system_prompt: &str,
        provider: Arc<dyn LlmProvider>,
        tools: Arc<dyn ToolExecutor>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            system_prompt: system_prompt.to_string(),
            provider,
            tools,
            settings,
        }
    }
}

impl AgentFactory for DefaultAgentFactory {
    fn create(&self, session_id: &str) -> Agent {
        Agent::new(
            session_id,
            &self.system_prompt,
            self.provider.clone(),
            self.tools.clone(),
            self.settings.clone(),
        )
    }
}

/// 会话 Agent 缓存
pub struct AgentCache {
    agents: Mutex<LruCache<String, SharedAgent>>,
    factory: Arc<dyn AgentFactory>,
}

impl AgentCache {
    /// 默认容量
    pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// 创建新的缓存，容量为 0 时使用默认容量
    pub fn new(capacity: usize, factory: Arc<dyn AgentFactory>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            agents: Mutex::new(LruCache::new(capacity)),
            factory,
        }
    }

    /// 获取会话的 Agent，不存在时创建
    ///
    /// 同一会话 ID 在被淘汰前始终返回同一个实例。
    pub fn get_or_create(&self, session_id: &str) -> SharedAgent {
        let mut agents = self.agents.lock();

        if let Some(agent) = agents.get(session_id) {
            return agent.clone();
        }

        let agent: SharedAgent = Arc::new(tokio::sync::Mutex::new(self.factory.create(session_id)));
        if let Some((evicted, _)) = agents.push(session_id.to_string(), agent.clone()) {
            if evicted != session_id {
                debug!(session_id = %evicted, "evicted least recently used session");
            }
        }
        debug!(session_id, sessions = agents.len(), "created session agent");

        agent
    }

    /// 当前缓存的会话数
    pub fn session_count(&self) -> usize {
        self.agents.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.agents.lock().cap().get()
    }
}

impl std::fmt::Debug for AgentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let agents = self.agents.lock();
        f.debug_struct("AgentCache")
            .field("len", &agents.len())
            .field("capacity", &agents.cap())
            .finish()
    }
}

/// 创建会话 Agent 缓存
pub fn create_agent_cache(capacity: usize, factory: Arc<dyn AgentFactory>) -> Arc<AgentCache> {
    Arc::new(AgentCache::new(capacity, factory))
}
