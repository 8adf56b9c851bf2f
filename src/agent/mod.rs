//! Agent 模块
//!
//! 与模型服务交互的对话 Agent：消息类型、工具调用约定、模型提供方
//! 以及驱动工具调用的循环。

pub mod agentic_loop;
pub mod conversation;
pub mod message;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod tool;

pub use conversation::{Agent, AgentSettings};
pub use provider::LlmProvider;
pub use tool::{ToolExecutor, ToolOutcome};
