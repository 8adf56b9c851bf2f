//! 服务模块

pub mod chat;
pub mod recipe;
pub mod session;

pub use chat::{ChatService, DEFAULT_SESSION_ID, create_chat_service};
pub use recipe::{RecipeDetailsParams, RecipeTools, SearchRecipesParams, SearchResults};
pub use session::{AgentCache, AgentFactory, DefaultAgentFactory, SharedAgent, create_agent_cache};
