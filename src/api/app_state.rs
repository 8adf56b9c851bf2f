use crate::services::chat::ChatService;
use crate::storage::pool::DbPool;
use std::sync::Arc;

/// 应用状态，在所有请求间共享
#[derive(Clone)]
pub struct AppState {
    /// 数据库连接池，健康检查使用
    pub db_pool: DbPool,
    /// 对话服务
    pub chat_service: Arc<dyn ChatService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db_pool", &self.db_pool)
            .field("chat_service", &"Arc<dyn ChatService>")
            .finish()
    }
}

impl AppState {
    pub fn new(db_pool: DbPool, chat_service: Box<dyn ChatService>) -> Self {
        Self {
            db_pool,
            chat_service: Arc::from(chat_service),
        }
    }
}
