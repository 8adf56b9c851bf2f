use crate::config::config::DatabaseConfig;
use sqlx::any::{AnyPoolOptions, install_default_drivers};
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool};
use std::time::Duration;

/// 关系库连接池
///
/// 通过 `sqlx` 的 `Any` 驱动同时支持 PostgreSQL 与 SQLite，
/// 每次工具调用从池中取出一个连接，作用域结束即归还。
#[derive(Clone)]
pub struct DbPool {
    pool: AnyPool,
}

impl DbPool {
    /// 创建新的连接池
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        install_default_drivers();

        let idle_timeout = match config.idle_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let pool = AnyPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout))
            .idle_timeout(idle_timeout)
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// 获取连接
    pub async fn acquire(&self) -> Result<PoolConnection<Any>, sqlx::Error> {
        self.pool.acquire().await
    }

    /// 执行 `SELECT 1` 探测数据库是否可用
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    /// 关闭连接
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl std::fmt::Debug for DbPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbPool")
            .field("size", &self.pool.size())
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}
