//! 可观测性模块
//!
//! 提供结构化日志和健康检查。

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::app_state::AppState;
use crate::config::config::LoggingConfig;

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            database: Some("connected".to_string()),
            database_error: None,
        }
    }

    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            status: "degraded".to_string(),
            database: None,
            database_error: Some(error.into()),
        }
    }
}

/// 健康检查
///
/// 数据库不可用时仍返回 200，由 `status` 字段区分。
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = match state.db_pool.ping().await {
        Ok(()) => HealthStatus::ok(),
        Err(e) => {
            warn!(error = %e, "database health check failed");
            HealthStatus::degraded(e.to_string())
        }
    };

    Json(status)
}

// ===== Structured Logging =====

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// 初始化结构化日志
///
/// `RUST_LOG` 优先于配置中的级别。配置了 `log_dir` 时额外写入按天滚动的日志文件，
/// 返回的 guard 需要在进程退出前一直持有。
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "meal-planner.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(env_filter(&config.level));

    let result = if config.structured {
        registry
            .with(fmt::layer().json().with_target(true))
            .with(file_writer.map(|w| fmt::layer().json().with_ansi(false).with_writer(w)))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .with(file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w)))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already initialized: {}", e);
    }

    guard
}
