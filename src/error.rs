//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。
//! 对外只暴露固定的公共错误消息，原始错误细节仅写入服务端日志。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(String),

    /// 模型服务错误
    #[error("模型服务错误: {0}")]
    Llm(String),

    /// 工具调用轮次超限
    #[error("工具调用超过最大轮次: {max_iterations}")]
    ToolLoopExceeded { max_iterations: usize },

    /// 参数验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    /// 返回可以安全展示给客户端的消息
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Llm(_) => "The assistant is temporarily unavailable.".to_string(),
            AppError::ToolLoopExceeded { .. } => {
                "The assistant could not finish answering this request.".to_string()
            }
            AppError::Database(_) => "The recipe database is unavailable.".to_string(),
            _ => "Internal server error.".to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Llm(e.to_string())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status: u16 = (&self).into();
        if status >= 500 {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = Json(ErrorResponse::new(&self.public_message()));
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误详情
    pub detail: String,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(detail: &str) -> Self {
        Self {
            detail: detail.to_string(),
        }
    }
}

/// HTTP 状态码映射
impl From<&AppError> for u16 {
    fn from(err: &AppError) -> u16 {
        match err {
            AppError::Validation(_) => 400,
            _ => 500,
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
