//! LLM provider 抽象
//!
//! 实现负责把 [`CompletionRequest`]/[`CompletionResponse`] 转换为具体厂商的协议格式。

use async_trait::async_trait;

use super::message::{CompletionRequest, CompletionResponse};
use crate::error::Result;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// 名称，如 `"openai"`
    fn name(&self) -> &'static str;

    /// 执行一次补全请求
    ///
    /// 网络、接口或解析失败时返回 [`AppError::Llm`](crate::error::AppError::Llm)。
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}
