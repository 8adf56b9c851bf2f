//! 工具调用循环
//!
//! 发送请求，执行响应中的工具调用并追加结果，直到模型给出最终文本或达到轮数上限。

use tracing::debug;

use super::message::{CompletionRequest, CompletionResponse, assistant_tool_calls_message, tool_message};
use super::provider::LlmProvider;
use super::tool::ToolExecutor;
use crate::error::{AppError, Result};

/// 在 `request` 上循环执行模型与工具调用，工具调用轮次和结果原地追加到 `request`
///
/// 超过 `max_iterations` 轮仍在请求工具时返回 [`AppError::ToolLoopExceeded`]，
/// provider 错误直接向上传播。
pub async fn agentic_loop(
    provider: &dyn LlmProvider,
    request: &mut CompletionRequest,
    executor: &dyn ToolExecutor,
    max_iterations: usize,
) -> Result<CompletionResponse> {
    for iteration in 0..max_iterations {
        let response = provider.complete(request).await?;

        if response.tool_calls.is_empty() {
            debug!(iteration, "agentic loop completed with final text response");
            return Ok(response);
        }

        debug!(
            iteration,
            tool_count = response.tool_calls.len(),
            "executing tool calls"
        );

        request.messages.push(assistant_tool_calls_message(
            &response.content,
            response.tool_calls.clone(),
        ));

        for call in &response.tool_calls {
            let result = executor.execute(call).await;
            debug!(
                tool = %call.name,
                call_id = %call.id,
                is_error = result.is_error,
                "tool execution complete"
            );
            request
                .messages
                .push(tool_message(&result.tool_call_id, &result.content));
        }
    }

    Err(AppError::ToolLoopExceeded { max_iterations })
}
