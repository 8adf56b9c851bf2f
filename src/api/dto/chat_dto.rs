//! 对话 DTO

use serde::{Deserialize, Serialize};

use crate::services::chat::DEFAULT_SESSION_ID;

/// 对话请求
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// 用户消息
    pub message: String,
    /// 会话 ID，缺省为 "default"
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

/// 对话响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(request.session_id, "default");

        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "session_id": "user-1"}"#).unwrap();
        assert_eq!(request.session_id, "user-1");
    }

    #[test]
    fn test_message_is_required() {
        assert!(serde_json::from_str::<ChatRequest>(r#"{"session_id": "x"}"#).is_err());
    }
}
