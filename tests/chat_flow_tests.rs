// End-to-end tests for the chat flow
//
// The HTTP router, session cache, agent loop and recipe tools are wired the
// same way as in main.rs; the model is either an in-process script or a
// wiremock server speaking the OpenAI chat completions protocol.

mod common;

#[cfg(test)]
mod chat_flow_tests {
    use super::common::{seeded_pool, tools_on};
    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use meal_planner::agent::AgentSettings;
    use meal_planner::agent::message::{CompletionRequest, CompletionResponse, Role};
    use meal_planner::agent::openai::OpenAiProvider;
    use meal_planner::agent::prompt::NUTRITIONIST_SYSTEM_PROMPT;
    use meal_planner::agent::provider::LlmProvider;
    use meal_planner::agent::tool::ToolCall;
    use meal_planner::api::{app_state::AppState, create_router};
    use meal_planner::config::config::LlmConfig;
    use meal_planner::error::Result;
    use meal_planner::services::{
        AgentCache, DefaultAgentFactory, create_agent_cache, create_chat_service,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// 先调用 search_recipes，拿到工具结果后把结果原样作为回答
    struct SearchingProvider;

    #[async_trait]
    impl LlmProvider for SearchingProvider {
        fn name(&self) -> &'static str {
            "searching"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
            let last = request.messages.last().expect("at least one message");
            if last.role == Role::Tool {
                return Ok(CompletionResponse {
                    content: format!("Here are some options:\n{}", last.content),
                    ..CompletionResponse::default()
                });
            }

            Ok(CompletionResponse {
                tool_calls: vec![ToolCall {
                    id: format!("call_{}", request.messages.len()),
                    name: "search_recipes".into(),
                    arguments: r#"{"min_protein": 30, "max_calories": 500, "limit": 2}"#.into(),
                }],
                finish_reason: Some("tool_calls".into()),
                ..CompletionResponse::default()
            })
        }
    }

    async fn app_with(provider: Arc<dyn LlmProvider>) -> (Router, Arc<AgentCache>) {
        let pool = seeded_pool().await;
        let factory = DefaultAgentFactory::new(
            NUTRITIONIST_SYSTEM_PROMPT,
            provider,
            Arc::new(tools_on(pool.clone())),
            AgentSettings::default(),
        );
        let agents = create_agent_cache(4, Arc::new(factory));
        let state = AppState::new(pool, create_chat_service(agents.clone()));
        (create_router(state), agents)
    }

    async fn post_chat(app: &Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_chat_uses_search_tool() {
        let (app, agents) = app_with(Arc::new(SearchingProvider)).await;

        let (status, body) = post_chat(
            &app,
            json!({"message": "I want a high protein lunch under 500 calories", "session_id": "u1"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let reply = body["response"].as_str().unwrap();
        assert!(reply.starts_with("Here are some options:"));
        assert!(reply.contains("- [ID: 1] Grilled Chicken Bowl"));
        assert!(reply.contains("- [ID: 2] Salmon Quinoa Plate"));
        assert!(!reply.contains("[ID: 3]"));

        let agent = agents.get_or_create("u1");
        let agent = agent.lock().await;
        assert_eq!(agent.turns(), 1);
        // system, user, assistant tool call, tool result, assistant reply
        assert_eq!(agent.history().len(), 5);
    }

    #[tokio::test]
    async fn test_sessions_keep_separate_history() {
        let (app, agents) = app_with(Arc::new(SearchingProvider)).await;

        post_chat(&app, json!({"message": "first", "session_id": "a"})).await;
        post_chat(&app, json!({"message": "second", "session_id": "a"})).await;
        post_chat(&app, json!({"message": "hello"})).await;

        let a = agents.get_or_create("a");
        assert_eq!(a.lock().await.turns(), 2);

        let default = agents.get_or_create("default");
        assert_eq!(default.lock().await.turns(), 1);
        assert_eq!(agents.session_count(), 2);
    }

    #[tokio::test]
    async fn test_chat_against_openai_compatible_server() {
        let server = MockServer::start().await;

        // 第二次请求带着工具结果，模型给出最终回答
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("\"role\":\"tool\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"content": "Try the Grilled Chicken Bowl: 40g protein, 450 kcal."},
                    "finish_reason": "stop"
                }]
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "content": null,
                        "tool_calls": [{
                            "id": "call_details",
                            "type": "function",
                            "function": {
                                "name": "get_recipe_details",
                                "arguments": "{\"recipe_name\": \"grilled chicken\"}"
                            }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&LlmConfig {
            api_key: "sk-test".into(),
            base_url: format!("{}/v1", server.uri()),
            ..LlmConfig::default()
        })
        .unwrap();
        let (app, _agents) = app_with(Arc::new(provider)).await;

        let (status, body) = post_chat(&app, json!({"message": "What's in the chicken bowl?"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["response"],
            "Try the Grilled Chicken Bowl: 40g protein, 450 kcal."
        );

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
        let tool_result = second["messages"]
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["role"] == "tool")
            .unwrap();
        let detail: Value = serde_json::from_str(tool_result["content"].as_str().unwrap()).unwrap();
        assert_eq!(detail["id"], 1);
        assert_eq!(detail["ingredients"][0], "200g chicken breast");
    }

    #[tokio::test]
    async fn test_provider_outage_returns_sanitized_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided: sk-test"}
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&LlmConfig {
            api_key: "sk-test".into(),
            base_url: server.uri(),
            ..LlmConfig::default()
        })
        .unwrap();
        let (app, agents) = app_with(Arc::new(provider)).await;

        let (status, body) = post_chat(&app, json!({"message": "hi", "session_id": "x"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["detail"].as_str().unwrap().contains("sk-test"));

        // 失败的轮次不写入历史
        let agent = agents.get_or_create("x");
        let agent = agent.lock().await;
        assert_eq!(agent.turns(), 0);
        assert_eq!(agent.history().len(), 1);
    }
}
