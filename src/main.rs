use anyhow::Context;
use meal_planner::agent::AgentSettings;
use meal_planner::agent::openai::OpenAiProvider;
use meal_planner::agent::prompt::NUTRITIONIST_SYSTEM_PROMPT;
use meal_planner::api::{self, app_state::AppState};
use meal_planner::config::loader::ConfigLoader;
use meal_planner::observability::init_tracing;
use meal_planner::services::{
    DefaultAgentFactory, RecipeTools, create_agent_cache, create_chat_service,
};
use meal_planner::storage::{DbPool, RecipeRepository};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    let _ = dotenvy::dotenv();

    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config).context("invalid configuration")?;

    let _log_guard = init_tracing(&config.logging);
    info!(app = %config.app_name, environment = %config.environment, "Starting Meal Planner...");

    if config.llm.api_key.is_empty() {
        warn!("llm.api_key is empty; model requests will be rejected by the provider");
    }

    let db_pool = DbPool::connect(&config.database)
        .await
        .context("failed to create database pool")?;
    db_pool
        .ping()
        .await
        .context("initial database connection check failed")?;
    info!("Database connection pool initialized");

    let tools = RecipeTools::new(RecipeRepository::new(db_pool.clone()), &config.tools);
    let provider = OpenAiProvider::new(&config.llm).context("failed to create model provider")?;
    info!(model = %config.llm.model, base_url = %config.llm.base_url, "Model provider initialized");

    let factory = DefaultAgentFactory::new(
        NUTRITIONIST_SYSTEM_PROMPT,
        Arc::new(provider),
        Arc::new(tools),
        AgentSettings::from(&config.llm),
    );
    let agents = create_agent_cache(config.session.max_sessions, Arc::new(factory));
    let chat_service = create_chat_service(agents.clone());
    info!(capacity = agents.capacity(), "Chat service initialized");

    let app_state = AppState::new(db_pool.clone(), chat_service);
    let router = api::create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
