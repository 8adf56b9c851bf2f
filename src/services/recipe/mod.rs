//! 食谱查询工具
//!
//! 提供给 Agent 的两个只读工具：按营养素搜索食谱、获取食谱详情。
//! 工具从不向外抛出错误，所有结果最终都渲染成文本交给模型。

mod params;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::agent::tool::{
    ToolCall, ToolDefinition, ToolExecutor, ToolFailure, ToolOutcome, ToolPayload, ToolResult,
};
use crate::config::config::ToolsConfig;
use crate::models::recipe::{RecipeDetail, RecipeSummary};
use crate::storage::repository::RecipeRepository;

pub use params::{RecipeDetailsParams, SearchRecipesParams};

pub const SEARCH_RECIPES: &str = "search_recipes";
pub const GET_RECIPE_DETAILS: &str = "get_recipe_details";

/// search_recipes 的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults(pub Vec<RecipeSummary>);

impl ToolPayload for SearchResults {
    const EMPTY: &'static str = "No recipes found matching those criteria.";

    fn render(&self) -> String {
        self.0
            .iter()
            .map(|recipe| format!("{}\n", recipe.to_line()))
            .collect()
    }
}

impl ToolPayload for RecipeDetail {
    const EMPTY: &'static str = "Recipe not found.";

    fn render(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

enum Lookup {
    Id(i64),
    Name(String),
}

/// 食谱工具集
#[derive(Debug, Clone)]
pub struct RecipeTools {
    repository: RecipeRepository,
    default_limit: u32,
    max_limit: u32,
}

impl RecipeTools {
    /// 创建新的工具集
    pub fn new(repository: RecipeRepository, config: &ToolsConfig) -> Self {
        Self {
            repository,
            default_limit: config.default_search_limit.max(1),
            max_limit: config.max_search_limit.max(1),
        }
    }

    fn effective_limit(&self, requested: Option<u32>) -> i64 {
        i64::from(
            requested
                .unwrap_or(self.default_limit)
                .clamp(1, self.max_limit),
        )
    }

    /// 按营养素条件搜索食谱
    pub async fn search_recipes(&self, params: &SearchRecipesParams) -> ToolOutcome<SearchResults> {
        let filter = params.filter();
        let limit = self.effective_limit(params.limit);

        let mut conn = match self.repository.pool().acquire().await {
            Ok(conn) => conn,
            Err(e) => return database_failure(SEARCH_RECIPES, e),
        };

        match RecipeRepository::search(&mut conn, &filter, limit).await {
            Ok(rows) if rows.is_empty() => ToolOutcome::Empty,
            Ok(rows) => {
                debug!(count = rows.len(), ?filter, limit, "recipes found");
                ToolOutcome::Found(SearchResults(rows))
            }
            Err(e) => database_failure(SEARCH_RECIPES, e),
        }
    }

    /// 获取食谱详情（元数据、配料、步骤）
    ///
    /// 同时提供 ID 与名称时以 ID 为准。
    pub async fn get_recipe_details(&self, params: &RecipeDetailsParams) -> ToolOutcome<RecipeDetail> {
        let lookup = match (params.recipe_id, params.recipe_name.as_deref().map(str::trim)) {
            (Some(id), _) => Lookup::Id(id),
            (None, Some(name)) if !name.is_empty() => Lookup::Name(name.to_string()),
            _ => return ToolOutcome::Error(ToolFailure::MissingIdentifier),
        };

        let mut conn = match self.repository.pool().acquire().await {
            Ok(conn) => conn,
            Err(e) => return database_failure(GET_RECIPE_DETAILS, e),
        };

        let record = match &lookup {
            Lookup::Id(id) => RecipeRepository::find_by_id(&mut conn, *id).await,
            Lookup::Name(name) => RecipeRepository::find_by_name(&mut conn, name).await,
        };
        let record = match record {
            Ok(Some(record)) => record,
            Ok(None) => return ToolOutcome::Empty,
            Err(e) => return database_failure(GET_RECIPE_DETAILS, e),
        };

        let ingredients = match RecipeRepository::ingredients(&mut conn, record.id).await {
            Ok(ingredients) => ingredients,
            Err(e) => return database_failure(GET_RECIPE_DETAILS, e),
        };
        let steps = match RecipeRepository::steps(&mut conn, record.id).await {
            Ok(steps) => steps,
            Err(e) => return database_failure(GET_RECIPE_DETAILS, e),
        };

        ToolOutcome::Found(RecipeDetail::assemble(record, &ingredients, &steps))
    }
}

fn database_failure<T>(tool: &str, error: sqlx::Error) -> ToolOutcome<T> {
    warn!(tool, error = %error, "recipe query failed");
    ToolOutcome::Error(ToolFailure::Database(error.to_string()))
}

fn invalid_arguments(call: &ToolCall, error: serde_json::Error) -> ToolResult {
    ToolResult {
        tool_call_id: call.id.clone(),
        content: ToolFailure::InvalidArguments {
            tool: call.name.clone(),
            reason: error.to_string(),
        }
        .render(),
        is_error: true,
    }
}

#[async_trait]
impl ToolExecutor for RecipeTools {
    fn definitions(&self) -> Vec<ToolDefinition> {
        vec![def_search_recipes(self.default_limit, self.max_limit), def_get_recipe_details()]
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        debug!(tool = %call.name, arguments = %call.arguments, "tool call");

        match call.name.as_str() {
            SEARCH_RECIPES => match params::parse::<SearchRecipesParams>(&call.arguments) {
                Ok(params) => self.search_recipes(&params).await.into_result(&call.id),
                Err(e) => invalid_arguments(call, e),
            },
            GET_RECIPE_DETAILS => match params::parse::<RecipeDetailsParams>(&call.arguments) {
                Ok(params) => self.get_recipe_details(&params).await.into_result(&call.id),
                Err(e) => invalid_arguments(call, e),
            },
            other => ToolResult {
                tool_call_id: call.id.clone(),
                content: ToolFailure::UnknownTool(other.to_string()).render(),
                is_error: true,
            },
        }
    }
}

fn def_search_recipes(default_limit: u32, max_limit: u32) -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_RECIPES.to_string(),
        description: "Search for recipes by nutritional filters. Returns one line per recipe: \
                      [ID] Name (Macros). Returns a 'No recipes found' message when nothing matches."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "min_protein": {
                    "type": "number",
                    "description": "Minimum protein in grams."
                },
                "max_calories": {
                    "type": "number",
                    "description": "Maximum calories."
                },
                "max_fat": {
                    "type": "number",
                    "description": "Maximum fat in grams."
                },
                "max_carbs": {
                    "type": "number",
                    "description": "Maximum carbohydrates in grams."
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": max_limit,
                    "default": default_limit,
                    "description": "Maximum number of recipes to return."
                }
            },
            "additionalProperties": false
        }),
    }
}

fn def_get_recipe_details() -> ToolDefinition {
    ToolDefinition {
        name: GET_RECIPE_DETAILS.to_string(),
        description: "Get details for a specific recipe: macros, ingredients and steps as JSON. \
                      You MUST provide either recipe_id (preferred) or recipe_name."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "recipe_id": {
                    "type": "integer",
                    "description": "Recipe ID as returned by search_recipes."
                },
                "recipe_name": {
                    "type": "string",
                    "description": "Recipe name, matched case-insensitively."
                }
            },
            "additionalProperties": false
        }),
    }
}
