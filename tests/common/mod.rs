//! 集成测试共用的内存 SQLite 食谱库

#![allow(dead_code)]

use meal_planner::config::config::{DatabaseConfig, ToolsConfig};
use meal_planner::services::RecipeTools;
use meal_planner::storage::{DbPool, RecipeRepository};

const SCHEMA: &[&str] = &[
    "CREATE TABLE recipes (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        calories REAL,
        protein REAL,
        fat REAL,
        carbs REAL,
        image_url TEXT
    )",
    "CREATE TABLE ingredients (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
    "CREATE TABLE recipe_ingredients (recipe_id INTEGER, ingredient_id INTEGER, amount TEXT)",
    "CREATE TABLE recipe_steps (recipe_id INTEGER, step_number INTEGER, description TEXT)",
];

const SEED: &[&str] = &[
    "INSERT INTO recipes VALUES (1, 'Grilled Chicken Bowl', 450, 40, 12, 35, 'https://img.example/1.jpg')",
    "INSERT INTO recipes VALUES (2, 'Salmon Quinoa Plate', 480, 35, 18, 30, NULL)",
    "INSERT INTO recipes VALUES (3, 'Turkey Lettuce Wrap', 420, 32, 10, 15, NULL)",
    "INSERT INTO recipes VALUES (4, 'Beef Lasagna', 800, 45, 40, 60, NULL)",
    "INSERT INTO recipes VALUES (5, 'Green Smoothie', 200, 5, 3, 40, NULL)",
    "INSERT INTO recipes VALUES (6, 'Chicken Curry', 650, 38, 25, 50, NULL)",
    "INSERT INTO recipes VALUES (7, 'Mystery Stew', NULL, NULL, NULL, NULL, NULL)",
    "INSERT INTO ingredients VALUES (1, 'chicken breast')",
    "INSERT INTO ingredients VALUES (2, 'brown rice')",
    "INSERT INTO ingredients VALUES (3, 'broccoli')",
    "INSERT INTO ingredients VALUES (4, 'olive oil')",
    "INSERT INTO recipe_ingredients VALUES (1, 1, '200g')",
    "INSERT INTO recipe_ingredients VALUES (1, 2, '1 cup')",
    "INSERT INTO recipe_ingredients VALUES (1, 3, NULL)",
    "INSERT INTO recipe_ingredients VALUES (1, 4, '1 tbsp')",
    "INSERT INTO recipe_steps VALUES (1, 3, 'Slice the chicken and assemble the bowl.')",
    "INSERT INTO recipe_steps VALUES (1, 1, 'Cook the rice.')",
    "INSERT INTO recipe_steps VALUES (1, 2, 'Grill the chicken.')",
];

/// 单连接的内存库，保证所有查询看到同一份数据
pub async fn memory_pool() -> DbPool {
    DbPool::connect(&DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        idle_timeout: 0,
        ..DatabaseConfig::default()
    })
    .await
    .expect("in-memory sqlite")
}

pub async fn seeded_pool() -> DbPool {
    let pool = memory_pool().await;
    let mut conn = pool.acquire().await.expect("connection");
    for statement in SCHEMA.iter().chain(SEED) {
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .expect("seed statement");
    }
    pool
}

pub fn tools_on(pool: DbPool) -> RecipeTools {
    RecipeTools::new(RecipeRepository::new(pool), &ToolsConfig::default())
}

pub async fn seeded_tools() -> RecipeTools {
    tools_on(seeded_pool().await)
}
