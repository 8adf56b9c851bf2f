//! 食谱只读查询
//!
//! 所有查询都接收调用方持有的连接，以便同一次工具调用内的多条查询
//! 复用一个连接。占位符统一使用 `$N`，PostgreSQL 与 SQLite 均可解析；
//! 数值列统一 CAST，保证两种驱动解码出相同的类型。

use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Row};

use crate::models::recipe::{
    IngredientLine, Macros, RecipeFilter, RecipeRecord, RecipeStep, RecipeSummary,
};
use crate::storage::pool::DbPool;

const RECIPE_COLUMNS: &str = "CAST(id AS BIGINT) AS id, name, \
     CAST(calories AS DOUBLE PRECISION) AS calories, \
     CAST(protein AS DOUBLE PRECISION) AS protein, \
     CAST(fat AS DOUBLE PRECISION) AS fat, \
     CAST(carbs AS DOUBLE PRECISION) AS carbs";

/// 食谱仓库
#[derive(Clone, Debug)]
pub struct RecipeRepository {
    pool: DbPool,
}

impl RecipeRepository {
    /// 创建新的仓库实例
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// 按营养素条件搜索，最多返回 `limit` 条
    pub async fn search(
        conn: &mut AnyConnection,
        filter: &RecipeFilter,
        limit: i64,
    ) -> Result<Vec<RecipeSummary>, sqlx::Error> {
        let (sql, binds) = build_search_query(filter);

        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(value);
        }
        let rows = query.bind(limit).fetch_all(conn).await?;

        rows.iter()
            .map(|row| -> Result<RecipeSummary, sqlx::Error> {
                Ok(RecipeSummary {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    macros: decode_macros(row)?,
                })
            })
            .collect()
    }

    /// 按 ID 精确查找
    pub async fn find_by_id(
        conn: &mut AnyConnection,
        id: i64,
    ) -> Result<Option<RecipeRecord>, sqlx::Error> {
        let sql = format!("SELECT {RECIPE_COLUMNS}, image_url FROM recipes WHERE id = $1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(conn).await?;
        row.as_ref().map(decode_record).transpose()
    }

    /// 按名称查找（忽略大小写的子串匹配），多条命中时取 ID 最小者
    pub async fn find_by_name(
        conn: &mut AnyConnection,
        name: &str,
    ) -> Result<Option<RecipeRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS}, image_url FROM recipes \
             WHERE LOWER(name) LIKE LOWER($1) ORDER BY id LIMIT 1"
        );
        let pattern = format!("%{}%", name.trim());
        let row = sqlx::query(&sql).bind(pattern).fetch_optional(conn).await?;
        row.as_ref().map(decode_record).transpose()
    }

    /// 食谱配料，每条连接行对应一条结果
    pub async fn ingredients(
        conn: &mut AnyConnection,
        recipe_id: i64,
    ) -> Result<Vec<IngredientLine>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT i.name AS name, CAST(ri.amount AS TEXT) AS amount \
             FROM recipe_ingredients ri \
             JOIN ingredients i ON ri.ingredient_id = i.id \
             WHERE ri.recipe_id = $1",
        )
        .bind(recipe_id)
        .fetch_all(conn)
        .await?;

        rows.iter()
            .map(|row| -> Result<IngredientLine, sqlx::Error> {
                Ok(IngredientLine {
                    name: row.try_get("name")?,
                    amount: row.try_get("amount")?,
                })
            })
            .collect()
    }

    /// 烹饪步骤，按步骤号升序
    pub async fn steps(
        conn: &mut AnyConnection,
        recipe_id: i64,
    ) -> Result<Vec<RecipeStep>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT CAST(step_number AS BIGINT) AS step_number, description \
             FROM recipe_steps \
             WHERE recipe_id = $1 \
             ORDER BY step_number ASC",
        )
        .bind(recipe_id)
        .fetch_all(conn)
        .await?;

        rows.iter()
            .map(|row| -> Result<RecipeStep, sqlx::Error> {
                Ok(RecipeStep {
                    step_number: row.try_get("step_number")?,
                    description: row.try_get("description")?,
                })
            })
            .collect()
    }
}

/// 构造搜索 SQL，返回语句与按顺序绑定的过滤值；`LIMIT` 占位符排在最后
fn build_search_query(filter: &RecipeFilter) -> (String, Vec<f64>) {
    let mut sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE 1=1");
    let mut binds = Vec::new();

    let clauses = [
        ("protein >=", filter.min_protein),
        ("calories <=", filter.max_calories),
        ("fat <=", filter.max_fat),
        ("carbs <=", filter.max_carbs),
    ];
    for (predicate, value) in clauses {
        if let Some(value) = value {
            binds.push(value);
            sql.push_str(&format!(" AND {} ${}", predicate, binds.len()));
        }
    }

    sql.push_str(&format!(" ORDER BY id LIMIT ${}", binds.len() + 1));
    (sql, binds)
}

// NULL 营养素保持为 None，不补 0
fn decode_macros(row: &AnyRow) -> Result<Macros, sqlx::Error> {
    Ok(Macros {
        calories: row.try_get::<Option<f64>, _>("calories")?,
        protein: row.try_get::<Option<f64>, _>("protein")?,
        fat: row.try_get::<Option<f64>, _>("fat")?,
        carbs: row.try_get::<Option<f64>, _>("carbs")?,
    })
}

fn decode_record(row: &AnyRow) -> Result<RecipeRecord, sqlx::Error> {
    Ok(RecipeRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        image_url: row.try_get("image_url")?,
        macros: decode_macros(row)?,
    })
}
