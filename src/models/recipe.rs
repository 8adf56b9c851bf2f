//! 食谱模型
//!
//! 食谱数据由关系库持有，本服务只读。

use serde::{Deserialize, Serialize, Serializer};

/// 营养素过滤条件，未设置的维度不做约束
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeFilter {
    /// 最少蛋白质（克）
    pub min_protein: Option<f64>,
    /// 最多热量
    pub max_calories: Option<f64>,
    /// 最多脂肪（克）
    pub max_fat: Option<f64>,
    /// 最多碳水（克）
    pub max_carbs: Option<f64>,
}

impl RecipeFilter {
    /// 判断给定营养素是否满足全部条件
    ///
    /// 与 SQL 比较一致：被约束的维度缺失时视为不满足。
    pub fn matches(&self, macros: &Macros) -> bool {
        fn at_least(value: Option<f64>, bound: Option<f64>) -> bool {
            bound.is_none_or(|min| value.is_some_and(|v| v >= min))
        }
        fn at_most(value: Option<f64>, bound: Option<f64>) -> bool {
            bound.is_none_or(|max| value.is_some_and(|v| v <= max))
        }

        at_least(macros.protein, self.min_protein)
            && at_most(macros.calories, self.max_calories)
            && at_most(macros.fat, self.max_fat)
            && at_most(macros.carbs, self.max_carbs)
    }
}

/// 营养素，库中为 NULL 的值保持缺失
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    #[serde(serialize_with = "serialize_amount")]
    pub calories: Option<f64>,
    #[serde(serialize_with = "serialize_amount")]
    pub protein: Option<f64>,
    #[serde(serialize_with = "serialize_amount")]
    pub fat: Option<f64>,
    #[serde(serialize_with = "serialize_amount")]
    pub carbs: Option<f64>,
}

/// 整数值按整数输出（`480` 而非 `480.0`），缺失输出 `null`
fn serialize_amount<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *value {
        Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => serializer.serialize_i64(v as i64),
        Some(v) => serializer.serialize_f64(v),
        None => serializer.serialize_none(),
    }
}

/// 文本中的营养素值，缺失时写 `unknown`
fn display_amount(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => "unknown".to_string(),
    }
}

/// 搜索结果中的单条食谱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub macros: Macros,
}

impl RecipeSummary {
    /// 渲染为 `- [ID: 1] Name (Cal: 400, Prot: 30g, Fat: 10g, Carbs: 20g)`
    pub fn to_line(&self) -> String {
        format!(
            "- [ID: {}] {} (Cal: {}, Prot: {}, Fat: {}, Carbs: {})",
            self.id,
            self.name,
            display_amount(self.macros.calories, ""),
            display_amount(self.macros.protein, "g"),
            display_amount(self.macros.fat, "g"),
            display_amount(self.macros.carbs, "g")
        )
    }
}

/// 食谱元数据行
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub macros: Macros,
}

/// 食谱配料（recipe_ingredients 与 ingredients 的连接行）
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientLine {
    pub name: String,
    pub amount: Option<String>,
}

impl IngredientLine {
    /// 渲染为 `<amount> <name>`，无用量时只保留名称
    pub fn to_line(&self) -> String {
        match self.amount.as_deref().map(str::trim) {
            Some(amount) if !amount.is_empty() => format!("{} {}", amount, self.name),
            _ => self.name.clone(),
        }
    }
}

/// 烹饪步骤
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeStep {
    pub step_number: i64,
    pub description: String,
}

impl RecipeStep {
    pub fn to_line(&self) -> String {
        format!("{}. {}", self.step_number, self.description)
    }
}

/// 食谱详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub macros: Macros,
    /// `<amount> <ingredient>`，与连接行一一对应
    pub ingredients: Vec<String>,
    /// `<step>. <description>`，按步骤号升序
    pub instructions: Vec<String>,
}

impl RecipeDetail {
    pub fn assemble(
        record: RecipeRecord,
        ingredients: &[IngredientLine],
        steps: &[RecipeStep],
    ) -> Self {
        Self {
            id: record.id,
            name: record.name,
            image: record.image_url,
            macros: record.macros,
            ingredients: ingredients.iter().map(IngredientLine::to_line).collect(),
            instructions: steps.iter().map(RecipeStep::to_line).collect(),
        }
    }
}
