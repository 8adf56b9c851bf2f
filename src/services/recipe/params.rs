//! 工具参数
//!
//! 模型偶尔会把数字写成字符串（`"30"`），这里统一宽松解析。

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;

use crate::models::recipe::RecipeFilter;

/// search_recipes 参数
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchRecipesParams {
    #[serde(deserialize_with = "lenient_f64")]
    pub min_protein: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub max_calories: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub max_fat: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub max_carbs: Option<f64>,
    #[serde(deserialize_with = "lenient_u32")]
    pub limit: Option<u32>,
}

impl SearchRecipesParams {
    pub fn filter(&self) -> RecipeFilter {
        RecipeFilter {
            min_protein: self.min_protein,
            max_calories: self.max_calories,
            max_fat: self.max_fat,
            max_carbs: self.max_carbs,
        }
    }
}

/// get_recipe_details 参数
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecipeDetailsParams {
    #[serde(deserialize_with = "lenient_i64")]
    pub recipe_id: Option<i64>,
    pub recipe_name: Option<String>,
}

/// 解析工具参数，空字符串视为 `{}`
pub fn parse<T: DeserializeOwned>(arguments: &str) -> Result<T, serde_json::Error> {
    let arguments = arguments.trim();
    if arguments.is_empty() {
        return serde_json::from_str("{}");
    }
    serde_json::from_str(arguments)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid number: {}", n))),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, got \"{}\"", s))),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match lenient_number(deserializer)? {
        Some(v) if !v.is_finite() => Err(D::Error::custom("number must be finite")),
        other => Ok(other),
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match lenient_number(deserializer)? {
        None => Ok(None),
        Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Ok(Some(v as i64)),
        Some(v) => Err(D::Error::custom(format!("expected an integer, got {}", v))),
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match lenient_number(deserializer)? {
        None => Ok(None),
        Some(v) if v.fract() == 0.0 && v >= 0.0 && v <= f64::from(u32::MAX) => Ok(Some(v as u32)),
        Some(v) => Err(D::Error::custom(format!(
            "expected a non-negative integer, got {}",
            v
        ))),
    }
}
