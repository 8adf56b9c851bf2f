use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀，嵌套字段以 `__` 分隔，例如 `MEALPLAN_SERVER__PORT`
const ENV_PREFIX: &str = "MEALPLAN_";

/// 数据库连接字符串环境变量
const DB_CONNECTION_STRING_ENV: &str = "DB_CONNECTION_STRING";

/// 模型服务密钥环境变量
const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（由低到高）：
    /// 1. 内置默认值
    /// 2. ./config.toml
    /// 3. `MEALPLAN_` 前缀环境变量
    /// 4. `DB_CONNECTION_STRING` / `OPENAI_API_KEY`
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[DB_CONNECTION_STRING_ENV])
                    .map(|_| "database.url".into()),
            )
            .merge(
                Env::raw()
                    .only(&[OPENAI_API_KEY_ENV])
                    .map(|_| "llm.api_key".into()),
            )
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.database.url.trim().is_empty() {
            return Err(ConfigValidationError::MissingDatabaseUrl);
        }

        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.session.max_sessions == 0 {
            return Err(ConfigValidationError::InvalidSessionCapacity);
        }

        if config.llm.max_tool_iterations == 0 {
            return Err(ConfigValidationError::InvalidToolIterations);
        }

        if config.tools.max_search_limit == 0 {
            return Err(ConfigValidationError::InvalidSearchLimit);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("数据库连接字符串未配置（DB_CONNECTION_STRING）")]
    MissingDatabaseUrl,

    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("会话容量无效，必须大于 0")]
    InvalidSessionCapacity,

    #[error("工具调用轮次无效，必须大于 0")]
    InvalidToolIterations,

    #[error("搜索条数上限无效，必须大于 0")]
    InvalidSearchLimit,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}
