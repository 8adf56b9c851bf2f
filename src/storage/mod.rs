//! 存储层模块
//!
//! 食谱库的连接池与只读查询。

pub mod pool;
pub mod repository;

pub use pool::DbPool;
pub use repository::RecipeRepository;
