//! 数据模型模块
//!
//! 定义食谱相关的核心数据结构。

pub mod recipe;

pub use recipe::*;
