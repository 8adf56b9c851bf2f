//! Meal Planner - 对话式营养师后端
//!
//! 每个会话持有一个带工具的 Agent，工具直接查询食谱库，
//! 按营养素筛选食谱并给出配料与步骤。

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
