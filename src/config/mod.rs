// ==========================================
// 教学计划排课系统 - 配置层
// ==========================================
// 职责: 系统配置管理（兜底校历、导入校验、默认语言）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod planning_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use planning_config_trait::{ConfigReadError, PlanningConfigReader};
