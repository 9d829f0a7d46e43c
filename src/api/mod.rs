// ==========================================
// 教学计划排课系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 CLI 与上层调用
// ==========================================

pub mod error;
pub mod plan_api;
pub mod timetable_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use plan_api::PlanApi;
pub use timetable_api::TimetableApi;
