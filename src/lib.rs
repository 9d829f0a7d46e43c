// ==========================================
// 教学计划排课系统 - 核心库
// ==========================================
// 主流程: 周课表 + 校历 → 可用课时 → 课题生成 → 课题排期
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 可用课时与排期
pub mod engine;

// 导入层 - 外部文件
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/表结构）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AssignedTopic, Availability, CalendarYear, DaySchedule, PlanSummary, TermPlan, TimeSlot,
    Topic, TopicPriority, Weekday, WeeklyTimetable,
};

// 引擎
pub use engine::{
    AvailabilityCalculator, PlanAssigner, PlanOrchestrator, PlanRequest, StaticTopicProducer,
    TopicProducer, TopicRequest,
};

// API
pub use api::{ApiError, ApiResult, PlanApi, TimetableApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "教学计划排课系统";
