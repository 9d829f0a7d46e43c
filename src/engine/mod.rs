// ==========================================
// 教学计划排课系统 - 引擎层
// ==========================================
// 职责: 可用课时计算与课题排期,纯内存计算
// 红线: Engine 不访问数据库,不拼 SQL; 不报错,异常输入退化为空结果
// ==========================================

pub mod assigner;
pub mod availability;
pub mod orchestrator;
pub mod topic_source;

// 重导出核心引擎
pub use assigner::PlanAssigner;
pub use availability::{AvailabilityCalculator, SubjectFilter};
pub use orchestrator::{PlanOrchestrator, PlanOutcome, PlanRequest, PlanningError};
pub use topic_source::{StaticTopicProducer, TopicProducer, TopicRequest};
