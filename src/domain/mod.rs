// ==========================================
// 教学计划排课系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod calendar;
pub mod plan;
pub mod timetable;
pub mod topic;
pub mod types;

// 重导出核心类型
pub use calendar::{CalendarYear, ISO_DATE_FORMAT};
pub use plan::{linearize, Availability, DaySchedule, LinearSlot, PlanSummary, TermPlan};
pub use timetable::{TimeSlot, WeeklyTimetable};
pub use topic::{AssignedTopic, Topic};
pub use types::{CalendarDateKind, TopicPriority, Weekday};
