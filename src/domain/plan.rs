// ==========================================
// 教学计划排课系统 - 学期计划领域模型
// ==========================================
// DaySchedule / Availability: 可用课时计算结果
// TermPlan: 持久化的学期计划记录
// PlanSummary: 计划统计（区分主动自学与强制自学）
// ==========================================

use crate::domain::timetable::TimeSlot;
use crate::domain::topic::AssignedTopic;
use crate::domain::types::Weekday;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// DaySchedule - 单日可用课时
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub day_of_week: Weekday,
    pub slots: Vec<TimeSlot>,
    /// 是否为调休的周日
    pub is_override: bool,
}

// ==========================================
// Availability - 日期区间的可用课时
// ==========================================
// 红线: total_slots == schedule 中课时数之和
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub total_slots: usize,
    pub schedule: Vec<DaySchedule>,
}

impl Availability {
    pub fn is_empty(&self) -> bool {
        self.total_slots == 0
    }

    /// 线性化: 按日期、再按日内顺序展开为课时序列
    pub fn linear_slots(&self) -> Vec<LinearSlot<'_>> {
        linearize(&self.schedule)
    }
}

// ==========================================
// LinearSlot - 线性化后的单个课时
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearSlot<'a> {
    pub date: NaiveDate,
    pub slot: &'a TimeSlot,
}

/// 展开日程: 日程顺序优先,日内课时顺序其次
pub fn linearize(schedule: &[DaySchedule]) -> Vec<LinearSlot<'_>> {
    schedule
        .iter()
        .flat_map(|day| {
            day.slots.iter().map(move |slot| LinearSlot {
                date: day.date,
                slot,
            })
        })
        .collect()
}

// ==========================================
// TermPlan - 学期计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPlan {
    pub plan_id: String,
    pub group_id: String,
    pub subject: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_slots_available: usize,
    pub topics: Vec<AssignedTopic>,
    pub created_at: NaiveDateTime,
}

impl TermPlan {
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from_topics(&self.topics, self.total_slots_available)
    }
}

// ==========================================
// PlanSummary - 计划统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_topics: usize,
    pub core_count: usize,
    pub voluntary_self_study_count: usize,
    pub forced_overflow_count: usize,
    /// 未被占用的课时数
    pub unused_slots: usize,
    pub first_scheduled_date: Option<NaiveDate>,
    pub last_scheduled_date: Option<NaiveDate>,
}

impl PlanSummary {
    pub fn from_topics(topics: &[AssignedTopic], total_slots: usize) -> Self {
        let core_count = topics.iter().filter(|t| t.is_core()).count();
        let forced_overflow_count = topics.iter().filter(|t| t.forced_overflow).count();
        let voluntary_self_study_count = topics
            .iter()
            .filter(|t| !t.is_core() && !t.forced_overflow)
            .count();
        let dates = topics.iter().filter_map(|t| t.scheduled_date);

        Self {
            total_topics: topics.len(),
            core_count,
            voluntary_self_study_count,
            forced_overflow_count,
            unused_slots: total_slots.saturating_sub(core_count),
            first_scheduled_date: dates.clone().min(),
            last_scheduled_date: dates.max(),
        }
    }

    pub fn has_overflow(&self) -> bool {
        self.forced_overflow_count > 0
    }
}
