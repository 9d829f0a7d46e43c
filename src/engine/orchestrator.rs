// ==========================================
// 教学计划排课系统 - 引擎编排器
// ==========================================
// 主流程:
// 1) AvailabilityCalculator 计算可用课时
// 2) 课时为 0 → EmptyBudget（配置问题,交由用户处理）
// 3) total_slots 作为预算提示交给外部课题生成方
// 4) PlanAssigner 排期
// 说明: 课表/校历由调用方一次性读取后传入,编排器不访问存储
// ==========================================

use crate::domain::calendar::CalendarYear;
use crate::domain::plan::{Availability, PlanSummary};
use crate::domain::timetable::WeeklyTimetable;
use crate::domain::topic::AssignedTopic;
use crate::engine::assigner::PlanAssigner;
use crate::engine::availability::AvailabilityCalculator;
use crate::engine::topic_source::{TopicProducer, TopicRequest};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// PlanRequest - 排期请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub group_id: String,
    pub subject: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 是否只统计该科目的课时（默认是）
    #[serde(default = "default_filter_by_subject")]
    pub filter_by_subject: bool,
}

fn default_filter_by_subject() -> bool {
    true
}

impl PlanRequest {
    pub fn new(
        group_id: impl Into<String>,
        subject: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            subject: subject.into(),
            start_date,
            end_date,
            filter_by_subject: true,
        }
    }

    pub fn subject_filter(&self) -> Option<&str> {
        if self.filter_by_subject {
            Some(self.subject.as_str())
        } else {
            None
        }
    }
}

// ==========================================
// PlanOutcome - 排期结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub availability: Availability,
    pub topics: Vec<AssignedTopic>,
}

impl PlanOutcome {
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from_topics(&self.topics, self.availability.total_slots)
    }
}

// ==========================================
// PlanningError - 编排错误
// ==========================================
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("可用课时为 0: subject={subject}, range={start_date}..={end_date}（请检查课表与校历）")]
    EmptyBudget {
        subject: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("课题生成失败: {0}")]
    TopicProducer(anyhow::Error),
}

// ==========================================
// PlanOrchestrator - 引擎编排器
// ==========================================
pub struct PlanOrchestrator {
    calculator: AvailabilityCalculator,
    assigner: PlanAssigner,
}

impl PlanOrchestrator {
    pub fn new() -> Self {
        Self {
            calculator: AvailabilityCalculator::new(),
            assigner: PlanAssigner::new(),
        }
    }

    /// 仅计算可用课时（预览用）
    pub fn preview(
        &self,
        request: &PlanRequest,
        timetable: &WeeklyTimetable,
        calendar: &CalendarYear,
    ) -> Availability {
        self.calculator.calculate(
            request.start_date,
            request.end_date,
            timetable,
            calendar,
            request.subject_filter(),
        )
    }

    /// 执行完整排期流程
    ///
    /// # 返回
    /// - Ok(PlanOutcome): 可用课时 + 排期结果
    /// - Err(EmptyBudget): 区间内无可用课时,不调用课题生成方
    /// - Err(TopicProducer): 外部生成失败
    pub async fn execute(
        &self,
        request: &PlanRequest,
        timetable: &WeeklyTimetable,
        calendar: &CalendarYear,
        producer: &dyn TopicProducer,
    ) -> Result<PlanOutcome, PlanningError> {
        info!(
            group_id = %request.group_id,
            subject = %request.subject,
            start_date = %request.start_date,
            end_date = %request.end_date,
            "开始执行排期流程"
        );

        // ==========================================
        // 步骤1: 可用课时
        // ==========================================
        let availability = self.preview(request, timetable, calendar);
        if availability.is_empty() {
            return Err(PlanningError::EmptyBudget {
                subject: request.subject.clone(),
                start_date: request.start_date,
                end_date: request.end_date,
            });
        }

        // ==========================================
        // 步骤2: 外部课题生成（预算提示）
        // ==========================================
        let topic_request = TopicRequest {
            group_id: request.group_id.clone(),
            subject: request.subject.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            total_slots: availability.total_slots,
        };
        let topics = producer
            .produce_topics(&topic_request)
            .await
            .map_err(PlanningError::TopicProducer)?;
        debug!(topics_count = topics.len(), "课题生成完成");

        // ==========================================
        // 步骤3: 排期
        // ==========================================
        let assigned = self.assigner.assign(&topics, &availability.schedule);

        Ok(PlanOutcome {
            availability,
            topics: assigned,
        })
    }
}

impl Default for PlanOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
