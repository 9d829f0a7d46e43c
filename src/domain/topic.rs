// ==========================================
// 教学计划排课系统 - 课题领域模型
// ==========================================
// Topic: 外部课题生成方产出的有序课题
// AssignedTopic: 排期结果（CORE 带日期 / SELF_STUDY 无日期）
// ==========================================

use crate::domain::timetable::TimeSlot;
use crate::domain::types::TopicPriority;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Topic - 课题（外部输入）
// ==========================================
// 顺序已由上游编码先修关系,核心不重排
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    /// 时长描述，由生成方给出，核心不解释
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub is_self_study: bool,
    #[serde(default)]
    pub sequence_order: i32,
}

impl Topic {
    /// 创建课堂讲授课题
    pub fn core(title: impl Into<String>, sequence_order: i32) -> Self {
        Self {
            title: title.into(),
            duration: String::new(),
            is_self_study: false,
            sequence_order,
        }
    }

    /// 创建自学课题
    pub fn self_study(title: impl Into<String>, sequence_order: i32) -> Self {
        Self {
            is_self_study: true,
            ..Self::core(title, sequence_order)
        }
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }
}

// ==========================================
// AssignedTopic - 排期后的课题
// ==========================================
// 红线: forced_overflow=true 必须与上游标记的自学区分开
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedTopic {
    #[serde(flatten)]
    pub topic: Topic,
    pub priority: TopicPriority,
    pub scheduled_date: Option<NaiveDate>,
    /// 占用的课时（仅 CORE 有值）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_slot: Option<TimeSlot>,
    #[serde(default)]
    pub forced_overflow: bool,
}

impl AssignedTopic {
    /// 排入课时的课堂课题
    pub fn scheduled(topic: Topic, date: NaiveDate, slot: TimeSlot) -> Self {
        Self {
            topic,
            priority: TopicPriority::Core,
            scheduled_date: Some(date),
            scheduled_slot: Some(slot),
            forced_overflow: false,
        }
    }

    /// 上游标记的自学课题
    pub fn voluntary_self_study(topic: Topic) -> Self {
        Self {
            topic,
            priority: TopicPriority::SelfStudy,
            scheduled_date: None,
            scheduled_slot: None,
            forced_overflow: false,
        }
    }

    /// 课时耗尽被强制转为自学的课题
    pub fn forced_self_study(topic: Topic) -> Self {
        Self {
            forced_overflow: true,
            ..Self::voluntary_self_study(topic)
        }
    }

    pub fn is_core(&self) -> bool {
        self.priority == TopicPriority::Core
    }
}
