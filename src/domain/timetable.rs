// ==========================================
// 教学计划排课系统 - 周课表领域模型
// ==========================================
// 周课表归属于教学班（group），对排课核心只读
// 同一天内的课时顺序即为排课消耗顺序
// ==========================================

use crate::domain::types::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// TimeSlot - 课时
// ==========================================
// 红线: 读入后不可变; start < end 由数据源保证,核心不校验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: String,      // 开始时间 HH:MM
    pub end_time: String,        // 结束时间 HH:MM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,    // 教室
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>, // 科目
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>, // 任课教师
}

impl TimeSlot {
    /// 创建只有时间段的课时
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            room: None,
            subject: None,
            faculty: None,
        }
    }

    /// 设置科目
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// 设置教室
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// 设置任课教师
    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty = Some(faculty.into());
        self
    }
}

// ==========================================
// WeeklyTimetable - 周课表
// ==========================================
// 星期 → 有序课时列表; 周日按惯例缺省
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyTimetable {
    days: BTreeMap<Weekday, Vec<TimeSlot>>,
}

impl WeeklyTimetable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个课时到指定星期（保持插入顺序）
    pub fn push(&mut self, weekday: Weekday, slot: TimeSlot) {
        self.days.entry(weekday).or_default().push(slot);
    }

    /// 链式追加（构造测试数据/默认课表用）
    pub fn with_slot(mut self, weekday: Weekday, slot: TimeSlot) -> Self {
        self.push(weekday, slot);
        self
    }

    /// 整体设置某天的课时
    pub fn set_day(&mut self, weekday: Weekday, slots: Vec<TimeSlot>) {
        self.days.insert(weekday, slots);
    }

    /// 获取某天的课时; 未配置返回空切片
    pub fn slots_for(&self, weekday: Weekday) -> &[TimeSlot] {
        self.days.get(&weekday).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 按星期顺序遍历已配置的天
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[TimeSlot])> {
        self.days.iter().map(|(day, slots)| (*day, slots.as_slice()))
    }

    /// 每周课时总数
    pub fn slots_per_week(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots_per_week() == 0
    }
}
