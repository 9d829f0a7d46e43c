// ==========================================
// 教学计划排课系统 - 课题排期引擎
// ==========================================
// 输入: 有序课题列表 + 有序 DaySchedule
// 输出: 与输入等长的 AssignedTopic 列表
// ==========================================
// 规则:
// 1) 自学课题 → SELF_STUDY, 不占课时
// 2) 课堂课题且仍有课时 → CORE, 占用下一个课时
// 3) 课堂课题但课时耗尽 → SELF_STUDY + forced_overflow（强制转自学,不丢弃）
// 红线: 课时按线性顺序消耗,不复用、不跳过; 纯函数,相同输入相同输出
// ==========================================

use crate::domain::plan::{linearize, DaySchedule};
use crate::domain::topic::{AssignedTopic, Topic};
use tracing::{info, instrument, warn};

// ==========================================
// PlanAssigner - 课题排期器
// ==========================================
pub struct PlanAssigner {
    // 无状态引擎
}

impl PlanAssigner {
    pub fn new() -> Self {
        Self {}
    }

    /// 将课题映射到线性化课时
    ///
    /// # 参数
    /// - `topics`: 课题（顺序已编码先修关系,不重排）
    /// - `schedule`: 可用课时日程（日期升序）
    ///
    /// # 返回
    /// 排期结果,顺序与 topics 一致
    #[instrument(skip_all, fields(topics_count = topics.len(), teaching_days = schedule.len()))]
    pub fn assign(&self, topics: &[Topic], schedule: &[DaySchedule]) -> Vec<AssignedTopic> {
        let linear_slots = linearize(schedule);
        let mut slot_index = 0usize;
        let mut assigned = Vec::with_capacity(topics.len());

        for topic in topics {
            if topic.is_self_study {
                assigned.push(AssignedTopic::voluntary_self_study(topic.clone()));
                continue;
            }

            match linear_slots.get(slot_index) {
                Some(linear) => {
                    assigned.push(AssignedTopic::scheduled(
                        topic.clone(),
                        linear.date,
                        linear.slot.clone(),
                    ));
                    slot_index += 1;
                }
                None => {
                    assigned.push(AssignedTopic::forced_self_study(topic.clone()));
                }
            }
        }

        let forced = assigned.iter().filter(|t| t.forced_overflow).count();
        if forced > 0 {
            warn!(
                forced_overflow = forced,
                total_slots = linear_slots.len(),
                "课时不足，部分课堂课题已强制转为自学"
            );
        }
        info!(
            used_slots = slot_index,
            total_slots = linear_slots.len(),
            "课题排期完成"
        );

        assigned
    }
}

impl Default for PlanAssigner {
    fn default() -> Self {
        Self::new()
    }
}
