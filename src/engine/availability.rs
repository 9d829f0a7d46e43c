// ==========================================
// 教学计划排课系统 - 可用课时计算引擎
// ==========================================
// 输入: 日期区间 + 周课表 + 校历 + 科目过滤(可选)
// 输出: total_slots + 按日期升序的 DaySchedule 列表
// ==========================================
// 判定顺序（逐日,闭区间,升序）:
// 1) 节假日 → 排除（即使同时是调休日）
// 2) 周日且非调休 → 排除
// 3) 取该星期课表,按科目过滤
// 4) 过滤后非空 → 产出 DaySchedule
// 红线: 引擎不报错,异常输入一律退化为空结果
// ==========================================

use crate::domain::calendar::CalendarYear;
use crate::domain::plan::{Availability, DaySchedule};
use crate::domain::timetable::{TimeSlot, WeeklyTimetable};
use crate::domain::types::Weekday;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, instrument};

// ==========================================
// SubjectFilter - 科目过滤器
// ==========================================
// 双向子串匹配: 课时科目包含过滤词,或过滤词包含课时科目
// 已知不精确（例如 "STQA" 与 "Software Testing" 部分重叠时可能误匹配）,
// 保持原有口径,改动会影响课时预算
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectFilter {
    normalized: String,
}

impl SubjectFilter {
    /// 构造过滤器; 去空白后为空视为不过滤
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize_subject(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self { normalized })
        }
    }

    /// 判断课时是否匹配
    ///
    /// 课时未标注科目（或科目为空白）时不匹配
    pub fn matches(&self, slot: &TimeSlot) -> bool {
        let subject = match slot.subject.as_deref().map(normalize_subject) {
            Some(s) if !s.is_empty() => s,
            _ => return false,
        };
        subject.contains(&self.normalized) || self.normalized.contains(&subject)
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }
}

fn normalize_subject(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ==========================================
// AvailabilityCalculator - 可用课时计算器
// ==========================================
pub struct AvailabilityCalculator {
    // 无状态引擎，不需要注入依赖
}

impl AvailabilityCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算日期区间内的可用课时
    ///
    /// # 参数
    /// - `start_date` / `end_date`: 闭区间; start > end 时返回空结果
    /// - `timetable`: 周课表
    /// - `calendar`: 校历（节假日/调休）
    /// - `subject_filter`: 科目过滤词（大小写不敏感,去空白）
    ///
    /// # 返回
    /// Availability（total_slots + 升序 DaySchedule）
    #[instrument(skip(self, timetable, calendar), fields(
        holidays = calendar.holidays.len(),
        overrides = calendar.working_day_overrides.len(),
        slots_per_week = timetable.slots_per_week()
    ))]
    pub fn calculate(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        timetable: &WeeklyTimetable,
        calendar: &CalendarYear,
        subject_filter: Option<&str>,
    ) -> Availability {
        let filter = subject_filter.and_then(SubjectFilter::new);
        let mut availability = Availability::default();

        if start_date > end_date {
            debug!("起始日期晚于结束日期，返回空结果");
            return availability;
        }

        for date in start_date.iter_days().take_while(|d| *d <= end_date) {
            if let Some(day) = self.evaluate_day(date, timetable, calendar, filter.as_ref()) {
                availability.total_slots += day.slots.len();
                availability.schedule.push(day);
            }
        }

        info!(
            total_slots = availability.total_slots,
            teaching_days = availability.schedule.len(),
            "可用课时计算完成"
        );
        availability
    }

    /// 单日判定
    fn evaluate_day(
        &self,
        date: NaiveDate,
        timetable: &WeeklyTimetable,
        calendar: &CalendarYear,
        filter: Option<&SubjectFilter>,
    ) -> Option<DaySchedule> {
        let weekday = Weekday::from(date.weekday());

        // 1) 节假日优先
        if calendar.is_holiday(date) {
            debug!(%date, "节假日，排除");
            return None;
        }

        // 2) 周日默认不上课,调休除外
        let is_override = weekday == Weekday::Sunday && calendar.is_working_day_override(date);
        if weekday == Weekday::Sunday && !is_override {
            debug!(%date, "周日非调休，排除");
            return None;
        }

        // 3) 课表 + 科目过滤
        let slots: Vec<TimeSlot> = timetable
            .slots_for(weekday)
            .iter()
            .filter(|slot| filter.map_or(true, |f| f.matches(slot)))
            .cloned()
            .collect();

        if slots.is_empty() {
            return None;
        }

        Some(DaySchedule {
            date,
            day_of_week: weekday,
            slots,
            is_override,
        })
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for AvailabilityCalculator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn slot(start: &str, end: &str, subject: &str) -> TimeSlot {
        TimeSlot::new(start, end).with_subject(subject)
    }

    // ==========================================
    // 科目过滤测试
    // ==========================================

    #[test]
    fn test_subject_filter_bidirectional() {
        let filter = SubjectFilter::new("  Software Testing ").unwrap();
        assert!(filter.matches(&slot("09:00", "10:00", "software testing and QA")));
        assert!(filter.matches(&slot("09:00", "10:00", "TESTING")));
        assert!(!filter.matches(&slot("09:00", "10:00", "STQA")));
        assert!(!filter.matches(&TimeSlot::new("09:00", "10:00")));
        assert!(!filter.matches(&slot("09:00", "10:00", "   ")));
    }

    #[test]
    fn test_blank_filter_is_no_filter() {
        assert!(SubjectFilter::new("   ").is_none());
    }

    // ==========================================
    // 日期判定测试
    // ==========================================

    #[test]
    fn test_sunday_override_sets_flag() {
        // 2026-01-04 是周日
        let timetable = WeeklyTimetable::new()
            .with_slot(Weekday::Sunday, TimeSlot::new("09:00", "10:00"));
        let calendar = CalendarYear::new(2026).with_working_day(d(2026, 1, 4));

        let result = AvailabilityCalculator::new().calculate(
            d(2026, 1, 4),
            d(2026, 1, 4),
            &timetable,
            &calendar,
            None,
        );

        assert_eq!(result.total_slots, 1);
        assert!(result.schedule[0].is_override);
        assert_eq!(result.schedule[0].day_of_week, Weekday::Sunday);
    }

    #[test]
    fn test_override_on_weekday_is_not_flagged() {
        // 2026-01-05 是周一; 调休对非周日无影响
        let timetable = WeeklyTimetable::new()
            .with_slot(Weekday::Monday, TimeSlot::new("09:00", "10:00"));
        let calendar = CalendarYear::new(2026).with_working_day(d(2026, 1, 5));

        let result = AvailabilityCalculator::new().calculate(
            d(2026, 1, 5),
            d(2026, 1, 5),
            &timetable,
            &calendar,
            None,
        );

        assert_eq!(result.total_slots, 1);
        assert!(!result.schedule[0].is_override);
    }

    #[test]
    fn test_filter_dropping_all_slots_skips_day() {
        let timetable = WeeklyTimetable::new()
            .with_slot(Weekday::Thursday, slot("09:00", "10:00", "Mathematics"));

        let result = AvailabilityCalculator::new().calculate(
            d(2026, 1, 1),
            d(2026, 1, 1),
            &timetable,
            &CalendarYear::new(2026),
            Some("Physics"),
        );

        assert_eq!(result.total_slots, 0);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_range_crosses_year_boundary() {
        let timetable = WeeklyTimetable::new()
            .with_slot(Weekday::Wednesday, TimeSlot::new("09:00", "10:00"))
            .with_slot(Weekday::Thursday, TimeSlot::new("09:00", "10:00"));

        // 2025-12-31 周三, 2026-01-01 周四
        let result = AvailabilityCalculator::new().calculate(
            d(2025, 12, 31),
            d(2026, 1, 1),
            &timetable,
            &CalendarYear::new(2025),
            None,
        );

        assert_eq!(result.total_slots, 2);
        assert_eq!(result.schedule[0].date, d(2025, 12, 31));
        assert_eq!(result.schedule[1].date, d(2026, 1, 1));
    }
}
