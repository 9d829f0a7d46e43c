// ==========================================
// 教学计划排课系统 - 校历领域模型
// ==========================================
// 节假日: 任何星期都不排课
// 调休工作日: 仅用于把周日变为工作日
// 优先级: 节假日 > 调休
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// ISO 日期格式（存储/导入统一使用）
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// CalendarYear - 校历年
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarYear {
    pub year: i32,
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub working_day_overrides: BTreeSet<NaiveDate>,
}

impl CalendarYear {
    /// 创建空校历（无节假日、无调休）
    pub fn new(year: i32) -> Self {
        Self {
            year,
            holidays: BTreeSet::new(),
            working_day_overrides: BTreeSet::new(),
        }
    }

    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    pub fn with_working_day(mut self, date: NaiveDate) -> Self {
        self.working_day_overrides.insert(date);
        self
    }

    /// 从 ISO 日期字符串构建校历
    ///
    /// 无法解析的日期被跳过并记录告警（宽松策略,不报错）
    pub fn from_iso_strings<S: AsRef<str>>(year: i32, holidays: &[S], overrides: &[S]) -> Self {
        Self {
            year,
            holidays: parse_iso_dates(holidays, "holidays"),
            working_day_overrides: parse_iso_dates(overrides, "working_day_overrides"),
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_working_day_override(&self, date: NaiveDate) -> bool {
        self.working_day_overrides.contains(&date)
    }

    /// 合并多个校历年（跨年日期区间使用）
    ///
    /// 结果的 year 取第一个校历的年份; 输入为空时返回 fallback_year 的空校历
    pub fn merged<'a, I>(fallback_year: i32, calendars: I) -> Self
    where
        I: IntoIterator<Item = &'a CalendarYear>,
    {
        let mut iter = calendars.into_iter();
        let mut result = match iter.next() {
            Some(first) => first.clone(),
            None => return Self::new(fallback_year),
        };
        for calendar in iter {
            result.holidays.extend(calendar.holidays.iter().copied());
            result
                .working_day_overrides
                .extend(calendar.working_day_overrides.iter().copied());
        }
        result
    }
}

/// 解析 ISO 日期列表,跳过非法值
fn parse_iso_dates<S: AsRef<str>>(values: &[S], field: &str) -> BTreeSet<NaiveDate> {
    values
        .iter()
        .filter_map(|raw| {
            let raw = raw.as_ref().trim();
            match NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    tracing::warn!(field, raw_value = %raw, "校历日期格式错误，已跳过");
                    None
                }
            }
        })
        .collect()
}
