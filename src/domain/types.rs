// ==========================================
// 教学计划排课系统 - 领域类型定义
// ==========================================
// 星期、课题优先级、日历日期类型
// 序列化格式与数据库存储保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 星期 (Weekday)
// ==========================================
// 红线: 课表按枚举键存储,不接受字符串键（杜绝 "Munday" 类拼写错误）
// 顺序: Monday < ... < Sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// 全部星期（周一到周日）
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// 英文全称（与课表数据中的键一致）
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// 从字符串解析星期
    ///
    /// 接受英文全称、三字母缩写和中文（周一/星期一），大小写不敏感。
    /// 无法识别时返回 None，由调用方决定跳过还是报错。
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" | "周一" | "星期一" => Some(Weekday::Monday),
            "tuesday" | "tue" | "tues" | "周二" | "星期二" => Some(Weekday::Tuesday),
            "wednesday" | "wed" | "周三" | "星期三" => Some(Weekday::Wednesday),
            "thursday" | "thu" | "thur" | "thurs" | "周四" | "星期四" => Some(Weekday::Thursday),
            "friday" | "fri" | "周五" | "星期五" => Some(Weekday::Friday),
            "saturday" | "sat" | "周六" | "星期六" => Some(Weekday::Saturday),
            "sunday" | "sun" | "周日" | "星期日" | "星期天" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        self.name()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// 课题优先级 (Topic Priority)
// ==========================================
// CORE: 占用一个课时; SELF_STUDY: 不占课时
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopicPriority {
    Core,      // 课堂讲授
    SelfStudy, // 自学
}

impl fmt::Display for TopicPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicPriority::Core => write!(f, "CORE"),
            TopicPriority::SelfStudy => write!(f, "SELF_STUDY"),
        }
    }
}

impl TopicPriority {
    /// 从字符串解析优先级
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CORE" => Some(TopicPriority::Core),
            "SELF_STUDY" => Some(TopicPriority::SelfStudy),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TopicPriority::Core => "CORE",
            TopicPriority::SelfStudy => "SELF_STUDY",
        }
    }
}

// ==========================================
// 日历日期类型 (Calendar Date Kind)
// ==========================================
// calendar_date 表中每条记录的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarDateKind {
    Holiday,    // 节假日（任何星期都不排课）
    WorkingDay, // 调休工作日（仅对周日生效）
}

impl fmt::Display for CalendarDateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl CalendarDateKind {
    /// 从字符串解析日期类型
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "HOLIDAY" | "节假日" | "假日" => Some(CalendarDateKind::Holiday),
            "WORKING_DAY" | "WORKING" | "OVERRIDE" | "调休" | "工作日" => {
                Some(CalendarDateKind::WorkingDay)
            }
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CalendarDateKind::Holiday => "HOLIDAY",
            CalendarDateKind::WorkingDay => "WORKING_DAY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    #[test]
    fn test_weekday_from_str_variants() {
        assert_eq!(Weekday::from_str("Monday"), Some(Weekday::Monday));
        assert_eq!(Weekday::from_str("  friday "), Some(Weekday::Friday));
        assert_eq!(Weekday::from_str("SAT"), Some(Weekday::Saturday));
        assert_eq!(Weekday::from_str("周日"), Some(Weekday::Sunday));
        assert_eq!(Weekday::from_str("Munday"), None);
    }

    #[test]
    fn test_weekday_from_chrono() {
        // 2026-01-01 是周四
        let d = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(Weekday::from(d.weekday()), Weekday::Thursday);
    }

    #[test]
    fn test_weekday_serde_uses_full_name() {
        let json = serde_json::to_string(&Weekday::Wednesday).unwrap();
        assert_eq!(json, "\"Wednesday\"");
    }

    #[test]
    fn test_topic_priority_serde() {
        let json = serde_json::to_string(&TopicPriority::SelfStudy).unwrap();
        assert_eq!(json, "\"SELF_STUDY\"");
        assert_eq!(TopicPriority::from_str("core"), Some(TopicPriority::Core));
    }

    #[test]
    fn test_calendar_date_kind_aliases() {
        assert_eq!(CalendarDateKind::from_str("holiday"), Some(CalendarDateKind::Holiday));
        assert_eq!(CalendarDateKind::from_str("调休"), Some(CalendarDateKind::WorkingDay));
        assert_eq!(CalendarDateKind::from_str("???"), None);
    }
}
