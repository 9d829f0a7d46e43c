// ==========================================
// 教学计划排课系统 - 字段映射器
// ==========================================
// 职责: 源列名（中英文别名）→ 标准字段 + 类型转换
// ==========================================

use crate::domain::calendar::ISO_DATE_FORMAT;
use crate::domain::types::Weekday;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::{NaiveDate, NaiveTime};

/// 标准列名
pub mod columns {
    pub const WEEKDAY: &str = "weekday";
    pub const START_TIME: &str = "start_time";
    pub const END_TIME: &str = "end_time";
    pub const ROOM: &str = "room";
    pub const SUBJECT: &str = "subject";
    pub const FACULTY: &str = "faculty";

    pub const DATE: &str = "date";
    pub const KIND: &str = "kind";

    pub const TITLE: &str = "title";
    pub const DURATION: &str = "duration";
    pub const IS_SELF_STUDY: &str = "is_self_study";
    pub const SEQUENCE_ORDER: &str = "sequence_order";
}

pub struct FieldMapper;

impl FieldMapper {
    /// 标准列名的全部可接受写法
    fn aliases(column: &str) -> &'static [&'static str] {
        match column {
            columns::WEEKDAY => &["weekday", "day", "day_of_week", "星期"],
            columns::START_TIME => &["start_time", "start", "开始时间"],
            columns::END_TIME => &["end_time", "end", "结束时间"],
            columns::ROOM => &["room", "教室"],
            columns::SUBJECT => &["subject", "科目", "课程"],
            columns::FACULTY => &["faculty", "teacher", "教师"],
            columns::DATE => &["date", "日期"],
            columns::KIND => &["kind", "type", "类型"],
            columns::TITLE => &["title", "topic", "课题", "标题"],
            columns::DURATION => &["duration", "时长"],
            columns::IS_SELF_STUDY => &["is_self_study", "self_study", "自学"],
            columns::SEQUENCE_ORDER => &["sequence_order", "order", "seq", "顺序"],
            _ => &[],
        }
    }

    fn matches_column(header: &str, column: &str) -> bool {
        let header = header.trim();
        header.eq_ignore_ascii_case(column)
            || Self::aliases(column)
                .iter()
                .any(|alias| header.eq_ignore_ascii_case(alias))
    }

    /// 表头中是否存在该列（任一别名）
    pub fn has_column(&self, row: &RawRow, column: &str) -> bool {
        row.fields.keys().any(|h| Self::matches_column(h, column))
    }

    /// 校验必需列; 以首行表头为准
    pub fn require_columns(&self, rows: &[RawRow], required: &[&str]) -> ImportResult<()> {
        let Some(first) = rows.first() else {
            return Ok(());
        };
        for column in required {
            if !self.has_column(first, column) {
                return Err(ImportError::MissingColumn {
                    column: column.to_string(),
                    found: first.headers().join(","),
                });
            }
        }
        Ok(())
    }

    /// 提取字符串字段（空白视为缺失）
    pub fn get_string(&self, row: &RawRow, column: &str) -> Option<String> {
        row.fields
            .iter()
            .filter(|(header, _)| Self::matches_column(header, column))
            .map(|(_, value)| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn require_string(&self, row: &RawRow, column: &str) -> ImportResult<String> {
        self.get_string(row, column)
            .ok_or_else(|| ImportError::field(row.row_number, column, "必填字段为空"))
    }

    /// 解析整数
    pub fn parse_i32(&self, row: &RawRow, column: &str) -> ImportResult<Option<i32>> {
        match self.get_string(row, column) {
            None => Ok(None),
            Some(value) => value
                .parse::<i32>()
                .or_else(|_| {
                    // Excel 数值单元格可能带小数部分（如 "3.0"）
                    value
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0 && f.abs() <= i32::MAX as f64)
                        .map(|f| f as i32)
                        .ok_or(())
                })
                .map(Some)
                .map_err(|_| {
                    ImportError::field(row.row_number, column, format!("无法解析为整数: {}", value))
                }),
        }
    }

    /// 解析布尔值（缺失为 false）
    pub fn parse_bool(&self, row: &RawRow, column: &str) -> ImportResult<bool> {
        let Some(value) = self.get_string(row, column) else {
            return Ok(false);
        };
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "是" => Ok(true),
            "false" | "0" | "no" | "n" | "否" => Ok(false),
            _ => Err(ImportError::field(
                row.row_number,
                column,
                format!("无法解析为布尔值: {}", value),
            )),
        }
    }

    /// 解析日期（YYYY-MM-DD / YYYY/MM/DD / YYYYMMDD）
    pub fn parse_date(&self, row: &RawRow, column: &str) -> ImportResult<NaiveDate> {
        let value = self.require_string(row, column)?;
        NaiveDate::parse_from_str(&value, ISO_DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(&value, "%Y/%m/%d"))
            .or_else(|_| NaiveDate::parse_from_str(&value, "%Y%m%d"))
            .map_err(|_| {
                ImportError::field(row.row_number, column, format!("日期格式错误: {}", value))
            })
    }

    /// 解析时刻并规范化为 HH:MM
    pub fn parse_time(&self, row: &RawRow, column: &str) -> ImportResult<(NaiveTime, String)> {
        let value = self.require_string(row, column)?;
        let time = NaiveTime::parse_from_str(&value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
            .map_err(|_| {
                ImportError::field(row.row_number, column, format!("时刻格式错误: {}", value))
            })?;
        Ok((time, time.format("%H:%M").to_string()))
    }

    /// 解析星期
    pub fn parse_weekday(&self, row: &RawRow, column: &str) -> ImportResult<Weekday> {
        let value = self.require_string(row, column)?;
        Weekday::from_str(&value).ok_or_else(|| {
            ImportError::field(row.row_number, column, format!("无法识别的星期: {}", value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        RawRow {
            row_number: 2,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_aliases_and_case_insensitive_headers() {
        let mapper = FieldMapper;
        let r = row(&[("星期", "周五"), ("Start_Time", "9:05"), ("课程", " STQA ")]);

        assert_eq!(mapper.parse_weekday(&r, columns::WEEKDAY).unwrap(), Weekday::Friday);
        assert_eq!(mapper.parse_time(&r, columns::START_TIME).unwrap().1, "09:05");
        assert_eq!(mapper.get_string(&r, columns::SUBJECT), Some("STQA".to_string()));
        assert_eq!(mapper.get_string(&r, columns::ROOM), None);
    }

    #[test]
    fn test_require_columns_reports_missing() {
        let mapper = FieldMapper;
        let rows = vec![row(&[("title", "Intro")])];
        let err = mapper
            .require_columns(&rows, &[columns::TITLE, columns::SEQUENCE_ORDER])
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn { column, .. } if column == "sequence_order"));
    }

    #[test]
    fn test_parse_i32_accepts_excel_float() {
        let mapper = FieldMapper;
        assert_eq!(
            mapper.parse_i32(&row(&[("order", "3.0")]), columns::SEQUENCE_ORDER).unwrap(),
            Some(3)
        );
        assert!(mapper
            .parse_i32(&row(&[("order", "3.5")]), columns::SEQUENCE_ORDER)
            .is_err());
    }

    #[test]
    fn test_parse_bool_and_date() {
        let mapper = FieldMapper;
        assert!(mapper.parse_bool(&row(&[("自学", "是")]), columns::IS_SELF_STUDY).unwrap());
        assert!(!mapper.parse_bool(&row(&[]), columns::IS_SELF_STUDY).unwrap());
        assert!(mapper.parse_bool(&row(&[("self_study", "perhaps")]), columns::IS_SELF_STUDY).is_err());

        assert_eq!(
            mapper.parse_date(&row(&[("date", "20260126")]), columns::DATE).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 26).unwrap()
        );
    }
}
