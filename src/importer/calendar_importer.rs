// ==========================================
// 教学计划排课系统 - 校历导入器
// ==========================================
// 列: date, kind (HOLIDAY | WORKING_DAY; 缺省为 HOLIDAY)
// ==========================================

use crate::domain::calendar::CalendarYear;
use crate::domain::types::CalendarDateKind;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{columns, FieldMapper};
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use crate::importer::import_report::{ImportReport, ValidationMode};
use chrono::{Datelike, NaiveDate};
use std::path::Path;
use tracing::instrument;

pub struct CalendarImporter {
    mapper: FieldMapper,
    mode: ValidationMode,
}

impl CalendarImporter {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            mapper: FieldMapper,
            mode,
        }
    }

    /// 从文件导入某年校历
    ///
    /// 只有表头的文件视为该年无特殊日期; 有数据行但全部非法时返回 NoValidRows
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(
        &self,
        path: P,
        year: i32,
    ) -> ImportResult<ImportReport<CalendarYear>> {
        let rows = UniversalFileParser.parse(path.as_ref())?;
        let report = self.import_rows(&rows, year)?;
        if !rows.is_empty() && report.imported_rows == 0 {
            return Err(ImportError::NoValidRows(path.as_ref().display().to_string()));
        }
        Ok(report)
    }

    /// 从原始行组装校历; 不属于该年份的日期视为非法行
    pub fn import_rows(&self, rows: &[RawRow], year: i32) -> ImportResult<ImportReport<CalendarYear>> {
        self.mapper.require_columns(rows, &[columns::DATE])?;

        let mut report = ImportReport::new(CalendarYear::new(year));
        for row in rows {
            match self.map_row(row, year) {
                Ok((date, CalendarDateKind::Holiday)) => {
                    report.data.holidays.insert(date);
                    report.imported_rows += 1;
                }
                Ok((date, CalendarDateKind::WorkingDay)) => {
                    report.data.working_day_overrides.insert(date);
                    report.imported_rows += 1;
                }
                Err(err) => report.reject_row(self.mode, row.row_number, err)?,
            }
        }

        tracing::info!(
            year,
            holidays = report.data.holidays.len(),
            working_day_overrides = report.data.working_day_overrides.len(),
            skipped = report.skipped_rows.len(),
            "校历导入完成"
        );
        Ok(report)
    }

    fn map_row(&self, row: &RawRow, year: i32) -> ImportResult<(NaiveDate, CalendarDateKind)> {
        let date = self.mapper.parse_date(row, columns::DATE)?;
        if date.year() != year {
            return Err(ImportError::field(
                row.row_number,
                columns::DATE,
                format!("日期 {} 不属于 {} 年", date, year),
            ));
        }

        let kind = match self.mapper.get_string(row, columns::KIND) {
            None => CalendarDateKind::Holiday,
            Some(raw) => CalendarDateKind::from_str(&raw).ok_or_else(|| {
                ImportError::field(
                    row.row_number,
                    columns::KIND,
                    format!("无法识别的日期类型: {}", raw),
                )
            })?,
        };
        Ok((date, kind))
    }
}

impl Default for CalendarImporter {
    fn default() -> Self {
        Self::new(ValidationMode::default())
    }
}
