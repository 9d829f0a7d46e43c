// ==========================================
// 教学计划排课系统 - 周课表导入器
// ==========================================
// 列: weekday, start_time, end_time, room, subject, faculty
// 同一星期内的课时保持文件中的先后顺序
// ==========================================

use crate::domain::timetable::{TimeSlot, WeeklyTimetable};
use crate::domain::types::Weekday;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{columns, FieldMapper};
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use crate::importer::import_report::{ImportReport, ValidationMode};
use std::path::Path;
use tracing::instrument;

pub struct TimetableImporter {
    mapper: FieldMapper,
    mode: ValidationMode,
}

impl TimetableImporter {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            mapper: FieldMapper,
            mode,
        }
    }

    /// 从 CSV / Excel 文件导入周课表
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> ImportResult<ImportReport<WeeklyTimetable>> {
        let rows = UniversalFileParser.parse(path.as_ref())?;
        let report = self.import_rows(&rows)?;
        if report.imported_rows == 0 {
            return Err(ImportError::NoValidRows(path.as_ref().display().to_string()));
        }
        Ok(report)
    }

    /// 从原始行组装周课表
    pub fn import_rows(&self, rows: &[RawRow]) -> ImportResult<ImportReport<WeeklyTimetable>> {
        self.mapper.require_columns(
            rows,
            &[columns::WEEKDAY, columns::START_TIME, columns::END_TIME],
        )?;

        let mut report = ImportReport::new(WeeklyTimetable::new());
        for row in rows {
            match self.map_row(row) {
                Ok((weekday, slot)) => {
                    report.data.push(weekday, slot);
                    report.imported_rows += 1;
                }
                Err(err) => report.reject_row(self.mode, row.row_number, err)?,
            }
        }

        tracing::info!(
            imported = report.imported_rows,
            skipped = report.skipped_rows.len(),
            slots_per_week = report.data.slots_per_week(),
            "周课表导入完成"
        );
        Ok(report)
    }

    fn map_row(&self, row: &RawRow) -> ImportResult<(Weekday, TimeSlot)> {
        let weekday = self.mapper.parse_weekday(row, columns::WEEKDAY)?;
        let (start, start_text) = self.mapper.parse_time(row, columns::START_TIME)?;
        let (end, end_text) = self.mapper.parse_time(row, columns::END_TIME)?;
        if start >= end {
            return Err(ImportError::field(
                row.row_number,
                columns::END_TIME,
                format!("结束时刻 {} 不晚于开始时刻 {}", end_text, start_text),
            ));
        }

        Ok((
            weekday,
            TimeSlot {
                start_time: start_text,
                end_time: end_text,
                room: self.mapper.get_string(row, columns::ROOM),
                subject: self.mapper.get_string(row, columns::SUBJECT),
                faculty: self.mapper.get_string(row, columns::FACULTY),
            },
        ))
    }
}

impl Default for TimetableImporter {
    fn default() -> Self {
        Self::new(ValidationMode::default())
    }
}
