// ==========================================
// 教学计划排课系统 - 课题清单导入器
// ==========================================
// 列: title, duration, is_self_study, sequence_order
// 输出按 sequence_order 稳定排序; 缺省序号取文件中的位置
// ==========================================

use crate::domain::topic::Topic;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{columns, FieldMapper};
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use crate::importer::import_report::{ImportReport, ValidationMode};
use std::path::Path;
use tracing::instrument;

pub struct TopicImporter {
    mapper: FieldMapper,
    mode: ValidationMode,
}

impl TopicImporter {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            mapper: FieldMapper,
            mode,
        }
    }

    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<ImportReport<Vec<Topic>>> {
        let rows = UniversalFileParser.parse(path.as_ref())?;
        let report = self.import_rows(&rows)?;
        if report.imported_rows == 0 {
            return Err(ImportError::NoValidRows(path.as_ref().display().to_string()));
        }
        Ok(report)
    }

    pub fn import_rows(&self, rows: &[RawRow]) -> ImportResult<ImportReport<Vec<Topic>>> {
        self.mapper.require_columns(rows, &[columns::TITLE])?;

        let mut report = ImportReport::new(Vec::with_capacity(rows.len()));
        for (position, row) in rows.iter().enumerate() {
            match self.map_row(row, position as i32 + 1) {
                Ok(topic) => {
                    report.data.push(topic);
                    report.imported_rows += 1;
                }
                Err(err) => report.reject_row(self.mode, row.row_number, err)?,
            }
        }

        report.data.sort_by_key(|topic| topic.sequence_order);

        tracing::info!(
            imported = report.imported_rows,
            skipped = report.skipped_rows.len(),
            self_study = report.data.iter().filter(|t| t.is_self_study).count(),
            "课题清单导入完成"
        );
        Ok(report)
    }

    fn map_row(&self, row: &RawRow, position: i32) -> ImportResult<Topic> {
        Ok(Topic {
            title: self.mapper.require_string(row, columns::TITLE)?,
            duration: self
                .mapper
                .get_string(row, columns::DURATION)
                .unwrap_or_default(),
            is_self_study: self.mapper.parse_bool(row, columns::IS_SELF_STUDY)?,
            sequence_order: self
                .mapper
                .parse_i32(row, columns::SEQUENCE_ORDER)?
                .unwrap_or(position),
        })
    }
}

impl Default for TopicImporter {
    fn default() -> Self {
        Self::new(ValidationMode::default())
    }
}
