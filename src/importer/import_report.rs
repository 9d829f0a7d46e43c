// ==========================================
// 教学计划排课系统 - 导入结果与校验模式
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::Serialize;

/// 行级校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// 非法行告警后跳过
    #[default]
    Lenient,
    /// 任一非法行使整个导入失败
    Strict,
}

impl ValidationMode {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        }
    }
}

/// 被跳过的行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: String,
}

/// 导入结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport<T> {
    pub data: T,
    pub imported_rows: usize,
    pub skipped_rows: Vec<SkippedRow>,
}

impl<T> ImportReport<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            imported_rows: 0,
            skipped_rows: Vec::new(),
        }
    }

    /// 处理行级错误: Strict 直接返回错误; Lenient 记录并跳过
    pub fn reject_row(
        &mut self,
        mode: ValidationMode,
        row_number: usize,
        err: ImportError,
    ) -> ImportResult<()> {
        match mode {
            ValidationMode::Strict => Err(err),
            ValidationMode::Lenient => {
                tracing::warn!(row_number, error = %err, "导入行无效，已跳过");
                self.skipped_rows.push(SkippedRow {
                    row_number,
                    reason: err.to_string(),
                });
                Ok(())
            }
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ImportReport<U> {
        ImportReport {
            data: f(self.data),
            imported_rows: self.imported_rows,
            skipped_rows: self.skipped_rows,
        }
    }
}
