// ==========================================
// 教学计划排课系统 - 导入层
// ==========================================
// 职责: 外部文件（周课表、校历、课题清单）→ 领域对象
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod calendar_importer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_report;
pub mod timetable_importer;
pub mod topic_importer;

// 重导出核心类型
pub use calendar_importer::CalendarImporter;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use import_report::{ImportReport, SkippedRow, ValidationMode};
pub use timetable_importer::TimetableImporter;
pub use topic_importer::TopicImporter;
