// ==========================================
// 教学计划排课系统 - 课表与校历 API
// ==========================================
// 职责: 周课表 / 校历的导入、保存、查询
// 校验模式: 配置项 strict_input_validation
// ==========================================

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::PlanningConfigReader;
use crate::domain::calendar::CalendarYear;
use crate::domain::timetable::WeeklyTimetable;
use crate::importer::{CalendarImporter, ImportReport, TimetableImporter, ValidationMode};
use crate::perf::PerfGuard;
use crate::repository::{CalendarRepository, TimetableRepository};

pub struct TimetableApi {
    timetable_repo: Arc<TimetableRepository>,
    calendar_repo: Arc<CalendarRepository>,
    config: Arc<dyn PlanningConfigReader>,
}

impl TimetableApi {
    pub fn new(
        timetable_repo: Arc<TimetableRepository>,
        calendar_repo: Arc<CalendarRepository>,
        config: Arc<dyn PlanningConfigReader>,
    ) -> Self {
        Self {
            timetable_repo,
            calendar_repo,
            config,
        }
    }

    async fn validation_mode(&self) -> ApiResult<ValidationMode> {
        let strict = self
            .config
            .get_strict_input_validation()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(ValidationMode::from_strict_flag(strict))
    }

    // ==========================================
    // 周课表
    // ==========================================

    /// 导入周课表文件并整体替换该教学班课表
    pub async fn import_timetable_file(
        &self,
        group_id: &str,
        path: &Path,
    ) -> ApiResult<ImportReport<WeeklyTimetable>> {
        let _perf = PerfGuard::new("import_timetable_file");
        validate_group_id(group_id)?;

        let importer = TimetableImporter::new(self.validation_mode().await?);
        let report = importer.import_file(path)?;
        let written = self.timetable_repo.replace_for_group(group_id, &report.data)?;

        info!(group_id, written, skipped = report.skipped_rows.len(), "周课表已保存");
        Ok(report)
    }

    pub fn save_timetable(&self, group_id: &str, timetable: &WeeklyTimetable) -> ApiResult<usize> {
        validate_group_id(group_id)?;
        Ok(self.timetable_repo.replace_for_group(group_id, timetable)?)
    }

    /// 读取周课表（未登记时为空课表）
    pub fn get_timetable(&self, group_id: &str) -> ApiResult<WeeklyTimetable> {
        Ok(self.timetable_repo.find_by_group(group_id)?)
    }

    pub fn list_groups(&self) -> ApiResult<Vec<String>> {
        Ok(self.timetable_repo.list_groups()?)
    }

    // ==========================================
    // 校历
    // ==========================================

    /// 导入某年校历文件（覆盖该年已有校历）
    pub async fn import_calendar_file(
        &self,
        year: i32,
        path: &Path,
    ) -> ApiResult<ImportReport<CalendarYear>> {
        let _perf = PerfGuard::new("import_calendar_file");

        let importer = CalendarImporter::new(self.validation_mode().await?);
        let report = importer.import_file(path, year)?;
        self.calendar_repo.upsert(&report.data)?;

        info!(
            year,
            holidays = report.data.holidays.len(),
            working_day_overrides = report.data.working_day_overrides.len(),
            "校历已保存"
        );
        Ok(report)
    }

    pub fn save_calendar(&self, calendar: &CalendarYear) -> ApiResult<()> {
        let outside = calendar
            .holidays
            .iter()
            .chain(calendar.working_day_overrides.iter())
            .find(|date| chrono::Datelike::year(*date) != calendar.year);
        if let Some(date) = outside {
            return Err(ApiError::InvalidInput(format!(
                "日期 {} 不属于 {} 年",
                date, calendar.year
            )));
        }
        Ok(self.calendar_repo.upsert(calendar)?)
    }

    /// 读取已登记的校历
    ///
    /// # 返回
    /// - Ok(None): 该年未登记（排期时使用兜底节假日）
    pub fn get_calendar(&self, year: i32) -> ApiResult<Option<CalendarYear>> {
        Ok(self.calendar_repo.find_by_year(year)?)
    }
}

fn validate_group_id(group_id: &str) -> ApiResult<()> {
    if group_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("教学班不能为空".to_string()));
    }
    Ok(())
}
