// ==========================================
// 教学计划排课系统 - 排课配置读取 Trait
// ==========================================
// 职责: 定义排课流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::calendar::CalendarYear;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::error::Error;

/// 配置读取错误
pub type ConfigReadError = Box<dyn Error + Send + Sync>;

// ==========================================
// PlanningConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PlanningConfigReader: Send + Sync {
    // ===== 兜底校历 =====

    /// 获取兜底节假日（某年校历未登记时使用）
    ///
    /// # 默认值
    /// - 01-01, 01-26, 08-15, 10-02, 12-25（每年固定日期）
    async fn get_fallback_holidays(&self, year: i32) -> Result<Vec<NaiveDate>, ConfigReadError>;

    /// 获取兜底调休工作日
    ///
    /// # 默认值
    /// - 空
    async fn get_fallback_working_days(
        &self,
        year: i32,
    ) -> Result<Vec<NaiveDate>, ConfigReadError>;

    // ===== 导入校验 =====

    /// 是否严格校验导入数据（true: 非法行使导入失败; false: 跳过非法行）
    ///
    /// # 默认值
    /// - false
    async fn get_strict_input_validation(&self) -> Result<bool, ConfigReadError>;

    // ===== 界面 =====

    /// 默认语言
    ///
    /// # 默认值
    /// - zh-CN
    async fn get_default_locale(&self) -> Result<String, ConfigReadError>;

    /// 组装兜底校历
    async fn get_fallback_calendar(&self, year: i32) -> Result<CalendarYear, ConfigReadError> {
        let mut calendar = CalendarYear::new(year);
        calendar.holidays.extend(self.get_fallback_holidays(year).await?);
        calendar
            .working_day_overrides
            .extend(self.get_fallback_working_days(year).await?);
        Ok(calendar)
    }
}
