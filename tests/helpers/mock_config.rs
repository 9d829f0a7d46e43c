// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use teaching_plan::config::{ConfigReadError, PlanningConfigReader};

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub fallback_holidays: Vec<NaiveDate>,
    pub fallback_working_days: Vec<NaiveDate>,
    pub strict_input_validation: bool,
    pub default_locale: String,
    /// true 时所有读取返回错误
    pub broken: bool,
}

impl MockConfig {
    /// 创建默认配置（无兜底节假日,宽松导入）
    pub fn default() -> Self {
        Self {
            fallback_holidays: Vec::new(),
            fallback_working_days: Vec::new(),
            strict_input_validation: false,
            default_locale: "zh-CN".to_string(),
            broken: false,
        }
    }

    pub fn with_fallback_holidays(holidays: Vec<NaiveDate>) -> Self {
        let mut config = Self::default();
        config.fallback_holidays = holidays;
        config
    }

    pub fn strict() -> Self {
        let mut config = Self::default();
        config.strict_input_validation = true;
        config
    }

    pub fn broken() -> Self {
        let mut config = Self::default();
        config.broken = true;
        config
    }

    fn check(&self) -> Result<(), ConfigReadError> {
        if self.broken {
            return Err("mock config unavailable".into());
        }
        Ok(())
    }
}

#[async_trait]
impl PlanningConfigReader for MockConfig {
    async fn get_fallback_holidays(&self, year: i32) -> Result<Vec<NaiveDate>, ConfigReadError> {
        self.check()?;
        Ok(self
            .fallback_holidays
            .iter()
            .copied()
            .filter(|d| d.year() == year)
            .collect())
    }

    async fn get_fallback_working_days(
        &self,
        year: i32,
    ) -> Result<Vec<NaiveDate>, ConfigReadError> {
        self.check()?;
        Ok(self
            .fallback_working_days
            .iter()
            .copied()
            .filter(|d| d.year() == year)
            .collect())
    }

    async fn get_strict_input_validation(&self) -> Result<bool, ConfigReadError> {
        self.check()?;
        Ok(self.strict_input_validation)
    }

    async fn get_default_locale(&self) -> Result<String, ConfigReadError> {
        self.check()?;
        Ok(self.default_locale.clone())
    }
}
