// ==========================================
// 教学计划排课系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::planning_config_trait::{ConfigReadError, PlanningConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::calendar::ISO_DATE_FORMAT;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 兜底节假日默认值（MM-DD 每年固定; 也可写 YYYY-MM-DD 指定年份）
pub const DEFAULT_FALLBACK_HOLIDAYS: &str = "01-01,01-26,08-15,10-02,12-25";

/// 默认语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigReadError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigReadError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigReadError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigReadError> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global 配置（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), ConfigReadError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigReadError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名 global 配置，快照中没有的键保持不变
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, ConfigReadError> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 解析日期列表配置
    ///
    /// 支持 MM-DD（每年）与 YYYY-MM-DD（仅匹配年份生效）; 非法项告警后跳过
    fn parse_date_list(key: &str, raw: &str, year: i32) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let parsed = match NaiveDate::parse_from_str(item, ISO_DATE_FORMAT) {
                Ok(date) => Some(date).filter(|d| d.year() == year),
                Err(_) => parse_month_day(item, year),
            };
            match parsed {
                Some(date) => dates.push(date),
                None if NaiveDate::parse_from_str(item, ISO_DATE_FORMAT).is_ok() => {}
                None => tracing::warn!(
                    config_key = key,
                    raw_value = %item,
                    year,
                    "日期配置项格式错误，已跳过"
                ),
            }
        }
        dates.sort();
        dates.dedup();
        dates
    }
}

/// 解析 MM-DD
fn parse_month_day(item: &str, year: i32) -> Option<NaiveDate> {
    let (month, day) = item.split_once('-')?;
    let month = month.trim().parse::<u32>().ok()?;
    let day = day.trim().parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// ==========================================
// PlanningConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PlanningConfigReader for ConfigManager {
    async fn get_fallback_holidays(&self, year: i32) -> Result<Vec<NaiveDate>, ConfigReadError> {
        let value =
            self.get_config_or_default(config_keys::FALLBACK_HOLIDAYS, DEFAULT_FALLBACK_HOLIDAYS)?;
        Ok(Self::parse_date_list(config_keys::FALLBACK_HOLIDAYS, &value, year))
    }

    async fn get_fallback_working_days(
        &self,
        year: i32,
    ) -> Result<Vec<NaiveDate>, ConfigReadError> {
        let value = self.get_config_or_default(config_keys::FALLBACK_WORKING_DAYS, "")?;
        Ok(Self::parse_date_list(config_keys::FALLBACK_WORKING_DAYS, &value, year))
    }

    async fn get_strict_input_validation(&self) -> Result<bool, ConfigReadError> {
        let value = self.get_config_or_default(config_keys::STRICT_INPUT_VALIDATION, "false")?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            _ => {
                tracing::warn!(
                    config_key = config_keys::STRICT_INPUT_VALIDATION,
                    raw_value = %value,
                    "布尔配置格式错误，使用默认值 false"
                );
                Ok(false)
            }
        }
    }

    async fn get_default_locale(&self) -> Result<String, ConfigReadError> {
        let value = self.get_config_or_default(config_keys::DEFAULT_LOCALE, DEFAULT_LOCALE)?;
        let value = value.trim();
        if value.is_empty() {
            Ok(DEFAULT_LOCALE.to_string())
        } else {
            Ok(value.to_string())
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 兜底校历
    pub const FALLBACK_HOLIDAYS: &str = "fallback_holidays";
    pub const FALLBACK_WORKING_DAYS: &str = "fallback_working_days";

    // 导入校验
    pub const STRICT_INPUT_VALIDATION: &str = "strict_input_validation";

    // 界面
    pub const DEFAULT_LOCALE: &str = "default_locale";
}
