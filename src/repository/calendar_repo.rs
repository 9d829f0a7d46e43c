// ==========================================
// 教学计划排课系统 - 校历数据仓储
// ==========================================
// 存储: calendar_year + calendar_date (HOLIDAY / WORKING_DAY)
// ==========================================

use crate::domain::calendar::{CalendarYear, ISO_DATE_FORMAT};
use crate::domain::types::CalendarDateKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// CalendarRepository - 校历仓储
// ==========================================
pub struct CalendarRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CalendarRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按年份读取校历
    ///
    /// # 返回
    /// - Ok(Some(CalendarYear)): 已登记该年校历
    /// - Ok(None): 未登记（调用方使用配置中的兜底节假日）
    pub fn find_by_year(&self, year: i32) -> RepositoryResult<Option<CalendarYear>> {
        let conn = self.get_conn()?;

        let exists = conn
            .query_row(
                "SELECT 1 FROM calendar_year WHERE year = ?1",
                params![year],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !exists {
            return Ok(None);
        }

        let mut stmt =
            conn.prepare("SELECT date, kind FROM calendar_date WHERE year = ?1 ORDER BY date")?;
        let rows = stmt.query_map(params![year], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut calendar = CalendarYear::new(year);
        for row in rows {
            let (date_raw, kind_raw) = row?;
            let date = match NaiveDate::parse_from_str(date_raw.trim(), ISO_DATE_FORMAT) {
                Ok(d) => d,
                Err(_) => {
                    tracing::warn!(year, date = %date_raw, "校历日期格式错误，已跳过");
                    continue;
                }
            };
            match CalendarDateKind::from_str(&kind_raw) {
                Some(CalendarDateKind::Holiday) => {
                    calendar.holidays.insert(date);
                }
                Some(CalendarDateKind::WorkingDay) => {
                    calendar.working_day_overrides.insert(date);
                }
                None => {
                    tracing::warn!(year, kind = %kind_raw, "校历日期类型无法识别，已跳过");
                }
            }
        }

        Ok(Some(calendar))
    }

    /// 写入（覆盖）某年校历
    pub fn upsert(&self, calendar: &CalendarYear) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO calendar_year (year, updated_at) VALUES (?1, datetime('now'))
            ON CONFLICT(year) DO UPDATE SET updated_at = datetime('now')
            "#,
            params![calendar.year],
        )?;
        tx.execute(
            "DELETE FROM calendar_date WHERE year = ?1",
            params![calendar.year],
        )?;

        {
            let mut stmt =
                tx.prepare("INSERT INTO calendar_date (year, date, kind) VALUES (?1, ?2, ?3)")?;
            let entries = calendar
                .holidays
                .iter()
                .map(|d| (d, CalendarDateKind::Holiday))
                .chain(
                    calendar
                        .working_day_overrides
                        .iter()
                        .map(|d| (d, CalendarDateKind::WorkingDay)),
                );
            for (date, kind) in entries {
                stmt.execute(params![
                    calendar.year,
                    date.format(ISO_DATE_FORMAT).to_string(),
                    kind.to_db_str(),
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 删除某年校历
    pub fn delete(&self, year: i32) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM calendar_year WHERE year = ?1", params![year])?;
        Ok(affected)
    }
}
