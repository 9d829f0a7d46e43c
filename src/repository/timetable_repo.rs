// ==========================================
// 教学计划排课系统 - 周课表数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: timetable_slot (group_id, weekday, position)
// ==========================================

use crate::domain::timetable::{TimeSlot, WeeklyTimetable};
use crate::domain::types::Weekday;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// TimetableRepository - 周课表仓储
// ==========================================
pub struct TimetableRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimetableRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取教学班周课表
    ///
    /// 无法识别的星期值被跳过并记录告警; 无记录时返回空课表
    pub fn find_by_group(&self, group_id: &str) -> RepositoryResult<WeeklyTimetable> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT weekday, start_time, end_time, room, subject, faculty
            FROM timetable_slot
            WHERE group_id = ?1
            ORDER BY weekday, position
            "#,
        )?;

        let rows = stmt.query_map(params![group_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                TimeSlot {
                    start_time: row.get(1)?,
                    end_time: row.get(2)?,
                    room: row.get(3)?,
                    subject: row.get(4)?,
                    faculty: row.get(5)?,
                },
            ))
        })?;

        let mut timetable = WeeklyTimetable::new();
        for row in rows {
            let (weekday_raw, slot) = row?;
            match Weekday::from_str(&weekday_raw) {
                Some(weekday) => timetable.push(weekday, slot),
                None => tracing::warn!(
                    group_id,
                    weekday = %weekday_raw,
                    "课表星期值无法识别，已跳过"
                ),
            }
        }

        Ok(timetable)
    }

    /// 整体替换教学班周课表（事务内先删后插）
    ///
    /// # 返回
    /// 写入的课时数
    pub fn replace_for_group(
        &self,
        group_id: &str,
        timetable: &WeeklyTimetable,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM timetable_slot WHERE group_id = ?1",
            params![group_id],
        )?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO timetable_slot (
                    group_id, weekday, position, start_time, end_time, room, subject, faculty
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;

            for (weekday, slots) in timetable.iter() {
                for (position, slot) in slots.iter().enumerate() {
                    stmt.execute(params![
                        group_id,
                        weekday.to_db_str(),
                        position as i64,
                        slot.start_time,
                        slot.end_time,
                        slot.room,
                        slot.subject,
                        slot.faculty,
                    ])?;
                    count += 1;
                }
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    /// 列出已有课表的教学班
    pub fn list_groups(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT group_id FROM timetable_slot ORDER BY group_id")?;
        let groups = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(groups)
    }
}
