// ==========================================
// 教学计划排课系统 - 学期计划数据仓储
// ==========================================
// 存储: term_plan (计划头) + plan_topic (课题明细,按 seq_no 保序)
// 说明: 日期字段使用 rusqlite chrono 特性直接绑定
// ==========================================

use crate::domain::plan::TermPlan;
use crate::domain::timetable::TimeSlot;
use crate::domain::topic::{AssignedTopic, Topic};
use crate::domain::types::TopicPriority;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// TermPlanRepository - 学期计划仓储
// ==========================================
pub struct TermPlanRepository {
    conn: Arc<Mutex<Connection>>,
}

/// 计划头（不含课题明细）
struct PlanHeader {
    plan_id: String,
    group_id: String,
    subject: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_slots_available: i64,
    created_at: NaiveDateTime,
}

impl TermPlanRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存学期计划（计划头 + 全部课题,单事务）
    pub fn insert(&self, plan: &TermPlan) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO term_plan (
                plan_id, group_id, subject, start_date, end_date,
                total_slots_available, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                plan.plan_id,
                plan.group_id,
                plan.subject,
                plan.start_date,
                plan.end_date,
                plan.total_slots_available as i64,
                plan.created_at,
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO plan_topic (
                    plan_id, seq_no, title, duration, is_self_study, sequence_order,
                    priority, scheduled_date, slot_json, forced_overflow
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )?;

            for (seq_no, assigned) in plan.topics.iter().enumerate() {
                let slot_json = assigned
                    .scheduled_slot
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?;
                stmt.execute(params![
                    plan.plan_id,
                    seq_no as i64,
                    assigned.topic.title,
                    assigned.topic.duration,
                    assigned.topic.is_self_study,
                    assigned.topic.sequence_order,
                    assigned.priority.to_db_str(),
                    assigned.scheduled_date,
                    slot_json,
                    assigned.forced_overflow,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 按计划ID读取
    pub fn find_by_id(&self, plan_id: &str) -> RepositoryResult<Option<TermPlan>> {
        let conn = self.get_conn()?;

        let header = conn
            .query_row(
                r#"
                SELECT plan_id, group_id, subject, start_date, end_date,
                       total_slots_available, created_at
                FROM term_plan
                WHERE plan_id = ?1
                "#,
                params![plan_id],
                map_header,
            )
            .optional()?;

        match header {
            Some(header) => Ok(Some(load_topics(&conn, header)?)),
            None => Ok(None),
        }
    }

    /// 按教学班列出计划（最新在前）
    pub fn list_by_group(&self, group_id: &str) -> RepositoryResult<Vec<TermPlan>> {
        let conn = self.get_conn()?;

        let headers = {
            let mut stmt = conn.prepare(
                r#"
                SELECT plan_id, group_id, subject, start_date, end_date,
                       total_slots_available, created_at
                FROM term_plan
                WHERE group_id = ?1
                ORDER BY created_at DESC, plan_id
                "#,
            )?;
            let headers = stmt
                .query_map(params![group_id], map_header)?
                .collect::<rusqlite::Result<Vec<PlanHeader>>>()?;
            headers
        };

        headers
            .into_iter()
            .map(|header| load_topics(&conn, header))
            .collect()
    }

    /// 删除计划（课题明细级联删除）
    pub fn delete(&self, plan_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM term_plan WHERE plan_id = ?1", params![plan_id])?;
        Ok(affected)
    }
}

fn map_header(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlanHeader> {
    Ok(PlanHeader {
        plan_id: row.get(0)?,
        group_id: row.get(1)?,
        subject: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        total_slots_available: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// 读取课题明细并组装 TermPlan
fn load_topics(conn: &Connection, header: PlanHeader) -> RepositoryResult<TermPlan> {
    let mut stmt = conn.prepare(
        r#"
        SELECT title, duration, is_self_study, sequence_order,
               priority, scheduled_date, slot_json, forced_overflow
        FROM plan_topic
        WHERE plan_id = ?1
        ORDER BY seq_no
        "#,
    )?;

    let rows = stmt.query_map(params![header.plan_id], |row| {
        Ok((
            Topic {
                title: row.get(0)?,
                duration: row.get(1)?,
                is_self_study: row.get(2)?,
                sequence_order: row.get(3)?,
            },
            row.get::<_, String>(4)?,
            row.get::<_, Option<NaiveDate>>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, bool>(7)?,
        ))
    })?;

    let mut topics = Vec::new();
    for row in rows {
        let (topic, priority_raw, scheduled_date, slot_json, forced_overflow) = row?;
        let priority = TopicPriority::from_str(&priority_raw).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "priority".to_string(),
                message: format!("无法识别的课题优先级: {}", priority_raw),
            }
        })?;
        let scheduled_slot = slot_json
            .as_deref()
            .map(serde_json::from_str::<TimeSlot>)
            .transpose()?;

        topics.push(AssignedTopic {
            topic,
            priority,
            scheduled_date,
            scheduled_slot,
            forced_overflow,
        });
    }

    Ok(TermPlan {
        plan_id: header.plan_id,
        group_id: header.group_id,
        subject: header.subject,
        start_date: header.start_date,
        end_date: header.end_date,
        total_slots_available: header.total_slots_available.max(0) as usize,
        topics,
        created_at: header.created_at,
    })
}
