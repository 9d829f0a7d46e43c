// ==========================================
// 教学计划排课系统 - 性能统计
// ==========================================
// PerfGuard: API 操作耗时 + SQL 语句数 + 慢 SQL 数
// SQLite trace/profile 回调按环境变量开关
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 开关: `TEACHING_PLAN_PERF_SQL=1`
pub const ENV_PERF_SQL: &str = "TEACHING_PLAN_PERF_SQL";
/// 慢 SQL 阈值（毫秒）: `TEACHING_PLAN_SLOW_SQL_MS=50`
pub const ENV_SLOW_SQL_MS: &str = "TEACHING_PLAN_SLOW_SQL_MS";

static PERF_SQL_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static SQL_COUNT: Cell<u64> = Cell::new(0);
    static SLOW_SQL_COUNT: Cell<u64> = Cell::new(0);
}

/// SQL 统计设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlTracingSettings {
    pub enabled: bool,
    pub slow_sql_ms: u64,
}

impl SqlTracingSettings {
    /// 由环境变量值解析（Debug 默认开启,Release 默认关闭）
    pub fn from_values(perf_sql: Option<&str>, slow_sql_ms: Option<&str>) -> Self {
        let enabled = perf_sql.map(is_true).unwrap_or(cfg!(debug_assertions));
        let slow_sql_ms = slow_sql_ms
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
        Self {
            enabled,
            slow_sql_ms,
        }
    }

    pub fn from_env() -> Self {
        let perf_sql = std::env::var(ENV_PERF_SQL).ok();
        let slow_sql_ms = std::env::var(ENV_SLOW_SQL_MS).ok();
        Self::from_values(perf_sql.as_deref(), slow_sql_ms.as_deref())
    }
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn truncate_sql(sql: &str, max_chars: usize) -> String {
    let s = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let head: String = s.chars().take(max_chars).collect();
    format!("{}…", head)
}

/// 安装 SQLite 语句 trace/profile
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let settings = SqlTracingSettings::from_env();
    PERF_SQL_ENABLED.store(settings.enabled, Ordering::Relaxed);

    if !settings.enabled {
        // 复用连接时清理残留回调
        conn.trace(None);
        conn.profile(None);
        return;
    }

    SLOW_SQL_THRESHOLD_MS.store(settings.slow_sql_ms, Ordering::Relaxed);
    conn.trace(Some(sql_trace_callback));
    conn.profile(Some(sql_profile_callback));
}

fn sql_trace_callback(_sql: &str) {
    if !PERF_SQL_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    if PERF_DEPTH.with(|d| d.get() > 0) {
        SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }
}

fn sql_profile_callback(sql: &str, duration: Duration) {
    if !PERF_SQL_ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        tracing::warn!(
            target: "slow_sql",
            duration_ms = ms,
            sql = %truncate_sql(sql, 420),
            "slow sql"
        );
        if PERF_DEPTH.with(|d| d.get() > 0) {
            SLOW_SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
        }
    }
}

/// 性能统计 Guard
///
/// ```ignore
/// let _perf = teaching_plan::perf::PerfGuard::new("generate_plan");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    sql_start: u64,
    slow_sql_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            sql_start: SQL_COUNT.with(|c| c.get()),
            slow_sql_start: SLOW_SQL_COUNT.with(|c| c.get()),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let sql_count = SQL_COUNT.with(|c| c.get()).saturating_sub(self.sql_start);
        let slow_sql_count = SLOW_SQL_COUNT
            .with(|c| c.get())
            .saturating_sub(self.slow_sql_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            sql_count,
            slow_sql_count,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_values() {
        let s = SqlTracingSettings::from_values(Some("on"), Some(" 75 "));
        assert!(s.enabled);
        assert_eq!(s.slow_sql_ms, 75);

        let s = SqlTracingSettings::from_values(Some("0"), Some("abc"));
        assert!(!s.enabled);
        assert!(s.slow_sql_ms > 0);
    }

    #[test]
    fn test_truncate_sql_multibyte_safe() {
        let sql = "SELECT  *\n FROM  timetable_slot WHERE subject = '软件测试与质量保证'";
        let short = truncate_sql(sql, 45);
        assert!(short.ends_with('…'));
        assert_eq!(short.chars().count(), 46);
        assert!(!short.contains('\n'));
    }

    #[test]
    fn test_guard_counts_statements_on_traced_connection() {
        let mut conn = Connection::open_in_memory().unwrap();
        PERF_SQL_ENABLED.store(true, Ordering::Relaxed);
        conn.trace(Some(sql_trace_callback));

        let before = SQL_COUNT.with(|c| c.get());
        {
            let _perf = PerfGuard::new("test_op");
            conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")
                .unwrap();
        }
        assert!(SQL_COUNT.with(|c| c.get()) > before);
    }
}
