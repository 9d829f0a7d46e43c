// ==========================================
// 教学计划排课系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{PlanApi, TimetableApi};
use crate::config::config_manager::ConfigManager;
use crate::config::PlanningConfigReader;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{CalendarRepository, TermPlanRepository, TimetableRepository};

/// 数据库路径环境变量
pub const ENV_DB_PATH: &str = "TEACHING_PLAN_DB_PATH";

/// 应用状态
///
/// 所有仓储共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 学期计划API
    pub plan_api: Arc<PlanApi>,

    /// 课表与校历API
    pub timetable_api: Arc<TimetableApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 打开（必要时创建）数据库并初始化表结构
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
        crate::perf::install_sqlite_tracing(&mut conn);
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let timetable_repo = Arc::new(TimetableRepository::from_connection(conn.clone()));
        let calendar_repo = Arc::new(CalendarRepository::from_connection(conn.clone()));
        let term_plan_repo = Arc::new(TermPlanRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("配置管理器初始化失败: {}", e))?,
        );
        let config_reader: Arc<dyn PlanningConfigReader> = config_manager.clone();

        // ==========================================
        // 初始化API层
        // ==========================================
        let plan_api = Arc::new(PlanApi::new(
            timetable_repo.clone(),
            calendar_repo.clone(),
            term_plan_repo,
            config_reader.clone(),
        ));
        let timetable_api = Arc::new(TimetableApi::new(
            timetable_repo,
            calendar_repo,
            config_reader,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config_manager,
            plan_api,
            timetable_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 TEACHING_PLAN_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match dirs::data_dir() {
        Some(data_dir) => {
            let dir = data_dir.join("teaching-plan");
            // 目录创建失败时回退到当前目录
            if std::fs::create_dir_all(&dir).is_ok() {
                return dir.join("teaching_plan.db").to_string_lossy().to_string();
            }
            "./teaching_plan.db".to_string()
        }
        None => "./teaching_plan.db".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db").to_string_lossy().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);
        assert!(state.timetable_api.list_groups().unwrap().is_empty());
    }
}
