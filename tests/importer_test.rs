// ==========================================
// 导入层集成测试
// ==========================================
// 测试目标: CSV 文件 → 周课表/校历/课题清单,宽松与严格模式
// ==========================================

mod helpers;

use helpers::mock_config::MockConfig;
use std::sync::{Arc, Mutex};
use teaching_plan::api::{ApiError, PlanApi, TimetableApi};
use teaching_plan::domain::Weekday;
use teaching_plan::importer::{
    CalendarImporter, ImportError, TimetableImporter, TopicImporter, ValidationMode,
};
use teaching_plan::repository::{CalendarRepository, TermPlanRepository, TimetableRepository};
use test_helpers::{create_test_db, d, open_test_connection, write_csv};

fn apis(config: MockConfig) -> (tempfile::NamedTempFile, TimetableApi, PlanApi) {
    let (db_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = Arc::new(Mutex::new(open_test_connection(&db_path).unwrap()));
    let timetable_repo = Arc::new(TimetableRepository::from_connection(conn.clone()));
    let calendar_repo = Arc::new(CalendarRepository::from_connection(conn.clone()));
    let term_plan_repo = Arc::new(TermPlanRepository::from_connection(conn));
    let config = Arc::new(config);

    let timetable_api =
        TimetableApi::new(timetable_repo.clone(), calendar_repo.clone(), config.clone());
    let plan_api = PlanApi::new(timetable_repo, calendar_repo, term_plan_repo, config);
    (db_file, timetable_api, plan_api)
}

// ==========================================
// 文件级导入
// ==========================================

#[test]
fn test_timetable_csv_with_chinese_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "timetable.csv",
        &[
            "星期,开始时间,结束时间,教室,课程,教师",
            "周四,09:00,10:00,R101,STQA,Dr. Rao",
            "周五,10:00,11:00,R102,STQA,",
            "周五,11:00,12:00,,AI,Dr. Iyer",
        ],
    );

    let report = TimetableImporter::default().import_file(&path).unwrap();

    assert_eq!(report.imported_rows, 3);
    let thursday = report.data.slots_for(Weekday::Thursday);
    assert_eq!(thursday.len(), 1);
    assert_eq!(thursday[0].room.as_deref(), Some("R101"));
    assert_eq!(thursday[0].faculty.as_deref(), Some("Dr. Rao"));
    let friday = report.data.slots_for(Weekday::Friday);
    assert_eq!(friday[0].faculty, None);
    assert_eq!(friday[1].room, None);
    assert_eq!(friday[1].subject.as_deref(), Some("AI"));
}

#[test]
fn test_timetable_file_with_only_bad_rows_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "timetable.csv",
        &["weekday,start_time,end_time", "Munday,09:00,10:00"],
    );

    let err = TimetableImporter::new(ValidationMode::Lenient)
        .import_file(&path)
        .unwrap_err();
    assert!(matches!(err, ImportError::NoValidRows(_)));
}

#[test]
fn test_calendar_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "calendar.csv",
        &[
            "date,kind",
            "2026-01-26,HOLIDAY",
            "2026/02/01,WORKING_DAY",
            "2026-08-15,节假日",
        ],
    );

    let report = CalendarImporter::default().import_file(&path, 2026).unwrap();
    assert_eq!(report.imported_rows, 3);
    assert!(report.data.is_holiday(d(2026, 1, 26)));
    assert!(report.data.is_holiday(d(2026, 8, 15)));
    assert!(report.data.is_working_day_override(d(2026, 2, 1)));
}

#[test]
fn test_topics_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "topics.csv",
        &[
            "title,duration,is_self_study,sequence_order",
            "Black-box testing,2h,false,2",
            "Intro to STQA,1h,false,1",
            "Reading: IEEE 829,,true,3",
        ],
    );

    let report = TopicImporter::default().import_file(&path).unwrap();
    let titles: Vec<&str> = report.data.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Intro to STQA", "Black-box testing", "Reading: IEEE 829"]);
    assert!(report.data[2].is_self_study);
}

#[test]
fn test_calendar_file_with_only_bad_rows_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "calendar.csv", &["date", "26/01/2026"]);

    let err = CalendarImporter::default()
        .import_file(&path, 2026)
        .unwrap_err();
    assert!(matches!(err, ImportError::NoValidRows(_)));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "timetable.txt", &["weekday,start_time,end_time"]);
    let err = TimetableImporter::default().import_file(&path).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}

// ==========================================
// API 级导入（校验模式取自配置）
// ==========================================

#[tokio::test]
async fn test_import_timetable_lenient_by_default() {
    let (_db, timetable_api, _plan_api) = apis(MockConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "timetable.csv",
        &[
            "weekday,start_time,end_time,subject",
            "Thursday,09:00,10:00,STQA",
            "Munday,09:00,10:00,STQA",
            "Friday,10:00,11:00,STQA",
        ],
    );

    let report = timetable_api.import_timetable_file("G1", &path).await.unwrap();
    assert_eq!(report.imported_rows, 2);
    assert_eq!(report.skipped_rows.len(), 1);
    assert_eq!(report.skipped_rows[0].row_number, 3);

    let stored = timetable_api.get_timetable("G1").unwrap();
    assert_eq!(stored, report.data);
    assert_eq!(stored.slots_per_week(), 2);
}

#[tokio::test]
async fn test_import_timetable_strict_rejects_and_keeps_previous() {
    let (_db, timetable_api, _plan_api) = apis(MockConfig::strict());
    let dir = tempfile::tempdir().unwrap();
    let good = write_csv(
        dir.path(),
        "good.csv",
        &["weekday,start_time,end_time", "Monday,09:00,10:00"],
    );
    let bad = write_csv(
        dir.path(),
        "bad.csv",
        &[
            "weekday,start_time,end_time",
            "Tuesday,09:00,10:00",
            "Munday,09:00,10:00",
        ],
    );

    timetable_api.import_timetable_file("G1", &good).await.unwrap();
    let err = timetable_api
        .import_timetable_file("G1", &bad)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ImportError(msg) if msg.contains("Munday")));

    let stored = timetable_api.get_timetable("G1").unwrap();
    assert_eq!(stored.slots_for(Weekday::Monday).len(), 1);
    assert!(stored.slots_for(Weekday::Tuesday).is_empty());
}

#[tokio::test]
async fn test_import_calendar_replaces_year() {
    let (_db, timetable_api, _plan_api) = apis(MockConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let first = write_csv(dir.path(), "c1.csv", &["date", "2026-01-26"]);
    let second = write_csv(dir.path(), "c2.csv", &["date,kind", "2026-03-14,HOLIDAY"]);

    timetable_api.import_calendar_file(2026, &first).await.unwrap();
    timetable_api.import_calendar_file(2026, &second).await.unwrap();

    let calendar = timetable_api.get_calendar(2026).unwrap().unwrap();
    assert!(!calendar.is_holiday(d(2026, 1, 26)));
    assert!(calendar.is_holiday(d(2026, 3, 14)));
    assert!(timetable_api.get_calendar(2027).unwrap().is_none());
}

#[tokio::test]
async fn test_calendar_file_without_valid_rows_keeps_stored_year() {
    let (_db, timetable_api, _plan_api) = apis(MockConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let good = write_csv(dir.path(), "good.csv", &["date", "2026-01-26", "2026-03-14"]);
    let typos = write_csv(dir.path(), "typos.csv", &["date", "26/01/2026", "14/03/2026"]);

    timetable_api.import_calendar_file(2026, &good).await.unwrap();
    let err = timetable_api
        .import_calendar_file(2026, &typos)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ImportError(_)));

    let calendar = timetable_api.get_calendar(2026).unwrap().unwrap();
    assert!(calendar.is_holiday(d(2026, 1, 26)));
    assert!(calendar.is_holiday(d(2026, 3, 14)));
}

#[tokio::test]
async fn test_header_only_calendar_file_clears_year() {
    let (_db, timetable_api, _plan_api) = apis(MockConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let good = write_csv(dir.path(), "good.csv", &["date", "2026-01-26"]);
    let empty = write_csv(dir.path(), "empty.csv", &["date,kind"]);

    timetable_api.import_calendar_file(2026, &good).await.unwrap();
    let report = timetable_api.import_calendar_file(2026, &empty).await.unwrap();
    assert_eq!(report.imported_rows, 0);

    let calendar = timetable_api.get_calendar(2026).unwrap().unwrap();
    assert!(calendar.holidays.is_empty());
}

#[tokio::test]
async fn test_missing_file_maps_to_not_found() {
    let (_db, timetable_api, plan_api) = apis(MockConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");

    let err = timetable_api
        .import_timetable_file("G1", &missing)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = plan_api.read_topics_file(&missing).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_save_calendar_rejects_dates_from_other_year() {
    let (_db, timetable_api, _plan_api) = apis(MockConfig::default());
    let calendar = teaching_plan::domain::CalendarYear::new(2026).with_holiday(d(2025, 12, 25));
    let err = timetable_api.save_calendar(&calendar).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_blank_group_rejected() {
    let (_db, timetable_api, _plan_api) = apis(MockConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "timetable.csv",
        &["weekday,start_time,end_time", "Monday,09:00,10:00"],
    );
    let err = timetable_api.import_timetable_file(" ", &path).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}
