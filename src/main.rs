// ==========================================
// 教学计划排课系统 - 命令行入口
// ==========================================
// 用法: teaching-plan <group_id> <subject> <start> <end> <topics_file> [db_path]
// 输出: 学期计划 JSON 写 stdout,提示信息与日志写 stderr
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use teaching_plan::api::ApiError;
use teaching_plan::app::{get_default_db_path, AppState};
use teaching_plan::config::PlanningConfigReader;
use teaching_plan::domain::ISO_DATE_FORMAT;
use teaching_plan::engine::{PlanRequest, StaticTopicProducer};
use teaching_plan::i18n::{self, t, t_with_args};
use teaching_plan::logging;

struct CliArgs {
    request: PlanRequest,
    topics_file: PathBuf,
    db_path: String,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT)
        .map_err(|_| t_with_args("cli.invalid_date", &[("value", raw)]))
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() != 5 && args.len() != 6 {
        return Err(t("cli.usage"));
    }

    let start_date = parse_date(&args[2])?;
    let end_date = parse_date(&args[3])?;
    Ok(CliArgs {
        request: PlanRequest::new(args[0].trim(), args[1].trim(), start_date, end_date),
        topics_file: PathBuf::from(&args[4]),
        db_path: args.get(5).cloned().unwrap_or_else(get_default_db_path),
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn error_message(e: impl std::fmt::Display) -> String {
    t_with_args("common.error", &[("message", &e.to_string())])
}

async fn run(cli: CliArgs) -> Result<(), String> {
    let state = AppState::new(cli.db_path).map_err(|e| error_message(e))?;
    match state.config_manager.get_default_locale().await {
        Ok(locale) => {
            i18n::apply_locale(&locale);
        }
        Err(e) => tracing::warn!(error = %e, "读取默认语言失败"),
    }

    // ==========================================
    // 课题清单
    // ==========================================
    let topics = state
        .plan_api
        .read_topics_file(&cli.topics_file)
        .await
        .map_err(|e| error_message(e))?;
    eprintln!(
        "{}",
        t_with_args(
            "import.topics_done",
            &[
                ("rows", &topics.imported_rows.to_string()),
                ("skipped", &topics.skipped_rows.len().to_string()),
            ],
        )
    );

    // ==========================================
    // 排期
    // ==========================================
    let producer = StaticTopicProducer::new(topics.data);
    let plan = match state.plan_api.generate_plan(&cli.request, &producer).await {
        Ok(plan) => plan,
        Err(ApiError::EmptyBudget {
            subject,
            start_date,
            end_date,
        }) => {
            return Err(t_with_args(
                "plan.empty_budget",
                &[
                    ("subject", &subject),
                    ("start", &start_date.to_string()),
                    ("end", &end_date.to_string()),
                ],
            ));
        }
        Err(e) => return Err(error_message(e)),
    };

    let json = serde_json::to_string_pretty(&plan).map_err(|e| error_message(e))?;
    println!("{}", json);

    let summary = plan.summary();
    eprintln!(
        "{}",
        t_with_args(
            "plan.generated",
            &[
                ("plan_id", &plan.plan_id),
                ("slots", &plan.total_slots_available.to_string()),
                ("core", &summary.core_count.to_string()),
                (
                    "self_study",
                    &(summary.voluntary_self_study_count + summary.forced_overflow_count).to_string(),
                ),
            ],
        )
    );
    if summary.has_overflow() {
        eprintln!(
            "{}",
            t_with_args(
                "plan.overflow",
                &[("count", &summary.forced_overflow_count.to_string())],
            )
        );
    }
    if summary.unused_slots > 0 {
        eprintln!(
            "{}",
            t_with_args("plan.unused_slots", &[("count", &summary.unused_slots.to_string())])
        );
    }

    Ok(())
}
