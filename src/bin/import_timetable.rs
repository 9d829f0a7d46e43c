// 导入教学班周课表（可选同时导入某年校历）
//
// Usage:
//   cargo run --bin import_timetable -- <db_path> <group_id> <timetable_file> [<year> <calendar_file>]

use std::path::Path;

use teaching_plan::app::AppState;
use teaching_plan::i18n::{t, t_with_args};
use teaching_plan::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 3 && args.len() != 5 {
        eprintln!("{}", t("cli.import_usage"));
        std::process::exit(2);
    }

    let state = AppState::new(args[0].clone())?;
    let group_id = args[1].trim();

    let report = state
        .timetable_api
        .import_timetable_file(group_id, Path::new(&args[2]))
        .await?;
    println!(
        "{}",
        t_with_args(
            "import.timetable_done",
            &[
                ("group_id", group_id),
                ("rows", &report.imported_rows.to_string()),
                ("skipped", &report.skipped_rows.len().to_string()),
            ],
        )
    );

    if args.len() == 5 {
        let year: i32 = args[3]
            .trim()
            .parse()
            .map_err(|_| t_with_args("cli.invalid_year", &[("value", &args[3])]))?;
        let report = state
            .timetable_api
            .import_calendar_file(year, Path::new(&args[4]))
            .await?;
        println!(
            "{}",
            t_with_args(
                "import.calendar_done",
                &[
                    ("year", &year.to_string()),
                    ("rows", &report.imported_rows.to_string()),
                    ("skipped", &report.skipped_rows.len().to_string()),
                ],
            )
        );
    }

    Ok(())
}
