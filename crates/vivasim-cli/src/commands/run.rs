//! The `vivasim run` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use vivasim_core::engine::{ExamEngine, ExamEngineConfig, Roster};
use vivasim_core::report::ExamReport;
use vivasim_core::traits::NoopSink;
use vivasim_render::ConsoleSink;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    roster_path: Option<PathBuf>,
    students: Option<PathBuf>,
    examiners: Option<PathBuf>,
    questions: Option<PathBuf>,
    seed: Option<u64>,
    interval: f64,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    anyhow::ensure!(interval > 0.0, "interval must be positive");

    let roster: Roster = match (roster_path, students, examiners, questions) {
        (Some(path), ..) => vivasim_loader::roster::parse_roster(&path)?,
        (None, Some(s), Some(e), Some(q)) => vivasim_loader::load_text_roster(&s, &e, &q)?,
        _ => anyhow::bail!("pass either --roster or all of --students/--examiners/--questions"),
    };

    eprintln!(
        "vivasim — {} examiners, {} students, {} questions",
        roster.examiners.len(),
        roster.students.len(),
        roster.questions.len()
    );

    let engine = ExamEngine::new(ExamEngineConfig {
        poll_interval: Duration::from_secs_f64(interval),
        seed,
    });

    let report = if quiet {
        engine.run(roster, &NoopSink).await?
    } else {
        engine.run(roster, &ConsoleSink).await?
    };

    print_summary(&report);

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &ExamReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Examiner", "Total", "Failed", "Time worked"]);

    for row in &report.examiners {
        table.add_row(vec![
            Cell::new(row.examiner.to_string()),
            Cell::new(row.total_students),
            Cell::new(row.failed_students),
            Cell::new(format!("{:.2} s", row.time_worked)),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "\nExam time: {:.2} s | verdict: {}",
        report.exam_time,
        if report.succeeded {
            "the exam succeeded"
        } else {
            "the exam failed"
        }
    );
}
