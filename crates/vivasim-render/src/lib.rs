//! vivasim-render — Console rendering of exam snapshots.
//!
//! Consumes the immutable snapshots the engine pushes and turns them into
//! comfy-table tables plus the narrative footer. The core never touches a
//! console itself.

use comfy_table::{Cell, Table};

use vivasim_core::snapshot::{ExamSnapshot, ExaminerRow, StudentRow};
use vivasim_core::statistics::StudentStatus;
use vivasim_core::traits::SnapshotSink;

fn status_label(status: StudentStatus) -> &'static str {
    match status {
        StudentStatus::Queued => "queued",
        StudentStatus::Passed => "passed",
        StudentStatus::Failed => "failed",
    }
}

/// The students table: one row per student, grouped by status.
pub fn students_table(rows: &[StudentRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Student", "Status"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.student.to_string()),
            Cell::new(status_label(row.status)),
        ]);
    }

    table
}

/// The live examiners table shown while students remain queued.
pub fn examiners_table(rows: &[ExaminerRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Examiner",
        "Current student",
        "Total",
        "Failed",
        "Time worked",
    ]);

    for row in rows {
        let current = row
            .current_student
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(row.examiner.to_string()),
            Cell::new(current),
            Cell::new(row.total_students),
            Cell::new(row.failed_students),
            Cell::new(format!("{:.2} s", row.time_worked)),
        ]);
    }

    table
}

/// The final examiners table, without the transient columns.
pub fn final_table(rows: &[ExaminerRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Examiner", "Total", "Failed", "Time worked"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.examiner.to_string()),
            Cell::new(row.total_students),
            Cell::new(row.failed_students),
            Cell::new(format!("{:.2} s", row.time_worked)),
        ]);
    }

    table
}

/// Render one snapshot the way the live view shows it: students, then the
/// live or final examiners table, then the narrative footer.
pub fn render_snapshot(snapshot: &ExamSnapshot) -> String {
    let examiners = if snapshot.finished {
        final_table(&snapshot.examiners)
    } else {
        examiners_table(&snapshot.examiners)
    };
    format!(
        "{}\n{}\n{}",
        students_table(&snapshot.students),
        examiners,
        snapshot.narrative
    )
}

/// Prints every pushed snapshot to stdout.
pub struct ConsoleSink;

impl SnapshotSink for ConsoleSink {
    fn on_snapshot(&self, snapshot: &ExamSnapshot) {
        println!("{}\n", render_snapshot(snapshot));
    }

    fn on_complete(&self, snapshot: &ExamSnapshot) {
        println!("{}\n", render_snapshot(snapshot));
    }
}
