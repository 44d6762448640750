//! Final exam report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::person::Person;
use crate::snapshot::{ExaminerRow, StudentRow};
use crate::statistics::{ExamStatistics, SUCCESS_GOAL};

/// Everything worth keeping after a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Longest per-examiner working time, i.e. the simulated duration.
    pub exam_time: f64,
    /// Students never examined (non-zero only for aborted or degenerate runs).
    pub students_in_queue: usize,
    /// Final per-examiner rows.
    pub examiners: Vec<ExaminerRow>,
    /// Final per-student rows, grouped by status.
    pub students: Vec<StudentRow>,
    /// Correct-answer count per question, in first-answered order.
    pub questions: Vec<QuestionCount>,
    /// Examiners with the lowest failure ratio.
    pub best_examiners: Vec<Person>,
    /// Passed students with the shortest exam.
    pub best_students: Vec<Person>,
    /// Failed students with the shortest exam.
    pub failed_students: Vec<Person>,
    /// Questions answered correctly most often.
    pub best_questions: Vec<String>,
    /// Whether the pass rate beat the success goal.
    pub succeeded: bool,
}

/// Correct-answer tally for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionCount {
    pub question: String,
    pub correct: u32,
}

impl ExamReport {
    pub fn from_stats(id: Uuid, stats: &ExamStatistics) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            exam_time: stats.exam_time(),
            students_in_queue: stats.students_in_queue(),
            examiners: stats.examiner_rows(),
            students: stats.student_rows(),
            questions: stats
                .question_counts()
                .into_iter()
                .map(|(question, correct)| QuestionCount { question, correct })
                .collect(),
            best_examiners: stats.best_examiners(),
            best_students: stats.best_students(),
            failed_students: stats.failed_students(),
            best_questions: stats.best_questions(),
            succeeded: stats.exam_summary(SUCCESS_GOAL),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ExamReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(first: &str, last: &str) -> Person {
        Person::new(first, last).unwrap()
    }

    fn finished_stats() -> ExamStatistics {
        let examiner = person("Игорь", "Петров");
        let students = vec![person("Мария", "Смирнова"), person("Олег", "Кузнецов")];
        let mut stats = ExamStatistics::new(&[examiner.clone()], &students);
        stats.record_correct_answer("что такое поток");
        stats.complete_session(&examiner, &students[0], true, 4.0);
        stats.complete_session(&examiner, &students[1], true, 6.0);
        stats
    }

    #[test]
    fn from_stats_captures_the_final_state() {
        let report = ExamReport::from_stats(Uuid::nil(), &finished_stats());
        assert_eq!(report.students_in_queue, 0);
        assert_eq!(report.exam_time, 10.0);
        assert_eq!(report.examiners.len(), 1);
        assert_eq!(report.students.len(), 2);
        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.best_students.len(), 1);
        assert!(report.succeeded);
    }

    #[test]
    fn json_roundtrip() {
        let report = ExamReport::from_stats(Uuid::nil(), &finished_stats());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam.json");

        report.save_json(&path).unwrap();
        let loaded = ExamReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.students.len(), 2);
        assert_eq!(loaded.questions[0].question, "что такое поток");
        assert!(loaded.succeeded);
    }
}
