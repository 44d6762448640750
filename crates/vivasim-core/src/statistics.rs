//! Shared statistics store for a running exam.
//!
//! The store owns every mutable table: per-examiner counters, per-student
//! outcomes, per-question correctness counts, and the queue counter. The
//! engine mutates it only through the operations below, always under the
//! shared lock; queries are pure reads over the current state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::person::Person;
use crate::snapshot::{ExamSnapshot, ExaminerRow, StudentRow};

/// Pass rate the whole exam must beat, strictly, to count as a success.
pub const SUCCESS_GOAL: f64 = 0.85;

/// Where a student stands. The status moves from `Queued` to exactly one of
/// the other two and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Queued,
    Passed,
    Failed,
}

/// Per-examiner counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExaminerStats {
    pub current_student: Option<Person>,
    pub total_students: u32,
    pub failed_students: u32,
    pub time_worked: f64,
    pub on_lunch_break: bool,
}

impl Default for ExaminerStats {
    fn default() -> Self {
        Self {
            current_student: None,
            total_students: 0,
            failed_students: 0,
            time_worked: 0.0,
            on_lunch_break: false,
        }
    }
}

/// Per-student outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentStats {
    pub status: StudentStatus,
    pub time_spent: f64,
}

/// Comparable digest of both stat tables; the reporting loop re-renders
/// only when it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    examiners: Vec<ExaminerRow>,
    students: Vec<StudentRow>,
}

pub struct ExamStatistics {
    examiner_order: Vec<Person>,
    student_order: Vec<Person>,
    examiners: HashMap<Person, ExaminerStats>,
    students: HashMap<Person, StudentStats>,
    question_order: Vec<String>,
    questions: HashMap<String, u32>,
    students_in_queue: usize,
}

impl ExamStatistics {
    pub fn new(examiners: &[Person], students: &[Person]) -> Self {
        let mut stats = Self {
            examiner_order: Vec::new(),
            student_order: Vec::new(),
            examiners: HashMap::new(),
            students: HashMap::new(),
            question_order: Vec::new(),
            questions: HashMap::new(),
            students_in_queue: students.len(),
        };
        for examiner in examiners {
            if stats
                .examiners
                .insert(examiner.clone(), ExaminerStats::default())
                .is_none()
            {
                stats.examiner_order.push(examiner.clone());
            }
        }
        for student in students {
            let entry = StudentStats {
                status: StudentStatus::Queued,
                time_spent: 0.0,
            };
            if stats.students.insert(student.clone(), entry).is_none() {
                stats.student_order.push(student.clone());
            }
        }
        stats
    }

    // -----------------------------------------------------------------
    // Mutations, all O(1); the engine calls these under the shared lock.
    // -----------------------------------------------------------------

    /// Record who the examiner is currently questioning, if anyone.
    pub fn assign_student(&mut self, examiner: &Person, student: Option<Person>) {
        if let Some(stats) = self.examiners.get_mut(examiner) {
            stats.current_student = student;
        }
    }

    pub fn set_on_lunch(&mut self, examiner: &Person, on_lunch: bool) {
        if let Some(stats) = self.examiners.get_mut(examiner) {
            stats.on_lunch_break = on_lunch;
        }
    }

    /// One more student answered this question correctly.
    pub fn record_correct_answer(&mut self, question: &str) {
        match self.questions.get_mut(question) {
            Some(count) => *count += 1,
            None => {
                self.question_order.push(question.to_string());
                self.questions.insert(question.to_string(), 1);
            }
        }
    }

    /// Commit one finished session in a single step: examiner counters,
    /// student outcome, and the shared queue counter.
    pub fn complete_session(
        &mut self,
        examiner: &Person,
        student: &Person,
        passed: bool,
        time_spent: f64,
    ) {
        if let Some(stats) = self.examiners.get_mut(examiner) {
            stats.total_students += 1;
            if !passed {
                stats.failed_students += 1;
            }
            stats.time_worked += time_spent;
        }
        if let Some(stats) = self.students.get_mut(student) {
            stats.status = if passed {
                StudentStatus::Passed
            } else {
                StudentStatus::Failed
            };
            stats.time_spent = time_spent;
        }
        self.students_in_queue = self.students_in_queue.saturating_sub(1);
    }

    // -----------------------------------------------------------------
    // Queries.
    // -----------------------------------------------------------------

    pub fn students_in_queue(&self) -> usize {
        self.students_in_queue
    }

    pub fn time_worked(&self, examiner: &Person) -> f64 {
        self.examiners
            .get(examiner)
            .map(|s| s.time_worked)
            .unwrap_or(0.0)
    }

    /// Duration of the whole run: the longest per-examiner working time.
    pub fn exam_time(&self) -> f64 {
        self.examiners
            .values()
            .map(|s| s.time_worked)
            .fold(0.0, f64::max)
    }

    /// Every examiner achieving the lowest failure ratio, in roster order.
    /// Examiners who saw no students do not qualify.
    pub fn best_examiners(&self) -> Vec<Person> {
        let rated: Vec<(&Person, f64)> = self
            .examiner_order
            .iter()
            .filter_map(|p| {
                let s = &self.examiners[p];
                (s.total_students > 0)
                    .then(|| (p, s.failed_students as f64 / s.total_students as f64))
            })
            .collect();
        let min = rated.iter().map(|&(_, r)| r).fold(f64::INFINITY, f64::min);
        rated
            .into_iter()
            .filter(|&(_, r)| r == min)
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Every passed student achieving the shortest exam, in roster order.
    pub fn best_students(&self) -> Vec<Person> {
        self.fastest_with_status(StudentStatus::Passed)
    }

    /// Every failed student achieving the shortest exam, in roster order.
    pub fn failed_students(&self) -> Vec<Person> {
        self.fastest_with_status(StudentStatus::Failed)
    }

    fn fastest_with_status(&self, status: StudentStatus) -> Vec<Person> {
        let timed: Vec<(&Person, f64)> = self
            .student_order
            .iter()
            .filter_map(|p| {
                let s = &self.students[p];
                (s.status == status).then_some((p, s.time_spent))
            })
            .collect();
        let min = timed.iter().map(|&(_, t)| t).fold(f64::INFINITY, f64::min);
        timed
            .into_iter()
            .filter(|&(_, t)| t == min)
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Every question achieving the highest correctness count, in the order
    /// the questions were first answered.
    pub fn best_questions(&self) -> Vec<String> {
        let Some(max) = self.questions.values().copied().max() else {
            return Vec::new();
        };
        self.question_order
            .iter()
            .filter(|q| self.questions[*q] == max)
            .cloned()
            .collect()
    }

    /// Whether the run beat `goal`: false until somebody has been examined,
    /// then `1 - failed/total > goal`, strictly.
    pub fn exam_summary(&self, goal: f64) -> bool {
        let total: u32 = self.examiners.values().map(|s| s.total_students).sum();
        if total == 0 {
            return false;
        }
        let failed: u32 = self.examiners.values().map(|s| s.failed_students).sum();
        1.0 - failed as f64 / total as f64 > goal
    }

    pub fn question_counts(&self) -> Vec<(String, u32)> {
        self.question_order
            .iter()
            .map(|q| (q.clone(), self.questions[q]))
            .collect()
    }

    // -----------------------------------------------------------------
    // Snapshot producers.
    // -----------------------------------------------------------------

    pub fn examiner_rows(&self) -> Vec<ExaminerRow> {
        self.examiner_order
            .iter()
            .map(|p| {
                let s = &self.examiners[p];
                ExaminerRow {
                    examiner: p.clone(),
                    current_student: if s.on_lunch_break {
                        None
                    } else {
                        s.current_student.clone()
                    },
                    total_students: s.total_students,
                    failed_students: s.failed_students,
                    time_worked: s.time_worked,
                    on_lunch_break: s.on_lunch_break,
                }
            })
            .collect()
    }

    pub fn student_rows(&self) -> Vec<StudentRow> {
        let mut rows: Vec<StudentRow> = self
            .student_order
            .iter()
            .map(|p| {
                let s = &self.students[p];
                StudentRow {
                    student: p.clone(),
                    status: s.status,
                    time_spent: s.time_spent,
                }
            })
            .collect();
        // stable sort keeps roster order inside each status group
        rows.sort_by_key(|r| r.status as u8);
        rows
    }

    pub fn snapshot(&self) -> ExamSnapshot {
        let finished = self.students_in_queue == 0;
        let narrative = if finished {
            self.summary_text()
        } else {
            self.status_text()
        };
        ExamSnapshot {
            students: self.student_rows(),
            examiners: self.examiner_rows(),
            students_in_queue: self.students_in_queue,
            finished,
            narrative,
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            examiners: self.examiner_rows(),
            students: self.student_rows(),
        }
    }

    /// Status line shown while students remain queued.
    pub fn status_text(&self) -> String {
        format!(
            "Students still queued: {}\nTime since the exam started: {:.2} s",
            self.students_in_queue,
            self.exam_time()
        )
    }

    /// Summary block shown once the queue drains.
    pub fn summary_text(&self) -> String {
        let verdict = if self.exam_summary(SUCCESS_GOAL) {
            "the exam succeeded"
        } else {
            "the exam failed"
        };
        format!(
            "Exam duration from start to finish: {:.2} s\n\
             Best students: {}\n\
             Best examiners: {}\n\
             Students facing expulsion: {}\n\
             Best questions: {}\n\
             Verdict: {}",
            self.exam_time(),
            format_names(&self.best_students()),
            format_names(&self.best_examiners()),
            format_names(&self.failed_students()),
            format_items(&self.best_questions()),
            verdict,
        )
    }
}

fn format_names(people: &[Person]) -> String {
    if people.is_empty() {
        return "no data".to_string();
    }
    people
        .iter()
        .map(Person::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_items(items: &[String]) -> String {
    if items.is_empty() {
        return "no data".to_string();
    }
    items.join(", ")
}
