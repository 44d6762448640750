//! Immutable point-in-time views of the statistics store.
//!
//! Snapshots are cloned out of the shared lock and handed to the
//! presentation layer, which may render them at leisure.

use serde::{Deserialize, Serialize};

use crate::person::Person;
use crate::statistics::StudentStatus;

/// One row of the students table. Rows are grouped by status:
/// queued first, then passed, then failed, keeping roster order inside
/// each group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRow {
    pub student: Person,
    pub status: StudentStatus,
    pub time_spent: f64,
}

/// One row of the examiners table. `current_student` is blanked while the
/// examiner is out on lunch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExaminerRow {
    pub examiner: Person,
    pub current_student: Option<Person>,
    pub total_students: u32,
    pub failed_students: u32,
    pub time_worked: f64,
    pub on_lunch_break: bool,
}

/// A read-only copy of the exam state pushed to the presentation layer.
///
/// `narrative` holds the in-progress status text while students remain
/// queued and the end-of-exam summary once `finished` flips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSnapshot {
    pub students: Vec<StudentRow>,
    pub examiners: Vec<ExaminerRow>,
    pub students_in_queue: usize,
    pub finished: bool,
    pub narrative: String,
}
