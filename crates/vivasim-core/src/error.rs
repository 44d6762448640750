//! Exam error types.
//!
//! Defined here so callers can classify failures (bad roster data vs a
//! misconfigured question bank) without string matching.

use thiserror::Error;

use crate::engine::QUESTIONS_PER_SESSION;

/// Errors produced while setting up or running an exam.
#[derive(Debug, Error)]
pub enum ExamError {
    /// A roster entry had an empty first or last name.
    #[error("first and last names must not be empty")]
    EmptyName,

    /// A roster entry contained characters outside the accepted alphabet.
    #[error("name {0:?} must contain only letters or '-'")]
    InvalidName(String),

    /// The question bank cannot cover a single session.
    #[error("question bank holds {0} questions, at least {QUESTIONS_PER_SESSION} required")]
    NotEnoughQuestions(usize),

    /// An examiner's session loop aborted mid-run.
    #[error("examiner {examiner} aborted: {source}")]
    Session {
        examiner: String,
        #[source]
        source: Box<ExamError>,
    },
}

impl ExamError {
    /// Returns `true` if this error was caused by invalid roster data.
    pub fn is_validation(&self) -> bool {
        matches!(self, ExamError::EmptyName | ExamError::InvalidName(_))
    }

    /// Returns `true` if this error was caused by a misconfigured question bank.
    pub fn is_configuration(&self) -> bool {
        match self {
            ExamError::NotEnoughQuestions(_) => true,
            ExamError::Session { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}
