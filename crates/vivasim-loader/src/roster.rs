//! TOML roster format.
//!
//! A single file carrying both rosters and the question bank:
//!
//! ```toml
//! questions = [
//!     "что такое поток",
//!     "что такое мьютекс",
//!     "что такое очередь",
//! ]
//!
//! [[examiners]]
//! first_name = "Игорь"
//! last_name = "Петров"
//!
//! [[students]]
//! first_name = "Мария"
//! last_name = "Смирнова"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use vivasim_core::engine::{Roster, QUESTIONS_PER_SESSION};
use vivasim_core::person::Person;

/// Intermediate TOML structure for parsing roster files.
#[derive(Debug, Deserialize)]
struct TomlRosterFile {
    #[serde(default)]
    students: Vec<TomlPerson>,
    #[serde(default)]
    examiners: Vec<TomlPerson>,
    #[serde(default)]
    questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TomlPerson {
    first_name: String,
    last_name: String,
}

/// Parse a TOML roster file into a [`Roster`].
pub fn parse_roster(path: &Path) -> Result<Roster> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file: {}", path.display()))?;

    parse_roster_str(&content, path)
}

/// Parse a TOML string into a [`Roster`] (useful for testing).
pub fn parse_roster_str(content: &str, source_path: &Path) -> Result<Roster> {
    let parsed: TomlRosterFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let into_pairs = |people: Vec<TomlPerson>| {
        people
            .into_iter()
            .map(|p| (p.first_name, p.last_name))
            .collect()
    };

    Ok(Roster {
        students: into_pairs(parsed.students),
        examiners: into_pairs(parsed.examiners),
        questions: parsed.questions,
    })
}

/// A finding from [`validate_roster`].
#[derive(Debug, Clone)]
pub struct RosterWarning {
    pub message: String,
}

/// Check a roster without running anything: name validity, question count,
/// and an examiner roster that can actually hold an exam.
pub fn validate_roster(roster: &Roster) -> Vec<RosterWarning> {
    let mut warnings = Vec::new();

    for (first, last) in roster.students.iter().chain(roster.examiners.iter()) {
        if let Err(e) = Person::new(first.clone(), last.clone()) {
            warnings.push(RosterWarning {
                message: format!("{first} {last}: {e}"),
            });
        }
    }

    if roster.questions.len() < QUESTIONS_PER_SESSION {
        warnings.push(RosterWarning {
            message: format!(
                "{} questions in the bank, at least {} required",
                roster.questions.len(),
                QUESTIONS_PER_SESSION
            ),
        });
    }

    if roster.examiners.is_empty() && !roster.students.is_empty() {
        warnings.push(RosterWarning {
            message: "students are queued but there are no examiners".to_string(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
questions = [
    "что такое поток",
    "что такое мьютекс",
    "что такое очередь",
]

[[examiners]]
first_name = "Игорь"
last_name = "Петров"

[[students]]
first_name = "Мария"
last_name = "Смирнова"

[[students]]
first_name = "Олег"
last_name = "Кузнецов"
"#;

    #[test]
    fn parses_a_full_roster() {
        let roster = parse_roster_str(SAMPLE, Path::new("roster.toml")).unwrap();
        assert_eq!(roster.examiners.len(), 1);
        assert_eq!(roster.students.len(), 2);
        assert_eq!(roster.questions.len(), 3);
        assert_eq!(roster.students[0].0, "Мария");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let roster = parse_roster_str("questions = [\"раз\", \"два\", \"три\"]", Path::new("r.toml"))
            .unwrap();
        assert!(roster.students.is_empty());
        assert!(roster.examiners.is_empty());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = parse_roster_str("questions = [", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn validate_accepts_the_sample() {
        let roster = parse_roster_str(SAMPLE, Path::new("roster.toml")).unwrap();
        assert!(validate_roster(&roster).is_empty());
    }

    #[test]
    fn validate_flags_bad_names_and_a_small_bank() {
        let mut roster = parse_roster_str(SAMPLE, Path::new("roster.toml")).unwrap();
        roster.students.push(("R2D2".into(), "Droid".into()));
        roster.questions.truncate(2);

        let warnings = validate_roster(&roster);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].message.contains("R2D2"));
        assert!(warnings[1].message.contains("at least 3"));
    }

    #[test]
    fn validate_flags_a_run_with_no_examiners() {
        let mut roster = parse_roster_str(SAMPLE, Path::new("roster.toml")).unwrap();
        roster.examiners.clear();

        let warnings = validate_roster(&roster);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("no examiners")));
    }
}
