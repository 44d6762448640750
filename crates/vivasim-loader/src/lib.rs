//! vivasim-loader — Roster and question-bank loading.
//!
//! Two input shapes are supported: the classic trio of plain-text files
//! (students, examiners, questions — one entry per line) and a single TOML
//! roster file (see [`roster`]).

use std::path::Path;

use anyhow::{bail, Context, Result};

use vivasim_core::engine::{Roster, QUESTIONS_PER_SESSION};

pub mod roster;

/// Read `first last` name pairs, one per line.
///
/// Blank lines are skipped. Fields past the second are ignored; a line with
/// fewer than two fields, or a file with no entries at all, is an error.
pub fn read_persons(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file: {}", path.display()))?;

    let mut pairs = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(first), Some(last)) => pairs.push((first.to_string(), last.to_string())),
            _ => bail!(
                "{}:{}: expected 'first last', got {:?}",
                path.display(),
                number + 1,
                line
            ),
        }
    }

    if pairs.is_empty() {
        bail!("roster file {} holds no entries", path.display());
    }
    Ok(pairs)
}

/// Read questions, one per line. Blank lines are skipped with a warning;
/// fewer than [`QUESTIONS_PER_SESSION`] entries is a configuration error.
pub fn read_questions(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;

    let mut questions = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            tracing::warn!("blank line in question file {} skipped", path.display());
            continue;
        }
        questions.push(line.to_string());
    }

    if questions.len() < QUESTIONS_PER_SESSION {
        bail!(
            "question file {} holds {} questions, at least {} required",
            path.display(),
            questions.len(),
            QUESTIONS_PER_SESSION
        );
    }
    Ok(questions)
}

/// Load the three classic roster files into a [`Roster`].
pub fn load_text_roster(students: &Path, examiners: &Path, questions: &Path) -> Result<Roster> {
    Ok(Roster {
        students: read_persons(students)?,
        examiners: read_persons(examiners)?,
        questions: read_questions(questions)?,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_person_pairs_and_ignores_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "students.txt",
            "Мария Смирнова\nОлег Кузнецов staff\n\nНина Попова\n",
        );

        let pairs = read_persons(&path).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("Мария".to_string(), "Смирнова".to_string()),
                ("Олег".to_string(), "Кузнецов".to_string()),
                ("Нина".to_string(), "Попова".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_a_single_field_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "students.txt", "Мария Смирнова\nОлег\n");

        let err = read_persons(&path).unwrap_err();
        assert!(err.to_string().contains("expected 'first last'"));
        assert!(err.to_string().contains(":2:"));
    }

    #[test]
    fn rejects_an_empty_roster_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "students.txt", "\n\n");

        let err = read_persons(&path).unwrap_err();
        assert!(err.to_string().contains("no entries"));
    }

    #[test]
    fn missing_file_errors_with_the_path() {
        let err = read_persons(Path::new("no/such/file.txt")).unwrap_err();
        assert!(err.to_string().contains("file.txt"));
    }

    #[test]
    fn reads_questions_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "questions.txt",
            "что такое поток\n\nчто такое мьютекс\nчто такое очередь\n",
        );

        let questions = read_questions(&path).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[1], "что такое мьютекс");
    }

    #[test]
    fn rejects_a_question_bank_below_the_minimum() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "questions.txt", "первый вопрос\nвторой вопрос\n");

        let err = read_questions(&path).unwrap_err();
        assert!(err.to_string().contains("at least 3"));
    }

    #[test]
    fn loads_the_classic_file_trio() {
        let dir = tempfile::tempdir().unwrap();
        let students = write(&dir, "students.txt", "Мария Смирнова\n");
        let examiners = write(&dir, "examiners.txt", "Игорь Петров\n");
        let questions = write(&dir, "questions.txt", "раз\nдва\nтри\n");

        let roster = load_text_roster(&students, &examiners, &questions).unwrap();
        assert_eq!(roster.students.len(), 1);
        assert_eq!(roster.examiners.len(), 1);
        assert_eq!(roster.questions.len(), 3);
    }
}
