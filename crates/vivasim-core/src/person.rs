//! Participant identity.
//!
//! A [`Person`] is an immutable value compared and hashed by its two name
//! fields, so it can key the statistics maps. The derived [`Sex`] attribute
//! picks an answer-ordering strategy from the final letter of the first name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExamError;

/// Final-letter vowels that mark a first name as [`Sex::Women`].
const VOWELS: [char; 10] = ['а', 'е', 'ё', 'и', 'о', 'у', 'ы', 'э', 'ю', 'я'];

/// Answer-ordering strategy derived from the first name; it selects whether
/// question words are read reversed, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Women,
    Men,
}

/// An examiner or student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    first_name: String,
    last_name: String,
}

impl Person {
    /// Build a person, rejecting empty names and names with characters
    /// outside the accepted alphabet.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, ExamError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        validate_name(&first_name)?;
        validate_name(&last_name)?;
        Ok(Self {
            first_name,
            last_name,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// `Women` iff the first name ends in one of the fixed vowel set,
    /// matched case-insensitively. The last name plays no part.
    pub fn sex(&self) -> Sex {
        if ends_with_marked_vowel(&self.first_name) {
            Sex::Women
        } else {
            Sex::Men
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_name)
    }
}

fn ends_with_marked_vowel(name: &str) -> bool {
    name.chars()
        .last()
        .map(|c| c.to_lowercase().any(|l| VOWELS.contains(&l)))
        .unwrap_or(false)
}

fn validate_name(name: &str) -> Result<(), ExamError> {
    if name.is_empty() {
        return Err(ExamError::EmptyName);
    }
    if !name.chars().all(is_name_char) {
        return Err(ExamError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Letters of the accepted alphabet (Latin and Cyrillic ranges) plus hyphen.
fn is_name_char(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | 'А'..='Я' | 'а'..='я' | 'Ё' | 'ё' | '-')
}
