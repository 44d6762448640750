//! The `vivasim validate` command.

use std::path::PathBuf;

use anyhow::Result;

use vivasim_loader::roster::{parse_roster, validate_roster};

pub fn execute(roster_path: PathBuf) -> Result<()> {
    let roster = parse_roster(&roster_path)?;

    println!(
        "Roster: {} students, {} examiners, {} questions",
        roster.students.len(),
        roster.examiners.len(),
        roster.questions.len()
    );

    let warnings = validate_roster(&roster);
    for w in &warnings {
        println!("  WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Roster valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
