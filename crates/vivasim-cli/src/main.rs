//! vivasim CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vivasim", version, about = "Concurrent oral-exam simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the exam simulation
    Run {
        /// Path to a .toml roster file
        #[arg(long, conflicts_with_all = ["students", "examiners", "questions"])]
        roster: Option<PathBuf>,

        /// Students file, one "first last" per line
        #[arg(long, requires = "examiners")]
        students: Option<PathBuf>,

        /// Examiners file, same shape as the students file
        #[arg(long)]
        examiners: Option<PathBuf>,

        /// Questions file, one question per line
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Master seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Reporting poll interval in seconds
        #[arg(long, default_value = "1.0")]
        interval: f64,

        /// Write the final JSON report here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Suppress live table rendering
        #[arg(long)]
        quiet: bool,
    },

    /// Validate a roster file without running anything
    Validate {
        /// Path to a .toml roster file
        #[arg(long)]
        roster: PathBuf,
    },

    /// Create a starter roster.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vivasim=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            roster,
            students,
            examiners,
            questions,
            seed,
            interval,
            output,
            quiet,
        } => {
            commands::run::execute(
                roster, students, examiners, questions, seed, interval, output, quiet,
            )
            .await
        }
        Commands::Validate { roster } => commands::validate::execute(roster),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
