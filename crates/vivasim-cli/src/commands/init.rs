//! The `vivasim init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("roster.toml").exists() {
        println!("roster.toml already exists, skipping.");
    } else {
        std::fs::write("roster.toml", SAMPLE_ROSTER)?;
        println!("Created roster.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit roster.toml with your own people and questions");
    println!("  2. Run: vivasim validate --roster roster.toml");
    println!("  3. Run: vivasim run --roster roster.toml");

    Ok(())
}

const SAMPLE_ROSTER: &str = r#"# vivasim roster

questions = [
    "что такое поток и чем он отличается от процесса",
    "что такое мьютекс и зачем он нужен",
    "что такое очередь сообщений",
    "как работает кооперативная многозадачность",
    "что такое состояние гонки",
]

[[examiners]]
first_name = "Игорь"
last_name = "Петров"

[[examiners]]
first_name = "Анна"
last_name = "Иванова"

[[students]]
first_name = "Мария"
last_name = "Смирнова"

[[students]]
first_name = "Олег"
last_name = "Кузнецов"

[[students]]
first_name = "Нина"
last_name = "Попова"

[[students]]
first_name = "Павел"
last_name = "Сидоров"

[[students]]
first_name = "Вера"
last_name = "Орлова"
"#;
