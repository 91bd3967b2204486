//! The `satforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("satforge.toml").exists() {
        println!("satforge.toml already exists, skipping.");
    } else {
        std::fs::write("satforge.toml", STARTER_PLAN)?;
        println!("Created satforge.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: satforge fetch --output questions.json");
    println!("  2. Run: satforge validate --plan satforge.toml --corpus questions.json");
    println!("  3. Run: satforge generate --plan satforge.toml --corpus questions.json");

    Ok(())
}

// Full-length digital SAT shape: 27 + 27 Reading & Writing, 22 + 22 Math.
const STARTER_PLAN: &str = r#"[exam]
name = "Practice Test 1"
# seed = 42

[[slots]]
section = "reading-writing"
module = "module-1"
count = 27
max_per_skill = 3

[slots.difficulty_mix]
easy = 11
medium = 11
hard = 5

[[slots]]
section = "reading-writing"
module = "module-2"
count = 27
max_per_skill = 3

[slots.difficulty_mix]
easy = 7
medium = 10
hard = 10

[[slots]]
section = "math"
module = "module-1"
count = 22
max_per_skill = 1

[slots.difficulty_mix]
easy = 9
medium = 9
hard = 4

[[slots]]
section = "math"
module = "module-2"
count = 22
max_per_skill = 1

[slots.difficulty_mix]
easy = 4
medium = 9
hard = 9
"#;
