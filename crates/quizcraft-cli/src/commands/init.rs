use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

const STARTER_CONFIG: &str = r#"# quizcraft configuration.
#
# The mock provider works offline and is useful for trying the tool out.
# Switch default_provider to "openai" (and set OPENAI_API_KEY) or "local"
# (with Ollama running) for real embeddings and question generation.
default_provider = "mock"
embedding_model = "text-embedding-3-small"
text_model = "gpt-4.1-mini"
student_id = "student"
catalog_dir = "assignments"
store_path = "answers.json"

[providers.mock]
type = "mock"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.local]
type = "ollama"
base_url = "http://localhost:11434"
"#;

const EXAMPLE_ASSIGNMENT: &str = r#"[assignment]
id = "example"
prompt = "The water cycle moves water between oceans, air, and land. Heat from the sun drives evaporation from the oceans; as water vapor rises and cools it condenses into clouds and returns as rain."

[[questions]]
id = "1"
question = "What drives evaporation from the oceans?"
answer = "Heat from the sun"

[[questions]]
id = "2"
question = "What happens when water vapor cools?"
answer = "It condenses into clouds"
"#;

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing quizcraft.toml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs) -> Result<()> {
    let config_path = Path::new("quizcraft.toml");
    if config_path.exists() && !args.force {
        bail!("quizcraft.toml already exists (use --force to overwrite)");
    }
    std::fs::write(config_path, STARTER_CONFIG).context("failed to write quizcraft.toml")?;

    let catalog_dir = Path::new("assignments");
    std::fs::create_dir_all(catalog_dir)
        .with_context(|| format!("failed to create {}", catalog_dir.display()))?;
    let example = catalog_dir.join("example.toml");
    if !example.exists() {
        std::fs::write(&example, EXAMPLE_ASSIGNMENT)
            .with_context(|| format!("failed to write {}", example.display()))?;
    }

    println!("Wrote quizcraft.toml and {}", example.display());
    println!("Try: quizcraft submit --assignment example --question 1 --answer \"Heat from the sun\"");
    Ok(())
}
