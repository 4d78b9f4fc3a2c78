use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use quizcraft_core::catalog::FileCatalog;
use quizcraft_core::traits::AssignmentCatalog;
use quizcraft_providers::QuizcraftConfig;

const PROMPT_PREVIEW_CHARS: usize = 60;

pub fn run(config: &QuizcraftConfig) -> Result<()> {
    let catalog = FileCatalog::open(&config.catalog_dir)?;
    let assignments = catalog.list_assignments()?;

    if assignments.is_empty() {
        println!("No assignments in {}", config.catalog_dir.display());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Questions", "Teacher", "Prompt"]);
    for assignment in &assignments {
        table.add_row(vec![
            assignment.assignment_id.clone(),
            assignment.questions.len().to_string(),
            assignment.teacher_id.clone().unwrap_or_default(),
            preview(&assignment.prompt),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn preview(prompt: &str) -> String {
    let flattened = prompt.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= PROMPT_PREVIEW_CHARS {
        flattened
    } else {
        let cut: String = flattened.chars().take(PROMPT_PREVIEW_CHARS).collect();
        format!("{cut}…")
    }
}
