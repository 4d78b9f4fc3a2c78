use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use quizcraft_core::catalog;
use quizcraft_providers::QuizcraftConfig;

#[derive(Args)]
pub struct ValidateArgs {
    /// A single assignment file to validate (defaults to the whole catalog)
    pub path: Option<PathBuf>,
}

pub fn run(config: &QuizcraftConfig, args: &ValidateArgs) -> Result<()> {
    let assignments = match &args.path {
        Some(path) => vec![catalog::parse_assignment(path)?],
        None => catalog::load_catalog_directory(&config.catalog_dir)?,
    };

    let mut total = 0;
    for assignment in &assignments {
        for warning in catalog::validate_assignment(assignment) {
            match &warning.question_id {
                Some(question_id) => println!(
                    "{}: question {}: {}",
                    assignment.assignment_id, question_id, warning.message
                ),
                None => println!("{}: {}", assignment.assignment_id, warning.message),
            }
            total += 1;
        }
    }

    if total > 0 {
        bail!(
            "{total} validation warning(s) across {} assignment(s)",
            assignments.len()
        );
    }
    println!("{} assignment(s) OK", assignments.len());
    Ok(())
}
