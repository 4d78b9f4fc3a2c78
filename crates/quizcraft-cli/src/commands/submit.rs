use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;

use quizcraft_core::catalog::FileCatalog;
use quizcraft_core::error::ScoringError;
use quizcraft_core::feedback;
use quizcraft_core::pipeline::{PipelineConfig, ScoringPipeline, Submission};
use quizcraft_core::traits::AssignmentCatalog;
use quizcraft_providers::{create_embedder, create_generator, QuizcraftConfig};
use quizcraft_store::FileStore;

use super::leaderboard_table;

#[derive(Args)]
pub struct SubmitArgs {
    /// Assignment ID
    #[arg(long)]
    pub assignment: String,

    /// Question ID within the assignment
    #[arg(long)]
    pub question: String,

    /// Answer text
    #[arg(long, conflicts_with = "answer_file")]
    pub answer: Option<String>,

    /// Read the answer from a file instead
    #[arg(long)]
    pub answer_file: Option<PathBuf>,

    /// Student identity (defaults to student_id from the config)
    #[arg(long)]
    pub student: Option<String>,

    /// Also ask the text model for grammar and rephrasing suggestions
    #[arg(long)]
    pub suggest: bool,
}

pub async fn run(
    config: &QuizcraftConfig,
    provider: Option<&str>,
    args: &SubmitArgs,
) -> Result<()> {
    let answer_text = match (&args.answer, &args.answer_file) {
        (Some(answer), _) => answer.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answer file: {}", path.display()))?
            .trim()
            .to_string(),
        (None, None) => bail!("provide --answer or --answer-file"),
    };

    let catalog = FileCatalog::open(&config.catalog_dir)?;
    let assignment = catalog
        .get_assignment(&args.assignment)?
        .ok_or_else(|| ScoringError::NotFound(format!("assignment '{}'", args.assignment)))?;
    let question = assignment.question(&args.question).ok_or_else(|| {
        ScoringError::NotFound(format!(
            "question '{}' in assignment '{}'",
            args.question, args.assignment
        ))
    })?;

    let (provider_name, provider_config) = config.provider(provider)?;
    let embedder = create_embedder(provider_config, &config.embedding_model)?;
    let store = Arc::new(FileStore::open(&config.store_path)?);

    let pipeline = ScoringPipeline::new(
        embedder,
        Arc::clone(&store) as Arc<dyn quizcraft_core::traits::AnswerStore>,
        PipelineConfig {
            leaderboard_size: config.leaderboard_size,
            embed_timeout: Some(Duration::from_secs(config.embed_timeout_secs)),
        },
    );

    let student_id = args
        .student
        .clone()
        .unwrap_or_else(|| config.student_id.clone());
    let submission = Submission {
        student_id: student_id.clone(),
        assignment_id: args.assignment.clone(),
        question_id: args.question.clone(),
        answer_text: answer_text.clone(),
        correct_answer_text: question.answer.clone(),
    };

    tracing::info!(provider = provider_name, student = %student_id, "scoring submission");
    let result = pipeline.submit(&submission).await?;

    println!("Score: {}", result.score);
    if result.updated {
        println!("New personal best for {student_id}!");
    } else {
        println!("Best so far for {student_id}: {}", result.best.score);
    }
    if !result.leaderboard.is_empty() {
        println!("{}", leaderboard_table(&result.leaderboard));
    }

    if args.suggest {
        let generator = create_generator(provider_config)?;
        let grammar =
            feedback::suggest_grammar_fix(generator.as_ref(), &config.text_model, &answer_text)
                .await?;
        let rephrased =
            feedback::suggest_rephrasing(generator.as_ref(), &config.text_model, &answer_text)
                .await?;
        println!("Grammar: {grammar}");
        println!("Rephrased: {rephrased}");
    }

    Ok(())
}
