use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;

use quizcraft_core::authoring;
use quizcraft_core::catalog;
use quizcraft_core::model::Assignment;
use quizcraft_core::traits::GenerateRequest;
use quizcraft_providers::{create_generator, create_image_generator, QuizcraftConfig};

const GENERATION_MAX_TOKENS: u32 = 2048;
const GENERATION_TEMPERATURE: f64 = 0.2;
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

#[derive(Args)]
pub struct CreateArgs {
    /// File containing the source text to generate questions from
    #[arg(long)]
    pub input: PathBuf,

    /// Teacher identity recorded on the assignment
    #[arg(long)]
    pub teacher: Option<String>,

    /// Also generate a cover image (requires an image-capable provider)
    #[arg(long)]
    pub image: bool,
}

pub async fn run(
    config: &QuizcraftConfig,
    provider: Option<&str>,
    args: &CreateArgs,
) -> Result<()> {
    let input_text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input file: {}", args.input.display()))?
        .trim()
        .to_string();
    if input_text.is_empty() {
        bail!("input file is empty: {}", args.input.display());
    }

    let (provider_name, provider_config) = config.provider(provider)?;
    let generator = create_generator(provider_config)?;
    tracing::info!(
        provider = provider_name,
        model = %config.text_model,
        "generating questions"
    );

    let request = GenerateRequest {
        model: config.text_model.clone(),
        prompt: authoring::question_prompt(&input_text),
        system_prompt: None,
        max_tokens: GENERATION_MAX_TOKENS,
        temperature: GENERATION_TEMPERATURE,
    };
    let response = generator.generate(&request).await?;
    let questions = authoring::parse_generated_questions(&response.content)?;

    let assignment_id = authoring::generate_assignment_id();

    let image_ref = if args.image {
        let model = config.image_model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL);
        match create_image_generator(provider_config, Some(model))? {
            Some(image_generator) => {
                let bytes = image_generator
                    .generate_image(&authoring::image_prompt(&input_text))
                    .await?;
                let images_dir = config.catalog_dir.join("images");
                std::fs::create_dir_all(&images_dir)
                    .with_context(|| format!("failed to create {}", images_dir.display()))?;
                let relative = format!("images/{assignment_id}.png");
                std::fs::write(config.catalog_dir.join(&relative), bytes)
                    .context("failed to write assignment image")?;
                Some(relative)
            }
            None => {
                tracing::warn!("provider '{provider_name}' cannot generate images, skipping");
                None
            }
        }
    } else {
        None
    };

    let assignment = Assignment {
        assignment_id: assignment_id.clone(),
        prompt: input_text,
        image_ref,
        teacher_id: args.teacher.clone(),
        created_at: Some(Utc::now()),
        questions,
    };

    std::fs::create_dir_all(&config.catalog_dir)
        .with_context(|| format!("failed to create {}", config.catalog_dir.display()))?;
    let path = config.catalog_dir.join(format!("{assignment_id}.toml"));
    std::fs::write(&path, catalog::assignment_to_toml(&assignment)?)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!(
        "Created assignment {assignment_id} with {} question(s)",
        assignment.questions.len()
    );
    println!("  {}", path.display());
    for question in &assignment.questions {
        println!("  [{}] {}", question.id, question.question);
    }
    Ok(())
}
