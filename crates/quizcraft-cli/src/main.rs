use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quizcraft_providers::QuizcraftConfig;

mod commands;

use commands::{create, init, leaderboard, list, submit, validate};

#[derive(Parser)]
#[command(
    name = "quizcraft",
    version,
    about = "Generate quiz assignments from source texts and score student answers"
)]
struct Cli {
    /// Config file path (defaults to quizcraft.toml, then
    /// ~/.config/quizcraft/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Provider name from the config, overriding default_provider
    #[arg(long, global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config and an example assignment
    Init(init::InitArgs),
    /// Generate a new assignment from a source text
    Create(create::CreateArgs),
    /// List assignments in the catalog
    List,
    /// Validate assignment files
    Validate(validate::ValidateArgs),
    /// Score an answer to one assignment question
    Submit(submit::SubmitArgs),
    /// Show the top scores for one question
    Leaderboard(leaderboard::LeaderboardArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizcraft=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Init(args) = &cli.command {
        return init::run(args);
    }

    let config = match &cli.config {
        Some(path) => QuizcraftConfig::load_from(path)?,
        None => quizcraft_providers::load_config()?,
    };
    let provider = cli.provider.as_deref();

    match &cli.command {
        Commands::Init(_) => unreachable!("handled above"),
        Commands::Create(args) => create::run(&config, provider, args).await,
        Commands::List => list::run(&config),
        Commands::Validate(args) => validate::run(&config, args),
        Commands::Submit(args) => submit::run(&config, provider, args).await,
        Commands::Leaderboard(args) => leaderboard::run(&config, args).await,
    }
}
