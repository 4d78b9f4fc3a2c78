use anyhow::Result;
use clap::Args;

use quizcraft_core::model::question_key;
use quizcraft_core::traits::AnswerStore;
use quizcraft_providers::QuizcraftConfig;
use quizcraft_store::FileStore;

use super::leaderboard_table;

#[derive(Args)]
pub struct LeaderboardArgs {
    /// Assignment ID
    #[arg(long)]
    pub assignment: String,

    /// Question ID within the assignment
    #[arg(long)]
    pub question: String,

    /// Number of entries to show (defaults to leaderboard_size from the config)
    #[arg(long, short = 'n')]
    pub top: Option<usize>,
}

pub async fn run(config: &QuizcraftConfig, args: &LeaderboardArgs) -> Result<()> {
    let store = FileStore::open(&config.store_path)?;
    let key = question_key(&args.assignment, &args.question);
    let entries = store
        .top_n(&key, args.top.unwrap_or(config.leaderboard_size))
        .await?;

    if entries.is_empty() {
        println!("No submissions yet for {key}");
        return Ok(());
    }
    println!("{}", leaderboard_table(&entries));
    Ok(())
}
