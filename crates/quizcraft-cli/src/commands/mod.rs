pub mod create;
pub mod init;
pub mod leaderboard;
pub mod list;
pub mod submit;
pub mod validate;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use quizcraft_core::model::LeaderboardEntry;

pub(crate) fn leaderboard_table(entries: &[LeaderboardEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rank", "Student", "Score"]);
    for (rank, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            entry.student_id.clone(),
            entry.score.to_string(),
        ]);
    }
    table
}
