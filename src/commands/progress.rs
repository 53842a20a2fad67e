//! Continue-watching commands

use super::{print_json, AppState};
use crate::cli::ProgressCommand;
use khattarhub::models::ProgressUpdate;

pub fn run(state: &AppState, command: ProgressCommand) -> anyhow::Result<()> {
    let mut store = state.progress_store();

    match command {
        ProgressCommand::List => print_json(&store.list()),
        ProgressCommand::Get {
            kind,
            id,
            season,
            episode,
        } => print_json(&store.get(kind, id, season, episode)),
        ProgressCommand::Save {
            kind,
            id,
            position,
            season,
            episode,
            title,
        } => {
            store.save(
                kind,
                id,
                ProgressUpdate {
                    position_seconds: position,
                    season,
                    episode,
                    title,
                },
            );
            tracing::info!("Saved position for {} {}", kind, id);
            print_json(&store.get(kind, id, season, episode))
        }
        ProgressCommand::Remove {
            kind,
            id,
            season,
            episode,
        } => {
            store.remove(kind, id, season, episode);
            print_json(&serde_json::json!({ "removed": true }))
        }
    }
}
