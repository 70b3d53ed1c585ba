//! Overdue backlog commands.

use clap::Subcommand;
use studyplan_core::{detect, rank};

use crate::common;

#[derive(Subcommand)]
pub enum OverdueAction {
    /// List overdue work, oldest first, highest priority breaking ties
    List,
}

pub fn run(owner: &str, action: OverdueAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        OverdueAction::List => {
            let snapshot = common::load_snapshot(owner)?;
            let mut entries = detect(&snapshot.allocations, &snapshot.completion, common::today());
            rank(&mut entries);

            let listing: Vec<serde_json::Value> = entries
                .iter()
                .map(|overdue| {
                    serde_json::json!({
                        "task_id": overdue.task_id(),
                        "date": overdue.date,
                        "title": overdue.entry.title,
                        "priority": overdue.entry.priority,
                        "units": format!("{}-{}", overdue.entry.start_unit, overdue.entry.end_unit),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(())
}
