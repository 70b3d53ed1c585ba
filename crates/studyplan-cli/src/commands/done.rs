//! Completion toggle commands.

use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum DoneAction {
    /// Mark a task complete
    Mark {
        /// Task ID
        task_id: String,
    },
    /// Clear a completion mark
    Clear {
        /// Task ID
        task_id: String,
    },
}

pub fn run(owner: &str, action: DoneAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut snapshot = common::load_snapshot(owner)?;
    match action {
        DoneAction::Mark { task_id } => {
            snapshot.completion.mark_complete(task_id.clone());
            common::save_snapshot(owner, &snapshot)?;
            println!("Completed: {task_id}");
        }
        DoneAction::Clear { task_id } => {
            snapshot.completion.mark_incomplete(&task_id);
            common::save_snapshot(owner, &snapshot)?;
            println!("Cleared: {task_id}");
        }
    }
    Ok(())
}
