//! Calendar grid slot commands.

use chrono::NaiveDate;
use clap::Subcommand;
use studyplan_core::{
    materialize, task_from_entry, Board, Config, DragSession, DragSource, Provenance, SlotKey,
    Snapshot, Task,
};

use crate::common;

#[derive(Subcommand)]
pub enum SlotAction {
    /// Place a task at a slot
    Place {
        /// Target slot (YYYY-MM-DD:HH)
        key: String,
        /// Task ID (derived allocation id)
        task_id: String,
        /// Duration in hours
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Move an anchor to another slot
    Move {
        /// Source slot (YYYY-MM-DD:HH)
        from: String,
        /// Destination slot (YYYY-MM-DD:HH)
        to: String,
    },
    /// Remove an anchor
    Remove {
        /// Slot (YYYY-MM-DD:HH)
        key: String,
    },
    /// Resize an anchor
    Resize {
        /// Slot (YYYY-MM-DD:HH)
        key: String,
        /// New duration in hours
        duration: u32,
    },
    /// Show a day's anchors
    Show {
        /// Date to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Auto-fill a day's free hours with its planned tasks
    Auto {
        /// Date to fill (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

/// Resolve a derived task id against the allocation history.
fn find_task(snapshot: &Snapshot, task_id: &str) -> Option<Task> {
    for (date, entries) in &snapshot.allocations {
        for entry in entries {
            let task = task_from_entry(*date, entry, Provenance::Calendar);
            if task.id == task_id {
                return Some(task);
            }
        }
    }
    None
}

/// Tasks planned for `date` that are neither completed nor already
/// anchored on that day.
fn unscheduled_tasks(snapshot: &Snapshot, date: NaiveDate) -> Vec<Task> {
    let entries = match snapshot.allocations.get(&date) {
        Some(entries) => entries,
        None => return Vec::new(),
    };
    let anchored: Vec<String> = snapshot
        .grid
        .day_slots(date)
        .into_iter()
        .map(|(_, slot)| slot.task.id.clone())
        .collect();

    materialize(date, entries, Provenance::Calendar)
        .into_iter()
        .filter(|task| !snapshot.completion.is_complete(&task.id))
        .filter(|task| !anchored.contains(&task.id))
        .collect()
}

pub fn run(owner: &str, action: SlotAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut snapshot = common::load_snapshot(owner)?;

    match action {
        SlotAction::Place {
            key,
            task_id,
            duration,
        } => {
            let key: SlotKey = key.parse()?;
            let task = find_task(&snapshot, &task_id)
                .ok_or_else(|| format!("unknown task id '{task_id}'"))?;
            let duration = duration.unwrap_or(config.planner.default_duration_hours);

            // Same pick/commit path the interactive surface uses.
            let mut board = Board {
                pool: vec![task.clone()],
                overdue: Vec::new(),
                grid: std::mem::take(&mut snapshot.grid),
            };
            let mut session = DragSession::new();
            session.pick(task, DragSource::Pool)?;
            let committed = session.commit(&mut board, key, duration);
            snapshot.grid = board.grid;
            committed?;

            common::save_snapshot(owner, &snapshot)?;
            println!("Placed {task_id} at {key}");
        }
        SlotAction::Move { from, to } => {
            let from: SlotKey = from.parse()?;
            let to: SlotKey = to.parse()?;
            snapshot.grid.move_task(from, to)?;
            common::save_snapshot(owner, &snapshot)?;
            println!("Moved {from} -> {to}");
        }
        SlotAction::Remove { key } => {
            let key: SlotKey = key.parse()?;
            match snapshot.grid.remove(key) {
                Some(task) => {
                    common::save_snapshot(owner, &snapshot)?;
                    println!("Removed {} from {key}", task.id);
                }
                None => println!("Slot {key} was already empty"),
            }
        }
        SlotAction::Resize { key, duration } => {
            let key: SlotKey = key.parse()?;
            let applied = snapshot.grid.resize(key, duration)?;
            common::save_snapshot(owner, &snapshot)?;
            if applied == duration {
                println!("Resized {key} to {applied}h");
            } else {
                println!("Resized {key} to {applied}h (capped by the next anchor)");
            }
        }
        SlotAction::Show { date } => {
            let date = date
                .map(|raw| common::parse_date(&raw))
                .transpose()?
                .unwrap_or_else(common::today);

            let listing: Vec<serde_json::Value> = snapshot
                .grid
                .day_slots(date)
                .into_iter()
                .map(|(key, slot)| {
                    serde_json::json!({
                        "slot": key.to_string(),
                        "task_id": slot.task.id,
                        "title": slot.task.title,
                        "duration": slot.duration,
                        "completed": snapshot.completion.is_complete(&slot.task.id),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        SlotAction::Auto { date } => {
            let date = date
                .map(|raw| common::parse_date(&raw))
                .transpose()?
                .unwrap_or_else(common::today);

            let tasks = unscheduled_tasks(&snapshot, date);
            let planned = tasks.len();
            let mut board = Board {
                pool: Vec::new(),
                overdue: Vec::new(),
                grid: std::mem::take(&mut snapshot.grid),
            };
            let leftover = board.bulk_schedule(
                date,
                config.planner.day_start_hour,
                config.planner.day_end_hour,
                tasks,
            );
            snapshot.grid = board.grid;

            common::save_snapshot(owner, &snapshot)?;
            println!(
                "Scheduled {} tasks for {date}, {} left over",
                planned - leftover.len(),
                leftover.len()
            );
        }
    }
    Ok(())
}
