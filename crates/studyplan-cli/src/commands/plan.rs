//! Allocation planning commands.

use clap::Subcommand;
use studyplan_core::{allocate_daily, allocate_window, materialize, merge_allocations, Provenance};

use crate::common;

#[derive(Subcommand)]
pub enum PlanAction {
    /// Rebuild allocations for every material
    Generate {
        /// Spread remaining work across a fixed window (two dates) instead
        /// of the open-ended daily target
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        window: Option<Vec<String>>,
    },
    /// Show a day's materialized tasks
    Show {
        /// Date to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Show the whole Sunday-to-Saturday week containing the date
        #[arg(long)]
        week: bool,
    },
}

pub fn run(owner: &str, action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Generate { window } => {
            let mut snapshot = common::load_snapshot(owner)?;
            snapshot.allocations.clear();
            let reference = common::today();

            for material in &snapshot.materials {
                let fresh = match &window {
                    Some(bounds) => {
                        let start = common::parse_date(&bounds[0])?;
                        let end = common::parse_date(&bounds[1])?;
                        allocate_window(material, start, end)?
                    }
                    None => {
                        if !material.is_allocatable() {
                            continue;
                        }
                        allocate_daily(material, reference)
                    }
                };
                merge_allocations(&mut snapshot.allocations, fresh);
            }

            common::save_snapshot(owner, &snapshot)?;
            println!(
                "Allocated {} materials over {} days",
                snapshot.materials.len(),
                snapshot.allocations.len()
            );
        }
        PlanAction::Show { date, week } => {
            let snapshot = common::load_snapshot(owner)?;
            let date = date
                .map(|raw| common::parse_date(&raw))
                .transpose()?
                .unwrap_or_else(common::today);

            let (start, end) = if week {
                studyplan_core::calendar::week_bounds(date)
            } else {
                (date, date)
            };

            let mut listing = serde_json::Map::new();
            for (day, entries) in snapshot.allocations.range(start..=end) {
                let mut tasks = materialize(*day, entries, Provenance::Calendar);
                for task in &mut tasks {
                    task.completed = snapshot.completion.is_complete(&task.id);
                }
                listing.insert(
                    studyplan_core::calendar::date_key(*day),
                    serde_json::to_value(tasks)?,
                );
            }
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(())
}
