//! Study material commands.

use clap::Subcommand;
use std::collections::BTreeSet;
use studyplan_core::{Material, Priority, UnitKind};
use uuid::Uuid;

use crate::common;

#[derive(Subcommand)]
pub enum MaterialAction {
    /// Register a new material
    Add {
        /// Display title
        title: String,
        /// Total units of work
        #[arg(long)]
        total: u32,
        /// Units per study day
        #[arg(long, default_value = "10")]
        daily_target: u32,
        /// Unit kind: pages or problems
        #[arg(long, default_value = "pages")]
        kind: String,
        /// Category tag
        #[arg(long, default_value = "")]
        category: String,
        /// Units already completed
        #[arg(long, default_value = "0")]
        completed: u32,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// First study day (YYYY-MM-DD); allocation starts today when unset
        #[arg(long)]
        start: Option<String>,
        /// Comma-separated excluded weekdays, 0=Sunday .. 6=Saturday
        #[arg(long)]
        exclude: Option<String>,
    },
    /// List materials
    List,
    /// Update a material
    Update {
        /// Material ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New total units
        #[arg(long)]
        total: Option<u32>,
        /// New completed units
        #[arg(long)]
        completed: Option<u32>,
        /// New daily target
        #[arg(long)]
        daily_target: Option<u32>,
        /// New priority
        #[arg(long)]
        priority: Option<String>,
        /// New excluded weekdays (comma-separated)
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Remove a material and its allocation
    Remove {
        /// Material ID
        id: String,
    },
}

fn parse_kind(raw: &str) -> UnitKind {
    match raw {
        "problems" => UnitKind::Problems,
        _ => UnitKind::Pages,
    }
}

fn parse_priority(raw: &str) -> Priority {
    match raw {
        "high" => Priority::High,
        "low" => Priority::Low,
        _ => Priority::Medium,
    }
}

fn parse_exclude(raw: &str) -> BTreeSet<u8> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .filter(|weekday| *weekday < 7)
        .collect()
}

pub fn run(owner: &str, action: MaterialAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut snapshot = common::load_snapshot(owner)?;

    match action {
        MaterialAction::Add {
            title,
            total,
            daily_target,
            kind,
            category,
            completed,
            priority,
            start,
            exclude,
        } => {
            let material = Material {
                id: Uuid::new_v4().to_string(),
                title,
                category,
                unit_kind: parse_kind(&kind),
                total_units: total,
                completed_units: completed,
                daily_target,
                priority: parse_priority(&priority),
                start_date: start.map(|raw| common::parse_date(&raw)).transpose()?,
                excluded_weekdays: exclude.as_deref().map(parse_exclude).unwrap_or_default(),
            };
            snapshot.materials.push(material.clone());
            common::regenerate_material(&mut snapshot, &material.id, common::today());
            common::save_snapshot(owner, &snapshot)?;
            println!("Material created: {}", material.id);
            println!("{}", serde_json::to_string_pretty(&material)?);
        }
        MaterialAction::List => {
            println!("{}", serde_json::to_string_pretty(&snapshot.materials)?);
        }
        MaterialAction::Update {
            id,
            title,
            total,
            completed,
            daily_target,
            priority,
            exclude,
        } => {
            let material = snapshot
                .materials
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| format!("unknown material id '{id}'"))?;
            if let Some(title) = title {
                material.title = title;
            }
            if let Some(total) = total {
                material.total_units = total;
            }
            if let Some(completed) = completed {
                material.completed_units = completed;
            }
            if let Some(daily_target) = daily_target {
                material.daily_target = daily_target;
            }
            if let Some(priority) = priority {
                material.priority = parse_priority(&priority);
            }
            if let Some(exclude) = exclude {
                material.excluded_weekdays = parse_exclude(&exclude);
            }
            let updated = material.clone();
            common::regenerate_material(&mut snapshot, &id, common::today());
            common::save_snapshot(owner, &snapshot)?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        MaterialAction::Remove { id } => {
            let before = snapshot.materials.len();
            snapshot.materials.retain(|m| m.id != id);
            if snapshot.materials.len() == before {
                return Err(format!("unknown material id '{id}'").into());
            }
            studyplan_core::remove_material(&mut snapshot.allocations, &id);
            common::save_snapshot(owner, &snapshot)?;
            println!("Material removed: {id}");
        }
    }
    Ok(())
}
