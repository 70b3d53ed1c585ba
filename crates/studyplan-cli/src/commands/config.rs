//! Configuration management commands.

use clap::Subcommand;
use studyplan_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Update configuration values
    Set {
        /// First hour shown and auto-filled on the grid
        #[arg(long)]
        day_start_hour: Option<u8>,
        /// Hour the grid stops at (exclusive)
        #[arg(long)]
        day_end_hour: Option<u8>,
        /// Default placement duration in hours
        #[arg(long)]
        default_duration_hours: Option<u32>,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Set {
            day_start_hour,
            day_end_hour,
            default_duration_hours,
        } => {
            let mut config = Config::load()?;
            if let Some(hour) = day_start_hour {
                config.planner.day_start_hour = hour;
            }
            if let Some(hour) = day_end_hour {
                config.planner.day_end_hour = hour;
            }
            if let Some(hours) = default_duration_hours {
                config.planner.default_duration_hours = hours;
            }
            config.save()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
