use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "studyplan-cli", version, about = "Studyplan CLI")]
struct Cli {
    /// Snapshot namespace to operate on
    #[arg(long, global = true, default_value = "default")]
    owner: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Study material management
    Material {
        #[command(subcommand)]
        action: commands::material::MaterialAction,
    },
    /// Allocation planning
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Calendar grid slots
    Slot {
        #[command(subcommand)]
        action: commands::slot::SlotAction,
    },
    /// Overdue backlog
    Overdue {
        #[command(subcommand)]
        action: commands::overdue::OverdueAction,
    },
    /// Completion toggles
    Done {
        #[command(subcommand)]
        action: commands::done::DoneAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let owner = cli.owner;
    let result = match cli.command {
        Commands::Material { action } => commands::material::run(&owner, action),
        Commands::Plan { action } => commands::plan::run(&owner, action),
        Commands::Slot { action } => commands::slot::run(&owner, action),
        Commands::Overdue { action } => commands::overdue::run(&owner, action),
        Commands::Done { action } => commands::done::run(&owner, action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
