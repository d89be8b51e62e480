//! Keyforge CLI — caption animation and tracking transfer on project snapshots.
//!
//! Usage:
//!   keyforge animate <PROJECT>         Write pop curves onto text clips
//!   keyforge clear <PROJECT>           Reset text-clip scale curves
//!   keyforge fit-width <PROJECT>       Scale captions to span the frame
//!   keyforge apply-tracking <PROJECT>  Copy tracked corners onto corner pins
//!   keyforge sync-location <PROJECT>   Align caption locations
//!   keyforge info <PROJECT>            Show project information
//!   keyforge params <PROJECT>          Dump effect parameters of the first
//!                                      selected clip

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "keyforge",
    about = "Keyframe automation for caption clips in host project snapshots",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Load and run but do not write the project back
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write pop-in/pop-out scale curves onto every text clip
    Animate {
        /// Path to the project snapshot (JSON)
        project: PathBuf,

        /// Optional pop-curve spec overrides (JSON file)
        #[arg(long)]
        pop_spec: Option<PathBuf>,

        /// Derive per-clip scale bounds from the caption text
        #[arg(long)]
        fit_text: bool,
    },

    /// Reset every text clip's scale to a static unit value
    Clear {
        project: PathBuf,
    },

    /// Statically scale each caption so its longest line spans the frame
    FitWidth {
        project: PathBuf,

        /// Characters that fill the full width at scale 1.0
        #[arg(long, default_value = "42")]
        full_width_chars: f64,
    },

    /// Copy tracked surface corners onto the selected clips' corner pins
    ApplyTracking {
        project: PathBuf,
    },

    /// Apply the earliest selected caption's location to all of them
    SyncLocation {
        project: PathBuf,
    },

    /// Show snapshot information
    Info {
        project: PathBuf,
    },

    /// Dump the effect parameters of the first selected clip
    Params {
        project: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = keyforge_common::AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    keyforge_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Animate {
            project,
            pop_spec,
            fit_text,
        } => commands::animate::run(project, pop_spec, fit_text, config.rounding, cli.dry_run),
        Commands::Clear { project } => commands::clear::run(project, config.rounding, cli.dry_run),
        Commands::FitWidth {
            project,
            full_width_chars,
        } => commands::fit_width::run(project, full_width_chars, config.rounding, cli.dry_run),
        Commands::ApplyTracking { project } => {
            commands::apply_tracking::run(project, config.rounding, cli.dry_run)
        }
        Commands::SyncLocation { project } => {
            commands::sync_location::run(project, config.rounding, cli.dry_run)
        }
        Commands::Info { project } => commands::info::run(project, config.rounding),
        Commands::Params { project } => commands::params::run(project, config.rounding),
    }
}
