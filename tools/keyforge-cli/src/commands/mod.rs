//! Subcommand implementations.
//!
//! Each command loads the snapshot, runs one engine operation against it,
//! prints a summary, and writes the snapshot back unless `--dry-run` was
//! given.

pub mod animate;
pub mod apply_tracking;
pub mod clear;
pub mod fit_width;
pub mod info;
pub mod params;
pub mod sync_location;

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use keyforge_common::config::RoundingPolicy;
use keyforge_common::progress::ProgressSink;
use keyforge_project_model::Project;

/// Load the snapshot, filling in the configured rounding policy when the
/// snapshot does not pin one itself.
pub(crate) fn load_project(path: &Path, rounding: RoundingPolicy) -> anyhow::Result<Project> {
    let mut project =
        Project::load(path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))?;
    project.apply_default_rounding(rounding);
    Ok(project)
}

/// Persist the mutated snapshot, honoring `--dry-run`.
pub(crate) fn write_back(project: &mut Project, path: &Path, dry_run: bool) -> anyhow::Result<()> {
    if dry_run {
        println!("Dry run; {} left untouched.", path.display());
        return Ok(());
    }
    project.touch();
    project
        .save(path)
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;
    println!("Saved: {}", path.display());
    Ok(())
}

/// Terminal progress bar bridging the engine's [`ProgressSink`] to indicatif.
pub(crate) struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressSink for BarProgress {
    fn set_max(&mut self, max: u64) {
        self.bar.set_length(max);
        self.bar.set_position(0);
    }

    fn increment(&mut self) {
        self.bar.inc(1);
    }

    fn set_status(&mut self, text: &str) {
        self.bar.set_message(text.to_string());
    }

    fn complete(&mut self, text: &str) {
        self.bar.finish_with_message(text.to_string());
    }
}
