//! Align every selected caption's location with the earliest one.

use std::path::PathBuf;

use keyforge_animation_core::sync::sync_text_location;
use keyforge_common::config::RoundingPolicy;
use keyforge_project_model::NameClassifier;

pub fn run(path: PathBuf, rounding: RoundingPolicy, dry_run: bool) -> anyhow::Result<()> {
    let mut project = super::load_project(&path, rounding)?;

    let classifier = NameClassifier::default();
    let report = sync_text_location(&mut project, &classifier)
        .map_err(|e| anyhow::anyhow!("Sync failed: {e}"))?;

    println!(
        "Applied location ({:.4}, {:.4}) to {} clip(s)",
        report.location.x, report.location.y, report.applied
    );

    super::write_back(&mut project, &path, dry_run)
}
