//! Statically scale each caption so its longest line spans the frame.

use std::path::PathBuf;

use keyforge_animation_core::text_fit::{resize_to_full_width, TextFitConfig};
use keyforge_common::config::RoundingPolicy;
use keyforge_project_model::NameClassifier;

use super::BarProgress;

pub fn run(
    path: PathBuf,
    full_width_chars: f64,
    rounding: RoundingPolicy,
    dry_run: bool,
) -> anyhow::Result<()> {
    if full_width_chars <= 0.0 {
        anyhow::bail!("--full-width-chars must be positive, got {full_width_chars}");
    }

    let mut project = super::load_project(&path, rounding)?;

    let config = TextFitConfig {
        full_width_chars,
        ..TextFitConfig::default()
    };
    let classifier = NameClassifier::default();
    let mut progress = BarProgress::new();

    let applied = resize_to_full_width(&mut project, &config, &classifier, &mut progress)
        .map_err(|e| anyhow::anyhow!("Resize failed: {e}"))?;

    println!("Resized {applied} caption(s) to full width");

    super::write_back(&mut project, &path, dry_run)
}
