//! Reset text-clip scale curves to a static unit value.

use std::path::PathBuf;

use keyforge_animation_core::clear_caption_animation;
use keyforge_common::config::RoundingPolicy;
use keyforge_project_model::NameClassifier;

pub fn run(path: PathBuf, rounding: RoundingPolicy, dry_run: bool) -> anyhow::Result<()> {
    let mut project = super::load_project(&path, rounding)?;

    let classifier = NameClassifier::default();
    let cleared = clear_caption_animation(&mut project, &classifier)
        .map_err(|e| anyhow::anyhow!("Clear failed: {e}"))?;

    println!("Reset scale on {cleared} text clip(s)");

    super::write_back(&mut project, &path, dry_run)
}
