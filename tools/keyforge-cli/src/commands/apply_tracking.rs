//! Copy tracked surface corners onto the selected clips' corner pins.

use std::path::PathBuf;

use keyforge_animation_core::apply_tracking;
use keyforge_common::cancel::CancelToken;
use keyforge_common::config::RoundingPolicy;
use keyforge_project_model::NameClassifier;

use super::BarProgress;

pub fn run(path: PathBuf, rounding: RoundingPolicy, dry_run: bool) -> anyhow::Result<()> {
    let mut project = super::load_project(&path, rounding)?;

    let classifier = NameClassifier::default();
    let mut progress = BarProgress::new();
    let cancel = CancelToken::new();

    let report = apply_tracking(&mut project, &classifier, &mut progress, &cancel)
        .map_err(|e| anyhow::anyhow!("Transfer failed: {e}"))?;

    println!("Tracking sources: {}", report.sources);
    println!("Corner-pin targets: {}", report.targets);
    println!("Keyframes copied: {}", report.frames_copied);

    super::write_back(&mut project, &path, dry_run)
}
