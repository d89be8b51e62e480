//! Write pop-in/pop-out scale curves onto every text clip.

use std::path::PathBuf;

use keyforge_animation_core::animate_captions;
use keyforge_animation_core::pop::PopCurveSpec;
use keyforge_animation_core::text_fit::TextFitConfig;
use keyforge_common::cancel::CancelToken;
use keyforge_common::config::RoundingPolicy;
use keyforge_project_model::NameClassifier;

use super::BarProgress;

pub fn run(
    path: PathBuf,
    pop_spec: Option<PathBuf>,
    fit_text: bool,
    rounding: RoundingPolicy,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut project = super::load_project(&path, rounding)?;

    let spec: PopCurveSpec = match pop_spec {
        Some(spec_path) => {
            let content = std::fs::read_to_string(&spec_path)
                .map_err(|_| anyhow::anyhow!("Spec file not found: {}", spec_path.display()))?;
            serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse curve spec: {e}"))?
        }
        None => PopCurveSpec::default(),
    };

    let fit = fit_text.then(TextFitConfig::default);
    let classifier = NameClassifier::default();
    let mut progress = BarProgress::new();
    let cancel = CancelToken::new();

    let summary = animate_captions(
        &mut project,
        &spec,
        fit.as_ref(),
        &classifier,
        &mut progress,
        &cancel,
    )
    .map_err(|e| anyhow::anyhow!("Animation failed: {e}"))?;

    println!("Animated {} text clip(s)", summary.animated);
    if summary.suppressed > 0 {
        println!("  Pop-out suppressed on {} clip(s)", summary.suppressed);
    }
    if summary.skipped > 0 {
        println!("  Skipped {} clip(s) without a usable scale", summary.skipped);
    }

    super::write_back(&mut project, &path, dry_run)
}
