//! Show snapshot information.

use std::path::PathBuf;

use keyforge_common::config::RoundingPolicy;
use keyforge_project_model::{Classifier, NameClassifier, TrackKind};

pub fn run(path: PathBuf, rounding: RoundingPolicy) -> anyhow::Result<()> {
    let project = super::load_project(&path, rounding)?;

    println!("Project: {}", project.name);
    println!("  Version: {}", project.version);
    println!("  Created: {}", project.created_at);
    println!("  Modified: {}", project.modified_at);
    println!("  Frame rate: {} fps", project.frame_rate);
    println!("  Rounding: {:?}", project.rounding.unwrap_or_default());
    println!();

    let classifier = NameClassifier::default();

    println!("Tracks:");
    for track in &project.tracks {
        let kind = match track.kind {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
        };
        let selected = track.clips.iter().filter(|c| c.selected).count();
        let text = track
            .clips
            .iter()
            .filter(|c| {
                c.generator
                    .as_ref()
                    .is_some_and(|g| classifier.is_text_generator(g))
            })
            .count();
        println!(
            "  {} \"{}\": {} clip(s), {} selected, {} text",
            kind,
            track.name,
            track.clips.len(),
            selected,
            text
        );
    }

    Ok(())
}
