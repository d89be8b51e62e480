//! Dump the effect parameters of the first selected clip.
//!
//! Handy when a host exposes a plugin whose parameter names are not
//! documented anywhere; run this against a snapshot with the clip of
//! interest selected.

use std::path::PathBuf;

use keyforge_common::config::RoundingPolicy;
use keyforge_project_model::ParamValue;

pub fn run(path: PathBuf, rounding: RoundingPolicy) -> anyhow::Result<()> {
    let project = super::load_project(&path, rounding)?;

    let clip = project
        .video_tracks()
        .flat_map(|t| t.clips.iter())
        .find(|c| c.selected)
        .ok_or_else(|| anyhow::anyhow!("No selected clip in {}", path.display()))?;

    if let Some(generator) = &clip.generator {
        println!(
            "Generator: {} ({})",
            generator.plugin_name, generator.plugin_uid
        );
        for param in &generator.params {
            print_param(param);
        }
        println!();
    }

    if clip.effects.is_empty() {
        println!("No effects on the first selected clip.");
    }
    for effect in &clip.effects {
        println!("Effect: {} ({})", effect.plugin_name, effect.plugin_uid);
        for param in &effect.params {
            print_param(param);
        }
        println!();
    }

    Ok(())
}

fn print_param(param: &keyforge_project_model::Parameter) {
    let detail = match &param.value {
        ParamValue::Scalar(s) => {
            if s.is_animated() {
                format!("{} keyframe(s)", s.keyframe_count())
            } else {
                format!("static {}", s.static_value())
            }
        }
        ParamValue::Vector2(v) => {
            if v.is_animated() {
                format!("{} keyframe(s)", v.keyframe_count())
            } else {
                let value = v.static_value();
                format!("static ({}, {})", value.x, value.y)
            }
        }
        ParamValue::Boolean { value } => format!("{value}"),
        ParamValue::Text { value } => {
            let mut preview: String = value.chars().take(32).collect();
            if value.chars().count() > 32 {
                preview.push('…');
            }
            format!("{preview:?}")
        }
        ParamValue::Choice(c) => format!("index {} of {}", c.selected, c.options.len()),
    };
    println!("  {} [{}]: {}", param.name, param.value.kind_name(), detail);
}
