//! Text-width-driven scale derivation.
//!
//! The only text metric the engines use is the longest rendered line of a
//! caption, in characters. Against a constant "characters that fill the
//! full frame width at unit scale", that yields a base width fraction from
//! which per-clip pop bounds and a full-width static scale are derived.
//! Rich-text decoding happens outside the core; the text parameter value
//! is treated as plain text.

use serde::{Deserialize, Serialize};

use keyforge_common::{KeyforgeResult, ProgressSink};
use keyforge_project_model::{Classifier, Project, TrackKind};

use crate::pop::{ScaleBounds, SCALE_PARAM};

/// Configuration for text-width measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFitConfig {
    /// Characters that fill the full frame width at scale 1.0.
    pub full_width_chars: f64,

    /// Name of the generator parameter carrying the text content.
    pub text_param: String,
}

impl Default for TextFitConfig {
    fn default() -> Self {
        Self {
            full_width_chars: 42.0,
            text_param: "Text".to_string(),
        }
    }
}

/// Length in characters of the longest line, after newline normalization.
pub fn longest_line_length(text: &str) -> usize {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

/// Derive pop scale bounds from a longest-line length.
///
/// With `base = len / full_width_chars`, the pop overshoot is 20% of the
/// base width but never more than 0.04 of frame width, re-expressed as a
/// scale multiplier; the upper bound never shrinks below 1.0 and the lower
/// never grows above it. Returns `None` when nothing is measurable.
pub fn scale_bounds_for_line(len: usize, full_width_chars: f64) -> Option<ScaleBounds> {
    if len == 0 || full_width_chars <= 0.0 {
        return None;
    }
    let base = len as f64 / full_width_chars;

    let max = ((base * 1.2).min(base + 0.04) / base).max(1.0);
    let min = ((base * 0.8).max((base - 0.04).max(0.0)) / base).min(1.0);

    Some(ScaleBounds { min, max })
}

/// Measure a text block and derive pop scale bounds from it.
pub fn scale_bounds_for_text(text: &str, full_width_chars: f64) -> Option<ScaleBounds> {
    scale_bounds_for_line(longest_line_length(text), full_width_chars)
}

/// Set every text clip's scale statically so its longest line spans the
/// full frame width. Discards any scale animation on the way.
pub fn resize_to_full_width(
    project: &mut Project,
    config: &TextFitConfig,
    classifier: &dyn Classifier,
    progress: &mut dyn ProgressSink,
) -> KeyforgeResult<usize> {
    let mut applied = 0;

    progress.set_status("Resizing captions to full width…");
    for track in &mut project.tracks {
        if track.kind != TrackKind::Video {
            continue;
        }
        for clip in &mut track.clips {
            let Some(generator) = &clip.generator else {
                continue;
            };
            if !classifier.is_text_generator(generator) {
                continue;
            }
            let longest = generator
                .text(&config.text_param)
                .map(longest_line_length)
                .unwrap_or(0);
            if longest == 0 {
                continue;
            }
            let target = config.full_width_chars / longest as f64;

            let Some(effect) = clip.effects.iter_mut().find(|fx| classifier.is_pip_effect(fx))
            else {
                continue;
            };
            if let Some(scale) = effect.scalar_mut(SCALE_PARAM) {
                scale.set_animated(false);
                scale.set_at_frame(0, target);
                applied += 1;
            }
        }
    }

    progress.complete("Done");
    tracing::info!(applied, "full-width resize finished");
    Ok(applied)
}
