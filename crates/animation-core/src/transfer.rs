//! Tracking-data keyframe transfer.
//!
//! Copies the four tracked surface-corner curves from every tracking
//! source among the selected clips onto the corner-pin parameters of every
//! selected clip's picture-in-picture effect. Corner values are recorded
//! in pixels against the source clip's local timeline; each write is
//! normalized to unit coordinates, remapped to absolute frames, and
//! clipped to the destination clip's window.
//!
//! Enumeration order is fixed and observable: sources, then destinations,
//! then corners, then keyframes. A destination frame written by two
//! sources keeps the value from the source processed last.

use keyforge_common::{CancelToken, KeyforgeError, KeyforgeResult, ProgressSink};
use keyforge_project_model::{
    Classifier, ClipWindow, FrameIndex, Project, TimeBase, TrackKind, Vec2,
};

/// Source corner name -> destination corner name, in enumeration order.
pub const CORNER_MAP: [(&str, &str); 4] = [
    ("surfaceTopLeft", "CornerTL"),
    ("surfaceTopRight", "CornerTR"),
    ("surfaceBottomLeft", "CornerBL"),
    ("surfaceBottomRight", "CornerBR"),
];

/// The corner whose first value carries the surface size in pixels.
pub const REFERENCE_CORNER: &str = "surfaceTopRight";

/// Discrete mode parameter forced to "free form" so X and Y scale
/// independently on the destination.
pub const PROPORTIONS_PARAM: &str = "KeepProportions";
const FREE_FORM_INDEX: usize = 2;

/// Outcome of a transfer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Tracking sources found among the selected clips.
    pub sources: usize,
    /// Destination effects written to (or skipped corner-wise).
    pub targets: usize,
    /// Keyframes actually written.
    pub frames_copied: u64,
    /// Progress steps taken (one per examined source keyframe).
    pub steps: u64,
}

/// Location of an effect inside the project graph.
#[derive(Debug, Clone, Copy)]
struct EffectRef {
    track: usize,
    clip: usize,
    effect: usize,
}

#[derive(Debug, Clone, Copy)]
struct SourceRef {
    at: EffectRef,
    start_frame: FrameIndex,
}

#[derive(Debug, Clone, Copy)]
struct TargetRef {
    at: EffectRef,
    window: ClipWindow,
}

/// Copy corner keyframes from every tracking source onto every
/// picture-in-picture destination among the selected clips.
pub fn apply_tracking(
    project: &mut Project,
    classifier: &dyn Classifier,
    progress: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> KeyforgeResult<TransferReport> {
    let tb = project
        .timebase()
        .map_err(|e| KeyforgeError::project(e.to_string()))?;

    let (sources, targets) = collect_endpoints(project, classifier, &tb);

    if sources.is_empty() {
        return Err(KeyforgeError::transfer(
            "no tracking source found among the selected clips",
        ));
    }
    if targets.is_empty() {
        return Err(KeyforgeError::transfer(
            "no picture-in-picture effect found on the selected clips",
        ));
    }

    // One-time per destination, before any corner writes.
    for target in &targets {
        ensure_free_form(project, target.at);
    }

    let total_steps = estimate_total_steps(project, &sources, targets.len());
    progress.set_max(total_steps.max(1));
    progress.set_status("Preparing…");

    let mut report = TransferReport {
        sources: sources.len(),
        targets: targets.len(),
        ..Default::default()
    };

    for (source_index, source) in sources.iter().enumerate() {
        let (sx, sy) = normalization_scale(project, source.at);

        for (target_index, target) in targets.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(KeyforgeError::Cancelled);
            }
            progress.set_status(&format!(
                "Processing source {}/{} • clip {}/{}…",
                source_index + 1,
                sources.len(),
                target_index + 1,
                targets.len()
            ));

            for (src_name, dst_name) in CORNER_MAP {
                let src_effect = effect_at(project, source.at);
                let Some(src_param) = src_effect.vector2(src_name) else {
                    return Err(KeyforgeError::transfer(format!(
                        "tracking parameter {src_name} not found or not a 2D parameter"
                    )));
                };
                let keyframes: Vec<(FrameIndex, Vec2)> = src_param.keyframes().collect();

                let dst_effect = effect_at_mut(project, target.at);
                let Some(dst_param) = dst_effect.vector2_mut(dst_name) else {
                    // Keep the progress total consistent even though
                    // nothing can be written on this destination corner.
                    for _ in &keyframes {
                        progress.increment();
                        report.steps += 1;
                    }
                    continue;
                };

                if !dst_param.is_animated() {
                    dst_param.set_animated(true);
                }

                for (frame, value) in keyframes {
                    let absolute = frame + source.start_frame;
                    if target.window.contains(absolute) {
                        dst_param.set_at_frame(
                            absolute - target.window.start,
                            value.scaled(sx, sy),
                        );
                        report.frames_copied += 1;
                    }
                    progress.increment();
                    report.steps += 1;
                }
            }
        }
    }

    progress.complete("Done");
    tracing::info!(
        sources = report.sources,
        targets = report.targets,
        frames_copied = report.frames_copied,
        "tracking transfer finished"
    );
    Ok(report)
}

/// Gather tracking sources and picture-in-picture destinations from the
/// selected video clips, in track-then-clip order. The destination is the
/// *last* matching effect in a clip's chain; the source the first.
fn collect_endpoints(
    project: &Project,
    classifier: &dyn Classifier,
    tb: &TimeBase,
) -> (Vec<SourceRef>, Vec<TargetRef>) {
    let mut sources = vec![];
    let mut targets = vec![];

    for (track_index, track) in project.tracks.iter().enumerate() {
        if track.kind != TrackKind::Video {
            continue;
        }
        for (clip_index, clip) in track.clips.iter().enumerate() {
            if !clip.selected {
                continue;
            }

            if let Some(effect_index) = clip
                .effects
                .iter()
                .rposition(|fx| classifier.is_pip_effect(fx))
            {
                targets.push(TargetRef {
                    at: EffectRef {
                        track: track_index,
                        clip: clip_index,
                        effect: effect_index,
                    },
                    window: clip.window(tb),
                });
            }

            if let Some(effect_index) = clip
                .effects
                .iter()
                .position(|fx| classifier.is_tracking_source(fx))
            {
                sources.push(SourceRef {
                    at: EffectRef {
                        track: track_index,
                        clip: clip_index,
                        effect: effect_index,
                    },
                    start_frame: tb.to_frames(clip.start),
                });
            }
        }
    }

    (sources, targets)
}

fn effect_at(project: &Project, at: EffectRef) -> &keyforge_project_model::Effect {
    &project.tracks[at.track].clips[at.clip].effects[at.effect]
}

fn effect_at_mut(project: &mut Project, at: EffectRef) -> &mut keyforge_project_model::Effect {
    &mut project.tracks[at.track].clips[at.clip].effects[at.effect]
}

/// Force the destination's proportions mode to "free form" (third option)
/// so the corners can move independently. Absent or short option lists are
/// left alone.
fn ensure_free_form(project: &mut Project, at: EffectRef) {
    if let Some(mode) = effect_at_mut(project, at).choice_mut(PROPORTIONS_PARAM) {
        if mode.options.len() >= 3 {
            mode.select(FREE_FORM_INDEX);
        }
    }
}

/// Per-axis pixel-to-unit scale from the source's reference corner: the
/// value at its first keyframe when animated, its static value otherwise.
/// A zero denominator leaves that axis unscaled.
fn normalization_scale(project: &Project, at: EffectRef) -> (f64, f64) {
    let mut sx = 1.0;
    let mut sy = 1.0;

    if let Some(reference) = effect_at(project, at).vector2(REFERENCE_CORNER) {
        let size = match reference.first_keyframe() {
            Some((_, value)) if reference.is_animated() => value,
            _ => reference.static_value(),
        };
        if size.x != 0.0 {
            sx = 1.0 / size.x;
        }
        if size.y != 0.0 {
            sy = 1.0 / size.y;
        }
    }

    (sx, sy)
}

/// Upper-bound progress estimate: every `(source, corner)` keyframe is
/// examined once per destination (at least once even with none writable).
fn estimate_total_steps(project: &Project, sources: &[SourceRef], target_count: usize) -> u64 {
    let mut total = 0u64;
    for source in sources {
        let effect = effect_at(project, source.at);
        for (src_name, _) in CORNER_MAP {
            if let Some(param) = effect.vector2(src_name) {
                total += param.keyframe_count() as u64 * target_count.max(1) as u64;
            }
        }
    }
    total
}
