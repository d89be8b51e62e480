//! Pop-in/pop-out scale curve generation for text clips.
//!
//! Every recognized text clip gets a short scale-up-then-settle animation
//! at its start. The matching settle-then-scale-down at the end is written
//! only when the clip has room for it and nothing begins or ends exactly
//! where it ends: a text clip that runs straight into the next caption, or
//! that stops together with an audio clip, keeps its final size so the
//! cut stays clean.
//!
//! The generated curve always replaces the previous one outright; there is
//! no merging with pre-existing keyframes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use keyforge_common::{CancelToken, KeyforgeError, KeyforgeResult, ProgressSink};
use keyforge_project_model::{
    AnimatedScalar, Classifier, ClipWindow, FrameIndex, Project, TrackKind,
};

use crate::text_fit::{scale_bounds_for_text, TextFitConfig};

/// Name of the scale parameter on a picture-in-picture effect.
pub const SCALE_PARAM: &str = "Scale";

/// Tunable frame offsets and scale bounds for the pop curve.
///
/// `pop_in_frames_a/b` shape the opening bounce (`min -> max` over A frames,
/// `max -> 1.0` over B more); the pop-out offsets mirror it at the end.
/// The two buffer thresholds decide whether a clip is long enough for the
/// full three-keyframe pop-out, the two-keyframe half variant, or none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopCurveSpec {
    pub min_scale: f64,
    pub max_scale: f64,

    pub pop_in_frames_a: FrameIndex,
    pub pop_in_frames_b: FrameIndex,

    pub pop_out_frames_a: FrameIndex,
    pub pop_out_frames_b: FrameIndex,

    pub full_pop_out_min_frame_buffer: FrameIndex,
    pub half_pop_out_min_frame_buffer: FrameIndex,
}

impl Default for PopCurveSpec {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 1.5,
            pop_in_frames_a: 4,
            pop_in_frames_b: 6,
            pop_out_frames_a: 4,
            pop_out_frames_b: 3,
            full_pop_out_min_frame_buffer: 15,
            half_pop_out_min_frame_buffer: 8,
        }
    }
}

/// Per-clip scale bounds, fixed or derived from a text-width estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl PopCurveSpec {
    /// The spec's fixed scale bounds.
    pub fn bounds(&self) -> ScaleBounds {
        ScaleBounds {
            min: self.min_scale,
            max: self.max_scale,
        }
    }
}

/// Adjacency facts that suppress the pop-out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adjacency {
    /// Another text clip starts exactly at this clip's end frame.
    pub followed_by_text: bool,
    /// An audio clip ends exactly at this clip's end frame.
    pub ends_with_audio: bool,
}

impl Adjacency {
    pub fn suppresses_pop_out(&self) -> bool {
        self.followed_by_text || self.ends_with_audio
    }
}

/// Replace a scale parameter's curve with the pop animation.
///
/// The pop-in is written unconditionally, even for zero-length clips; the
/// pop-out only when adjacency allows it and the clip clears one of the
/// two frame-buffer thresholds (full checked first, the checks are
/// mutually exclusive).
pub fn write_pop_curve(
    scale: &mut AnimatedScalar,
    duration_frames: FrameIndex,
    bounds: ScaleBounds,
    adjacency: Adjacency,
    spec: &PopCurveSpec,
) {
    // Disable-then-enable discards whatever curve was there before.
    scale.set_animated(false);
    scale.set_animated(true);

    let a = spec.pop_in_frames_a;
    let b = spec.pop_in_frames_b;
    let c = spec.pop_out_frames_a;
    let d = spec.pop_out_frames_b;

    scale.set_at_frame(0, bounds.min);
    scale.set_at_frame(a, bounds.max);
    scale.set_at_frame(a + b, 1.0);

    if adjacency.suppresses_pop_out() {
        return;
    }

    if duration_frames - a - b - c - d > spec.full_pop_out_min_frame_buffer {
        scale.set_at_frame(duration_frames - c - d, 1.0);
        scale.set_at_frame(duration_frames - d, bounds.max);
        scale.set_at_frame(duration_frames, bounds.min);
    } else if duration_frames - a - b - d > spec.half_pop_out_min_frame_buffer {
        scale.set_at_frame(duration_frames - d, 1.0);
        scale.set_at_frame(duration_frames, bounds.min);
    }
}

/// Reset a scale parameter to a single static unit value.
pub fn clear_pop_curve(scale: &mut AnimatedScalar) {
    scale.set_animated(false);
    scale.set_at_frame(0, 1.0);
}

/// Outcome counts from a project-wide animate pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopSummary {
    /// Clips whose scale curve was written.
    pub animated: usize,
    /// Animated clips whose pop-out was suppressed by adjacency.
    pub suppressed: usize,
    /// Text clips skipped for lack of a usable effect or parameter.
    pub skipped: usize,
}

struct Candidate {
    track: usize,
    clip: usize,
    effect: usize,
    duration: FrameIndex,
    adjacency: Adjacency,
    bounds: ScaleBounds,
}

/// Write pop curves for every text clip in the project.
///
/// Clips without a recognized picture-in-picture effect or without a
/// scalar scale parameter are skipped, never fatal. When `text_fit` is
/// given, per-clip scale bounds are derived from the clip's text content,
/// falling back to the spec's fixed bounds.
pub fn animate_captions(
    project: &mut Project,
    spec: &PopCurveSpec,
    text_fit: Option<&TextFitConfig>,
    classifier: &dyn Classifier,
    progress: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> KeyforgeResult<PopSummary> {
    let tb = project
        .timebase()
        .map_err(|e| KeyforgeError::project(e.to_string()))?;

    // Adjacency facts come from a read-only scan of the whole timeline.
    let mut text_windows: Vec<ClipWindow> = vec![];
    let mut audio_ends: HashSet<FrameIndex> = HashSet::new();
    for track in &project.tracks {
        for clip in &track.clips {
            match track.kind {
                TrackKind::Video => {
                    if let Some(generator) = &clip.generator {
                        if classifier.is_text_generator(generator) {
                            text_windows.push(clip.window(&tb));
                        }
                    }
                }
                TrackKind::Audio => {
                    audio_ends.insert(clip.window(&tb).end);
                }
            }
        }
    }

    let mut summary = PopSummary::default();
    let mut candidates: Vec<Candidate> = vec![];

    for (track_index, track) in project.tracks.iter().enumerate() {
        if track.kind != TrackKind::Video {
            continue;
        }
        for (clip_index, clip) in track.clips.iter().enumerate() {
            let Some(generator) = &clip.generator else {
                continue;
            };
            if !classifier.is_text_generator(generator) {
                continue;
            }

            let Some(effect_index) = clip
                .effects
                .iter()
                .position(|fx| classifier.is_pip_effect(fx))
            else {
                tracing::debug!(track = track_index, clip = clip_index, "no pip effect, skipping");
                summary.skipped += 1;
                continue;
            };
            if clip.effects[effect_index].scalar(SCALE_PARAM).is_none() {
                tracing::debug!(track = track_index, clip = clip_index, "no scale param, skipping");
                summary.skipped += 1;
                continue;
            }

            let window = clip.window(&tb);
            let adjacency = Adjacency {
                followed_by_text: text_windows
                    .iter()
                    .any(|w| w.start == window.end && *w != window),
                ends_with_audio: audio_ends.contains(&window.end),
            };

            let bounds = text_fit
                .and_then(|cfg| {
                    generator
                        .text(&cfg.text_param)
                        .and_then(|text| scale_bounds_for_text(text, cfg.full_width_chars))
                })
                .unwrap_or_else(|| spec.bounds());

            candidates.push(Candidate {
                track: track_index,
                clip: clip_index,
                effect: effect_index,
                duration: clip.duration_frames(&tb),
                adjacency,
                bounds,
            });
        }
    }

    progress.set_max(candidates.len() as u64);
    progress.set_status("Animating captions…");

    for candidate in &candidates {
        if cancel.is_cancelled() {
            return Err(KeyforgeError::Cancelled);
        }

        let effect =
            &mut project.tracks[candidate.track].clips[candidate.clip].effects[candidate.effect];
        if let Some(scale) = effect.scalar_mut(SCALE_PARAM) {
            write_pop_curve(
                scale,
                candidate.duration,
                candidate.bounds,
                candidate.adjacency,
                spec,
            );
            summary.animated += 1;
            if candidate.adjacency.suppresses_pop_out() {
                summary.suppressed += 1;
            }
        }
        progress.increment();
    }

    progress.complete("Done");
    tracing::info!(
        animated = summary.animated,
        suppressed = summary.suppressed,
        skipped = summary.skipped,
        "caption animation pass finished"
    );
    Ok(summary)
}

/// Reset every text clip's scale parameter to a static unit value,
/// discarding pop curves. The companion clear operation to
/// [`animate_captions`].
pub fn clear_caption_animation(
    project: &mut Project,
    classifier: &dyn Classifier,
) -> KeyforgeResult<usize> {
    let mut cleared = 0;

    for track in &mut project.tracks {
        if track.kind != TrackKind::Video {
            continue;
        }
        for clip in &mut track.clips {
            let is_text = clip
                .generator
                .as_ref()
                .is_some_and(|g| classifier.is_text_generator(g));
            if !is_text {
                continue;
            }
            let Some(effect) = clip.effects.iter_mut().find(|fx| classifier.is_pip_effect(fx))
            else {
                continue;
            };
            if let Some(scale) = effect.scalar_mut(SCALE_PARAM) {
                clear_pop_curve(scale);
                cleared += 1;
            }
        }
    }

    tracing::info!(cleared, "caption animation cleared");
    Ok(cleared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyforge_common::NoopProgress;
    use keyforge_project_model::{
        Clip, Effect, Generator, NameClassifier, Parameter, Timecode, Track,
    };

    fn spec() -> PopCurveSpec {
        PopCurveSpec::default()
    }

    fn animated_scale() -> AnimatedScalar {
        AnimatedScalar::with_value(1.0)
    }

    fn keyframes(scale: &AnimatedScalar) -> Vec<(FrameIndex, f64)> {
        scale.keyframes().collect()
    }

    #[test]
    fn test_pop_in_shape_regardless_of_length() {
        for duration in [0, 5, 10, 60, 600] {
            let mut scale = animated_scale();
            write_pop_curve(
                &mut scale,
                duration,
                spec().bounds(),
                Adjacency {
                    followed_by_text: true,
                    ends_with_audio: false,
                },
                &spec(),
            );
            let kfs = keyframes(&scale);
            assert_eq!(kfs, vec![(0, 0.5), (4, 1.5), (10, 1.0)], "duration {duration}");
        }
    }

    #[test]
    fn test_end_to_end_sixty_frame_clip() {
        // 60 frames at the default offsets: 60-4-6-4-3 = 43 > 15, full pop-out.
        let mut scale = animated_scale();
        write_pop_curve(&mut scale, 60, spec().bounds(), Adjacency::default(), &spec());
        assert_eq!(
            keyframes(&scale),
            vec![
                (0, 0.5),
                (4, 1.5),
                (10, 1.0),
                (53, 1.0),
                (57, 1.5),
                (60, 0.5),
            ]
        );
    }

    #[test]
    fn test_half_pop_out_threshold() {
        // D = 30: 30-4-6-4-3 = 13 <= 15, but 30-4-6-3 = 17 > 8 -> half.
        let mut scale = animated_scale();
        write_pop_curve(&mut scale, 30, spec().bounds(), Adjacency::default(), &spec());
        assert_eq!(
            keyframes(&scale),
            vec![(0, 0.5), (4, 1.5), (10, 1.0), (27, 1.0), (30, 0.5)]
        );
    }

    #[test]
    fn test_no_pop_out_when_too_short() {
        // D = 18: 18-4-6-4-3 = 1 <= 15 and 18-4-6-3 = 5 <= 8 -> pop-in only.
        let mut scale = animated_scale();
        write_pop_curve(&mut scale, 18, spec().bounds(), Adjacency::default(), &spec());
        assert_eq!(keyframes(&scale), vec![(0, 0.5), (4, 1.5), (10, 1.0)]);
    }

    #[test]
    fn test_full_threshold_is_strict() {
        // D = 32: 32-4-6-4-3 = 15, not > 15; falls to half (32-4-6-3 = 19 > 8).
        let mut scale = animated_scale();
        write_pop_curve(&mut scale, 32, spec().bounds(), Adjacency::default(), &spec());
        assert_eq!(keyframes(&scale).len(), 5);
    }

    #[test]
    fn test_curve_is_fully_replaced() {
        let mut scale = animated_scale();
        scale.set_animated(true);
        scale.set_at_frame(99, 7.0);
        write_pop_curve(&mut scale, 60, spec().bounds(), Adjacency::default(), &spec());
        assert!(!keyframes(&scale).iter().any(|(f, _)| *f == 99));
    }

    #[test]
    fn test_clear_pop_curve() {
        let mut scale = animated_scale();
        write_pop_curve(&mut scale, 60, spec().bounds(), Adjacency::default(), &spec());
        clear_pop_curve(&mut scale);
        assert!(!scale.is_animated());
        assert_eq!(scale.keyframe_count(), 0);
        assert_eq!(scale.value_at_frame(0), 1.0);
    }

    // -- project-level driver --

    fn text_clip(start_secs: f64, len_secs: f64) -> Clip {
        Clip {
            start: Timecode::from_secs(start_secs),
            length: Timecode::from_secs(len_secs),
            selected: false,
            generator: Some(Generator {
                plugin_uid: "{gen}".into(),
                plugin_name: "VEGAS Titles & Text".into(),
                params: vec![Parameter::text("Text", "Hello")],
            }),
            effects: vec![Effect {
                plugin_uid: "{Svfx:com.vegascreativesoftware:pictureinpicture}".into(),
                plugin_name: "Picture in Picture".into(),
                params: vec![Parameter::scalar("Scale", 1.0)],
            }],
        }
    }

    fn audio_clip(start_secs: f64, len_secs: f64) -> Clip {
        Clip {
            start: Timecode::from_secs(start_secs),
            length: Timecode::from_secs(len_secs),
            selected: false,
            generator: None,
            effects: vec![],
        }
    }

    fn project_with(tracks: Vec<Track>) -> Project {
        let mut project = Project::new("Test", 30.0);
        project.tracks = tracks;
        project
    }

    fn run(project: &mut Project) -> PopSummary {
        animate_captions(
            project,
            &spec(),
            None,
            &NameClassifier::default(),
            &mut NoopProgress,
            &CancelToken::new(),
        )
        .unwrap()
    }

    fn scale_of(project: &Project, track: usize, clip: usize) -> &AnimatedScalar {
        project.tracks[track].clips[clip].effects[0]
            .scalar(SCALE_PARAM)
            .unwrap()
    }

    #[test]
    fn test_adjacent_text_clip_suppresses_pop_out() {
        // Second clip starts exactly at the first clip's end frame (60).
        let mut project = project_with(vec![Track {
            kind: TrackKind::Video,
            name: "V1".into(),
            clips: vec![text_clip(0.0, 2.0), text_clip(2.0, 2.0)],
        }]);
        let summary = run(&mut project);
        assert_eq!(summary.animated, 2);
        assert_eq!(summary.suppressed, 1);

        // First clip: pop-in only; second clip ends alone so it pops out.
        assert_eq!(scale_of(&project, 0, 0).keyframe_count(), 3);
        assert_eq!(scale_of(&project, 0, 1).keyframe_count(), 6);
    }

    #[test]
    fn test_co_terminating_audio_suppresses_pop_out() {
        let mut project = project_with(vec![
            Track {
                kind: TrackKind::Video,
                name: "V1".into(),
                clips: vec![text_clip(0.0, 2.0)],
            },
            Track {
                kind: TrackKind::Audio,
                name: "A1".into(),
                clips: vec![audio_clip(1.0, 1.0)],
            },
        ]);
        let summary = run(&mut project);
        assert_eq!(summary.suppressed, 1);
        assert_eq!(scale_of(&project, 0, 0).keyframe_count(), 3);
    }

    #[test]
    fn test_clip_without_pip_is_skipped() {
        let mut clip = text_clip(0.0, 2.0);
        clip.effects.clear();
        let mut project = project_with(vec![Track {
            kind: TrackKind::Video,
            name: "V1".into(),
            clips: vec![clip],
        }]);
        let summary = run(&mut project);
        assert_eq!(summary.animated, 0);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_non_text_clip_untouched() {
        let mut clip = text_clip(0.0, 2.0);
        clip.generator = None;
        let mut project = project_with(vec![Track {
            kind: TrackKind::Video,
            name: "V1".into(),
            clips: vec![clip],
        }]);
        let summary = run(&mut project);
        assert_eq!(summary, PopSummary::default());
    }

    #[test]
    fn test_cancelled_before_first_clip() {
        let mut project = project_with(vec![Track {
            kind: TrackKind::Video,
            name: "V1".into(),
            clips: vec![text_clip(0.0, 2.0)],
        }]);
        let token = CancelToken::new();
        token.cancel();
        let result = animate_captions(
            &mut project,
            &spec(),
            None,
            &NameClassifier::default(),
            &mut NoopProgress,
            &token,
        );
        assert!(matches!(result, Err(KeyforgeError::Cancelled)));
    }

    #[test]
    fn test_clear_caption_animation() {
        let mut project = project_with(vec![Track {
            kind: TrackKind::Video,
            name: "V1".into(),
            clips: vec![text_clip(0.0, 2.0)],
        }]);
        run(&mut project);
        let cleared = clear_caption_animation(&mut project, &NameClassifier::default()).unwrap();
        assert_eq!(cleared, 1);
        let scale = scale_of(&project, 0, 0);
        assert!(!scale.is_animated());
        assert_eq!(scale.value_at_frame(0), 1.0);
    }
}
