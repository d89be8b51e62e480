//! Picture-in-picture location alignment across selected clips.
//!
//! Reads the location of the earliest-starting selected text clip's
//! picture-in-picture effect and applies it statically to all of them, so
//! a run of captions sits at exactly the same spot. Hosts expose the
//! location either as one 2D parameter or as a scalar X/Y pair under a few
//! historical names; both shapes are handled.

use keyforge_common::{KeyforgeError, KeyforgeResult};
use keyforge_project_model::{Classifier, Effect, Project, Timecode, TrackKind, Vec2};

/// 2D location parameter name.
const LOCATION_PARAM: &str = "Location";

/// Scalar fallback pairs, tried in order.
const LOCATION_PAIRS: [(&str, &str); 3] = [
    ("Location X", "Location Y"),
    ("Position X", "Position Y"),
    ("Center X", "Center Y"),
];

/// How a given effect exposes its location.
#[derive(Debug, Clone)]
enum LocationShape {
    Vec2,
    Pair(&'static str, &'static str),
}

fn location_shape(effect: &Effect) -> Option<LocationShape> {
    if effect.vector2(LOCATION_PARAM).is_some() {
        return Some(LocationShape::Vec2);
    }
    LOCATION_PAIRS
        .iter()
        .find(|(x, y)| effect.scalar(x).is_some() && effect.scalar(y).is_some())
        .map(|(x, y)| LocationShape::Pair(x, y))
}

/// Outcome of a location sync.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncReport {
    /// Clips the reference location was applied to.
    pub applied: usize,
    /// The reference location.
    pub location: Vec2,
}

struct SyncCandidate {
    track: usize,
    clip: usize,
    effect: usize,
    start: Timecode,
    shape: LocationShape,
}

/// Copy the earliest selected text clip's location to every selected text
/// clip, disabling location animation. Fatal when no selected text clip
/// carries a usable location.
pub fn sync_text_location(
    project: &mut Project,
    classifier: &dyn Classifier,
) -> KeyforgeResult<SyncReport> {
    let mut candidates: Vec<SyncCandidate> = vec![];

    for (track_index, track) in project.tracks.iter().enumerate() {
        if track.kind != TrackKind::Video {
            continue;
        }
        for (clip_index, clip) in track.clips.iter().enumerate() {
            if !clip.selected {
                continue;
            }
            let is_text = clip
                .generator
                .as_ref()
                .is_some_and(|g| classifier.is_text_generator(g));
            if !is_text {
                continue;
            }
            let Some(effect_index) = clip
                .effects
                .iter()
                .position(|fx| classifier.is_pip_effect(fx))
            else {
                continue;
            };
            let Some(shape) = location_shape(&clip.effects[effect_index]) else {
                continue;
            };
            candidates.push(SyncCandidate {
                track: track_index,
                clip: clip_index,
                effect: effect_index,
                start: clip.start,
                shape,
            });
        }
    }

    if candidates.is_empty() {
        return Err(KeyforgeError::animation(
            "no selected text clip with a picture-in-picture location found",
        ));
    }

    let Some(earliest) = candidates
        .iter()
        .min_by(|a, b| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|c| (c.track, c.clip, c.effect, c.shape.clone()))
    else {
        return Err(KeyforgeError::animation("no usable reference clip"));
    };

    let reference = {
        let effect = &project.tracks[earliest.0].clips[earliest.1].effects[earliest.2];
        match &earliest.3 {
            LocationShape::Vec2 => effect
                .vector2(LOCATION_PARAM)
                .map(|p| p.static_value())
                .unwrap_or_default(),
            LocationShape::Pair(x, y) => Vec2::new(
                effect.scalar(x).map(|p| p.static_value()).unwrap_or(0.0),
                effect.scalar(y).map(|p| p.static_value()).unwrap_or(0.0),
            ),
        }
    };

    let mut applied = 0;
    for candidate in &candidates {
        let effect =
            &mut project.tracks[candidate.track].clips[candidate.clip].effects[candidate.effect];
        match &candidate.shape {
            LocationShape::Vec2 => {
                if let Some(location) = effect.vector2_mut(LOCATION_PARAM) {
                    location.set_animated(false);
                    location.set_at_frame(0, reference);
                    applied += 1;
                }
            }
            LocationShape::Pair(x, y) => {
                let Some(px) = effect.scalar_mut(x) else { continue };
                px.set_animated(false);
                px.set_at_frame(0, reference.x);
                let Some(py) = effect.scalar_mut(y) else { continue };
                py.set_animated(false);
                py.set_at_frame(0, reference.y);
                applied += 1;
            }
        }
    }

    tracing::info!(applied, ?reference, "location sync finished");
    Ok(SyncReport {
        applied,
        location: reference,
    })
}
