//! Host-project snapshot: tracks, clips, and effect chains.
//!
//! The snapshot is a serde model of the host's in-memory object graph, so
//! the engines can be driven and tested without a live host. Operations
//! mutate the graph in place; `load`/`save` move it through `project.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use keyforge_common::RoundingPolicy;

use crate::param::{AnimatedScalar, AnimatedVec2, ChoiceParam, ParamValue, Parameter};
use crate::time::{FrameIndex, TimeBase, TimeError, Timecode};

/// Top-level project snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Project frame rate (frames per second).
    pub frame_rate: f64,

    /// Rounding policy for timecode-to-frame derivation. Snapshots that
    /// omit it take the application default (see
    /// [`Project::apply_default_rounding`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<RoundingPolicy>,

    /// Timeline tracks in host order.
    pub tracks: Vec<Track>,
}

/// Track kind. Only video tracks carry effect chains the engines touch;
/// audio tracks contribute adjacency facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// A timeline track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub kind: TrackKind,

    #[serde(default)]
    pub name: String,

    /// Clips in timeline order.
    pub clips: Vec<Clip>,
}

/// A placed media event on a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    /// Absolute start time on the timeline.
    pub start: Timecode,

    /// Clip length.
    pub length: Timecode,

    /// Host selection state.
    #[serde(default)]
    pub selected: bool,

    /// Generator info when the clip's media is generated (titles, text).
    #[serde(default)]
    pub generator: Option<Generator>,

    /// Effect chain in applied order.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// Generated-media plugin attached to a clip, with its own parameters
/// (the text content lives here, not on the effect chain).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    pub plugin_uid: String,
    pub plugin_name: String,

    #[serde(default)]
    pub params: Vec<Parameter>,
}

/// An effect instance on a clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub plugin_uid: String,
    pub plugin_name: String,

    #[serde(default)]
    pub params: Vec<Parameter>,
}

/// Inclusive absolute-frame range during which a clip is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipWindow {
    pub start: FrameIndex,
    pub end: FrameIndex,
}

impl ClipWindow {
    /// Whether the clip is active at an absolute frame, inclusive both ends.
    pub fn contains(&self, frame: FrameIndex) -> bool {
        self.start <= frame && frame <= self.end
    }
}

impl Clip {
    /// The clip's absolute frame window at the given time base.
    pub fn window(&self, tb: &TimeBase) -> ClipWindow {
        ClipWindow {
            start: tb.to_frames(self.start),
            end: tb.to_frames(self.start.plus(self.length)),
        }
    }

    /// Clip length in frames.
    pub fn duration_frames(&self, tb: &TimeBase) -> FrameIndex {
        tb.to_frames(self.length)
    }
}

/// Name-based parameter lookup, shared by effects and generators.
/// Lookups are case-sensitive and return the first (and by host contract,
/// only) match; the kind is checked at every access site.
macro_rules! param_lookup_impl {
    ($ty:ident) => {
        impl $ty {
            pub fn find_param(&self, name: &str) -> Option<&Parameter> {
                self.params.iter().find(|p| p.name == name)
            }

            pub fn find_param_mut(&mut self, name: &str) -> Option<&mut Parameter> {
                self.params.iter_mut().find(|p| p.name == name)
            }

            pub fn scalar(&self, name: &str) -> Option<&AnimatedScalar> {
                match self.find_param(name)?.value {
                    ParamValue::Scalar(ref s) => Some(s),
                    _ => None,
                }
            }

            pub fn scalar_mut(&mut self, name: &str) -> Option<&mut AnimatedScalar> {
                match self.find_param_mut(name)?.value {
                    ParamValue::Scalar(ref mut s) => Some(s),
                    _ => None,
                }
            }

            pub fn vector2(&self, name: &str) -> Option<&AnimatedVec2> {
                match self.find_param(name)?.value {
                    ParamValue::Vector2(ref v) => Some(v),
                    _ => None,
                }
            }

            pub fn vector2_mut(&mut self, name: &str) -> Option<&mut AnimatedVec2> {
                match self.find_param_mut(name)?.value {
                    ParamValue::Vector2(ref mut v) => Some(v),
                    _ => None,
                }
            }

            pub fn choice_mut(&mut self, name: &str) -> Option<&mut ChoiceParam> {
                match self.find_param_mut(name)?.value {
                    ParamValue::Choice(ref mut c) => Some(c),
                    _ => None,
                }
            }

            pub fn text(&self, name: &str) -> Option<&str> {
                match self.find_param(name)?.value {
                    ParamValue::Text { ref value } => Some(value.as_str()),
                    _ => None,
                }
            }
        }
    };
}

param_lookup_impl!(Effect);
param_lookup_impl!(Generator);

impl Project {
    /// Create an empty project at the given frame rate.
    pub fn new(name: impl Into<String>, frame_rate: f64) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            created_at: now.clone(),
            modified_at: now,
            frame_rate,
            rounding: None,
            tracks: vec![],
        }
    }

    /// The project time base. Fails on a non-positive frame rate.
    pub fn timebase(&self) -> Result<TimeBase, TimeError> {
        TimeBase::new(self.frame_rate, self.rounding.unwrap_or_default())
    }

    /// Pin the rounding policy to an application-level default when the
    /// snapshot does not carry one of its own. A policy already present
    /// in the snapshot always wins.
    pub fn apply_default_rounding(&mut self, default: RoundingPolicy) {
        self.rounding.get_or_insert(default);
    }

    /// Video tracks in host order.
    pub fn video_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.kind == TrackKind::Video)
    }

    /// Audio tracks in host order.
    pub fn audio_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.kind == TrackKind::Audio)
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }

    /// Load a project snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ProjectError::ParseError { path, source: e })
    }

    /// Save the snapshot to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref().to_path_buf();
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ProjectError::ParseError {
                path: path.clone(),
                source: e,
            })?;
        std::fs::write(&path, json).map_err(|e| ProjectError::IoError { path, source: e })
    }
}

/// Errors that can occur when working with project snapshots.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Time(#[from] TimeError),
}
