//! Frame-rate-based time conversion.
//!
//! A [`TimeBase`] is the single source of truth for frame arithmetic: every
//! place a frame count is derived from a timecode goes through it, so the
//! rounding policy is applied consistently across an operation.

use keyforge_common::RoundingPolicy;
use serde::{Deserialize, Serialize};

/// Signed frame index relative to some origin (clip start or project start).
pub type FrameIndex = i64;

/// An opaque continuous time value, stored as milliseconds.
///
/// Timecodes are never compared against frame counts directly; conversion
/// always goes through a [`TimeBase`] at a known frame rate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
pub struct Timecode {
    ms: f64,
}

impl Timecode {
    /// Construct from milliseconds.
    pub fn from_millis(ms: f64) -> Self {
        Self { ms }
    }

    /// Construct from seconds.
    pub fn from_secs(secs: f64) -> Self {
        Self { ms: secs * 1000.0 }
    }

    /// The value in milliseconds.
    pub fn millis(&self) -> f64 {
        self.ms
    }

    /// The value in seconds.
    pub fn secs(&self) -> f64 {
        self.ms / 1000.0
    }

    /// Sum of two timecodes (e.g. clip start + clip length).
    pub fn plus(&self, other: Timecode) -> Timecode {
        Timecode {
            ms: self.ms + other.ms,
        }
    }
}

/// Converter between timecodes and frame indices at a fixed frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBase {
    fps: f64,
    rounding: RoundingPolicy,
}

/// Errors from time-base construction.
#[derive(Debug, thiserror::Error)]
pub enum TimeError {
    #[error("frame rate must be strictly positive, got {fps}")]
    NonPositiveFrameRate { fps: f64 },
}

impl TimeBase {
    /// Create a time base. The frame rate must be strictly positive.
    pub fn new(fps: f64, rounding: RoundingPolicy) -> Result<Self, TimeError> {
        if !(fps > 0.0) || !fps.is_finite() {
            return Err(TimeError::NonPositiveFrameRate { fps });
        }
        Ok(Self { fps, rounding })
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// The rounding policy in effect.
    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Convert a timecode to the nearest frame index.
    pub fn to_frames(&self, tc: Timecode) -> FrameIndex {
        self.rounding.round(tc.millis() / 1000.0 * self.fps)
    }

    /// Convert a frame index back to a timecode. Exact; no rounding.
    pub fn to_timecode(&self, frame: FrameIndex) -> Timecode {
        Timecode::from_millis(frame as f64 / self.fps * 1000.0)
    }
}
