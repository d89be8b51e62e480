//! Keyforge Project Model
//!
//! Defines the core data contracts for Keyforge operations:
//! - **Time:** Frame-rate-based conversion between timecodes and frame indices
//! - **Params:** Animated effect parameters (scalar, 2D, boolean, text, choice)
//! - **Project:** Tracks, clips, effect chains, and snapshot load/save
//! - **Classify:** Injected recognition of generator and effect kinds
//!
//! Curves are keyed by integer frame index at the project frame rate; all
//! timecode-to-frame derivation goes through [`time::TimeBase`] so a single
//! rounding policy governs the whole project.

pub mod classify;
pub mod param;
pub mod project;
pub mod time;

pub use classify::*;
pub use param::*;
pub use project::*;
pub use time::*;
