//! Keyforge Animation Core
//!
//! Pure keyframe computation over a project snapshot:
//! - **Pop:** Generate pop-in/pop-out scale curves for text clips
//! - **Text fit:** Derive scale bounds and full-width scale from text length
//! - **Transfer:** Copy tracked corner curves onto picture-in-picture corners
//! - **Sync:** Align the picture-in-picture location across selected clips
//!
//! This crate is pure computation — no I/O, no host dependencies.
//! All inputs are data; all outputs are data.

pub mod pop;
pub mod sync;
pub mod text_fit;
pub mod transfer;

pub use pop::{animate_captions, clear_caption_animation, PopCurveSpec};
pub use sync::{sync_text_location, SyncReport};
pub use text_fit::{resize_to_full_width, TextFitConfig};
pub use transfer::{apply_tracking, TransferReport};
