//! Keyforge Common Utilities
//!
//! Shared infrastructure for all Keyforge crates:
//! - Error types and result aliases
//! - Progress-sink contract for long-running operations
//! - Cooperative cancellation token
//! - Tracing/logging initialization
//! - Configuration loading

pub mod cancel;
pub mod config;
pub mod error;
pub mod logging;
pub mod progress;

pub use cancel::*;
pub use config::*;
pub use error::*;
pub use progress::*;
