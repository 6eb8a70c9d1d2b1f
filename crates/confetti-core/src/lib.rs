//! Confetti Core - Foundational types for the confetti engine
//!
//! This crate provides the core types that the other confetti crates depend on:
//! - `Rect` - Axis-aligned clip bounds
//! - `Color`, `Bitmap` - Drawing primitives shared with rendering backends
//! - Error types and Result alias

mod error;
mod types;

pub use error::{ConfettiError, Result};
pub use types::{Bitmap, Color, Rect};
