//! Foundation utilities shared across the toolkit
//!
//! Math types, frame timing, and logging helpers. Nothing in here depends on
//! the renderer or the windowing layer.

pub mod logging;
pub mod math;
pub mod time;
