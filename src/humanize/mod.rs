//! Human behavior simulation
//!
//! This module makes automated play statistically resemble a human
//! operator's:
//! - Humanized timing with bounded random variance
//! - Off-center click points that never leave the target region
//! - Burst scrolling, idle cursor drift, and self-corrected mistakes
//! - Session-level pacing: a fatigue curve plus scheduled, random, and
//!   session-cap breaks
//!
//! Neither component touches the browser. They compute parameters; the
//! driver performs the gestures and honors the waits.

use std::time::Duration;

pub mod gesture;
pub mod pacing;

pub use gesture::{
    DelayShape, GestureRandomizer, MovementScale, ScrollDirection, ScrollPlan, ScrollStep,
};
pub use pacing::{
    ActionCategory, ActionRecord, Break, BreakKind, SessionPacer, SessionStats,
};

/// Gesture sampling errors
#[derive(Debug, thiserror::Error)]
pub enum HumanizeError {
    /// Delay bounds where the minimum exceeds the maximum.
    #[error("invalid delay bounds: min {min:?} exceeds max {max:?}")]
    InvalidDelayBounds { min: Duration, max: Duration },
    /// Target region with a zero-sized axis.
    #[error("region must have positive dimensions, got {width}x{height}")]
    InvalidRegion { width: u32, height: u32 },
}
