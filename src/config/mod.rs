//! Configuration module
//!
//! Safety limits, delay bounds, and behavior probabilities for the
//! humanization engines.

pub mod settings;

pub use settings::{ConfigError, GestureConfig, PacingConfig, Settings};
