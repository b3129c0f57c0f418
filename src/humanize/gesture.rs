//! Gesture randomization
//!
//! Produces the spatial and temporal jitter that keeps repeated
//! interactions with the same target from repeating exact coordinates or
//! exact timings: off-center click offsets, scroll bursts, idle cursor
//! drift, and the occasional self-corrected mistake.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::HumanizeError;
use crate::config::GestureConfig;

/// Pause between scroll steps, in milliseconds.
const SCROLL_PAUSE_MIN_MS: u64 = 50;
const SCROLL_PAUSE_MAX_MS: u64 = 150;

/// Idle drift bounds (horizontal, vertical), in pixels.
const SMALL_DRIFT_RANGE: (i32, i32) = (50, 30);
const LARGE_DRIFT_RANGE: (i32, i32) = (200, 100);

/// Distribution shape for [`GestureRandomizer::sample_delay`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayShape {
    /// Flat over the whole range
    Uniform,
    /// Bell-shaped, concentrated near the midpoint of the range
    Normal,
}

/// Scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// How far idle cursor drift may wander
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementScale {
    /// Up to ±50 px horizontally, ±30 px vertically
    Small,
    /// Up to ±200 px horizontally, ±100 px vertically
    Large,
}

/// One motion of a scroll burst
#[derive(Debug, Clone, Copy)]
pub struct ScrollStep {
    /// Signed pixel delta for this step (negative scrolls up)
    pub delta_px: i32,
    /// Pause to take after this step
    pub pause: Duration,
}

/// A scroll intention decomposed into several smaller motions
#[derive(Debug, Clone)]
pub struct ScrollPlan {
    pub steps: Vec<ScrollStep>,
}

impl ScrollPlan {
    /// Sum of all step deltas. Equals the signed total requested.
    pub fn total_delta(&self) -> i32 {
        self.steps.iter().map(|s| s.delta_px).sum()
    }
}

/// Randomizer for single-interaction jitter
///
/// Owns its random source so concurrent sessions never share generator
/// state. Use [`GestureRandomizer::seeded`] for reproducible sequences.
pub struct GestureRandomizer {
    config: GestureConfig,
    rng: StdRng,
}

impl GestureRandomizer {
    /// Create a randomizer seeded from system entropy.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a randomizer producing a deterministic sequence for `seed`.
    pub fn seeded(config: GestureConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sample a delay within `[min, max]`.
    ///
    /// `Normal` places the mean at the midpoint with the full range
    /// spanning six standard deviations, then clamps, so the bounds are
    /// hard limits either way. Inverted bounds are rejected.
    pub fn sample_delay(
        &mut self,
        min: Duration,
        max: Duration,
        shape: DelayShape,
    ) -> Result<Duration, HumanizeError> {
        if min > max {
            return Err(HumanizeError::InvalidDelayBounds { min, max });
        }
        let (lo, hi) = (min.as_secs_f64(), max.as_secs_f64());
        if lo >= hi {
            return Ok(min);
        }
        let secs = match shape {
            DelayShape::Uniform => self.rng.gen_range(lo..=hi),
            DelayShape::Normal => {
                let mean = (lo + hi) / 2.0;
                let std_dev = (hi - lo) / 6.0;
                match Normal::new(mean, std_dev) {
                    Ok(normal) => normal.sample(&mut self.rng).clamp(lo, hi),
                    Err(_) => mean,
                }
            }
        };
        Ok(Duration::from_secs_f64(secs))
    }

    /// Sample a click offset from the center of a `width` x `height`
    /// region.
    ///
    /// Offsets are normally distributed around the center and clamped so
    /// the click lands at least the configured margin away from every
    /// edge. Regions too small to honor the margin collapse to the exact
    /// center.
    pub fn sample_click_offset(
        &mut self,
        region_width: u32,
        region_height: u32,
        max_variance: u32,
    ) -> Result<(i32, i32), HumanizeError> {
        if region_width == 0 || region_height == 0 {
            return Err(HumanizeError::InvalidRegion {
                width: region_width,
                height: region_height,
            });
        }
        let dx = self.axis_offset(region_width, max_variance);
        let dy = self.axis_offset(region_height, max_variance);
        Ok((dx, dy))
    }

    /// Off-center offset along one axis, biased toward the center.
    fn axis_offset(&mut self, extent: u32, max_variance: u32) -> i32 {
        let max_offset = max_variance.min(extent / 3) as f64;
        let sampled = if max_offset > 0.0 {
            match Normal::new(0.0, max_offset / 2.0) {
                Ok(normal) => normal.sample(&mut self.rng),
                Err(_) => 0.0,
            }
        } else {
            0.0
        };

        let margin = self.config.click_margin_px as i32;
        let half = (extent / 2) as i32;
        let (lo, hi) = (-half + margin, half - margin);
        if lo > hi {
            return 0;
        }
        (sampled as i32).clamp(lo, hi)
    }

    /// Decompose one scroll intention into 2-5 smaller motions whose
    /// deltas sum exactly to the requested amount, each followed by a
    /// short pause.
    pub fn sample_scroll_plan(&mut self, amount: u32, direction: ScrollDirection) -> ScrollPlan {
        let total = match direction {
            ScrollDirection::Down => amount as i32,
            ScrollDirection::Up => -(amount as i32),
        };
        let step_count: i32 = self.rng.gen_range(2..=5);
        let per_step = total / step_count;

        let mut steps = Vec::with_capacity(step_count as usize);
        for i in 0..step_count {
            // Integer division remainder lands in the last step
            let delta = if i == step_count - 1 {
                total - per_step * (step_count - 1)
            } else {
                per_step
            };
            let pause = self
                .sample_delay(
                    Duration::from_millis(SCROLL_PAUSE_MIN_MS),
                    Duration::from_millis(SCROLL_PAUSE_MAX_MS),
                    DelayShape::Uniform,
                )
                .unwrap_or(Duration::from_millis(SCROLL_PAUSE_MIN_MS));
            steps.push(ScrollStep {
                delta_px: delta,
                pause,
            });
        }
        ScrollPlan { steps }
    }

    /// Idle cursor drift. Fires roughly 30% of the time; `None` means
    /// the cursor stays put.
    pub fn maybe_random_movement(&mut self, scale: MovementScale) -> Option<(i32, i32)> {
        if self.rng.gen::<f64>() >= self.config.movement_chance {
            return None;
        }
        let (max_x, max_y) = match scale {
            MovementScale::Small => SMALL_DRIFT_RANGE,
            MovementScale::Large => LARGE_DRIFT_RANGE,
        };
        Some((
            self.rng.gen_range(-max_x..=max_x),
            self.rng.gen_range(-max_y..=max_y),
        ))
    }

    /// Whether to perform a wrong action before the intended one.
    ///
    /// The corrective behavior itself belongs to the caller.
    pub fn should_simulate_mistake(&mut self) -> bool {
        self.rng.gen::<f64>() < self.config.mistake_chance
    }

    /// Occasionally mistype one letter and immediately erase it.
    ///
    /// With the configured typo chance, returns `text` with one random
    /// lowercase letter plus a backspace appended; otherwise returns
    /// `text` unchanged.
    pub fn maybe_insert_typo(&mut self, text: &str) -> String {
        if self.rng.gen::<f64>() < self.config.typo_chance {
            let typo = self.rng.gen_range(b'a'..=b'z') as char;
            let mut out = String::with_capacity(text.len() + 2);
            out.push_str(text);
            out.push(typo);
            out.push('\u{8}');
            return out;
        }
        text.to_string()
    }
}
