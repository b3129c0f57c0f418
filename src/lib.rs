//! GBF Cadence - human-behavior timing core for Granblue Fantasy browser
//! automation
//!
//! This library decides *when* an automated interaction happens, *where*
//! inside its target region it lands, and how a long-running session
//! paces itself. It never touches the browser: locator resolution and
//! the actual input events belong to the driver; this crate only hands
//! back delays, offsets, and break decisions.
//!
//! ## Anti-Detection
//!
//! The `humanize` module provides the two engines: a
//! [`GestureRandomizer`](humanize::GestureRandomizer) that perturbs
//! individual gestures (off-center clicks, burst scrolling, idle drift,
//! self-corrected typos) and a
//! [`SessionPacer`](humanize::SessionPacer) that stretches delays along
//! a fatigue curve and mandates scheduled, random, and session-cap
//! breaks.

pub mod clock;
pub mod config;
pub mod humanize;

use std::time::Duration;

use crate::config::Settings;
use crate::humanize::{ActionCategory, GestureRandomizer, HumanizeError, SessionPacer};

/// One session's worth of humanization state
///
/// Bundles a gesture randomizer and a session pacer built from the same
/// settings. Each concurrent automation session must own its own
/// instance; nothing here is shared.
pub struct Cadence {
    pub gestures: GestureRandomizer,
    pub pacer: SessionPacer,
    pub settings: Settings,
}

impl Cadence {
    /// Create a new instance with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            gestures: GestureRandomizer::new(settings.gesture.clone()),
            pacer: SessionPacer::new(settings.pacing.clone()),
            settings,
        }
    }

    /// Create a fully deterministic instance for a given seed.
    pub fn seeded(settings: Settings, seed: u64) -> Self {
        Self {
            gestures: GestureRandomizer::seeded(settings.gesture.clone(), seed),
            // separate stream per component
            pacer: SessionPacer::seeded(settings.pacing.clone(), seed.wrapping_add(1)),
            settings,
        }
    }

    /// Spatial and temporal parameters for one humanized click on a
    /// region of the given size.
    pub fn plan_click(
        &mut self,
        region_width: u32,
        region_height: u32,
    ) -> Result<ClickPlan, HumanizeError> {
        let variance = self.settings.gesture.click_variance_px;
        let (dx, dy) = self
            .gestures
            .sample_click_offset(region_width, region_height, variance)?;
        let pre_delay = self.pacer.get_delay(ActionCategory::Click);
        Ok(ClickPlan {
            dx,
            dy,
            pre_delay,
        })
    }
}

/// Where and when to perform a single click, relative to the center of
/// the target region
#[derive(Debug, Clone, Copy)]
pub struct ClickPlan {
    /// Horizontal offset from the region center, px
    pub dx: i32,
    /// Vertical offset from the region center, px
    pub dy: i32,
    /// Pause to take before pressing
    pub pre_delay: Duration,
}
