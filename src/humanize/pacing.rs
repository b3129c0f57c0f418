//! Session pacing and fatigue
//!
//! Derives per-action delays that stretch as a session wears on, and
//! decides when the session has to pause entirely. All values are
//! computed, never slept: the driver owns actual suspension, and is
//! expected to call [`SessionPacer::record_break`] after honoring a
//! break decision.
//!
//! One pacer tracks one session. Concurrent sessions must each own
//! their own instance; there is no internal locking.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::PacingConfig;

/// Most recent actions kept for inspection.
const HISTORY_CAPACITY: usize = 100;

/// Extra slowdown per elapsed hour.
const FATIGUE_PER_HOUR: f64 = 0.05;
/// Cap on the time-based fatigue component.
const MAX_TIME_FATIGUE: f64 = 1.25;
/// Actions before the count-based component starts to climb.
const FATIGUE_ACTION_THRESHOLD: u64 = 500;
/// Excess actions per 1% of additional slowdown, as a divisor.
const ACTION_FATIGUE_DIVISOR: f64 = 10_000.0;
/// Cap on the count-based fatigue component.
const MAX_COUNT_FATIGUE: f64 = 1.1;

/// Delay range for categories without an entry of their own, in seconds.
const DEFAULT_DELAY_RANGE: (f64, f64) = (0.3, 0.8);

/// What kind of interaction a delay is being requested for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActionCategory {
    /// Generic button or link click
    Click,
    /// In-battle action (attack, skill)
    Battle,
    /// Reading quest text or dialog
    Reading,
    /// Summon/support selection
    Summon,
    /// Result screens
    Results,
    /// Page navigation
    Navigation,
    /// Tiny in-between pause
    Micro,
    /// Caller-supplied bounds, in seconds
    Custom { min_secs: f64, max_secs: f64 },
}

impl ActionCategory {
    /// Short label for logs and history records.
    pub fn label(&self) -> &'static str {
        match self {
            ActionCategory::Click => "click",
            ActionCategory::Battle => "battle",
            ActionCategory::Reading => "reading",
            ActionCategory::Summon => "summon",
            ActionCategory::Results => "results",
            ActionCategory::Navigation => "navigation",
            ActionCategory::Micro => "micro",
            ActionCategory::Custom { .. } => "custom",
        }
    }
}

/// Why a break fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakKind {
    /// Low-probability short pause, independent of the schedule
    Micro,
    /// Caller-initiated pause between workflow phases
    Short,
    /// Mandatory pause on the configured cadence
    Scheduled,
    /// Session cap reached
    Long,
}

impl BreakKind {
    /// Duration bounds for this kind of break, in seconds.
    pub fn duration_range(&self) -> (f64, f64) {
        match self {
            BreakKind::Micro => (30.0, 120.0),
            BreakKind::Short => (300.0, 600.0),
            BreakKind::Scheduled => (600.0, 1_200.0),
            BreakKind::Long => (1_800.0, 3_600.0),
        }
    }
}

/// A mandated pause
///
/// The caller is expected to suspend activity for `duration`, then
/// acknowledge with [`SessionPacer::record_break`] and poll again: a
/// session past its cap still reports the scheduled break first.
#[derive(Debug, Clone, Copy)]
pub struct Break {
    pub kind: BreakKind,
    pub duration: Duration,
}

/// One computed delay, as remembered in the bounded history
#[derive(Debug, Clone, Copy)]
pub struct ActionRecord {
    /// When the delay was computed
    pub at: Instant,
    /// Category it was requested for
    pub category: ActionCategory,
    /// The delay handed back to the caller
    pub delay: Duration,
}

/// Point-in-time view of the session
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SessionStats {
    pub elapsed_hours: f64,
    pub total_actions: u64,
    pub minutes_since_break: f64,
    pub current_fatigue: f64,
    /// 0 when no time has elapsed yet
    pub actions_per_hour: f64,
}

/// Per-session delay and break policy engine
///
/// Tracks cumulative session state and derives per-action delays
/// adjusted for fatigue. `get_delay` mutates the session state, so the
/// pacer is `&mut` and non-reentrant by construction.
pub struct SessionPacer {
    config: PacingConfig,
    rng: StdRng,
    clock: Arc<dyn Clock>,
    start_time: Instant,
    action_count: u64,
    last_break_time: Instant,
    action_history: VecDeque<ActionRecord>,
}

impl SessionPacer {
    /// Create a pacer on the system clock, seeded from entropy.
    pub fn new(config: PacingConfig) -> Self {
        Self::build(config, StdRng::from_entropy(), Arc::new(SystemClock))
    }

    /// Create a pacer on the system clock with a deterministic sequence.
    pub fn seeded(config: PacingConfig, seed: u64) -> Self {
        Self::build(config, StdRng::seed_from_u64(seed), Arc::new(SystemClock))
    }

    /// Create a pacer on a caller-supplied clock.
    pub fn with_clock(config: PacingConfig, clock: Arc<dyn Clock>) -> Self {
        Self::build(config, StdRng::from_entropy(), clock)
    }

    /// Deterministic pacer on a caller-supplied clock.
    pub fn seeded_with_clock(config: PacingConfig, seed: u64, clock: Arc<dyn Clock>) -> Self {
        Self::build(config, StdRng::seed_from_u64(seed), clock)
    }

    fn build(config: PacingConfig, rng: StdRng, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            config,
            rng,
            clock,
            start_time: now,
            action_count: 0,
            last_break_time: now,
            action_history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Compute the pause to take before the next action of `category`.
    ///
    /// Base delay is uniform in the category's range, stretched by the
    /// current fatigue multiplier, then jittered by the configured
    /// variance. Never fails; the result is finite and non-negative.
    pub fn get_delay(&mut self, category: ActionCategory) -> Duration {
        let (min_s, max_s) = self.delay_bounds(category);
        let base = if min_s >= max_s {
            min_s
        } else {
            self.rng.gen_range(min_s..=max_s)
        };

        // The action being paced counts toward its own fatigue
        self.action_count += 1;
        let fatigue = self.fatigue_multiplier();

        let variance = self.config.random_variance.max(0.0);
        let jitter = if variance > 0.0 {
            self.rng.gen_range((1.0 - variance)..=(1.0 + variance))
        } else {
            1.0
        };

        let secs = base * fatigue * jitter;
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        let delay = Duration::from_secs_f64(secs);

        if self.action_history.len() == HISTORY_CAPACITY {
            self.action_history.pop_front();
        }
        self.action_history.push_back(ActionRecord {
            at: self.clock.now(),
            category,
            delay,
        });

        log::debug!(
            "{} delay: {:.2}s (fatigue: {:.3}x)",
            category.label(),
            secs,
            fatigue
        );
        delay
    }

    /// Base delay range for a category, in seconds.
    fn delay_bounds(&self, category: ActionCategory) -> (f64, f64) {
        match category {
            ActionCategory::Click => (
                self.config.min_click_delay_secs,
                self.config.max_click_delay_secs,
            ),
            ActionCategory::Battle => (0.3, 0.8),
            ActionCategory::Reading => (1.0, 3.0),
            ActionCategory::Summon => (0.5, 1.5),
            ActionCategory::Results => (0.8, 2.0),
            ActionCategory::Navigation => (0.4, 1.0),
            ActionCategory::Micro => DEFAULT_DELAY_RANGE,
            ActionCategory::Custom { min_secs, max_secs } => {
                if !min_secs.is_finite() || !max_secs.is_finite() {
                    return DEFAULT_DELAY_RANGE;
                }
                // get_delay has no error path; sort and floor instead
                let lo = min_secs.min(max_secs).max(0.0);
                let hi = min_secs.max(max_secs).max(0.0);
                (lo, hi)
            }
        }
    }

    /// Combined fatigue factor, always >= 1.0.
    ///
    /// Pure function of elapsed session time and the number of actions
    /// paced so far: up to +25% from elapsed hours and up to +10% past
    /// 500 actions, the two caps applied independently before
    /// multiplying. Identically 1.0 when fatigue is disabled.
    pub fn fatigue_multiplier(&self) -> f64 {
        if !self.config.enable_fatigue {
            return 1.0;
        }
        let hours = self.elapsed().as_secs_f64() / 3_600.0;
        let time_factor = (1.0 + hours * FATIGUE_PER_HOUR).min(MAX_TIME_FATIGUE);
        let count_factor = if self.action_count > FATIGUE_ACTION_THRESHOLD {
            let excess = (self.action_count - FATIGUE_ACTION_THRESHOLD) as f64;
            (1.0 + excess / ACTION_FATIGUE_DIVISOR).min(MAX_COUNT_FATIGUE)
        } else {
            1.0
        };
        time_factor * count_factor
    }

    /// Check the break triggers, in priority order: scheduled cadence,
    /// then the micro-break roll, then the session cap. First hit wins.
    pub fn should_take_break(&mut self) -> Option<Break> {
        let now = self.clock.now();

        let since_break = now.duration_since(self.last_break_time);
        if since_break.as_secs() >= self.config.break_frequency_secs {
            log::info!(
                "scheduled break due ({:.1} min since last break)",
                since_break.as_secs_f64() / 60.0
            );
            return Some(self.make_break(BreakKind::Scheduled));
        }

        if self.rng.gen::<f64>() < self.config.micro_break_chance {
            log::info!("taking a random micro-break");
            return Some(self.make_break(BreakKind::Micro));
        }

        let elapsed = now.duration_since(self.start_time);
        if elapsed.as_secs() >= self.config.max_session_secs {
            log::warn!(
                "maximum session duration reached ({:.1} hours)",
                elapsed.as_secs_f64() / 3_600.0
            );
            return Some(self.make_break(BreakKind::Long));
        }

        None
    }

    fn make_break(&mut self, kind: BreakKind) -> Break {
        let (lo, hi) = kind.duration_range();
        Break {
            kind,
            duration: Duration::from_secs_f64(self.rng.gen_range(lo..=hi)),
        }
    }

    /// Acknowledge that the caller honored a break.
    pub fn record_break(&mut self) {
        self.last_break_time = self.clock.now();
        log::info!("break recorded");
    }

    /// Read-only snapshot of the session.
    pub fn get_session_stats(&self) -> SessionStats {
        let hours = self.elapsed().as_secs_f64() / 3_600.0;
        let since_break = self.clock.now().duration_since(self.last_break_time);
        let actions_per_hour = if hours > 0.0 {
            self.action_count as f64 / hours
        } else {
            0.0
        };
        SessionStats {
            elapsed_hours: hours,
            total_actions: self.action_count,
            minutes_since_break: since_break.as_secs_f64() / 60.0,
            current_fatigue: self.fatigue_multiplier(),
            actions_per_hour,
        }
    }

    /// Recent actions, oldest first. At most the last 100 are kept.
    pub fn action_history(&self) -> &VecDeque<ActionRecord> {
        &self.action_history
    }

    fn elapsed(&self) -> Duration {
        self.clock.now().duration_since(self.start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn manual_pacer(config: PacingConfig) -> (SessionPacer, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let pacer = SessionPacer::seeded_with_clock(config, 7, clock.clone());
        (pacer, clock)
    }

    fn no_jitter_config() -> PacingConfig {
        PacingConfig {
            random_variance: 0.0,
            micro_break_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_fatigue_at_start() {
        let (pacer, _clock) = manual_pacer(PacingConfig::default());
        assert_eq!(pacer.fatigue_multiplier(), 1.0);
    }

    #[test]
    fn test_time_fatigue_is_linear() {
        let (pacer, clock) = manual_pacer(PacingConfig::default());
        clock.advance(Duration::from_secs(2 * 3_600));
        assert_eq!(pacer.fatigue_multiplier(), 1.1);
    }

    #[test]
    fn test_time_fatigue_caps_at_25_percent() {
        let (pacer, clock) = manual_pacer(PacingConfig::default());
        clock.advance(Duration::from_secs(5 * 3_600));
        assert_eq!(pacer.fatigue_multiplier(), 1.25);
        clock.advance(Duration::from_secs(10 * 3_600));
        assert_eq!(pacer.fatigue_multiplier(), 1.25);
    }

    #[test]
    fn test_fatigue_disabled_is_identity() {
        let config = PacingConfig {
            enable_fatigue: false,
            ..no_jitter_config()
        };
        let (mut pacer, clock) = manual_pacer(config);
        clock.advance(Duration::from_secs(3 * 3_600));
        for _ in 0..600 {
            pacer.get_delay(ActionCategory::Battle);
        }
        assert_eq!(pacer.fatigue_multiplier(), 1.0);
    }

    #[test]
    fn test_count_fatigue_kicks_in_after_500_actions() {
        let (mut pacer, _clock) = manual_pacer(no_jitter_config());
        for _ in 0..500 {
            pacer.get_delay(ActionCategory::Battle);
        }
        let at_500 = pacer.fatigue_multiplier();
        assert_eq!(at_500, 1.0);

        // The 501st delay is computed with the incremented count
        pacer.get_delay(ActionCategory::Battle);
        let at_501 = pacer.fatigue_multiplier();
        assert!(at_501 >= at_500);
        assert!((at_501 - 1.0001).abs() < 1e-12, "fatigue was {at_501}");
    }

    #[test]
    fn test_count_fatigue_caps_at_10_percent() {
        let (mut pacer, _clock) = manual_pacer(no_jitter_config());
        for _ in 0..2_000 {
            pacer.get_delay(ActionCategory::Battle);
        }
        assert_eq!(pacer.fatigue_multiplier(), 1.1);
    }

    #[test]
    fn test_delay_stays_in_jittered_envelope() {
        let config = PacingConfig {
            enable_fatigue: false,
            ..Default::default()
        };
        let (mut pacer, _clock) = manual_pacer(config);
        for _ in 0..1_000 {
            let delay = pacer.get_delay(ActionCategory::Battle).as_secs_f64();
            assert!(delay >= 0.3 * 0.7 - 1e-9, "delay was {delay}");
            assert!(delay <= 0.8 * 1.3 + 1e-9, "delay was {delay}");
        }
    }

    #[test]
    fn test_custom_bounds_are_normalized() {
        let (mut pacer, _clock) = manual_pacer(no_jitter_config());
        for _ in 0..200 {
            let delay = pacer
                .get_delay(ActionCategory::Custom {
                    min_secs: 2.0,
                    max_secs: 1.0,
                })
                .as_secs_f64();
            assert!((1.0..=2.0).contains(&delay), "delay was {delay}");
        }
        // Negative bounds floor at zero
        let delay = pacer
            .get_delay(ActionCategory::Custom {
                min_secs: -5.0,
                max_secs: -1.0,
            })
            .as_secs_f64();
        assert!(delay >= 0.0);
    }

    #[test]
    fn test_micro_category_uses_default_range() {
        let (mut pacer, _clock) = manual_pacer(no_jitter_config());
        for _ in 0..200 {
            let delay = pacer.get_delay(ActionCategory::Micro).as_secs_f64();
            assert!((0.3..=0.8).contains(&delay), "delay was {delay}");
        }
    }

    #[test]
    fn test_history_capped_at_100_most_recent() {
        let (mut pacer, _clock) = manual_pacer(PacingConfig::default());
        for _ in 0..900 {
            pacer.get_delay(ActionCategory::Click);
        }
        for _ in 0..100 {
            pacer.get_delay(ActionCategory::Battle);
        }
        let history = pacer.action_history();
        assert_eq!(history.len(), 100);
        assert!(history
            .iter()
            .all(|record| record.category == ActionCategory::Battle));
        assert_eq!(pacer.get_session_stats().total_actions, 1_000);
    }

    #[test]
    fn test_fresh_pacer_takes_no_break() {
        let (mut pacer, _clock) = manual_pacer(no_jitter_config());
        assert!(pacer.should_take_break().is_none());
    }

    #[test]
    fn test_scheduled_break_after_frequency() {
        let (mut pacer, clock) = manual_pacer(no_jitter_config());
        clock.advance(Duration::from_secs(3_600));
        let brk = pacer.should_take_break().expect("break should fire");
        assert_eq!(brk.kind, BreakKind::Scheduled);
        assert!(brk.duration >= Duration::from_secs(600));
        assert!(brk.duration <= Duration::from_secs(1_200));
    }

    #[test]
    fn test_scheduled_break_wins_over_session_cap() {
        let config = PacingConfig {
            break_frequency_secs: 3_600,
            max_session_secs: 3_600,
            ..no_jitter_config()
        };
        let (mut pacer, clock) = manual_pacer(config);
        clock.advance(Duration::from_secs(4_000));
        let brk = pacer.should_take_break().expect("break should fire");
        assert_eq!(brk.kind, BreakKind::Scheduled);
    }

    #[test]
    fn test_session_cap_break_after_schedule_reset() {
        let config = PacingConfig {
            break_frequency_secs: 3_600,
            max_session_secs: 3_600,
            ..no_jitter_config()
        };
        let (mut pacer, clock) = manual_pacer(config);
        clock.advance(Duration::from_secs(4_000));
        pacer.record_break();
        let brk = pacer.should_take_break().expect("cap break should fire");
        assert_eq!(brk.kind, BreakKind::Long);
        assert!(brk.duration >= Duration::from_secs(1_800));
        assert!(brk.duration <= Duration::from_secs(3_600));
    }

    #[test]
    fn test_micro_break_when_roll_hits() {
        let config = PacingConfig {
            micro_break_chance: 1.0,
            ..Default::default()
        };
        let (mut pacer, _clock) = manual_pacer(config);
        let brk = pacer.should_take_break().expect("micro break should fire");
        assert_eq!(brk.kind, BreakKind::Micro);
        assert!(brk.duration >= Duration::from_secs(30));
        assert!(brk.duration <= Duration::from_secs(120));
    }

    #[test]
    fn test_record_break_resets_schedule() {
        let (mut pacer, clock) = manual_pacer(no_jitter_config());
        clock.advance(Duration::from_secs(3_600));
        assert!(pacer.should_take_break().is_some());
        pacer.record_break();
        assert!(pacer.should_take_break().is_none());
        assert!(pacer.get_session_stats().minutes_since_break < 1e-9);
    }

    #[test]
    fn test_actions_per_hour_zero_at_start() {
        let (mut pacer, _clock) = manual_pacer(PacingConfig::default());
        pacer.get_delay(ActionCategory::Click);
        let stats = pacer.get_session_stats();
        assert_eq!(stats.elapsed_hours, 0.0);
        assert_eq!(stats.actions_per_hour, 0.0);
    }

    #[test]
    fn test_actions_per_hour_counts() {
        let (mut pacer, clock) = manual_pacer(no_jitter_config());
        for _ in 0..100 {
            pacer.get_delay(ActionCategory::Battle);
        }
        clock.advance(Duration::from_secs(3_600));
        let stats = pacer.get_session_stats();
        assert!((stats.actions_per_hour - 100.0).abs() < 1e-9);
        assert_eq!(stats.total_actions, 100);
    }

    #[test]
    fn test_stats_track_minutes_since_break() {
        let (pacer, clock) = manual_pacer(PacingConfig::default());
        clock.advance(Duration::from_secs(30 * 60));
        let stats = pacer.get_session_stats();
        assert!((stats.minutes_since_break - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_break_kind_ranges_are_ordered() {
        for kind in [
            BreakKind::Micro,
            BreakKind::Short,
            BreakKind::Scheduled,
            BreakKind::Long,
        ] {
            let (lo, hi) = kind.duration_range();
            assert!(lo < hi);
        }
    }
}
