//! Shaft encoder tracking.
//!
//! Pulses arrive asynchronously (interrupt context on the target); the tick
//! loop reads a consistent snapshot. Ownership is strict: only
//! [`EncoderTracker::record_pulse`] mutates [`EncoderState`], and it does the
//! minimum bounded work (store a timestamp, bump the count). The handoff goes
//! through [`SharedState`] so the tick never observes a torn count/timestamp
//! pair.

use crate::config::ProjectorConfig;
use crate::core::traits::SharedState;

/// Raw encoder pulse state. Written only from the pulse context.
#[derive(Debug, Clone, Copy)]
pub struct EncoderState {
    /// Free-running pulse counter. Wraps at `u32::MAX`; consumers take
    /// wrapping differences, never absolute positions.
    pulse_count: u32,
    /// Position within the current revolution, in pulses. Advanced by the
    /// tracker modulo pulses-per-revolution so the phase stays continuous
    /// when `pulse_count` wraps.
    rev_pos: u32,
    /// Timestamp of the most recent pulse, microseconds.
    last_pulse_us: u64,
    /// Timestamp of the pulse before that.
    prev_pulse_us: u64,
    /// Pulses observed since startup or the last stall, saturating at 2.
    /// The instantaneous period is undefined until this reaches 2.
    pulses_seen: u8,
}

impl EncoderState {
    /// Fresh state: no pulses observed, period undefined.
    pub const fn new() -> Self {
        Self {
            pulse_count: 0,
            rev_pos: 0,
            last_pulse_us: 0,
            prev_pulse_us: 0,
            pulses_seen: 0,
        }
    }

    /// Record one pulse. Bounded, minimal work: safe for interrupt context.
    pub fn record_pulse(&mut self, now_us: u64) {
        self.prev_pulse_us = self.last_pulse_us;
        self.last_pulse_us = now_us;
        self.pulse_count = self.pulse_count.wrapping_add(1);
        if self.pulses_seen < 2 {
            self.pulses_seen += 1;
        }
    }
}

impl Default for EncoderState {
    fn default() -> Self {
        Self::new()
    }
}

/// One tick's consistent view of the encoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderReading {
    /// Monotonic pulse count at snapshot time.
    pub pulse_count: u32,
    /// Instantaneous period between the two most recent pulses, or `None`
    /// when undefined (fewer than two pulses since startup/stall, or no pulse
    /// within the stall timeout). Consumers must treat `None` distinctly from
    /// any legitimate speed, including zero.
    pub period_us: Option<u64>,
    /// Rotational phase in [0, 1): position within the current revolution.
    /// Frozen at its last value while stalled, since the count stops moving.
    pub phase: f32,
}

impl EncoderReading {
    /// Whether the transport is stalled (no valid instantaneous period).
    pub fn is_stalled(&self) -> bool {
        self.period_us.is_none()
    }

    /// Measured transport speed in frames per second (one shaft revolution
    /// per frame). `None` while the period is undefined.
    pub fn speed_fps(&self, pulses_per_rev: u32) -> Option<f32> {
        let period = self.period_us?;
        if period == 0 || pulses_per_rev == 0 {
            return None;
        }
        Some(1_000_000.0 / (period as f32 * pulses_per_rev as f32))
    }

    /// Measured speed magnitude as a fraction of full speed, treating an
    /// undefined period as zero. For consumers (safe-mode policy) that want
    /// a conservative number rather than a flag.
    pub fn speed_fraction(&self, config: &ProjectorConfig) -> f32 {
        match self.speed_fps(config.pulses_per_rev) {
            Some(fps) => (fps / config.max_fps).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

/// Encoder tracker: single-writer (pulse context) / single-reader (tick)
/// handoff over a [`SharedState`].
pub struct EncoderTracker<S: SharedState<EncoderState>> {
    state: S,
    pulses_per_rev: u32,
    stall_timeout_us: u64,
}

impl<S: SharedState<EncoderState>> EncoderTracker<S> {
    /// Create a tracker over the given shared state. Const, so a tracker
    /// over an `EmbassyState` can live in a `static` shared between the
    /// pulse-capture task and the control task.
    pub const fn new(state: S, config: &ProjectorConfig) -> Self {
        Self {
            state,
            pulses_per_rev: if config.pulses_per_rev == 0 {
                1
            } else {
                config.pulses_per_rev
            },
            stall_timeout_us: config.stall_timeout_us,
        }
    }

    /// Register a pulse event. Call from the pulse-capture context only.
    pub fn record_pulse(&self, now_us: u64) {
        self.state.with_mut(|s| {
            s.record_pulse(now_us);
            s.rev_pos += 1;
            if s.rev_pos >= self.pulses_per_rev {
                s.rev_pos = 0;
            }
        });
    }

    /// Take an atomic snapshot for this tick.
    ///
    /// Detects a stall (no pulse within the timeout) and resets the
    /// two-pulse warmup so the period stays undefined until two fresh pulses
    /// arrive after the transport starts moving again.
    pub fn snapshot(&self, now_us: u64) -> EncoderReading {
        let state = self.state.with_mut(|s| {
            let silent_us = now_us.saturating_sub(s.last_pulse_us);
            if s.pulses_seen > 0 && silent_us > self.stall_timeout_us {
                s.pulses_seen = 0;
            }
            *s
        });

        let period_us = if state.pulses_seen >= 2 {
            let period = state.last_pulse_us.saturating_sub(state.prev_pulse_us);
            if period > 0 {
                Some(period)
            } else {
                None
            }
        } else {
            None
        };

        EncoderReading {
            pulse_count: state.pulse_count,
            period_us,
            phase: state.rev_pos as f32 / self.pulses_per_rev as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockState;

    fn tracker() -> EncoderTracker<MockState<EncoderState>> {
        EncoderTracker::new(
            MockState::new(EncoderState::new()),
            &ProjectorConfig::default(),
        )
    }

    #[test]
    fn period_undefined_until_two_pulses() {
        let tracker = tracker();
        assert!(tracker.snapshot(0).is_stalled());

        tracker.record_pulse(1_000);
        assert!(tracker.snapshot(1_100).is_stalled());

        tracker.record_pulse(2_000);
        let reading = tracker.snapshot(2_100);
        assert_eq!(reading.period_us, Some(1_000));
    }

    #[test]
    fn period_derived_from_two_most_recent_pulses() {
        let tracker = tracker();
        tracker.record_pulse(1_000);
        tracker.record_pulse(3_000);
        tracker.record_pulse(3_500);
        assert_eq!(tracker.snapshot(3_600).period_us, Some(500));
    }

    #[test]
    fn stall_invalidates_period_and_freezes_phase() {
        let tracker = tracker();
        tracker.record_pulse(1_000);
        tracker.record_pulse(2_000);
        let before = tracker.snapshot(2_100);
        assert!(!before.is_stalled());

        // Past the stall timeout: period invalid, phase unchanged
        let after = tracker.snapshot(2_000 + 250_001);
        assert!(after.is_stalled());
        assert_eq!(after.phase, before.phase);
        assert_eq!(after.pulse_count, before.pulse_count);
    }

    #[test]
    fn recovery_from_stall_requires_two_fresh_pulses() {
        let tracker = tracker();
        tracker.record_pulse(1_000);
        tracker.record_pulse(2_000);
        assert!(tracker.snapshot(2_000 + 300_000).is_stalled());

        // One pulse after the stall is not enough
        tracker.record_pulse(400_000);
        assert!(tracker.snapshot(400_100).is_stalled());

        tracker.record_pulse(401_000);
        assert_eq!(tracker.snapshot(401_100).period_us, Some(1_000));
    }

    #[test]
    fn phase_wraps_per_revolution() {
        let config = ProjectorConfig::default();
        let tracker = tracker();
        for i in 0..config.pulses_per_rev {
            tracker.record_pulse(1_000 * (i as u64 + 1));
        }
        // Exactly one revolution: back to phase 0
        let reading = tracker.snapshot(1_000 * config.pulses_per_rev as u64 + 100);
        assert!((reading.phase - 0.0).abs() < 1e-6);
        assert_eq!(reading.pulse_count, config.pulses_per_rev);
    }

    #[test]
    fn phase_continuous_across_counter_wrap() {
        let config = ProjectorConfig::default();
        let ppr = config.pulses_per_rev;
        // Start three pulses shy of the counter wrapping to zero. 2^32 is
        // not a multiple of 48, so a phase derived from the raw count would
        // jump at the wrap.
        let mut seeded = EncoderState::new();
        seeded.pulse_count = u32::MAX - 2;
        let tracker = EncoderTracker::new(MockState::new(seeded), &config);

        for i in 0..6u32 {
            tracker.record_pulse(1_000 * (i as u64 + 1));
            let reading = tracker.snapshot(1_000 * (i as u64 + 1) + 10);
            let expected = ((i + 1) % ppr) as f32 / ppr as f32;
            assert!(
                (reading.phase - expected).abs() < 1e-6,
                "pulse {}: phase {} != {}",
                i,
                reading.phase,
                expected
            );
        }
        // The raw count wrapped; consumers take wrapping differences.
        assert_eq!(tracker.snapshot(7_000).pulse_count, 3);
    }

    #[test]
    fn tracker_backs_constant_storage() {
        // Whole chain is const-constructible, so the target can hold the
        // tracker in a static without a runtime init cell.
        const CONFIG: ProjectorConfig = ProjectorConfig::stock_eiki();
        const TRACKER: EncoderTracker<MockState<EncoderState>> =
            EncoderTracker::new(MockState::new(EncoderState::new()), &CONFIG);
        assert!(TRACKER.snapshot(0).is_stalled());
    }

    #[test]
    fn speed_fps_follows_pulse_rate() {
        let config = ProjectorConfig::default();
        let tracker = tracker();
        // 24 fps with 48 pulses/rev: one pulse every 1/(24*48) s ≈ 868 us
        let period = 1_000_000 / (24 * config.pulses_per_rev as u64);
        tracker.record_pulse(period);
        tracker.record_pulse(2 * period);
        let reading = tracker.snapshot(2 * period + 10);
        let fps = reading.speed_fps(config.pulses_per_rev).unwrap();
        assert!((fps - 24.0).abs() < 0.5);
        assert!((reading.speed_fraction(&config) - 1.0).abs() < 0.05);
    }

    #[test]
    fn stalled_speed_fraction_is_zero_not_missing() {
        let config = ProjectorConfig::default();
        let tracker = tracker();
        let reading = tracker.snapshot(0);
        assert_eq!(reading.speed_fps(config.pulses_per_rev), None);
        assert_eq!(reading.speed_fraction(&config), 0.0);
    }

    #[test]
    fn snapshot_is_never_torn() {
        // A pulse arriving between two snapshots moves count and timestamp
        // together; a snapshot can only see the pre- or post-pulse pair.
        let tracker = tracker();
        tracker.record_pulse(1_000);
        tracker.record_pulse(2_000);

        let before = tracker.snapshot(2_100);
        tracker.record_pulse(2_500);
        let after = tracker.snapshot(2_600);

        // Pre-pulse state: old count with old period
        assert_eq!(
            (before.pulse_count, before.period_us),
            (2, Some(1_000))
        );
        // Post-pulse state: new count with new period; never the old count
        // with the new period or vice versa
        assert_eq!((after.pulse_count, after.period_us), (3, Some(500)));
    }
}
