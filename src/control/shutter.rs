//! Digital shutter synchronization.
//!
//! Divides each encoder revolution into N equal blade sectors and computes
//! the angular sub-window of each sector during which the lamp is lit. The
//! open sub-window is **centered** within its sector; a different alignment
//! would shift perceived flicker phase but not correctness, so one convention
//! is fixed here and used everywhere.
//!
//! Fail-dark rule: if the encoder is stalled while shutter emulation is
//! enabled, the gate reports closed so a static bright frame cannot burn the
//! film. With emulation disabled the gate is always open (a physical shutter
//! is installed).

use crate::config::ProjectorConfig;
use crate::control::encoder::EncoderReading;
use crate::control::params::RuntimeParameters;

/// Lamp gate decision for the current rotational phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutterGate {
    /// Phase is inside an open sub-window (or emulation is disabled).
    Open,
    /// Phase is inside a blade (or the encoder is invalid).
    Closed,
}

/// Illumination window geometry for one revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShutterWindow {
    blades: u8,
    angle: f32,
}

impl ShutterWindow {
    /// Compute the window for a blade count (floor-constrained to >= 1) and
    /// shutter angle (clamped to [0, 1]).
    pub fn compute(blades: u8, angle: f32) -> Self {
        Self {
            blades: blades.max(1),
            angle: angle.clamp(0.0, 1.0),
        }
    }

    /// Whether a rotational phase in [0, 1) falls inside any open sub-window.
    ///
    /// Each of the N sectors opens for `angle × sector_width`, centered in
    /// the sector.
    pub fn is_open(&self, phase: f32) -> bool {
        if self.angle >= 1.0 {
            return true;
        }
        if self.angle <= 0.0 {
            return false;
        }
        let scaled = phase.clamp(0.0, 1.0) * self.blades as f32;
        let sector_pos = scaled - (scaled as u32) as f32;
        libm::fabsf(sector_pos - 0.5) <= self.angle / 2.0
    }

    /// Fraction of one revolution that is illuminated. Equal to the shutter
    /// angle regardless of blade count; blades only set flicker frequency.
    pub fn open_fraction(&self) -> f32 {
        self.angle
    }

    /// Blade count after constraint.
    pub fn blades(&self) -> u8 {
        self.blades
    }
}

/// Shutter synchronizer with window caching.
///
/// The window is recomputed only when blade count or angle change; phase
/// evaluation is per tick.
pub struct ShutterSync {
    window: ShutterWindow,
    cached_blades: u8,
    cached_angle: f32,
    #[cfg(test)]
    recompute_count: u32,
}

impl ShutterSync {
    /// Create a synchronizer seeded from the configured defaults.
    pub fn new(config: &ProjectorConfig) -> Self {
        let blades = config.default_blades.max(1);
        let angle = config.default_shutter_angle.clamp(0.0, 1.0);
        Self {
            window: ShutterWindow::compute(blades, angle),
            cached_blades: blades,
            cached_angle: angle,
            #[cfg(test)]
            recompute_count: 0,
        }
    }

    /// Gate decision for this tick.
    pub fn evaluate(
        &mut self,
        reading: &EncoderReading,
        params: &RuntimeParameters,
        config: &ProjectorConfig,
    ) -> ShutterGate {
        if !config.shutter_enabled {
            return ShutterGate::Open;
        }

        if params.shutter_blades != self.cached_blades || params.shutter_angle != self.cached_angle
        {
            self.window = ShutterWindow::compute(params.shutter_blades, params.shutter_angle);
            self.cached_blades = params.shutter_blades;
            self.cached_angle = params.shutter_angle;
            #[cfg(test)]
            {
                self.recompute_count += 1;
            }
        }

        if reading.is_stalled() {
            // Fail dark: no phase information means no illumination
            return ShutterGate::Closed;
        }

        if self.window.is_open(reading.phase) {
            ShutterGate::Open
        } else {
            ShutterGate::Closed
        }
    }

    /// Current window geometry.
    pub fn window(&self) -> &ShutterWindow {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading_at_phase(phase: f32) -> EncoderReading {
        EncoderReading {
            pulse_count: 0,
            period_us: Some(1_000),
            phase,
        }
    }

    fn stalled_at_phase(phase: f32) -> EncoderReading {
        EncoderReading {
            pulse_count: 0,
            period_us: None,
            phase,
        }
    }

    #[test]
    fn illuminated_fraction_equals_angle_for_all_blade_counts() {
        // Sampled coverage: fraction of open phases must equal the angle,
        // independent of blade count
        const SAMPLES: usize = 10_000;
        for blades in 1..=4u8 {
            for &angle in &[0.0f32, 0.25, 0.5, 1.0] {
                let window = ShutterWindow::compute(blades, angle);
                let open = (0..SAMPLES)
                    .filter(|i| window.is_open(*i as f32 / SAMPLES as f32))
                    .count();
                let fraction = open as f32 / SAMPLES as f32;
                assert!(
                    (fraction - angle).abs() < 0.01,
                    "blades={} angle={}: measured {}",
                    blades,
                    angle,
                    fraction
                );
            }
        }
    }

    #[test]
    fn window_is_centered_in_each_sector() {
        // 2 blades, 50% angle: sector centers (phase 0.25 and 0.75) are
        // open, sector boundaries (0.0, 0.5) are closed
        let window = ShutterWindow::compute(2, 0.5);
        assert!(window.is_open(0.25));
        assert!(window.is_open(0.75));
        assert!(!window.is_open(0.0));
        assert!(!window.is_open(0.5));
    }

    #[test]
    fn zero_blades_constrained_to_one() {
        let window = ShutterWindow::compute(0, 0.5);
        assert_eq!(window.blades(), 1);
        assert!(window.is_open(0.5));
        assert!(!window.is_open(0.1));
    }

    #[test]
    fn full_angle_is_always_open_zero_always_closed() {
        let full = ShutterWindow::compute(3, 1.0);
        let dark = ShutterWindow::compute(3, 0.0);
        for i in 0..100 {
            let phase = i as f32 / 100.0;
            assert!(full.is_open(phase));
            assert!(!dark.is_open(phase));
        }
    }

    #[test]
    fn stalled_encoder_fails_closed() {
        let config = ProjectorConfig::default();
        let mut sync = ShutterSync::new(&config);
        let params = RuntimeParameters::neutral(&config);
        // Phase 0.25 would be open if the encoder were valid
        assert_eq!(
            sync.evaluate(&reading_at_phase(0.25), &params, &config),
            ShutterGate::Open
        );
        assert_eq!(
            sync.evaluate(&stalled_at_phase(0.25), &params, &config),
            ShutterGate::Closed
        );
    }

    #[test]
    fn emulation_disabled_is_always_open() {
        let config = ProjectorConfig {
            shutter_enabled: false,
            ..Default::default()
        };
        let mut sync = ShutterSync::new(&config);
        let params = RuntimeParameters::neutral(&config);
        // Even stalled: continuous illumination with a physical shutter
        assert_eq!(
            sync.evaluate(&stalled_at_phase(0.0), &params, &config),
            ShutterGate::Open
        );
    }

    #[test]
    fn window_recomputed_only_on_parameter_change() {
        let config = ProjectorConfig::default();
        let mut sync = ShutterSync::new(&config);
        let params = RuntimeParameters::neutral(&config);

        for i in 0..10 {
            sync.evaluate(&reading_at_phase(i as f32 / 10.0), &params, &config);
        }
        assert_eq!(sync.recompute_count, 0);

        let changed = RuntimeParameters {
            shutter_blades: 3,
            ..params
        };
        sync.evaluate(&reading_at_phase(0.1), &changed, &config);
        sync.evaluate(&reading_at_phase(0.2), &changed, &config);
        assert_eq!(sync.recompute_count, 1);
        assert_eq!(sync.window().blades(), 3);
    }
}
