//! Runtime parameter snapshot.
//!
//! Produced fresh by the input sampler every tick (or held by the
//! single-frame sequencer override) and read by the controllers. Nothing in
//! here persists across ticks except as "previous value" state inside the
//! slew limiters.

use crate::config::ProjectorConfig;

/// One tick's worth of operator intent, normalized and validated.
///
/// The sampler guarantees every field is in range regardless of which source
/// (pot, switch, or fixed default) supplied it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeParameters {
    /// Transport speed command in [−1.0, +1.0].
    /// Sign is direction, magnitude is speed.
    pub target_speed: f32,
    /// Requested lamp brightness in [0.0, 1.0].
    pub lamp_brightness: f32,
    /// Shutter blade count (>= 1).
    pub shutter_blades: u8,
    /// Open fraction of each blade sector, in [0.0, 1.0].
    pub shutter_angle: f32,
    /// Max motor pulse-width change per tick, microseconds.
    pub motor_slew_us: f32,
    /// Max lamp duty change per tick, fraction.
    pub lamp_slew: f32,
    /// Safe-mode brightness limiting is active.
    pub safe_mode: bool,
}

impl RuntimeParameters {
    /// Snapshot with everything at the configured defaults and the transport
    /// stopped. Used at startup before the first sample completes.
    pub fn neutral(config: &ProjectorConfig) -> Self {
        Self {
            target_speed: 0.0,
            lamp_brightness: 0.0,
            shutter_blades: config.default_blades.max(1),
            shutter_angle: config.default_shutter_angle.clamp(0.0, 1.0),
            motor_slew_us: config.default_motor_slew_us,
            lamp_slew: config.default_lamp_slew,
            safe_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_snapshot_is_stopped_and_dark() {
        let params = RuntimeParameters::neutral(&ProjectorConfig::default());
        assert_eq!(params.target_speed, 0.0);
        assert_eq!(params.lamp_brightness, 0.0);
        assert_eq!(params.shutter_blades, 2);
    }

    #[test]
    fn neutral_constrains_blades_to_at_least_one() {
        let config = ProjectorConfig {
            default_blades: 0,
            ..Default::default()
        };
        let params = RuntimeParameters::neutral(&config);
        assert_eq!(params.shutter_blades, 1);
    }
}
