//! LED lamp brightness control.
//!
//! The lamp has two layers of control. The slew-limited *envelope* tracks
//! the allowed brightness and changes by at most `lamp_slew` per tick, so
//! the LED driver never sees a step. The shutter *gate* multiplies that
//! envelope by 0 or 1 instantly; blade transitions must be sharp, not
//! ramped, or the projected image smears.
//!
//! Safe mode additionally caps the allowed brightness as a function of
//! transport speed so a slow or stopped film gate is never held at full
//! power.

use crate::config::ProjectorConfig;
use crate::control::params::RuntimeParameters;
use crate::control::shutter::ShutterGate;

/// Safe-mode brightness limiting rule.
///
/// Implementations must be monotonic: for fixed brightness and angle, a
/// higher measured speed never yields a lower allowed brightness.
pub trait SafeModePolicy {
    /// Allowed duty given requested brightness in [0, 1], measured transport
    /// speed as a fraction of maximum in [0, 1], and shutter angle in [0, 1].
    fn allowed(&self, brightness: f32, speed_fraction: f32, shutter_angle: f32) -> f32;
}

/// Default policy: scale brightness by measured speed, with a configured
/// floor so a stopped transport still shows a dim image for framing.
///
/// Duty cycle compensation: a wider shutter angle spreads the same energy
/// over more of the revolution, so the speed term is reduced by half the
/// angle before the floor applies.
#[derive(Debug, Clone, Copy)]
pub struct FloorScaledPolicy {
    floor: f32,
}

impl FloorScaledPolicy {
    pub fn new(config: &ProjectorConfig) -> Self {
        Self {
            floor: config.safe_min.clamp(0.0, 1.0),
        }
    }
}

impl SafeModePolicy for FloorScaledPolicy {
    fn allowed(&self, brightness: f32, speed_fraction: f32, shutter_angle: f32) -> f32 {
        let speed_term = speed_fraction.clamp(0.0, 1.0) * (1.0 - 0.5 * shutter_angle);
        brightness.clamp(0.0, 1.0) * speed_term.max(self.floor)
    }
}

/// Final lamp output for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LampCommand {
    /// PWM duty in [0.0, 1.0], gate already applied.
    pub duty: f32,
}

/// Slew-limited lamp envelope with hard shutter gating.
pub struct LampController<P: SafeModePolicy> {
    policy: P,
    envelope: f32,
}

impl<P: SafeModePolicy> LampController<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            envelope: 0.0,
        }
    }

    /// Advance the envelope one tick and apply the gate.
    ///
    /// `speed_fraction` is the measured transport speed as a fraction of
    /// maximum, in [0, 1]. The gate does not disturb the envelope: a closed
    /// gate forces the output to zero while the envelope keeps tracking, so
    /// reopening restores brightness without a ramp from black every blade.
    pub fn update(
        &mut self,
        params: &RuntimeParameters,
        speed_fraction: f32,
        gate: ShutterGate,
    ) -> LampCommand {
        let target = if params.safe_mode {
            self.policy
                .allowed(params.lamp_brightness, speed_fraction, params.shutter_angle)
        } else {
            params.lamp_brightness.clamp(0.0, 1.0)
        };

        let slew = params.lamp_slew.max(0.0);
        let step = (target - self.envelope).clamp(-slew, slew);
        self.envelope = (self.envelope + step).clamp(0.0, 1.0);

        let duty = match gate {
            ShutterGate::Open => self.envelope,
            ShutterGate::Closed => 0.0,
        };
        LampCommand { duty }
    }

    /// Current envelope value, before gating.
    pub fn envelope(&self) -> f32 {
        self.envelope
    }
}
