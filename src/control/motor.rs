//! Motor speed control.
//!
//! Converts the speed target (operator or single-frame override) plus encoder
//! feedback into a motor drive pulse. The controller owns two protocol
//! invariants:
//!
//! - the pulse width never changes by more than the slew limit per tick, so
//!   the transport cannot jolt hard enough to tear film;
//! - a direction reversal always decelerates through neutral first; opposite
//!   polarity is never commanded at speed.

use crate::config::ProjectorConfig;
use crate::control::encoder::EncoderReading;
use crate::control::params::RuntimeParameters;

/// Commanded speed magnitude below which the transport counts as stopped.
const NEAR_STOP_FRACTION: f32 = 0.02;

/// Closed-loop trim gain, µs of pulse width per unit speed error per tick.
const TRIM_GAIN_US: f32 = 2.0;

/// Bound on the accumulated closed-loop trim, µs.
const TRIM_LIMIT_US: f32 = 150.0;

/// Transport direction line state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// One tick's motor drive command.
///
/// Pure function of current state; it carries no identity across ticks beyond
/// the slew limit applied against the previous command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorCommand {
    /// Drive pulse width, microseconds.
    pub pulse_width_us: f32,
    /// Direction line state.
    pub direction: Direction,
}

/// Closed- or open-loop motor speed controller.
pub struct MotorSpeedController {
    neutral_us: f32,
    min_us: f32,
    max_us: f32,
    closed_loop: bool,
    /// Previous tick's pulse width; the slew limit clamps against this.
    last_pulse_us: f32,
    /// Accumulated closed-loop trim.
    trim_us: f32,
    direction: Direction,
}

impl MotorSpeedController {
    /// Create a controller from the motor calibration in the configuration.
    pub fn new(config: &ProjectorConfig) -> Self {
        let neutral = config.neutral_us();
        Self {
            neutral_us: neutral,
            min_us: config.mot_min_us as f32,
            max_us: config.mot_max_us as f32,
            closed_loop: config.closed_loop,
            last_pulse_us: neutral,
            trim_us: 0.0,
            direction: Direction::Forward,
        }
    }

    /// Compute this tick's command.
    ///
    /// `target` is the speed fraction in [−1, 1] after any single-frame
    /// override; `params` supplies the slew limit; `reading` supplies
    /// feedback for closed-loop correction (an invalid period contributes
    /// zero error so a stalled encoder cannot cause runaway).
    pub fn update(
        &mut self,
        target: f32,
        reading: &EncoderReading,
        params: &RuntimeParameters,
        config: &ProjectorConfig,
    ) -> MotorCommand {
        let desired = target.clamp(-1.0, 1.0);
        let current = self.pulse_to_speed(self.last_pulse_us);

        // Decelerate-then-reverse: while the transport still moves the other
        // way, the effective target is a stop. The slew limiter walks the
        // pulse through neutral before any opposite-polarity command.
        let effective = if desired * current < 0.0 && libm::fabsf(current) > NEAR_STOP_FRACTION {
            0.0
        } else {
            desired
        };

        if self.closed_loop {
            if effective == 0.0 {
                self.trim_us = 0.0;
            } else {
                let measured = match reading.speed_fps(config.pulses_per_rev) {
                    Some(fps) => {
                        let magnitude = (fps / config.max_fps).clamp(0.0, 1.0);
                        if current < 0.0 {
                            -magnitude
                        } else {
                            magnitude
                        }
                    }
                    // Invalid period: zero error, no trim movement
                    None => effective,
                };
                let error = effective - measured;
                self.trim_us = (self.trim_us + TRIM_GAIN_US * error * self.forward_sign())
                    .clamp(-TRIM_LIMIT_US, TRIM_LIMIT_US);
            }
        }

        let unslewed = self.speed_to_pulse(effective) + self.trim_us;
        let lo = self.min_us.min(self.max_us);
        let hi = self.min_us.max(self.max_us);
        let bounded = unslewed.clamp(lo, hi);

        let slew = params.motor_slew_us.max(0.0);
        let step = (bounded - self.last_pulse_us).clamp(-slew, slew);
        self.last_pulse_us += step;

        let commanded = self.pulse_to_speed(self.last_pulse_us);
        if commanded > NEAR_STOP_FRACTION {
            self.direction = Direction::Forward;
        } else if commanded < -NEAR_STOP_FRACTION {
            self.direction = Direction::Reverse;
        }
        // Within the stop band the direction line holds its previous state.

        MotorCommand {
            pulse_width_us: self.last_pulse_us,
            direction: self.direction,
        }
    }

    /// Whether the commanded output is at or near neutral.
    pub fn is_stopped(&self) -> bool {
        libm::fabsf(self.pulse_to_speed(self.last_pulse_us)) <= NEAR_STOP_FRACTION
    }

    /// Commanded speed fraction implied by the current pulse width.
    pub fn commanded_speed(&self) -> f32 {
        self.pulse_to_speed(self.last_pulse_us)
    }

    /// Open-loop map: speed fraction to pulse width. Piecewise linear from
    /// neutral to each calibrated endpoint, so asymmetric calibrations work.
    fn speed_to_pulse(&self, speed: f32) -> f32 {
        if speed >= 0.0 {
            self.neutral_us + speed * (self.max_us - self.neutral_us)
        } else {
            self.neutral_us + (-speed) * (self.min_us - self.neutral_us)
        }
    }

    /// Inverse of [`Self::speed_to_pulse`].
    fn pulse_to_speed(&self, pulse: f32) -> f32 {
        let offset = pulse - self.neutral_us;
        if offset == 0.0 {
            return 0.0;
        }
        let fwd_span = self.max_us - self.neutral_us;
        if fwd_span != 0.0 && offset / fwd_span > 0.0 {
            (offset / fwd_span).clamp(0.0, 1.0)
        } else {
            let rev_span = self.min_us - self.neutral_us;
            if rev_span == 0.0 {
                0.0
            } else {
                -(offset / rev_span).clamp(0.0, 1.0)
            }
        }
    }

    /// Sign that moves the pulse width toward full forward. With the stock
    /// calibration (1800 µs reverse, 1200 µs forward) this is −1.
    fn forward_sign(&self) -> f32 {
        if self.max_us >= self.neutral_us {
            1.0
        } else {
            -1.0
        }
    }
}
