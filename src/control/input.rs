//! Operator input sampling and conditioning.
//!
//! Every tick the sampler takes one [`RawInputs`] frame (straight off the
//! ADC and GPIO lines), debounces the switches, low-pass filters the pots,
//! and emits a complete, valid [`RuntimeParameters`] snapshot. Feature
//! toggles in the configuration select whether a pot or a fixed default
//! supplies each field; the sampler's contract is identical either way.
//! Out-of-range analog reads are clamped, never propagated as errors.

use crate::config::{DirectionSource, ParamSource, ProjectorConfig, SafeModeSource, SwitchScheme};
use crate::control::params::RuntimeParameters;

/// One tick's raw input line readings.
///
/// Analog values are normalized ADC fractions; the sampler clamps them to
/// [0, 1] before use. Digital values are the raw (bouncy) line levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawInputs {
    /// Motor speed pot.
    pub speed_pot: f32,
    /// Motor slew-rate pot.
    pub motor_slew_pot: f32,
    /// Lamp dimming pot.
    pub brightness_pot: f32,
    /// Lamp slew-rate pot.
    pub lamp_slew_pot: f32,
    /// Shutter blade-count pot.
    pub blades_pot: f32,
    /// Shutter angle pot.
    pub angle_pot: f32,
    /// Direction switch, forward contact.
    pub dir_fwd: bool,
    /// Direction switch, backward contact.
    pub dir_bck: bool,
    /// Single-frame forward button.
    pub button_a: bool,
    /// Single-frame backward button.
    pub button_b: bool,
    /// Safe-mode switch.
    pub safe_switch: bool,
}

impl RawInputs {
    /// Everything released, pots at zero.
    pub fn idle() -> Self {
        Self {
            speed_pot: 0.0,
            motor_slew_pot: 0.0,
            brightness_pot: 0.0,
            lamp_slew_pot: 0.0,
            blades_pot: 0.0,
            angle_pot: 0.0,
            dir_fwd: false,
            dir_bck: false,
            button_a: false,
            button_b: false,
            safe_switch: false,
        }
    }
}

/// Sampled operator input for one tick: the parameter snapshot plus the
/// discrete events the single-frame sequencer consumes.
#[derive(Debug, Clone, Copy)]
pub struct SampledInput {
    /// Complete, validated runtime parameters.
    pub params: RuntimeParameters,
    /// Debounced rising edge on the step-forward button.
    pub step_fwd_edge: bool,
    /// Debounced rising edge on the step-backward button.
    pub step_back_edge: bool,
    /// Debounced direction-switch pair changed state this tick.
    pub direction_changed: bool,
}

/// Digital debouncer: a state change is accepted only after N consecutive
/// samples agree on the new level.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    stable: bool,
    candidate: bool,
    run: u8,
    threshold: u8,
}

impl Debouncer {
    /// Create a debouncer with the given initial state and sample threshold.
    pub fn new(initial: bool, threshold: u8) -> Self {
        Self {
            stable: initial,
            candidate: initial,
            run: 0,
            threshold: threshold.max(1),
        }
    }

    /// Feed one raw sample; returns the debounced state.
    pub fn update(&mut self, raw: bool) -> bool {
        if raw == self.stable {
            self.candidate = raw;
            self.run = 0;
        } else if raw == self.candidate {
            self.run = self.run.saturating_add(1);
            if self.run >= self.threshold {
                self.stable = raw;
                self.run = 0;
            }
        } else {
            self.candidate = raw;
            self.run = 1;
        }
        self.stable
    }

    /// Current debounced state.
    pub fn state(&self) -> bool {
        self.stable
    }
}

/// Exponential moving average filter for pot readings.
///
/// Input is clamped to [0, 1] before filtering. The first sample passes
/// through unchanged; `alpha = 1.0` disables smoothing.
#[derive(Debug, Clone, Copy)]
pub struct PotFilter {
    alpha: f32,
    prev: Option<f32>,
}

impl PotFilter {
    /// Create a filter with the given smoothing factor (clamped to [0, 1]).
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            prev: None,
        }
    }

    /// Feed one raw reading; returns the smoothed value.
    pub fn apply(&mut self, raw: f32) -> f32 {
        let clamped = raw.clamp(0.0, 1.0);
        match self.prev {
            None => {
                self.prev = Some(clamped);
                clamped
            }
            Some(prev) => {
                let smoothed = prev + self.alpha * (clamped - prev);
                self.prev = Some(smoothed);
                smoothed
            }
        }
    }

    /// Clear filter state; the next sample passes through unchanged.
    pub fn reset(&mut self) {
        self.prev = None;
    }
}

/// Input sampler: filter and debounce state for every operator control.
pub struct InputSampler {
    speed: PotFilter,
    motor_slew: PotFilter,
    brightness: PotFilter,
    lamp_slew: PotFilter,
    blades: PotFilter,
    angle: PotFilter,
    dir_fwd: Debouncer,
    dir_bck: Debouncer,
    button_a: Debouncer,
    button_b: Debouncer,
    safe_switch: Debouncer,
    prev_button_a: bool,
    prev_button_b: bool,
}

impl InputSampler {
    /// Create a sampler configured for the projector's filter settings.
    pub fn new(config: &ProjectorConfig) -> Self {
        let alpha = config.pot_filter_alpha;
        let n = config.debounce_ticks;
        Self {
            speed: PotFilter::new(alpha),
            motor_slew: PotFilter::new(alpha),
            brightness: PotFilter::new(alpha),
            lamp_slew: PotFilter::new(alpha),
            blades: PotFilter::new(alpha),
            angle: PotFilter::new(alpha),
            dir_fwd: Debouncer::new(false, n),
            dir_bck: Debouncer::new(false, n),
            button_a: Debouncer::new(false, n),
            button_b: Debouncer::new(false, n),
            safe_switch: Debouncer::new(false, n),
            prev_button_a: false,
            prev_button_b: false,
        }
    }

    /// Sample one tick's raw inputs into a validated snapshot.
    pub fn sample(&mut self, raw: &RawInputs, config: &ProjectorConfig) -> SampledInput {
        // Condition every line each tick so filter state stays warm even for
        // fields the configuration sources from fixed defaults.
        let speed_pot = self.speed.apply(raw.speed_pot);
        let motor_slew_pot = self.motor_slew.apply(raw.motor_slew_pot);
        let brightness_pot = self.brightness.apply(raw.brightness_pot);
        let lamp_slew_pot = self.lamp_slew.apply(raw.lamp_slew_pot);
        let blades_pot = self.blades.apply(raw.blades_pot);
        let angle_pot = self.angle.apply(raw.angle_pot);

        let fwd_was = self.dir_fwd.state();
        let bck_was = self.dir_bck.state();
        let fwd = self.dir_fwd.update(raw.dir_fwd);
        let bck = self.dir_bck.update(raw.dir_bck);
        let direction_changed = fwd != fwd_was || bck != bck_was;

        let button_a = self.button_a.update(raw.button_a);
        let button_b = self.button_b.update(raw.button_b);
        let step_fwd_edge = config.buttons_enabled && button_a && !self.prev_button_a;
        let step_back_edge = config.buttons_enabled && button_b && !self.prev_button_b;
        self.prev_button_a = button_a;
        self.prev_button_b = button_b;

        let safe_sw = self.safe_switch.update(raw.safe_switch);

        let target_speed = Self::resolve_speed(speed_pot, fwd, bck, config);

        let (shutter_blades, shutter_angle) = match config.shutter_source {
            ParamSource::Pot => (
                Self::quantize_blades(blades_pot, config.max_blades),
                angle_pot.clamp(0.0, 1.0),
            ),
            ParamSource::Fixed => (
                config.default_blades.max(1),
                config.default_shutter_angle.clamp(0.0, 1.0),
            ),
        };

        let (motor_slew_us, lamp_slew) = match config.slew_source {
            ParamSource::Pot => (
                Self::lerp(config.motor_slew_range, motor_slew_pot),
                Self::lerp(config.lamp_slew_range, lamp_slew_pot),
            ),
            ParamSource::Fixed => (config.default_motor_slew_us, config.default_lamp_slew),
        };

        let safe_mode = match config.safe_mode_source {
            SafeModeSource::Fixed(enabled) => enabled,
            SafeModeSource::Switch => safe_sw,
        };

        SampledInput {
            params: RuntimeParameters {
                target_speed,
                lamp_brightness: brightness_pot.clamp(0.0, 1.0),
                shutter_blades,
                shutter_angle,
                motor_slew_us,
                lamp_slew,
                safe_mode,
            },
            step_fwd_edge,
            step_back_edge,
            direction_changed,
        }
    }

    /// Resolve transport speed and direction from the configured source.
    fn resolve_speed(speed_pot: f32, fwd: bool, bck: bool, config: &ProjectorConfig) -> f32 {
        match config.direction_source {
            DirectionSource::SpeedPot => {
                // Center-stop pot: 0.5 = stop, ends = full speed each way.
                let centered = (speed_pot - 0.5) * 2.0;
                Self::apply_deadband(centered, config.speed_deadband)
            }
            DirectionSource::Switches(SwitchScheme::FwdRev) => {
                // Forward contact runs forward, backward contact runs in
                // reverse; neither or both commands a stop.
                let magnitude = speed_pot.clamp(0.0, 1.0);
                match (fwd, bck) {
                    (true, false) => magnitude,
                    (false, true) => -magnitude,
                    _ => 0.0,
                }
            }
            DirectionSource::Switches(SwitchScheme::RunDir) => {
                // One contact is run/stop, the other picks the direction.
                let magnitude = speed_pot.clamp(0.0, 1.0);
                if fwd {
                    if bck {
                        -magnitude
                    } else {
                        magnitude
                    }
                } else {
                    0.0
                }
            }
        }
    }

    /// Suppress pot noise around the stop position, rescaling the remainder
    /// so full deflection still commands full speed.
    fn apply_deadband(value: f32, deadband: f32) -> f32 {
        let v = value.clamp(-1.0, 1.0);
        if v > deadband {
            (v - deadband) / (1.0 - deadband)
        } else if v < -deadband {
            (v + deadband) / (1.0 - deadband)
        } else {
            0.0
        }
    }

    /// Map a blade-count pot to 1..=max, in equal steps.
    fn quantize_blades(pot: f32, max: u8) -> u8 {
        let max = max.max(1);
        let step = (pot.clamp(0.0, 1.0) * max as f32) as u8;
        (step + 1).min(max)
    }

    /// Linear map of a pot fraction into a (min, max) range.
    fn lerp((min, max): (f32, f32), fraction: f32) -> f32 {
        min + (max - min) * fraction.clamp(0.0, 1.0)
    }
}
