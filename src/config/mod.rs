//! Immutable startup configuration.
//!
//! Each projector build differs in which controls are wired (pots vs fixed
//! constants, switch schemes, safe-mode switch) and in its motor calibration.
//! All of that is folded into one [`ProjectorConfig`] constructed at startup
//! and passed by reference to the control core. The toggles select the
//! *source* of a runtime parameter; they never change the control algorithms.

/// Where a tunable runtime parameter comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// Read from the wired potentiometer each tick.
    Pot,
    /// Use the fixed default from the configuration.
    Fixed,
}

/// Wiring scheme for the two motor-direction switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchScheme {
    /// Forward switch = run forward, backward switch = run reverse,
    /// neither (or both) = stop. Used on the Eiki conversions.
    FwdRev,
    /// One switch is run/stop, the other selects direction.
    /// Used on the P26 conversions.
    RunDir,
}

/// How transport speed and direction are commanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionSource {
    /// Single pot, center = stop, ends = full speed either direction.
    SpeedPot,
    /// Switch pair selects direction/run, pot magnitude supplies speed only.
    Switches(SwitchScheme),
}

/// How the safe-mode brightness limiter is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeModeSource {
    /// Hard-wired on or off.
    Fixed(bool),
    /// Follows the safety switch, sampled each tick.
    Switch,
}

/// Complete projector configuration, built once at startup.
///
/// Defaults mirror a stock Eiki conversion: 2-blade 180° shutter, motor
/// calibrated to 1800 µs at −24 fps and 1200 µs at +24 fps, single-frame
/// moves at 2 fps, safe-mode floor at 20% brightness.
#[derive(Debug, Clone, Copy)]
pub struct ProjectorConfig {
    /// Emulate the rotating shutter by strobing the LED. When false the lamp
    /// is continuously illuminated (a physical shutter is installed).
    pub shutter_enabled: bool,
    /// Source for blade count and shutter angle.
    pub shutter_source: ParamSource,
    /// Source for motor/lamp slew limits.
    pub slew_source: ParamSource,
    /// Closed-loop speed control from encoder feedback; open-loop otherwise.
    pub closed_loop: bool,
    /// How speed and direction are commanded.
    pub direction_source: DirectionSource,
    /// How safe mode is enabled.
    pub safe_mode_source: SafeModeSource,
    /// Single-frame step buttons are wired.
    pub buttons_enabled: bool,

    /// Default shutter blade count (constrained to >= 1).
    pub default_blades: u8,
    /// Largest blade count the blade pot can select.
    pub max_blades: u8,
    /// Default shutter angle: fraction of each blade sector that is open.
    pub default_shutter_angle: f32,

    /// Motor pulse width at full reverse (−`max_fps`), microseconds.
    pub mot_min_us: u16,
    /// Motor pulse width at full forward (+`max_fps`), microseconds.
    pub mot_max_us: u16,
    /// Transport speed at full pot deflection, frames per second.
    pub max_fps: f32,
    /// Transport speed used while stepping a single frame.
    pub single_frame_fps: f32,
    /// Safe-mode brightness floor when running very slowly or stopped.
    pub safe_min: f32,

    /// Encoder pulses per shaft revolution (one revolution = one frame).
    pub pulses_per_rev: u32,
    /// No pulse for this long means the transport is stalled.
    pub stall_timeout_us: u64,
    /// Control tick period. Must stay short relative to the fastest blade
    /// transit so the strobe gate tracks the encoder phase.
    pub tick_period_us: u64,

    /// Default motor slew limit, µs of pulse width per tick.
    pub default_motor_slew_us: f32,
    /// Default lamp slew limit, duty fraction per tick.
    pub default_lamp_slew: f32,
    /// Motor slew pot range (min, max), µs per tick.
    pub motor_slew_range: (f32, f32),
    /// Lamp slew pot range (min, max), duty per tick.
    pub lamp_slew_range: (f32, f32),

    /// Consecutive stable samples required to accept a switch state change.
    pub debounce_ticks: u8,
    /// EMA coefficient for pot smoothing (1.0 = no filtering).
    pub pot_filter_alpha: f32,
    /// Speed-pot deadband around center treated as stop.
    pub speed_deadband: f32,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self::stock_eiki()
    }
}

impl ProjectorConfig {
    /// The stock Eiki conversion calibration. Const, so a board build can
    /// keep its configuration in a `static` (or feed one to a `static`
    /// encoder tracker) without runtime initialization.
    pub const fn stock_eiki() -> Self {
        Self {
            shutter_enabled: true,
            shutter_source: ParamSource::Pot,
            slew_source: ParamSource::Pot,
            closed_loop: true,
            direction_source: DirectionSource::Switches(SwitchScheme::FwdRev),
            safe_mode_source: SafeModeSource::Switch,
            buttons_enabled: true,

            default_blades: 2,
            max_blades: 4,
            default_shutter_angle: 0.5,

            mot_min_us: 1800,
            mot_max_us: 1200,
            max_fps: 24.0,
            single_frame_fps: 2.0,
            safe_min: 0.2,

            pulses_per_rev: 48,
            stall_timeout_us: 250_000,
            tick_period_us: 1_000,

            default_motor_slew_us: 4.0,
            default_lamp_slew: 0.02,
            motor_slew_range: (1.0, 20.0),
            lamp_slew_range: (0.005, 0.1),

            debounce_ticks: 5,
            pot_filter_alpha: 0.2,
            speed_deadband: 0.05,
        }
    }

    /// Pulse width commanding zero transport speed.
    pub fn neutral_us(&self) -> f32 {
        (self.mot_min_us as f32 + self.mot_max_us as f32) / 2.0
    }

    /// Encoder pulses per film frame. The shutter shaft turns once per frame,
    /// so this equals the pulses per revolution.
    pub fn pulses_per_frame(&self) -> u32 {
        self.pulses_per_rev
    }

    /// Single-frame stepping speed as a fraction of full speed.
    pub fn single_frame_fraction(&self) -> f32 {
        (self.single_frame_fps / self.max_fps).clamp(0.0, 1.0)
    }
}
