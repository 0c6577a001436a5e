//! Single-frame advance sequencer.
//!
//! Steps the transport exactly one frame per button press by overriding the
//! speed command with a slow creep and counting encoder pulses until one
//! revolution has passed. Only armed while the transport is stopped; any
//! operator speed input aborts the step immediately so the sequencer can
//! never fight the speed pot.

use crate::config::ProjectorConfig;
use crate::control::encoder::EncoderReading;
use crate::control::input::SampledInput;
use crate::log_info;

/// Direction of an in-progress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequencerState {
    Idle,
    Stepping {
        direction: StepDirection,
        start_count: u32,
        target_pulses: u32,
    },
}

/// One-button frame stepper.
pub struct FrameSequencer {
    state: SequencerState,
}

impl FrameSequencer {
    pub fn new() -> Self {
        Self {
            state: SequencerState::Idle,
        }
    }

    /// Advance the state machine one tick.
    ///
    /// Returns the speed override to apply in place of the sampled
    /// `target_speed`, or `None` when the sequencer is idle and the
    /// operator's own command should pass through.
    pub fn update(
        &mut self,
        input: &SampledInput,
        reading: &EncoderReading,
        motor_stopped: bool,
        config: &ProjectorConfig,
    ) -> Option<f32> {
        match self.state {
            SequencerState::Idle => {
                let at_rest =
                    motor_stopped && libm::fabsf(input.params.target_speed) <= config.speed_deadband;
                if !at_rest {
                    return None;
                }
                let direction = if input.step_fwd_edge {
                    StepDirection::Forward
                } else if input.step_back_edge {
                    StepDirection::Backward
                } else {
                    return None;
                };
                self.state = SequencerState::Stepping {
                    direction,
                    start_count: reading.pulse_count,
                    target_pulses: config.pulses_per_frame(),
                };
                log_info!("single-frame step started");
                Some(self.override_speed(direction, config))
            }
            SequencerState::Stepping {
                direction,
                start_count,
                target_pulses,
            } => {
                // Operator speed input or a direction-switch flip wins
                let opposite_pressed = match direction {
                    StepDirection::Forward => input.step_back_edge,
                    StepDirection::Backward => input.step_fwd_edge,
                };
                let speed_commanded =
                    libm::fabsf(input.params.target_speed) > config.speed_deadband;
                if opposite_pressed || speed_commanded || input.direction_changed {
                    self.state = SequencerState::Idle;
                    log_info!("single-frame step aborted");
                    return None;
                }

                // Wrapping delta: the counter may roll over mid-step
                if reading.pulse_count.wrapping_sub(start_count) >= target_pulses {
                    self.state = SequencerState::Idle;
                    log_info!("single-frame step complete");
                    return None;
                }

                Some(self.override_speed(direction, config))
            }
        }
    }

    /// Whether a step is in progress.
    pub fn is_stepping(&self) -> bool {
        matches!(self.state, SequencerState::Stepping { .. })
    }

    fn override_speed(&self, direction: StepDirection, config: &ProjectorConfig) -> f32 {
        let magnitude = config.single_frame_fraction();
        match direction {
            StepDirection::Forward => magnitude,
            StepDirection::Backward => -magnitude,
        }
    }
}

impl Default for FrameSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::params::RuntimeParameters;

    fn idle_input(config: &ProjectorConfig) -> SampledInput {
        SampledInput {
            params: RuntimeParameters::neutral(config),
            step_fwd_edge: false,
            step_back_edge: false,
            direction_changed: false,
        }
    }

    fn reading(count: u32) -> EncoderReading {
        EncoderReading {
            pulse_count: count,
            period_us: Some(10_000),
            phase: 0.0,
        }
    }

    #[test]
    fn button_press_while_stopped_starts_a_step() {
        let config = ProjectorConfig::default();
        let mut seq = FrameSequencer::new();
        let mut input = idle_input(&config);
        input.step_fwd_edge = true;

        let speed = seq.update(&input, &reading(0), true, &config);
        assert_eq!(speed, Some(config.single_frame_fraction()));
        assert!(seq.is_stepping());
    }

    #[test]
    fn backward_step_creeps_in_reverse() {
        let config = ProjectorConfig::default();
        let mut seq = FrameSequencer::new();
        let mut input = idle_input(&config);
        input.step_back_edge = true;

        let speed = seq.update(&input, &reading(0), true, &config);
        assert_eq!(speed, Some(-config.single_frame_fraction()));
    }

    #[test]
    fn press_ignored_while_motor_moving() {
        let config = ProjectorConfig::default();
        let mut seq = FrameSequencer::new();
        let mut input = idle_input(&config);
        input.step_fwd_edge = true;

        assert_eq!(seq.update(&input, &reading(0), false, &config), None);
        assert!(!seq.is_stepping());
    }

    #[test]
    fn press_ignored_while_speed_commanded() {
        let config = ProjectorConfig::default();
        let mut seq = FrameSequencer::new();
        let mut input = idle_input(&config);
        input.step_fwd_edge = true;
        input.params.target_speed = 0.5;

        assert_eq!(seq.update(&input, &reading(0), true, &config), None);
    }

    #[test]
    fn step_completes_after_one_frame_of_pulses() {
        let config = ProjectorConfig::default();
        let mut seq = FrameSequencer::new();
        let mut input = idle_input(&config);
        input.step_fwd_edge = true;

        seq.update(&input, &reading(100), true, &config);
        input.step_fwd_edge = false;

        let frame = config.pulses_per_frame();
        // One pulse short: still stepping
        assert!(seq
            .update(&input, &reading(100 + frame - 1), false, &config)
            .is_some());
        // Full frame: done, override released
        assert_eq!(seq.update(&input, &reading(100 + frame), false, &config), None);
        assert!(!seq.is_stepping());
    }

    #[test]
    fn pulse_count_rollover_does_not_stall_a_step() {
        let config = ProjectorConfig::default();
        let mut seq = FrameSequencer::new();
        let mut input = idle_input(&config);
        input.step_fwd_edge = true;

        let start = u32::MAX - 3;
        seq.update(&input, &reading(start), true, &config);
        input.step_fwd_edge = false;

        let frame = config.pulses_per_frame();
        assert_eq!(
            seq.update(&input, &reading(start.wrapping_add(frame)), false, &config),
            None
        );
    }

    #[test]
    fn speed_input_aborts_in_progress_step() {
        let config = ProjectorConfig::default();
        let mut seq = FrameSequencer::new();
        let mut input = idle_input(&config);
        input.step_fwd_edge = true;

        seq.update(&input, &reading(0), true, &config);
        input.step_fwd_edge = false;
        input.params.target_speed = 0.8;

        assert_eq!(seq.update(&input, &reading(1), false, &config), None);
        assert!(!seq.is_stepping());
    }

    #[test]
    fn opposite_button_aborts_in_progress_step() {
        let config = ProjectorConfig::default();
        let mut seq = FrameSequencer::new();
        let mut input = idle_input(&config);
        input.step_fwd_edge = true;

        seq.update(&input, &reading(0), true, &config);
        input.step_fwd_edge = false;
        input.step_back_edge = true;

        assert_eq!(seq.update(&input, &reading(1), false, &config), None);
        assert!(!seq.is_stepping());
    }
}
