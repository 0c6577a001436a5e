//! Control tick task.
//!
//! Samples the operator panel, snapshots the encoder, runs one pipeline
//! tick, and writes the motor and lamp outputs. Everything inside one loop
//! iteration is synchronous; only the ticker wait yields.

use embassy_time::{Duration, Instant, Ticker};

use crate::config::ProjectorConfig;
use crate::control::{
    ControlPipeline, Direction, EncoderState, EncoderTracker, RawInputs, StatusReport, StatusSink,
    SystemMode,
};
use crate::core::traits::EmbassyState;
use crate::platform::rp2350::{Rp2350Adc, Rp2350Gpio, Rp2350Pwm};
use crate::platform::traits::{AdcInterface, GpioInterface, PwmInterface};
use crate::{log_error, log_info};

/// Every line the control task touches, wired up by board init.
pub struct ProjectorIo<'d> {
    pub speed_pot: Rp2350Adc<'d>,
    pub motor_slew_pot: Rp2350Adc<'d>,
    pub brightness_pot: Rp2350Adc<'d>,
    pub lamp_slew_pot: Rp2350Adc<'d>,
    pub blades_pot: Rp2350Adc<'d>,
    pub angle_pot: Rp2350Adc<'d>,
    pub dir_fwd: Rp2350Gpio<'d>,
    pub dir_bck: Rp2350Gpio<'d>,
    pub button_a: Rp2350Gpio<'d>,
    pub button_b: Rp2350Gpio<'d>,
    pub safe_switch: Rp2350Gpio<'d>,
    pub motor_pwm: Rp2350Pwm<'d>,
    pub lamp_pwm: Rp2350Pwm<'d>,
    pub direction_pin: Rp2350Gpio<'d>,
    pub status_led: Rp2350Gpio<'d>,
}

/// Status LED patterns: off = stopped, solid = running, fast blink =
/// stepping, slow blink = fault.
struct LedStatusSink<'d> {
    led: Rp2350Gpio<'d>,
    tick: u32,
}

impl StatusSink for LedStatusSink<'_> {
    fn report(&mut self, status: &StatusReport) {
        self.tick = self.tick.wrapping_add(1);
        let lit = match status.mode {
            SystemMode::Stopped => false,
            SystemMode::Running => true,
            SystemMode::Stepping => (self.tick / 125) % 2 == 0,
            SystemMode::Fault => (self.tick / 500) % 2 == 0,
        };
        let result = if lit {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
        if result.is_err() {
            log_error!("status led update failed");
        }
    }
}

/// A failed conversion holds the previous reading; the pot filter smooths
/// over the gap.
fn read_or(pot: &mut Rp2350Adc<'_>, last: f32) -> f32 {
    pot.read_fraction().unwrap_or(last)
}

/// Control tick task.
#[embassy_executor::task]
pub async fn projector_control_task(
    io: ProjectorIo<'static>,
    tracker: &'static EncoderTracker<EmbassyState<EncoderState>>,
    config: ProjectorConfig,
) {
    let ProjectorIo {
        mut speed_pot,
        mut motor_slew_pot,
        mut brightness_pot,
        mut lamp_slew_pot,
        mut blades_pot,
        mut angle_pot,
        dir_fwd,
        dir_bck,
        button_a,
        button_b,
        safe_switch,
        mut motor_pwm,
        mut lamp_pwm,
        mut direction_pin,
        status_led,
    } = io;

    log_info!("projector control task started");
    log_info!("  tick period: {} us", config.tick_period_us);

    let mut pipeline = ControlPipeline::new(config);
    let mut sink = LedStatusSink {
        led: status_led,
        tick: 0,
    };

    motor_pwm.enable();
    lamp_pwm.enable();

    let mut ticker = Ticker::every(Duration::from_micros(config.tick_period_us));
    let mut raw = RawInputs::idle();

    loop {
        raw = RawInputs {
            speed_pot: read_or(&mut speed_pot, raw.speed_pot),
            motor_slew_pot: read_or(&mut motor_slew_pot, raw.motor_slew_pot),
            brightness_pot: read_or(&mut brightness_pot, raw.brightness_pot),
            lamp_slew_pot: read_or(&mut lamp_slew_pot, raw.lamp_slew_pot),
            blades_pot: read_or(&mut blades_pot, raw.blades_pot),
            angle_pot: read_or(&mut angle_pot, raw.angle_pot),
            dir_fwd: dir_fwd.read(),
            dir_bck: dir_bck.read(),
            button_a: button_a.read(),
            button_b: button_b.read(),
            safe_switch: safe_switch.read(),
        };

        let reading = tracker.snapshot(Instant::now().as_micros());
        let out = pipeline.tick(&raw, &reading, &mut sink);

        if motor_pwm
            .set_pulse_width_us(out.motor.pulse_width_us as u32)
            .is_err()
        {
            log_error!("motor pwm update failed");
        }
        let dir_result = match out.motor.direction {
            Direction::Forward => direction_pin.set_high(),
            Direction::Reverse => direction_pin.set_low(),
        };
        if dir_result.is_err() {
            log_error!("direction line update failed");
        }
        if lamp_pwm.set_duty_cycle(out.lamp.duty).is_err() {
            log_error!("lamp pwm update failed");
        }

        ticker.next().await;
    }
}
