//! Encoder edge-capture task.

use embassy_rp::gpio::Input;
use embassy_time::Instant;

use crate::control::{EncoderState, EncoderTracker};
use crate::core::traits::EmbassyState;
use crate::log_info;

/// Timestamp every rising edge of the shaft encoder.
///
/// Runs independently of the control tick; the tracker's shared state is
/// the only coupling. Pulse rate at full speed is ~1.2 kHz (24 fps × 48
/// pulses), well within what an async edge wait keeps up with.
#[embassy_executor::task]
pub async fn encoder_capture_task(
    mut pin: Input<'static>,
    tracker: &'static EncoderTracker<EmbassyState<EncoderState>>,
) {
    log_info!("encoder capture task started");
    loop {
        pin.wait_for_rising_edge().await;
        tracker.record_pulse(Instant::now().as_micros());
    }
}
