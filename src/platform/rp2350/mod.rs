//! RP2350 platform implementation for the Raspberry Pi Pico 2 W brain board.
//!
//! Concrete implementations of the platform abstraction traits on top of
//! `embassy-rp`, plus the async tasks that tie the control core to the
//! hardware. Only available with the `pico2_w` feature.

mod adc;
mod gpio;
mod pwm;
mod time;

pub mod tasks;

pub use adc::Rp2350Adc;
pub use gpio::Rp2350Gpio;
pub use pwm::{PwmChannel, Rp2350Pwm};
pub use time::EmbassyTime;
