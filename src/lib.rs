#![cfg_attr(not(test), no_std)]

//! spectral - control core for a motorized film-projector retrofit
//!
//! This library drives film transport speed, synchronizes a digitally-emulated
//! rotating shutter (LED strobing in place of a mechanical blade), and
//! modulates lamp brightness, with closed-loop feedback from a shaft encoder.
//!
//! The control logic is platform-agnostic and host-testable; hardware access
//! goes through the traits in [`platform`], with an embassy-rp implementation
//! behind the `pico2_w` feature and mocks for tests.

// Global logger transport and panic handler for the embedded target
#[cfg(feature = "pico2_w")]
use {defmt_rtt as _, panic_probe as _};

// Platform abstraction layer (ADC, GPIO, PWM)
pub mod platform;

// Logging macros and platform-agnostic traits (time, shared state)
pub mod core;

// Immutable startup configuration
pub mod config;

// The control core: sampler, encoder, motor, shutter, lamp, sequencer
pub mod control;
