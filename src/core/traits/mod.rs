//! Platform-agnostic trait abstractions.
//!
//! These traits decouple the control core from embassy so the whole tick
//! pipeline can run in host tests with controllable time and state.

pub mod sync;
pub mod time;

pub use sync::{MockState, SharedState};
pub use time::{MockTime, TimeSource};

#[cfg(feature = "pico2_w")]
pub use sync::EmbassyState;
