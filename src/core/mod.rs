//! Core support modules: logging and platform-agnostic traits.

pub mod logging;
pub mod traits;
