//! Closed-loop motor/shutter/lamp synchronization engine.
//!
//! Components in tick dependency order: [`input::InputSampler`] and
//! [`encoder::EncoderTracker`] feed [`motor::MotorSpeedController`] and
//! [`shutter::ShutterSync`]; the shutter gate masks [`lamp::LampController`]
//! output; [`single_frame::FrameSequencer`], when active, overrides the
//! sampled speed target. [`pipeline::ControlPipeline`] runs one tick.

pub mod encoder;
pub mod input;
pub mod lamp;
pub mod motor;
pub mod params;
pub mod pipeline;
pub mod shutter;
pub mod single_frame;
pub mod status;

pub use encoder::{EncoderReading, EncoderState, EncoderTracker};
pub use input::{InputSampler, RawInputs, SampledInput};
pub use lamp::{FloorScaledPolicy, LampCommand, LampController, SafeModePolicy};
pub use motor::{Direction, MotorCommand, MotorSpeedController};
pub use params::RuntimeParameters;
pub use pipeline::{ControlPipeline, TickOutput};
pub use shutter::{ShutterGate, ShutterSync, ShutterWindow};
pub use single_frame::{FrameSequencer, StepDirection};
pub use status::{NullStatusSink, StatusReport, StatusSink, SystemMode};
