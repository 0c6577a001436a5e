//! Embassy tasks binding the control core to the board.
//!
//! Two tasks run concurrently on one executor: the 1 kHz control tick and
//! the encoder edge-capture task. They share the encoder tracker through a
//! `'static` reference; the tracker's critical-section state keeps the
//! snapshot consistent.
//!
//! The whole chain is const-constructible, so the shared tracker is a plain
//! `static`:
//!
//! ```ignore
//! const CONFIG: ProjectorConfig = ProjectorConfig::stock_eiki();
//! static TRACKER: EncoderTracker<EmbassyState<EncoderState>> =
//!     EncoderTracker::new(EmbassyState::new(EncoderState::new()), &CONFIG);
//!
//! #[embassy_executor::main]
//! async fn main(spawner: Spawner) {
//!     let p = embassy_rp::init(Default::default());
//!     let io = wire_board(p); // board-specific pin assignment
//!     spawner.spawn(encoder_capture_task(encoder_pin, &TRACKER)).unwrap();
//!     spawner.spawn(projector_control_task(io, &TRACKER, CONFIG)).unwrap();
//! }
//! ```

pub mod control;
pub mod encoder;

pub use control::{projector_control_task, ProjectorIo};
pub use encoder::encoder_capture_task;
