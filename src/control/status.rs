//! System status reporting.
//!
//! The pipeline classifies each tick into a coarse mode and hands the result
//! to a `StatusSink`. The sink is a seam: firmware drives a status LED from
//! it, tests capture the reports for assertion.

/// Coarse transport mode for operator indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMode {
    /// Transport stopped, no step in progress.
    Stopped,
    /// Transport running under speed command.
    Running,
    /// Single-frame step in progress.
    Stepping,
    /// Speed commanded but the encoder reports no motion.
    Fault,
}

/// One tick's status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub mode: SystemMode,
    pub safe_mode_active: bool,
    pub stalled: bool,
}

/// Consumer of per-tick status reports.
pub trait StatusSink {
    fn report(&mut self, status: &StatusReport);
}

/// Sink that drops every report. Used when status indication is disabled.
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn report(&mut self, _status: &StatusReport) {}
}

#[cfg(any(test, feature = "mock"))]
pub mod capture {
    use super::{StatusReport, StatusSink};

    /// Sink that remembers the most recent report.
    #[derive(Default)]
    pub struct CaptureStatusSink {
        last: Option<StatusReport>,
        count: u32,
    }

    impl CaptureStatusSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn last(&self) -> Option<StatusReport> {
            self.last
        }

        pub fn count(&self) -> u32 {
            self.count
        }
    }

    impl StatusSink for CaptureStatusSink {
        fn report(&mut self, status: &StatusReport) {
            self.last = Some(*status);
            self.count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::capture::CaptureStatusSink;
    use super::*;

    #[test]
    fn capture_sink_keeps_latest_report() {
        let mut sink = CaptureStatusSink::new();
        sink.report(&StatusReport {
            mode: SystemMode::Stopped,
            safe_mode_active: false,
            stalled: false,
        });
        sink.report(&StatusReport {
            mode: SystemMode::Running,
            safe_mode_active: true,
            stalled: false,
        });
        let last = sink.last().unwrap();
        assert_eq!(last.mode, SystemMode::Running);
        assert!(last.safe_mode_active);
        assert_eq!(sink.count(), 2);
    }
}
