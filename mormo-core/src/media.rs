//! Reaction capture bookkeeping
//!
//! A reaction capture runs as an external process started at the top
//! of a scare cycle and collected near its end. The handle tracks the
//! output path and a hard deadline; a recorder that outlives the
//! deadline is killed so a wedged camera stack can never hang a cycle.

use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

/// Errors from media playback and capture
#[derive(Debug, Error)]
pub enum MediaError {
    /// A required media file does not exist
    #[error("media file not found: {}", path.display())]
    Missing { path: PathBuf },
    /// The external program could not be spawned
    #[error("could not launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The external program finished unsuccessfully
    #[error("{program} failed (exit code {code:?})")]
    Failed { program: String, code: Option<i32> },
    /// A capture outlived its deadline and was killed
    #[error("{program} missed its capture deadline and was killed")]
    Timeout { program: String },
}

/// Lifecycle of one reaction capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    /// Process spawned; completion not yet awaited
    Pending,
    /// Completion wait in progress
    Recording,
    /// Recorder exited cleanly within its deadline
    Complete,
    /// Recorder failed, was killed, or never ran to completion
    Failed,
}

impl CaptureStatus {
    /// Check whether the capture can still change status
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaptureStatus::Complete | CaptureStatus::Failed)
    }
}

/// Trait for a spawned capture process
///
/// `poll` must not block, so the handle's deadline stays enforceable.
/// `kill` must tolerate a process that already exited.
pub trait CaptureProcess: Send {
    /// Non-blocking completion check
    ///
    /// `None` while the process is still running, `Some(success)` once
    /// it has exited.
    fn poll(&mut self) -> Option<bool>;

    /// Force-terminate the process
    fn kill(&mut self);
}

/// One in-flight or collected reaction capture
///
/// The deadline runs from the moment the process was handed over:
/// the configured capture duration plus a wait margin for encoder
/// flush and process teardown.
pub struct RecordingHandle {
    program: String,
    path: PathBuf,
    duration: Duration,
    deadline: Instant,
    status: CaptureStatus,
    process: Box<dyn CaptureProcess>,
}

impl RecordingHandle {
    /// Wrap a just-spawned capture process
    pub fn new(
        program: impl Into<String>,
        path: PathBuf,
        duration: Duration,
        wait_margin: Duration,
        process: Box<dyn CaptureProcess>,
    ) -> Self {
        Self {
            program: program.into(),
            path,
            duration,
            deadline: Instant::now() + duration + wait_margin,
            status: CaptureStatus::Pending,
            process,
        }
    }

    /// Where the recorder writes its output
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured capture duration, without the wait margin
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn status(&self) -> CaptureStatus {
        self.status
    }

    /// Block until the recorder finishes or its deadline passes
    ///
    /// Past the deadline the process is killed and the capture is
    /// failed. The caller decides what a failed capture means; the
    /// scare cycle responds by skipping reaction playback.
    pub fn wait_complete(&mut self, poll_interval: Duration) -> Result<(), MediaError> {
        self.status = CaptureStatus::Recording;
        loop {
            match self.process.poll() {
                Some(true) => {
                    debug!(file = %self.path.display(), "capture complete");
                    self.status = CaptureStatus::Complete;
                    return Ok(());
                }
                Some(false) => {
                    self.status = CaptureStatus::Failed;
                    return Err(MediaError::Failed {
                        program: self.program.clone(),
                        code: None,
                    });
                }
                None if Instant::now() >= self.deadline => {
                    warn!(
                        file = %self.path.display(),
                        "capture deadline passed, killing recorder"
                    );
                    self.process.kill();
                    self.status = CaptureStatus::Failed;
                    return Err(MediaError::Timeout {
                        program: self.program.clone(),
                    });
                }
                None => thread::sleep(poll_interval),
            }
        }
    }
}

impl Drop for RecordingHandle {
    /// A handle dropped mid-capture takes its recorder down with it
    fn drop(&mut self) {
        if !self.status.is_terminal() {
            debug!(file = %self.path.display(), "dropping live capture, killing recorder");
            self.process.kill();
            self.status = CaptureStatus::Failed;
        }
    }
}

impl fmt::Debug for RecordingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingHandle")
            .field("program", &self.program)
            .field("path", &self.path)
            .field("duration", &self.duration)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Exits on the first poll
    struct InstantCapture {
        success: bool,
    }

    impl CaptureProcess for InstantCapture {
        fn poll(&mut self) -> Option<bool> {
            Some(self.success)
        }

        fn kill(&mut self) {}
    }

    /// Never exits on its own; records whether it was killed
    struct HangingCapture {
        killed: Arc<AtomicBool>,
    }

    impl CaptureProcess for HangingCapture {
        fn poll(&mut self) -> Option<bool> {
            None
        }

        fn kill(&mut self) {
            self.killed.store(true, Ordering::SeqCst);
        }
    }

    /// Runs for a fixed number of polls, then exits cleanly
    struct SlowCapture {
        polls_left: u32,
    }

    impl CaptureProcess for SlowCapture {
        fn poll(&mut self) -> Option<bool> {
            if self.polls_left == 0 {
                Some(true)
            } else {
                self.polls_left -= 1;
                None
            }
        }

        fn kill(&mut self) {}
    }

    fn handle_with(process: Box<dyn CaptureProcess>) -> RecordingHandle {
        RecordingHandle::new(
            "fake-recorder",
            PathBuf::from("/tmp/reaction.h264"),
            Duration::from_millis(20),
            Duration::from_millis(10),
            process,
        )
    }

    #[test]
    fn test_new_handle_is_pending() {
        let handle = handle_with(Box::new(InstantCapture { success: true }));
        assert_eq!(handle.status(), CaptureStatus::Pending);
        assert_eq!(handle.path(), Path::new("/tmp/reaction.h264"));
        assert_eq!(handle.duration(), Duration::from_millis(20));
    }

    #[test]
    fn test_clean_exit_completes() {
        let mut handle = handle_with(Box::new(InstantCapture { success: true }));
        assert!(handle.wait_complete(Duration::from_millis(1)).is_ok());
        assert_eq!(handle.status(), CaptureStatus::Complete);
    }

    #[test]
    fn test_recorder_failure_reported() {
        let mut handle = handle_with(Box::new(InstantCapture { success: false }));
        let err = handle.wait_complete(Duration::from_millis(1)).unwrap_err();
        assert!(matches!(err, MediaError::Failed { .. }));
        assert_eq!(handle.status(), CaptureStatus::Failed);
    }

    #[test]
    fn test_slow_exit_within_deadline_completes() {
        let mut handle = handle_with(Box::new(SlowCapture { polls_left: 5 }));
        assert!(handle.wait_complete(Duration::from_millis(1)).is_ok());
        assert_eq!(handle.status(), CaptureStatus::Complete);
    }

    #[test]
    fn test_hung_recorder_killed_past_deadline() {
        let killed = Arc::new(AtomicBool::new(false));
        let mut handle = handle_with(Box::new(HangingCapture {
            killed: killed.clone(),
        }));

        let err = handle.wait_complete(Duration::from_millis(1)).unwrap_err();
        assert!(matches!(err, MediaError::Timeout { .. }));
        assert_eq!(handle.status(), CaptureStatus::Failed);
        assert!(killed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_dropping_live_handle_kills_recorder() {
        let killed = Arc::new(AtomicBool::new(false));
        let handle = handle_with(Box::new(HangingCapture {
            killed: killed.clone(),
        }));

        drop(handle);
        assert!(killed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_dropping_collected_handle_does_not_kill() {
        let killed = Arc::new(AtomicBool::new(false));
        {
            let mut handle = handle_with(Box::new(InstantCapture { success: true }));
            handle.wait_complete(Duration::from_millis(1)).unwrap();
            // Swap in a watcher to prove Drop leaves terminal captures alone.
            handle.process = Box::new(HangingCapture {
                killed: killed.clone(),
            });
        }
        assert!(!killed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!CaptureStatus::Pending.is_terminal());
        assert!(!CaptureStatus::Recording.is_terminal());
        assert!(CaptureStatus::Complete.is_terminal());
        assert!(CaptureStatus::Failed.is_terminal());
    }
}
