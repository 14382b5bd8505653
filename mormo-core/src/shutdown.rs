//! Cooperative shutdown signaling
//!
//! Long waits in this codebase (the motion poll loop, the rotation
//! timer, playback waits) all poll a shared flag instead of blocking
//! uninterruptibly, so one signal winds the whole process down within
//! a poll step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Clonable shutdown token
///
/// Every clone observes the same flag. The flag is set once and never
/// cleared; `is_set` answering `true` means the process is on its way
/// out.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of a clone to wind down
    ///
    /// Only performs an atomic store, so it is safe to call from a
    /// signal handler.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Check whether shutdown has been requested
    pub fn is_set(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Sleep for `duration`, waking early if shutdown is requested
    ///
    /// The wait is sliced into `step`-sized naps with a flag check in
    /// between. Returns `true` if shutdown was requested before the
    /// full duration elapsed.
    pub fn sleep_interruptibly(&self, duration: Duration, step: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_set() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            thread::sleep(remaining.min(step));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_visible_to_all_clones() {
        let flag = ShutdownFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_set());

        flag.request();
        assert!(clone.is_set());
        assert!(flag.is_set());
    }

    #[test]
    fn test_request_is_idempotent() {
        let flag = ShutdownFlag::new();
        flag.request();
        flag.request();
        assert!(flag.is_set());
    }

    #[test]
    fn test_sleep_runs_to_completion_when_not_requested() {
        let flag = ShutdownFlag::new();
        let start = Instant::now();
        let interrupted =
            flag.sleep_interruptibly(Duration::from_millis(30), Duration::from_millis(5));
        assert!(!interrupted);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_sleep_wakes_early_on_request() {
        let flag = ShutdownFlag::new();
        let requester = flag.clone();
        let waker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            requester.request();
        });

        let start = Instant::now();
        let interrupted =
            flag.sleep_interruptibly(Duration::from_secs(10), Duration::from_millis(10));
        waker.join().unwrap();

        assert!(interrupted);
        // Far below the requested ten seconds.
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_sleep_returns_immediately_when_already_requested() {
        let flag = ShutdownFlag::new();
        flag.request();
        let start = Instant::now();
        let interrupted =
            flag.sleep_interruptibly(Duration::from_secs(10), Duration::from_millis(10));
        assert!(interrupted);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
