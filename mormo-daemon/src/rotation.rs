//! Theme rotation thread
//!
//! Wakes every interval and proposes a different theme through the
//! shared hand-off. The new theme becomes visible the next time the
//! orchestrator redisplays the waiting image; a video already playing
//! is never swapped underneath.

use std::io;
use std::thread::JoinHandle;
use std::time::Duration;

use mormo_core::shutdown::ShutdownFlag;
use mormo_core::theme::{RotationOutcome, SharedThemes};
use tracing::{debug, info, warn};

/// Sleep slice, so a shutdown request interrupts long intervals
const SLEEP_STEP: Duration = Duration::from_millis(250);

/// Start the rotation timer thread
pub fn spawn(
    themes: SharedThemes,
    interval: Duration,
    shutdown: ShutdownFlag,
) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("theme-rotator".to_string())
        .spawn(move || run(themes, interval, shutdown))
}

fn run(themes: SharedThemes, interval: Duration, shutdown: ShutdownFlag) {
    info!(interval_secs = interval.as_secs(), "theme rotation active");
    let mut rng = rand::thread_rng();
    loop {
        if shutdown.sleep_interruptibly(interval, SLEEP_STEP) {
            debug!("theme rotator stopping");
            return;
        }
        match themes.rotate(&mut rng) {
            RotationOutcome::Rotated { from, to } => info!(%from, %to, "theme rotated"),
            RotationOutcome::SoleTheme => {
                debug!("single theme configured, rotation is a no-op")
            }
            RotationOutcome::MissingMedia { candidate } => {
                warn!(%candidate, "rotation rejected, candidate media missing")
            }
        }
    }
}
