//! Media backend trait

use std::path::Path;

use crate::media::{MediaError, RecordingHandle};

/// Trait for media playback and capture backends
///
/// The orchestrator drives the display, the video player, and the
/// camera through this seam, so a full scare cycle can run against a
/// scripted backend without spawning a single process.
pub trait MediaBackend {
    /// Put the waiting image on the display
    ///
    /// Returns once the viewer is up; it keeps running in the
    /// background until [`stop_image`](Self::stop_image) is called.
    fn show_image(&mut self, image: &Path) -> Result<(), MediaError>;

    /// Stop the waiting-image viewer if one is running
    ///
    /// Idempotent; stopping with no viewer up is not an error. The
    /// viewer must be fully gone before video playback starts, since
    /// both claim the same display.
    fn stop_image(&mut self) -> Result<(), MediaError>;

    /// Play a video to completion
    ///
    /// Blocks the calling thread for the duration of playback.
    fn play_video(&mut self, video: &Path) -> Result<(), MediaError>;

    /// Start a reaction capture running in the background
    fn start_capture(&mut self) -> Result<RecordingHandle, MediaError>;

    /// Stop any retained child processes
    ///
    /// Called once on the way out; safe to call repeatedly.
    fn shutdown(&mut self) {}
}
