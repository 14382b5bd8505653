//! Scare cycle orchestration
//!
//! Drives the state machine through one WAITING→…→WAITING traversal
//! per accepted motion event. The active theme is sampled once when
//! the cycle starts, so a rotation landing mid-playback only shows up
//! at the next redisplay. Step failures are confined to the cycle:
//! they are logged, the machine returns to WAITING, and the next
//! motion event starts fresh.

use std::time::Duration;

use mormo_core::media::{MediaError, RecordingHandle};
use mormo_core::motion::MotionEvent;
use mormo_core::shutdown::ShutdownFlag;
use mormo_core::state::{Event, ScareState};
use mormo_core::theme::SharedThemes;
use mormo_core::traits::MediaBackend;
use tracing::{debug, error, info, warn};

/// Capture completion poll cadence
const CAPTURE_POLL: Duration = Duration::from_millis(100);

/// Cycle runner wiring the sensor events to the media backend
pub struct Orchestrator<M: MediaBackend> {
    media: M,
    themes: SharedThemes,
    capture_enabled: bool,
    shutdown: ShutdownFlag,
    state: ScareState,
}

impl<M: MediaBackend> Orchestrator<M> {
    pub fn new(
        media: M,
        themes: SharedThemes,
        capture_enabled: bool,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            media,
            themes,
            capture_enabled,
            shutdown,
            state: ScareState::Waiting,
        }
    }

    /// Display the active theme's waiting image
    pub fn show_waiting_image(&mut self) -> Result<(), MediaError> {
        let theme = self.themes.current();
        self.media.show_image(theme.image())
    }

    /// Stop retained children on the way out
    pub fn shutdown(&mut self) {
        self.media.shutdown();
    }

    /// Run one scare cycle for a motion event
    ///
    /// Scares are single-session: an event arriving while a cycle is
    /// underway is discarded, and a new one is accepted only once the
    /// machine is back in WAITING.
    pub fn run_cycle(&mut self, event: MotionEvent) -> ScareState {
        if !self.state.accepts_motion() {
            debug!(state = ?self.state, "motion discarded mid-cycle");
            return self.state;
        }

        // The theme for this whole cycle is fixed here.
        let theme = self.themes.current();
        info!(theme = %theme.name(), latency = ?event.at.elapsed(), "motion detected");
        self.transition(Event::MotionDetected);

        if let Err(e) = self.media.stop_image() {
            warn!(error = %e, "could not stop the waiting image");
        }

        let mut recording = None;
        if self.capture_enabled && self.state.capture_allowed() {
            match self.media.start_capture() {
                Ok(handle) => {
                    debug!(file = %handle.path().display(), "reaction capture started");
                    self.transition(Event::CaptureStarted);
                    recording = Some(handle);
                }
                Err(e) => {
                    // Capture is a nice-to-have; the scare still runs.
                    warn!(error = %e, "capture did not start, continuing without");
                }
            }
        }

        self.transition(Event::ScareStarted);
        if let Err(e) = self.media.play_video(theme.video()) {
            error!(error = %e, "scare video failed");
        }

        if self.shutdown.is_set() {
            // Dropping a live recording handle kills its recorder.
            self.transition(Event::CycleAborted);
            return self.state;
        }

        let finish = self.reaction_step(recording);

        match self.show_waiting_image() {
            Ok(()) => self.transition(finish),
            Err(e) => {
                error!(error = %e, "could not redisplay the waiting image");
                self.transition(Event::CycleAborted);
            }
        }

        debug!("scare cycle finished");
        self.state
    }

    /// Collect the capture and play it back when it completed in time
    fn reaction_step(&mut self, recording: Option<RecordingHandle>) -> Event {
        let Some(mut handle) = recording else {
            return Event::ReactionSkipped;
        };

        if let Err(e) = handle.wait_complete(CAPTURE_POLL) {
            warn!(error = %e, "capture incomplete, skipping reaction playback");
            return Event::ReactionSkipped;
        }
        if !handle.path().exists() {
            warn!(file = %handle.path().display(), "recording file not found, skipping playback");
            return Event::ReactionSkipped;
        }

        self.transition(Event::ReactionReady);
        info!(file = %handle.path().display(), "playing back the reaction");
        if let Err(e) = self.media.play_video(handle.path()) {
            error!(error = %e, "reaction playback failed");
        }
        Event::ReactionFinished
    }

    fn transition(&mut self, event: Event) {
        self.state = self.state.transition(event);
    }

    #[cfg(test)]
    fn state(&self) -> ScareState {
        self.state
    }

    #[cfg(test)]
    fn set_state(&mut self, state: ScareState) {
        self.state = state;
    }
}
