//! State machine definition
//!
//! Every media action the daemon performs is a function of the current
//! state and an event.

use super::events::Event;

/// Scare cycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScareState {
    /// Waiting image on screen, sensor armed
    Waiting,
    /// Motion accepted, sequence starting
    Triggered,
    /// Reaction capture running in the background
    Recording,
    /// Scare video playing (blocking)
    PlayingScare,
    /// Captured reaction clip playing back (blocking)
    PlayingReaction,
}

impl ScareState {
    /// Check if a motion event is accepted in this state
    pub fn accepts_motion(&self) -> bool {
        matches!(self, ScareState::Waiting)
    }

    /// Check if a scare cycle is underway
    pub fn in_cycle(&self) -> bool {
        !matches!(self, ScareState::Waiting)
    }

    /// Check if the camera may be claimed in this state
    ///
    /// Capture starts before the scare video; once the video is rolling
    /// the camera is already spoken for (or deliberately skipped).
    pub fn capture_allowed(&self) -> bool {
        matches!(self, ScareState::Triggered)
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic. Unlisted pairs keep the
    /// current state, which is what discards motion mid-cycle.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use ScareState::*;

        match (self, event) {
            // Waiting transitions
            (Waiting, MotionDetected) => Triggered,

            // Triggered transitions
            (Triggered, CaptureStarted) => Recording,
            // Capture disabled or failed to spawn: straight to the video
            (Triggered, ScareStarted) => PlayingScare,

            // Recording transitions (capture keeps running in the background)
            (Recording, ScareStarted) => PlayingScare,

            // PlayingScare transitions
            (PlayingScare, ReactionReady) => PlayingReaction,
            (PlayingScare, ReactionSkipped) => Waiting,

            // PlayingReaction transitions
            (PlayingReaction, ReactionFinished) => Waiting,

            // A failed cycle lands back on the waiting image
            (Triggered, CycleAborted) => Waiting,
            (Recording, CycleAborted) => Waiting,
            (PlayingScare, CycleAborted) => Waiting,
            (PlayingReaction, CycleAborted) => Waiting,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_arms_cycle() {
        let state = ScareState::Waiting;
        let next = state.transition(Event::MotionDetected);
        assert_eq!(next, ScareState::Triggered);
    }

    #[test]
    fn test_full_cycle_with_reaction() {
        let state = ScareState::Waiting;

        let triggered = state.transition(Event::MotionDetected);
        assert_eq!(triggered, ScareState::Triggered);

        let recording = triggered.transition(Event::CaptureStarted);
        assert_eq!(recording, ScareState::Recording);

        let playing = recording.transition(Event::ScareStarted);
        assert_eq!(playing, ScareState::PlayingScare);

        let reaction = playing.transition(Event::ReactionReady);
        assert_eq!(reaction, ScareState::PlayingReaction);

        let waiting = reaction.transition(Event::ReactionFinished);
        assert_eq!(waiting, ScareState::Waiting);
    }

    #[test]
    fn test_cycle_without_capture() {
        // Capture disabled: Triggered goes straight to PlayingScare
        let playing = ScareState::Triggered.transition(Event::ScareStarted);
        assert_eq!(playing, ScareState::PlayingScare);

        let waiting = playing.transition(Event::ReactionSkipped);
        assert_eq!(waiting, ScareState::Waiting);
    }

    #[test]
    fn test_motion_ignored_mid_cycle() {
        let states = [
            ScareState::Triggered,
            ScareState::Recording,
            ScareState::PlayingScare,
            ScareState::PlayingReaction,
        ];

        for state in states {
            let next = state.transition(Event::MotionDetected);
            assert_eq!(next, state, "motion must not re-enter from {state:?}");
        }
    }

    #[test]
    fn test_abort_returns_to_waiting() {
        let states = [
            ScareState::Triggered,
            ScareState::Recording,
            ScareState::PlayingScare,
            ScareState::PlayingReaction,
        ];

        for state in states {
            let next = state.transition(Event::CycleAborted);
            assert_eq!(next, ScareState::Waiting);
        }
    }

    #[test]
    fn test_accepts_motion() {
        assert!(ScareState::Waiting.accepts_motion());
        assert!(!ScareState::Triggered.accepts_motion());
        assert!(!ScareState::PlayingScare.accepts_motion());
        assert!(!ScareState::PlayingReaction.accepts_motion());
    }

    #[test]
    fn test_capture_allowed() {
        assert!(ScareState::Triggered.capture_allowed());
        assert!(!ScareState::Waiting.capture_allowed());
        assert!(!ScareState::Recording.capture_allowed());
        assert!(!ScareState::PlayingScare.capture_allowed());
    }

    #[test]
    fn test_stray_sequence_events_keep_state() {
        // Events arriving in the wrong state must not move the machine
        assert_eq!(
            ScareState::Waiting.transition(Event::ScareStarted),
            ScareState::Waiting
        );
        assert_eq!(
            ScareState::Waiting.transition(Event::ReactionFinished),
            ScareState::Waiting
        );
        assert_eq!(
            ScareState::PlayingScare.transition(Event::CaptureStarted),
            ScareState::PlayingScare
        );
    }
}
