//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Sensor events
    /// Rising edge reported by the motion reader
    MotionDetected,

    // Sequence events
    /// Reaction capture spawned in the background
    CaptureStarted,
    /// Scare video invocation about to block
    ScareStarted,
    /// Capture completed in time; clip will be played back
    ReactionReady,
    /// No usable capture; skip straight to redisplay
    ReactionSkipped,
    /// Reaction playback finished
    ReactionFinished,

    // Fault events
    /// A step failed in a way that prevents finishing the sequence
    CycleAborted,
}

impl Event {
    /// Check if this event originates from the motion sensor
    pub fn is_sensor_event(&self) -> bool {
        matches!(self, Event::MotionDetected)
    }

    /// Check if this event is raised by the orchestrator mid-sequence
    pub fn is_sequence_event(&self) -> bool {
        matches!(
            self,
            Event::CaptureStarted
                | Event::ScareStarted
                | Event::ReactionReady
                | Event::ReactionSkipped
                | Event::ReactionFinished
        )
    }

    /// Check if this event indicates a failed cycle
    pub fn is_fault_event(&self) -> bool {
        matches!(self, Event::CycleAborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_events() {
        assert!(Event::MotionDetected.is_sensor_event());
        assert!(!Event::ScareStarted.is_sensor_event());
        assert!(!Event::CycleAborted.is_sensor_event());
    }

    #[test]
    fn test_sequence_events() {
        assert!(Event::CaptureStarted.is_sequence_event());
        assert!(Event::ReactionSkipped.is_sequence_event());
        assert!(!Event::MotionDetected.is_sequence_event());
        assert!(!Event::CycleAborted.is_sequence_event());
    }

    #[test]
    fn test_fault_events() {
        assert!(Event::CycleAborted.is_fault_event());
        assert!(!Event::ReactionFinished.is_fault_event());
    }
}
