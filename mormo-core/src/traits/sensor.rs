//! Motion sensor trait

use thiserror::Error;

/// Errors that can occur with motion sensing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The GPIO facility could not be opened or configured
    #[error("sensor hardware unavailable: {0}")]
    HardwareUnavailable(String),
    /// A single level read failed
    ///
    /// The polling loop skips the tick; a failed read never counts as
    /// a LOW sample.
    #[error("sensor read failed: {0}")]
    ReadFailed(String),
}

/// Trait for motion sensors
///
/// Implementations expose the raw line level (HIGH while motion is
/// held, LOW when quiet). Edge detection and debouncing live in
/// [`EdgeDetector`](crate::motion::EdgeDetector), so an implementation
/// only reports what the hardware says right now.
pub trait MotionSensor: Send {
    /// Read the current line level; `true` is HIGH (motion held)
    ///
    /// Takes `&mut self` because some implementations consume queued
    /// test stimuli on read.
    fn read_level(&mut self) -> Result<bool, SensorError>;

    /// Release the underlying hardware
    ///
    /// Must be idempotent; reads after shutdown fail.
    fn shutdown(&mut self);

    /// Check whether this sensor is a simulation stand-in
    fn is_simulated(&self) -> bool {
        false
    }
}

impl MotionSensor for Box<dyn MotionSensor> {
    fn read_level(&mut self) -> Result<bool, SensorError> {
        (**self).read_level()
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }

    fn is_simulated(&self) -> bool {
        (**self).is_simulated()
    }
}
