//! Hardware and process abstraction traits
//!
//! These traits define the interface between the orchestration logic
//! and the sensor- and process-specific implementations.

pub mod media;
pub mod sensor;

pub use media::MediaBackend;
pub use sensor::{MotionSensor, SensorError};
