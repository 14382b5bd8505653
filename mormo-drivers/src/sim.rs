//! Simulated motion sensor
//!
//! Stand-in used when the GPIO hardware is unavailable or simulation
//! is forced. Motion is injected through a `SimulatedTrigger`; each
//! fire is consumed as a single HIGH sample followed by LOW, so one
//! fire produces exactly one motion episode.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mormo_core::traits::{MotionSensor, SensorError};
use tracing::debug;

/// Injects motion into a [`SimulatedSensor`]
#[derive(Debug, Clone)]
pub struct SimulatedTrigger {
    pending: Arc<AtomicBool>,
}

impl SimulatedTrigger {
    /// Queue one motion episode
    ///
    /// Fires queued between two polls collapse into one episode.
    pub fn fire(&self) {
        self.pending.store(true, Ordering::SeqCst);
        debug!("simulated motion queued");
    }
}

/// Motion sensor with no hardware behind it
#[derive(Debug)]
pub struct SimulatedSensor {
    pending: Arc<AtomicBool>,
    shut_down: bool,
}

impl SimulatedSensor {
    /// Build the sensor and the trigger handle that feeds it
    pub fn new() -> (Self, SimulatedTrigger) {
        let pending = Arc::new(AtomicBool::new(false));
        let trigger = SimulatedTrigger {
            pending: pending.clone(),
        };
        (
            Self {
                pending,
                shut_down: false,
            },
            trigger,
        )
    }
}

impl MotionSensor for SimulatedSensor {
    /// A queued fire is consumed as one HIGH sample; otherwise LOW
    fn read_level(&mut self) -> Result<bool, SensorError> {
        if self.shut_down {
            return Err(SensorError::ReadFailed("sensor is shut down".to_string()));
        }
        Ok(self.pending.swap(false, Ordering::SeqCst))
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
