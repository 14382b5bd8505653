//! Polling motion reader
//!
//! Owns a sensor and turns raw line levels into debounced motion
//! events, either by blocking the calling thread (`wait_for_motion`)
//! or by feeding a channel from a producer thread (`spawn_events`).

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, TrySendError};
use mormo_core::config::GpioConfig;
use mormo_core::motion::{EdgeDetector, MotionEvent};
use mormo_core::shutdown::ShutdownFlag;
use mormo_core::traits::{MotionSensor, SensorError};
use tracing::{debug, warn};

use crate::pir::PirSensor;
use crate::sim::{SimulatedSensor, SimulatedTrigger};

/// Open the configured motion sensor
///
/// `simulate` forces the simulated sensor. Otherwise the PIR line is
/// claimed; when that fails the reader degrades to simulation unless
/// `strict`, in which case the error propagates and start-up aborts.
///
/// The trigger handle is returned for the simulated paths so a harness
/// can inject motion.
pub fn open_sensor(
    config: &GpioConfig,
    simulate: bool,
    strict: bool,
) -> Result<(Box<dyn MotionSensor>, Option<SimulatedTrigger>), SensorError> {
    if simulate {
        warn!("simulation forced, motion only fires when injected");
        let (sensor, trigger) = SimulatedSensor::new();
        return Ok((Box::new(sensor), Some(trigger)));
    }
    match PirSensor::open(config) {
        Ok(sensor) => Ok((Box::new(sensor), None)),
        Err(e) if strict => Err(e),
        Err(e) => {
            warn!(error = %e, "sensor unavailable, degrading to simulation");
            let (sensor, trigger) = SimulatedSensor::new();
            Ok((Box::new(sensor), Some(trigger)))
        }
    }
}

/// Debounced polling loop over a motion sensor
pub struct MotionReader<S: MotionSensor> {
    sensor: S,
    detector: EdgeDetector,
    poll_interval: Duration,
}

impl<S: MotionSensor> MotionReader<S> {
    pub fn new(sensor: S, poll_interval: Duration) -> Self {
        Self {
            sensor,
            detector: EdgeDetector::new(),
            poll_interval,
        }
    }

    /// Prime the detector with the current line level
    ///
    /// A line already HIGH at start-up counts as an ongoing episode,
    /// not fresh motion; the discarded sample swallows that edge.
    pub fn arm(&mut self) {
        match self.sensor.read_level() {
            Ok(level) => {
                let _ = self.detector.sample(level);
                debug!(level, "sensor armed");
            }
            Err(e) => warn!(error = %e, "could not read initial sensor level"),
        }
    }

    /// Block until a motion episode starts or shutdown is requested
    ///
    /// Polls the line at the configured interval. Returns `None` only
    /// on shutdown, so the caller's loop ends cleanly.
    pub fn wait_for_motion(&mut self, shutdown: &ShutdownFlag) -> Option<MotionEvent> {
        loop {
            if shutdown.is_set() {
                return None;
            }
            if let Some(event) = self.poll_once() {
                return Some(event);
            }
            thread::sleep(self.poll_interval);
        }
    }

    /// Push-style mode: feed motion events into a channel
    ///
    /// Consumes the reader and polls from a named producer thread. The
    /// channel holds a single event; an episode that starts while one
    /// is already queued is dropped, which matches the discard policy
    /// for motion during a running cycle. The thread ends on shutdown
    /// (or when the receiver is gone) and hands the sensor back through
    /// its join handle.
    pub fn spawn_events(
        mut self,
        shutdown: ShutdownFlag,
    ) -> io::Result<(Receiver<MotionEvent>, JoinHandle<S>)>
    where
        S: 'static,
    {
        let (sender, receiver) = bounded(1);
        let handle = thread::Builder::new()
            .name("motion-events".to_string())
            .spawn(move || {
                while !shutdown.is_set() {
                    if let Some(event) = self.poll_once() {
                        match sender.try_send(event) {
                            Ok(()) => {}
                            Err(TrySendError::Full(_)) => {
                                debug!("motion event dropped, consumer busy")
                            }
                            Err(TrySendError::Disconnected(_)) => break,
                        }
                    }
                    thread::sleep(self.poll_interval);
                }
                self.sensor
            })?;
        Ok((receiver, handle))
    }

    /// Release the underlying sensor
    pub fn shutdown(&mut self) {
        self.sensor.shutdown();
    }

    // One poll tick. A failed read neither raises an event nor ends a
    // HIGH episode; the tick is skipped entirely.
    fn poll_once(&mut self) -> Option<MotionEvent> {
        match self.sensor.read_level() {
            Ok(level) => {
                if level != self.detector.level() {
                    debug!(level, "sensor level changed");
                }
                self.detector.sample(level)
            }
            Err(e) => {
                warn!(error = %e, "sensor read failed, skipping tick");
                None
            }
        }
    }
}
