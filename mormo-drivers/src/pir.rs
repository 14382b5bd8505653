//! PIR motion sensor on a GPIO line
//!
//! The sensor holds its output HIGH while motion is present, so the
//! only hardware interaction is reading the line level. rppal
//! addresses pins by BCM number; physical (board) numbering is
//! translated through the 40-pin header table.

use mormo_core::config::{GpioConfig, PinMode, PullMode};
use mormo_core::traits::{MotionSensor, SensorError};
use rppal::gpio::{Gpio, InputPin};
use tracing::{debug, info};

/// Translate a physical header position to its BCM GPIO number
///
/// Covers the 40-pin J8 header. Power, ground, and the ID EEPROM pins
/// carry no GPIO line and yield `None`.
pub fn board_to_bcm(pin: u8) -> Option<u8> {
    match pin {
        3 => Some(2),
        5 => Some(3),
        7 => Some(4),
        8 => Some(14),
        10 => Some(15),
        11 => Some(17),
        12 => Some(18),
        13 => Some(27),
        15 => Some(22),
        16 => Some(23),
        18 => Some(24),
        19 => Some(10),
        21 => Some(9),
        22 => Some(25),
        23 => Some(11),
        24 => Some(8),
        26 => Some(7),
        29 => Some(5),
        31 => Some(6),
        32 => Some(12),
        33 => Some(13),
        35 => Some(19),
        36 => Some(16),
        37 => Some(26),
        38 => Some(20),
        40 => Some(21),
        _ => None,
    }
}

/// Resolve the configured pin to a BCM number
pub fn resolve_pin(config: &GpioConfig) -> Result<u8, SensorError> {
    match config.pin_mode {
        PinMode::Board => board_to_bcm(config.sensor_pin).ok_or_else(|| {
            SensorError::HardwareUnavailable(format!(
                "physical pin {} carries no GPIO line",
                config.sensor_pin
            ))
        }),
        PinMode::Bcm => Ok(config.sensor_pin),
    }
}

/// PIR sensor on one GPIO input line
pub struct PirSensor {
    // Taken on shutdown; a taken pin reports ReadFailed.
    pin: Option<InputPin>,
    bcm: u8,
}

impl PirSensor {
    /// Claim the configured line as an input
    ///
    /// Fails with `HardwareUnavailable` off-board or when the GPIO
    /// device cannot be opened; the caller decides whether that aborts
    /// start-up or degrades to the simulated sensor.
    pub fn open(config: &GpioConfig) -> Result<Self, SensorError> {
        let bcm = resolve_pin(config)?;
        let gpio = Gpio::new().map_err(|e| SensorError::HardwareUnavailable(e.to_string()))?;
        let pin = gpio
            .get(bcm)
            .map_err(|e| SensorError::HardwareUnavailable(e.to_string()))?;
        let pin = match config.pull_mode {
            PullMode::Down => pin.into_input_pulldown(),
            PullMode::Up => pin.into_input_pullup(),
        };
        info!(pin = config.sensor_pin, bcm, "PIR sensor line claimed");
        Ok(Self {
            pin: Some(pin),
            bcm,
        })
    }
}

impl MotionSensor for PirSensor {
    fn read_level(&mut self) -> Result<bool, SensorError> {
        match &self.pin {
            Some(pin) => Ok(pin.is_high()),
            None => Err(SensorError::ReadFailed("sensor is shut down".to_string())),
        }
    }

    fn shutdown(&mut self) {
        if self.pin.take().is_some() {
            debug!(bcm = self.bcm, "PIR sensor line released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_header_positions() {
        // The default sensor wiring: physical pin 7 is BCM 4.
        assert_eq!(board_to_bcm(7), Some(4));
        assert_eq!(board_to_bcm(3), Some(2));
        assert_eq!(board_to_bcm(40), Some(21));
    }

    #[test]
    fn test_power_and_ground_positions_have_no_line() {
        for pin in [1, 2, 4, 6, 9, 14, 17, 20, 25, 30, 34, 39] {
            assert_eq!(board_to_bcm(pin), None, "pin {pin} should not map");
        }
        // ID EEPROM pins are reserved.
        assert_eq!(board_to_bcm(27), None);
        assert_eq!(board_to_bcm(28), None);
    }

    #[test]
    fn test_positions_off_the_header_have_no_line() {
        assert_eq!(board_to_bcm(0), None);
        assert_eq!(board_to_bcm(41), None);
        assert_eq!(board_to_bcm(255), None);
    }

    #[test]
    fn test_resolve_pin_translates_board_numbering() {
        let config = GpioConfig::default();
        assert_eq!(resolve_pin(&config), Ok(4));
    }

    #[test]
    fn test_resolve_pin_passes_bcm_through() {
        let config = GpioConfig {
            sensor_pin: 17,
            pin_mode: PinMode::Bcm,
            ..GpioConfig::default()
        };
        assert_eq!(resolve_pin(&config), Ok(17));
    }

    #[test]
    fn test_resolve_pin_rejects_non_gpio_position() {
        let config = GpioConfig {
            sensor_pin: 6,
            ..GpioConfig::default()
        };
        assert!(matches!(
            resolve_pin(&config),
            Err(SensorError::HardwareUnavailable(_))
        ));
    }
}
