//! Configuration loading
//!
//! Reads the YAML configuration file and falls back to built-in
//! defaults when no file exists. A file that exists but cannot be read,
//! parsed, or validated is fatal; the daemon never runs on a silently
//! partial configuration.

use std::fs;
use std::io;
use std::path::Path;

use mormo_core::config::{Config, PinMode};
use mormo_drivers::pir;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("could not read configuration: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid YAML for the configuration shape
    #[error("could not parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The parsed configuration cannot run
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the effective configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    BuiltinDefaults,
}

/// Load the configuration, falling back to defaults when absent
pub fn load_or_default(path: &Path) -> Result<(Config, ConfigSource), ConfigError> {
    if !path.exists() {
        return Ok((Config::default(), ConfigSource::BuiltinDefaults));
    }
    let text = fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&text)?;
    validate(&config)?;
    Ok((config, ConfigSource::File))
}

/// Reject configurations that cannot run
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.themes.available.is_empty() {
        return Err(ConfigError::Invalid(
            "themes.available is empty".to_string(),
        ));
    }
    for (i, name) in config.themes.available.iter().enumerate() {
        if config.themes.available[..i].contains(name) {
            return Err(ConfigError::Invalid(format!("duplicate theme {name:?}")));
        }
    }
    if config.motion.poll_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "motion.poll_interval must be positive".to_string(),
        ));
    }
    if config.camera.enabled && config.camera.duration_ms == 0 {
        return Err(ConfigError::Invalid(
            "camera.duration must be positive when capture is enabled".to_string(),
        ));
    }
    match config.gpio.pin_mode {
        PinMode::Board if pir::board_to_bcm(config.gpio.sensor_pin).is_none() => {
            Err(ConfigError::Invalid(format!(
                "gpio.sensor_pin {} carries no GPIO line",
                config.gpio.sensor_pin
            )))
        }
        PinMode::Bcm if config.gpio.sensor_pin > 27 => Err(ConfigError::Invalid(format!(
            "gpio.sensor_pin {} is not a BCM GPIO number",
            config.gpio.sensor_pin
        ))),
        _ => Ok(()),
    }
}

/// Log a summary of the effective configuration
pub fn log_config_summary(config: &Config) {
    info!("configuration loaded");
    debug!(
        "  sensor pin {} ({:?} numbering, pull {:?})",
        config.gpio.sensor_pin, config.gpio.pin_mode, config.gpio.pull_mode
    );
    debug!("  media dir {}", config.paths.media_dir.display());
    debug!("  {} themes", config.themes.available.len());
    debug!(
        "  camera capture {}",
        if config.camera.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    debug!("  poll interval {}ms", config.motion.poll_interval_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let (config, source) = load_or_default(Path::new("/nonexistent/mormo.yaml")).unwrap();
        assert_eq!(source, ConfigSource::BuiltinDefaults);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_the_rest() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "gpio:\n  sensor_pin: 11\nthemes:\n  available: [Ghost]\n",
        );

        let (config, source) = load_or_default(&path).unwrap();
        assert_eq!(source, ConfigSource::File);
        assert_eq!(config.gpio.sensor_pin, 11);
        assert_eq!(config.themes.available, ["Ghost"]);
        // Untouched sections keep their defaults.
        assert_eq!(config.video.player, "omxplayer");
        assert_eq!(config.camera.duration_ms, 5000);
    }

    #[test]
    fn test_millisecond_keys_parse_under_their_short_names() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "camera:\n  duration: 3000\n  wait_margin: 500\nmotion:\n  poll_interval: 50\n",
        );

        let (config, _) = load_or_default(&path).unwrap();
        assert_eq!(config.camera.duration_ms, 3000);
        assert_eq!(config.camera.wait_margin_ms, 500);
        assert_eq!(config.motion.poll_interval_ms, 50);
    }

    #[test]
    fn test_malformed_yaml_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "gpio: [not, a, mapping\n");
        assert!(matches!(
            load_or_default(&path),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_defaults_validate() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_theme_list_rejected() {
        let mut config = Config::default();
        config.themes.available.clear();
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_theme_rejected() {
        let mut config = Config::default();
        config.themes.available.push("Male".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = Config::default();
        config.motion.poll_interval_ms = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_capture_duration_rejected_only_when_enabled() {
        let mut config = Config::default();
        config.camera.duration_ms = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));

        config.camera.enabled = false;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_non_gpio_board_pin_rejected() {
        let mut config = Config::default();
        config.gpio.sensor_pin = 6;
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_out_of_range_bcm_pin_rejected() {
        let mut config = Config::default();
        config.gpio.pin_mode = PinMode::Bcm;
        config.gpio.sensor_pin = 45;
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_shipped_sample_matches_the_builtin_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config.yaml");
        let (config, source) = load_or_default(&path).unwrap();
        assert_eq!(source, ConfigSource::File);
        assert_eq!(config, Config::default());
    }
}
