//! Configuration types and defaults
//!
//! Settings are loaded once at start-up and stay immutable for the
//! life of the process; rotation changes which theme is active, never
//! the configuration itself. Every field has a default carrying the
//! values the original installation ran with, so a partial file (or no
//! file at all) still yields a runnable configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pin numbering scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinMode {
    /// Physical position on the 40-pin header
    Board,
    /// Broadcom GPIO number
    Bcm,
}

/// Input pull-resistor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullMode {
    /// Pull-down; the line idles LOW and motion drives it HIGH
    Down,
    /// Pull-up
    Up,
}

/// Motion sensor wiring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    /// Sensor input pin, interpreted per `pin_mode`
    pub sensor_pin: u8,
    pub pin_mode: PinMode,
    pub pull_mode: PullMode,
    /// Abort start-up when the hardware is unavailable instead of
    /// degrading to the simulated sensor
    pub strict: bool,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            sensor_pin: 7,
            pin_mode: PinMode::Board,
            pull_mode: PullMode::Down,
            strict: false,
        }
    }
}

/// Media and recording locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding all theme images and videos, flat
    pub media_dir: PathBuf,
    /// Directory receiving reaction captures; created at start-up when
    /// capture is enabled
    pub recordings_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("/home/pi/Projects/Halloween/ScareMedia"),
            recordings_dir: PathBuf::from("/home/pi/Projects/Halloween/Recordings"),
        }
    }
}

/// Playback window size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Video player invocation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Player binary
    pub player: String,
    /// Audio output route (`hdmi`, `local`, or `both`)
    pub output: String,
    pub resolution: Resolution,
    /// How the video fills the window (`fill`, `letterbox`, `stretch`)
    pub aspect_mode: String,
    /// Playback rotation in degrees
    pub orientation: u16,
    /// Volume in millibels; negative values attenuate
    pub volume: i32,
    /// Leave the player's on-screen display enabled
    pub show_osd: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            player: "omxplayer".to_string(),
            output: "both".to_string(),
            resolution: Resolution::default(),
            aspect_mode: "fill".to_string(),
            orientation: 180,
            volume: -600,
            show_osd: false,
        }
    }
}

/// Reaction capture settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Record a reaction clip during each scare
    pub enabled: bool,
    /// Recorder binary
    pub recorder: String,
    /// Capture length in milliseconds
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    /// Camera rotation in degrees
    pub rotation: u16,
    /// Show the camera preview while recording
    pub preview: bool,
    /// Grace period past `duration`, in milliseconds, before a hung
    /// recorder is killed
    #[serde(rename = "wait_margin")]
    pub wait_margin_ms: u64,
}

impl CameraConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn wait_margin(&self) -> Duration {
        Duration::from_millis(self.wait_margin_ms)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            recorder: "raspivid".to_string(),
            duration_ms: 5000,
            rotation: 180,
            preview: false,
            wait_margin_ms: 2000,
        }
    }
}

/// Waiting-image viewer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Framebuffer image viewer binary
    pub viewer: String,
    /// Framebuffer device the viewer draws to
    pub device: String,
    /// Virtual terminal the viewer claims
    pub terminal: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            viewer: "fbi".to_string(),
            device: "/dev/fb0".to_string(),
            terminal: 1,
        }
    }
}

/// Sensor polling cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Line poll interval in milliseconds
    #[serde(rename = "poll_interval")]
    pub poll_interval_ms: u64,
}

impl MotionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
        }
    }
}

/// File-name convention binding a theme name to its media
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeFileFormat {
    /// Appended to the theme name for the scare video
    pub video_suffix: String,
    /// Appended to the theme name for the waiting image
    pub image_suffix: String,
}

impl Default for ThemeFileFormat {
    fn default() -> Self {
        Self {
            video_suffix: "ScareV.mp4".to_string(),
            image_suffix: "Start.png".to_string(),
        }
    }
}

/// Theme inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemesConfig {
    /// Theme names, in order
    pub available: Vec<String>,
    pub file_format: ThemeFileFormat,
}

impl Default for ThemesConfig {
    fn default() -> Self {
        Self {
            available: vec![
                "Male".to_string(),
                "Female".to_string(),
                "Child".to_string(),
            ],
            file_format: ThemeFileFormat::default(),
        }
    }
}

/// Log sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Default severity filter; the `RUST_LOG` environment variable
    /// overrides it
    pub level: String,
    /// Also write to stderr
    pub console_output: bool,
    /// Append to this file when set
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            console_output: true,
            log_file: None,
        }
    }
}

/// Complete daemon configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gpio: GpioConfig,
    pub paths: PathsConfig,
    pub video: VideoConfig,
    pub camera: CameraConfig,
    pub display: DisplayConfig,
    pub motion: MotionConfig,
    pub themes: ThemesConfig,
    pub logging: LoggingConfig,
}
