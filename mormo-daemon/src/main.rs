//! Mormo - Motion-Triggered Scare Sequencer
//!
//! Daemon binary for Raspberry-Pi-class boards. A PIR sensor arms a
//! themed jump scare: waiting image on the framebuffer, scare video on
//! motion, optional reaction capture and playback, then back to
//! waiting. A background timer can rotate the active theme.
//!
//! Named after the Greek "Mormo" (Μορμώ), a spirit invoked to frighten
//! children - fitting for a machine whose entire job is the jump scare.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use mormo_core::config::LoggingConfig;
use mormo_core::shutdown::ShutdownFlag;
use mormo_core::theme::{SharedThemes, Theme, ThemeSet};
use mormo_drivers::media::ProcessMedia;
use mormo_drivers::reader::{self, MotionReader};

use crate::orchestrator::Orchestrator;

mod config;
mod orchestrator;
mod rotation;
mod signals;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "mormo", version, about = "Motion-triggered scare sequencer")]
struct Cli {
    /// Theme to start with; defaults to the first configured theme
    theme: Option<String>,

    /// Minutes between theme rotations; omit to keep one theme
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    rotation_minutes: Option<u64>,

    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Use the simulated sensor even when hardware is present
    #[arg(long)]
    simulate: bool,

    /// Abort start-up when the sensor hardware is unavailable
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) = config::load_or_default(&cli.config)
        .with_context(|| format!("configuration {} unusable", cli.config.display()))?;
    init_logging(&config.logging)?;
    match source {
        config::ConfigSource::File => {
            info!(path = %cli.config.display(), "configuration file read")
        }
        config::ConfigSource::BuiltinDefaults => {
            warn!(path = %cli.config.display(), "configuration file not found, using built-in defaults")
        }
    }
    config::log_config_summary(&config);

    // Resolve and verify the initial theme before touching any
    // hardware, so a missing-media abort leaves no side effects.
    let initial = match &cli.theme {
        Some(name) => name.clone(),
        None => config
            .themes
            .available
            .first()
            .context("no themes configured")?
            .clone(),
    };
    let themes: Vec<Theme> = config
        .themes
        .available
        .iter()
        .map(|name| Theme::new(name, &config.paths.media_dir, &config.themes.file_format))
        .collect();
    let set = ThemeSet::new(themes, &initial).with_context(|| {
        format!(
            "theme {initial:?} is not one of the configured themes {:?}",
            config.themes.available
        )
    })?;
    set.current()
        .verify()
        .with_context(|| format!("theme {initial:?} is missing media"))?;

    if config.camera.enabled {
        fs::create_dir_all(&config.paths.recordings_dir).with_context(|| {
            format!(
                "could not create recordings directory {}",
                config.paths.recordings_dir.display()
            )
        })?;
    }

    let shutdown = ShutdownFlag::new();
    signals::install(shutdown.clone())?;

    let strict = cli.strict || config.gpio.strict;
    let (sensor, _trigger) = reader::open_sensor(&config.gpio, cli.simulate, strict)
        .context("motion sensor unavailable")?;

    let themes = SharedThemes::new(set);
    let rotator = match cli.rotation_minutes {
        Some(minutes) => {
            let interval = Duration::from_secs(minutes * 60);
            Some(
                rotation::spawn(themes.clone(), interval, shutdown.clone())
                    .context("could not start the theme rotator")?,
            )
        }
        None => None,
    };

    let media = ProcessMedia::new(&config, shutdown.clone());
    let mut orchestrator =
        Orchestrator::new(media, themes, config.camera.enabled, shutdown.clone());

    if let Err(e) = orchestrator.show_waiting_image() {
        // The image is retried at the end of every cycle.
        error!(error = %e, "could not display the initial waiting image");
    }

    let mut reader = MotionReader::new(sensor, config.motion.poll_interval());
    reader.arm();
    info!(theme = %initial, "armed, waiting for motion");

    while let Some(event) = reader.wait_for_motion(&shutdown) {
        orchestrator.run_cycle(event);
    }

    info!("shutdown requested, releasing resources");
    if let Some(handle) = rotator {
        if handle.join().is_err() {
            error!("theme rotator panicked");
        }
    }
    orchestrator.shutdown();
    reader.shutdown();
    info!("goodbye");
    Ok(())
}

/// Build the tracing subscriber from the logging section
///
/// `RUST_LOG` overrides the configured level; `enabled: false` turns
/// the sink off entirely. The optional file sink appends with ANSI
/// colors disabled.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = if logging.enabled {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    } else {
        EnvFilter::new("off")
    };

    let console = logging
        .console_output
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let file = match &logging.log_file {
        Some(path) => {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("could not open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();
    Ok(())
}
