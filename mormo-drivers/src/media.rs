//! Process-backed media backend
//!
//! Drives the framebuffer image viewer, the video player, and the
//! camera recorder as plain child processes (no shell). The viewer is
//! retained and killed on the next stop; the player is awaited in a
//! poll loop so a shutdown request can stop playback mid-file; the
//! recorder runs in the background behind a `RecordingHandle`.

use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

use mormo_core::config::{CameraConfig, Config, DisplayConfig, VideoConfig};
use mormo_core::media::{CaptureProcess, MediaError, RecordingHandle};
use mormo_core::shutdown::ShutdownFlag;
use mormo_core::traits::MediaBackend;
use tracing::{debug, info, warn};

/// Child-process completion poll cadence
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A spawned recorder child
pub struct ChildCapture {
    child: Child,
}

impl ChildCapture {
    pub fn new(child: Child) -> Self {
        Self { child }
    }
}

impl CaptureProcess for ChildCapture {
    fn poll(&mut self) -> Option<bool> {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(%status, "recorder exited");
                Some(status.success())
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not poll recorder");
                Some(false)
            }
        }
    }

    fn kill(&mut self) {
        // Kill on an already-exited child just fails; the wait reaps.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Media backend spawning external viewer/player/recorder processes
pub struct ProcessMedia {
    video: VideoConfig,
    camera: CameraConfig,
    display: DisplayConfig,
    recordings_dir: PathBuf,
    shutdown: ShutdownFlag,
    viewer: Option<Child>,
}

impl ProcessMedia {
    pub fn new(config: &Config, shutdown: ShutdownFlag) -> Self {
        Self {
            video: config.video.clone(),
            camera: config.camera.clone(),
            display: config.display.clone(),
            recordings_dir: config.paths.recordings_dir.clone(),
            shutdown,
            viewer: None,
        }
    }

    fn viewer_command(&self, image: &Path) -> Command {
        let mut cmd = Command::new(&self.display.viewer);
        cmd.arg("-T")
            .arg(self.display.terminal.to_string())
            .arg("-d")
            .arg(&self.display.device)
            .arg("-noverbose")
            .arg("-once")
            .arg(image);
        cmd
    }

    fn player_command(&self, video: &Path) -> Command {
        let res = self.video.resolution;
        let mut cmd = Command::new(&self.video.player);
        cmd.arg(video)
            .arg("-o")
            .arg(&self.video.output)
            .arg("--win")
            .arg(format!("0 0 {} {}", res.width, res.height))
            .arg("--aspect-mode")
            .arg(&self.video.aspect_mode)
            .arg("--orientation")
            .arg(self.video.orientation.to_string())
            .arg("--vol")
            .arg(self.video.volume.to_string());
        if !self.video.show_osd {
            cmd.arg("--no-osd");
        }
        cmd
    }

    fn recorder_command(&self, output: &Path) -> Command {
        let mut cmd = Command::new(&self.camera.recorder);
        cmd.arg("-o")
            .arg(output)
            .arg("-t")
            .arg(self.camera.duration_ms.to_string())
            .arg("-rot")
            .arg(self.camera.rotation.to_string());
        if !self.camera.preview {
            cmd.arg("-n");
        }
        cmd
    }

    fn recording_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H.%M.%S");
        self.recordings_dir.join(format!("{stamp}.h264"))
    }
}

impl MediaBackend for ProcessMedia {
    fn show_image(&mut self, image: &Path) -> Result<(), MediaError> {
        // One process on the display at a time.
        self.stop_image()?;
        info!(image = %image.display(), "displaying waiting image");
        let child = self
            .viewer_command(image)
            .spawn()
            .map_err(|source| MediaError::Spawn {
                program: self.display.viewer.clone(),
                source,
            })?;
        self.viewer = Some(child);
        Ok(())
    }

    fn stop_image(&mut self) -> Result<(), MediaError> {
        if let Some(mut child) = self.viewer.take() {
            debug!("stopping waiting-image viewer");
            if let Err(e) = child.kill() {
                debug!(error = %e, "viewer was already gone");
            }
            let _ = child.wait();
        }
        Ok(())
    }

    fn play_video(&mut self, video: &Path) -> Result<(), MediaError> {
        let program = self.video.player.clone();
        info!(file = %video.display(), "playing video");
        let mut child = self
            .player_command(video)
            .spawn()
            .map_err(|source| MediaError::Spawn {
                program: program.clone(),
                source,
            })?;

        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!(%status, "player exited");
                    return if status.success() {
                        Ok(())
                    } else {
                        Err(MediaError::Failed {
                            program,
                            code: status.code(),
                        })
                    };
                }
                Ok(None) => {
                    // An externally stopped playback counts as complete.
                    if self.shutdown.is_set() {
                        info!("shutdown requested, stopping playback");
                        let _ = child.kill();
                        let _ = child.wait();
                        return Ok(());
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    warn!(error = %e, "could not poll player");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(MediaError::Failed {
                        program,
                        code: None,
                    });
                }
            }
        }
    }

    fn start_capture(&mut self) -> Result<RecordingHandle, MediaError> {
        let path = self.recording_path();
        let program = self.camera.recorder.clone();
        info!(file = %path.display(), "starting reaction capture");
        let child = self
            .recorder_command(&path)
            .spawn()
            .map_err(|source| MediaError::Spawn {
                program: program.clone(),
                source,
            })?;
        Ok(RecordingHandle::new(
            program,
            path,
            self.camera.duration(),
            self.camera.wait_margin(),
            Box::new(ChildCapture::new(child)),
        ))
    }

    fn shutdown(&mut self) {
        debug!("media backend shutting down");
        let _ = self.stop_image();
    }
}
