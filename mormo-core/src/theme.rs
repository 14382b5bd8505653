//! Themes and rotation
//!
//! A theme pairs a waiting image with a scare video through a filename
//! convention. `ThemeSet` tracks which theme is active; rotation picks
//! a different member at random and activates it only when its media
//! is present. `SharedThemes` is the single hand-off point between the
//! rotator thread and the orchestrator.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;

use crate::config::ThemeFileFormat;
use crate::media::MediaError;

/// Named pairing of a waiting image and a scare video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    image: PathBuf,
    video: PathBuf,
}

impl Theme {
    /// Build a theme whose media follows the naming convention
    ///
    /// Files live flat in `media_dir` as `<name><image_suffix>` and
    /// `<name><video_suffix>`.
    pub fn new(name: impl Into<String>, media_dir: &Path, format: &ThemeFileFormat) -> Self {
        let name = name.into();
        let image = media_dir.join(format!("{}{}", name, format.image_suffix));
        let video = media_dir.join(format!("{}{}", name, format.video_suffix));
        Self { name, image, video }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the waiting image
    pub fn image(&self) -> &Path {
        &self.image
    }

    /// Path of the scare video
    pub fn video(&self) -> &Path {
        &self.video
    }

    /// Check that both backing files exist right now
    ///
    /// A theme is usable only at the moment both files are present, so
    /// callers verify immediately before activating it rather than once
    /// at start-up.
    pub fn verify(&self) -> Result<(), MediaError> {
        for path in [&self.image, &self.video] {
            if !path.exists() {
                return Err(MediaError::Missing { path: path.clone() });
            }
        }
        Ok(())
    }
}

/// Outcome of one rotation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The active theme changed
    Rotated { from: String, to: String },
    /// Only one theme is configured; nothing to rotate to
    SoleTheme,
    /// The candidate's media is missing; the previous theme stays
    MissingMedia { candidate: String },
}

/// Ordered collection of themes plus the active selection
///
/// The active theme is always a member of the set.
#[derive(Debug, Clone)]
pub struct ThemeSet {
    themes: Vec<Theme>,
    current: usize,
}

impl ThemeSet {
    /// Build a set with `initial` active
    ///
    /// Returns `None` when `initial` names no member, which also covers
    /// the empty set.
    pub fn new(themes: Vec<Theme>, initial: &str) -> Option<Self> {
        let current = themes.iter().position(|t| t.name() == initial)?;
        Some(Self { themes, current })
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// The active theme
    pub fn current(&self) -> &Theme {
        &self.themes[self.current]
    }

    /// Try to activate a different theme, chosen at random
    ///
    /// Candidates are the members other than the active theme, so
    /// rotation never re-selects the current one. A candidate with
    /// missing media is rejected and the previous theme stays active;
    /// the system never ends up on a theme that cannot play.
    pub fn rotate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RotationOutcome {
        if self.themes.len() < 2 {
            return RotationOutcome::SoleTheme;
        }

        let candidates: Vec<usize> = (0..self.themes.len())
            .filter(|&i| i != self.current)
            .collect();
        let pick = candidates[rng.gen_range(0..candidates.len())];
        let candidate = &self.themes[pick];

        match candidate.verify() {
            Ok(()) => {
                let from = self.current().name().to_string();
                self.current = pick;
                RotationOutcome::Rotated {
                    from,
                    to: self.current().name().to_string(),
                }
            }
            Err(_) => RotationOutcome::MissingMedia {
                candidate: candidate.name().to_string(),
            },
        }
    }
}

/// Single hand-off point between the rotator and the orchestrator
///
/// Readers clone the active theme inside one critical section and the
/// rotator replaces the selection inside one critical section, so a
/// half-updated theme (image swapped, video not) cannot be observed.
/// Nothing but the candidate existence check runs under the lock.
#[derive(Debug, Clone)]
pub struct SharedThemes {
    inner: Arc<Mutex<ThemeSet>>,
}

impl SharedThemes {
    pub fn new(set: ThemeSet) -> Self {
        Self {
            inner: Arc::new(Mutex::new(set)),
        }
    }

    /// Clone of the active theme
    pub fn current(&self) -> Theme {
        self.lock().current().clone()
    }

    /// Rotate the active theme; see [`ThemeSet::rotate`]
    pub fn rotate<R: Rng + ?Sized>(&self, rng: &mut R) -> RotationOutcome {
        self.lock().rotate(rng)
    }

    // The selection is a single index store, so a panic on another
    // thread cannot leave the set torn; recovering from poison is safe.
    fn lock(&self) -> MutexGuard<'_, ThemeSet> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
