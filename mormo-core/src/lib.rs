//! Hardware-agnostic core logic for the Mormo scare sequencer
//!
//! This crate contains all application logic that does not depend on
//! GPIO hardware or spawned child processes:
//!
//! - Abstraction traits (motion sensor, media backend)
//! - State machine for the scare cycle
//! - Theme set and rotation selection
//! - Reaction-capture bookkeeping
//! - Edge detection / debouncing
//! - Configuration type definitions

#![deny(unsafe_code)]

pub mod config;
pub mod media;
pub mod motion;
pub mod shutdown;
pub mod state;
pub mod theme;
pub mod traits;
