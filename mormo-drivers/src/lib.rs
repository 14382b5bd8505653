//! Sensor and process adapters
//!
//! This crate provides the concrete implementations of the traits
//! defined in mormo-core:
//!
//! - PIR motion sensor on a GPIO line (rppal)
//! - Simulated motion sensor with an injectable trigger
//! - Polling motion reader (blocking wait and channel mode)
//! - Process-backed media backend (viewer, player, recorder)

#![deny(unsafe_code)]

pub mod media;
pub mod pir;
pub mod reader;
pub mod sim;
