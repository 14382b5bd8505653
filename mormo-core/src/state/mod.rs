//! State machine for the scare cycle
//!
//! Defines the authoritative runtime behavior of the sequencer.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::ScareState;
