//! Chordpad - Call-and-response chord pad for ear training
//!
//! Pressing a button half sounds a sustained chord; releasing lets it decay
//! naturally. The voice engine keeps exactly one live chord per sound
//! identity and shapes every note with a click-free attack and release.

pub mod chords;
pub mod config;
pub mod engine;
pub mod synth;
pub mod ui;

pub use config::ChordpadConfig;
pub use engine::{SoundId, VoiceEngine};
