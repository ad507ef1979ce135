//! Synthesis building blocks
//!
//! Oscillators, parameter automation, envelopes and the voice that ties them together.

mod envelope;
mod oscillator;
mod param;
mod voice;

pub use envelope::{Envelope, EnvelopeStage};
pub use oscillator::{Oscillator, Waveform};
pub use param::AudioParam;
pub use voice::{Voice, VoiceId};
