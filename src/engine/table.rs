//! Sound identities and the voice groups the engine tracks for them

use std::borrow::Borrow;
use std::fmt;

use crate::synth::VoiceId;

/// Key for one independently triggerable sound
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(String);

impl SoundId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SoundId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SoundId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&SoundId> for SoundId {
    fn from(id: &SoundId) -> Self {
        id.clone()
    }
}

impl From<&str> for SoundId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SoundId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The voices started together for one live sound
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceGroup {
    voices: Vec<VoiceId>,
    started_at: f64,
}

impl VoiceGroup {
    pub fn new(voices: Vec<VoiceId>, started_at: f64) -> Self {
        Self { voices, started_at }
    }

    /// Voices in chord order
    pub fn voices(&self) -> &[VoiceId] {
        &self.voices
    }

    /// Context time the group was started at
    pub fn started_at(&self) -> f64 {
        self.started_at
    }
}
