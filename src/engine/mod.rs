//! Voice engine for Chordpad
//!
//! Owns the audio context and the table of live voice groups. Triggers call
//! [`VoiceEngine::start`] and [`VoiceEngine::stop`] with a [`SoundId`]; the
//! engine schedules attack and release envelopes against the context clock
//! and hands the voices to the render graph, which plays them out on its own.

mod context;
mod error;
mod output;
mod player;
mod table;

pub use context::{AudioContext, ContextState, Graph, MasterBus, SharedGraph};
pub use error::EngineError;
pub use output::{OfflineOutput, OutputBackend};
pub use player::{default_device_name, list_output_devices, CpalPlayer};
pub use table::{SoundId, VoiceGroup};

use std::collections::HashMap;

use crate::config::{AudioConfig, ChordpadConfig, VoiceConfig};
use crate::synth::{Envelope, Voice, VoiceId};

/// Where the engine is in its audio lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No context has been built yet
    Uninitialized,
    /// Context built, waiting for an unlock gesture
    Suspended,
    /// Context is rendering to the output
    Running,
    /// The audio subsystem could not be opened; every call is a no-op
    Unavailable,
}

enum Lifecycle {
    Uninitialized,
    Unavailable,
    Open(AudioContext),
}

/// The voice engine
pub struct VoiceEngine {
    audio: AudioConfig,
    voice: VoiceConfig,
    envelope: Envelope,
    backend: Box<dyn OutputBackend>,
    lifecycle: Lifecycle,
    active: HashMap<SoundId, VoiceGroup>,
}

impl VoiceEngine {
    /// Create an engine rendering through `backend`
    ///
    /// Nothing is opened until the first `start` or `unlock_audio`.
    pub fn new(config: &ChordpadConfig, backend: Box<dyn OutputBackend>) -> Self {
        Self {
            audio: config.audio.clone(),
            voice: config.voice,
            envelope: config.voice.envelope(),
            backend,
            lifecycle: Lifecycle::Uninitialized,
            active: HashMap::new(),
        }
    }

    /// Create an engine that plays through the configured cpal device
    pub fn with_device(config: &ChordpadConfig) -> Self {
        Self::new(config, Box::new(CpalPlayer::new()))
    }

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        match &self.lifecycle {
            Lifecycle::Uninitialized => EngineState::Uninitialized,
            Lifecycle::Unavailable => EngineState::Unavailable,
            Lifecycle::Open(ctx) => match ctx.state() {
                ContextState::Suspended => EngineState::Suspended,
                ContextState::Running => EngineState::Running,
            },
        }
    }

    /// Voice tunables in effect
    pub fn voice_config(&self) -> &VoiceConfig {
        &self.voice
    }

    /// Build the context if needed and resume it if suspended
    ///
    /// Safe to call on every trigger. The returned state is the completion
    /// signal: once it reads [`EngineState::Running`], started sounds are
    /// audible. A failed resume is logged and retried on the next call.
    pub fn unlock_audio(&mut self) -> EngineState {
        self.ensure_context();

        if let Lifecycle::Open(ctx) = &mut self.lifecycle {
            if ctx.state() == ContextState::Suspended {
                match self.backend.resume() {
                    Ok(()) => {
                        ctx.set_state(ContextState::Running);
                        log::info!("audio context running");
                    }
                    Err(e) => log::debug!("audio context still suspended: {}", e),
                }
            }
        }

        self.state()
    }

    /// Start sounding `frequencies` as one chord under `id`
    ///
    /// A no-op if `id` is already live, if the chord is invalid, or if audio
    /// is unavailable.
    pub fn start(&mut self, id: impl Into<SoundId>, frequencies: &[f64]) {
        let id = id.into();

        if let Err(e) = validate_chord(frequencies) {
            log::warn!("ignoring start for '{}': {}", id, e);
            return;
        }

        self.ensure_context();
        let Lifecycle::Open(ctx) = &mut self.lifecycle else {
            return;
        };

        if self.active.contains_key(&id) {
            log::trace!("'{}' already sounding", id);
            return;
        }

        // Equal share per note keeps chords of any size at similar loudness
        let peak = 1.0 / frequencies.len() as f64;
        let ids: Vec<VoiceId> = frequencies.iter().map(|_| ctx.next_voice_id()).collect();

        let mut graph = ctx.lock();
        graph.reclaim_finished();
        let now = graph.current_time();
        let sample_rate = graph.sample_rate();
        for (&voice_id, &frequency) in ids.iter().zip(frequencies) {
            graph.add_voice(Voice::start(
                voice_id,
                self.voice.waveform,
                frequency,
                sample_rate,
                &self.envelope,
                now,
                peak,
            ));
        }
        drop(graph);

        log::debug!("start '{}': {} voices at t={:.3}", id, ids.len(), now);
        self.active.insert(id, VoiceGroup::new(ids, now));
    }

    /// Release the chord sounding under `id`
    ///
    /// The id is free for reuse as soon as this returns; the released voices
    /// keep fading in the graph until their scheduled halt.
    pub fn stop(&mut self, id: impl AsRef<str>) {
        let id = id.as_ref();
        let Some(group) = self.active.remove(id) else {
            return;
        };
        let Lifecycle::Open(ctx) = &self.lifecycle else {
            return;
        };

        let mut graph = ctx.lock();
        graph.reclaim_finished();
        let now = graph.current_time();
        for &voice_id in group.voices() {
            if let Some(voice) = graph.voice_mut(voice_id) {
                voice.release(&self.envelope, now);
            }
        }

        log::debug!(
            "stop '{}': {} voices at t={:.3}, held {:.3}s",
            id,
            group.voices().len(),
            now,
            now - group.started_at()
        );
    }

    /// Release every live chord
    pub fn stop_all(&mut self) {
        let ids: Vec<SoundId> = self.active.keys().cloned().collect();
        for id in ids {
            self.stop(&id);
        }
    }

    /// Whether `id` has a live (not yet stopped) voice group
    pub fn is_active(&self, id: impl AsRef<str>) -> bool {
        self.active.contains_key(id.as_ref())
    }

    /// Number of live voice groups
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// The live voice group for `id`
    pub fn group(&self, id: impl AsRef<str>) -> Option<&VoiceGroup> {
        self.active.get(id.as_ref())
    }

    /// The render graph, once a context exists
    pub fn graph(&self) -> Option<SharedGraph> {
        match &self.lifecycle {
            Lifecycle::Open(ctx) => Some(ctx.graph()),
            _ => None,
        }
    }

    fn ensure_context(&mut self) {
        if !matches!(self.lifecycle, Lifecycle::Uninitialized) {
            return;
        }

        self.lifecycle = match self.backend.open(&self.audio, self.voice.master_gain) {
            Ok(graph) => {
                log::info!("audio context created (suspended)");
                Lifecycle::Open(AudioContext::new(graph))
            }
            Err(e) => {
                log::warn!("audio unavailable, continuing silently: {}", e);
                Lifecycle::Unavailable
            }
        };
    }
}

fn validate_chord(frequencies: &[f64]) -> Result<(), EngineError> {
    if frequencies.is_empty() {
        return Err(EngineError::InvalidChord("no frequencies".to_string()));
    }
    if let Some(bad) = frequencies.iter().find(|f| !f.is_finite() || **f <= 0.0) {
        return Err(EngineError::InvalidChord(format!(
            "frequency {} Hz is not positive",
            bad
        )));
    }
    Ok(())
}
