//! Audio context: the render graph, its clock and the master bus
//!
//! The [`Graph`] is shared between the control side (which schedules voices)
//! and the output callback (which renders them). Every voice ever started
//! lives here until the control side reclaims it after its scheduled halt,
//! whether or not the engine's active table still refers to it. The output
//! callback only renders, so voice storage is never freed on the audio thread.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::synth::{Voice, VoiceId};

/// Graph handle shared with the output callback
pub type SharedGraph = Arc<Mutex<Graph>>;

/// Power state of an open context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Built but not rendering; the clock is frozen
    Suspended,
    /// Output device is pulling samples
    Running,
}

/// Single shared amplitude stage in front of the output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterBus {
    gain: f64,
}

impl MasterBus {
    pub fn new(gain: f64) -> Self {
        Self { gain }
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }
}

/// Every sounding voice plus the sample clock they are scheduled against
#[derive(Debug)]
pub struct Graph {
    sample_rate: f64,
    frame: u64,
    master: MasterBus,
    voices: Vec<Voice>,
}

impl Graph {
    /// Create an empty graph
    pub fn new(sample_rate: f64, master_gain: f64) -> Self {
        Self {
            sample_rate,
            frame: 0,
            master: MasterBus::new(master_gain),
            voices: Vec::new(),
        }
    }

    /// Wrap the graph for sharing with an output callback
    pub fn shared(self) -> SharedGraph {
        Arc::new(Mutex::new(self))
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn master(&self) -> MasterBus {
        self.master
    }

    /// Context time in seconds: frames rendered so far over the sample rate
    pub fn current_time(&self) -> f64 {
        self.frame as f64 / self.sample_rate
    }

    /// Connect a voice to the master bus
    pub fn add_voice(&mut self, voice: Voice) {
        self.voices.push(voice);
    }

    pub fn voice(&self, id: VoiceId) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id() == id)
    }

    pub fn voice_mut(&mut self, id: VoiceId) -> Option<&mut Voice> {
        self.voices.iter_mut().find(|v| v.id() == id)
    }

    /// Number of voices still held by the graph, including releasing ones
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Render one frame and advance the clock
    pub fn process(&mut self) -> f64 {
        let t = self.current_time();
        let mut output = 0.0;

        for voice in &mut self.voices {
            output += voice.process(t);
        }

        self.frame += 1;
        output * self.master.gain()
    }

    /// Fill a mono buffer with rendered frames
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process() as f32;
        }
    }

    /// Render and discard `seconds` of audio, then reclaim halted voices
    pub fn advance(&mut self, seconds: f64) {
        let frames = (seconds * self.sample_rate).round() as u64;
        for _ in 0..frames {
            self.process();
        }
        self.reclaim_finished();
    }

    /// Drop voices whose scheduled halt has passed
    ///
    /// Returns how many were removed.
    pub fn reclaim_finished(&mut self) -> usize {
        let now = self.current_time();
        let before = self.voices.len();
        self.voices.retain(|v| !v.is_finished(now));
        before - self.voices.len()
    }
}

/// An open audio context
#[derive(Debug)]
pub struct AudioContext {
    graph: SharedGraph,
    state: ContextState,
    next_voice: u64,
}

impl AudioContext {
    /// Wrap a freshly opened graph; contexts always start suspended
    pub fn new(graph: SharedGraph) -> Self {
        Self {
            graph,
            state: ContextState::Suspended,
            next_voice: 0,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ContextState) {
        self.state = state;
    }

    /// Clone of the shared graph handle
    pub fn graph(&self) -> SharedGraph {
        Arc::clone(&self.graph)
    }

    /// Lock the graph for scheduling
    ///
    /// A poisoned lock only means the render callback panicked mid-block;
    /// the voice list itself is still consistent.
    pub fn lock(&self) -> MutexGuard<'_, Graph> {
        self.graph.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Allocate a fresh voice id
    pub fn next_voice_id(&mut self) -> VoiceId {
        let id = VoiceId(self.next_voice);
        self.next_voice += 1;
        id
    }
}
