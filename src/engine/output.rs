//! Output backends the engine renders through

use super::context::{Graph, SharedGraph};
use super::EngineError;
use crate::config::AudioConfig;

/// Something that can carry a [`Graph`] to a listener
///
/// `open` must leave the output paused: the context starts suspended and
/// only [`OutputBackend::resume`] begins pulling samples.
pub trait OutputBackend {
    /// Build the output path and the graph it renders from
    fn open(&mut self, audio: &AudioConfig, master_gain: f64) -> Result<SharedGraph, EngineError>;

    /// Start (or restart) pulling samples from the graph
    fn resume(&mut self) -> Result<(), EngineError>;
}

/// Backend with no device behind it
///
/// The caller drives time by rendering the shared graph directly, which is
/// how headless tools and tests observe the engine.
#[derive(Debug, Default)]
pub struct OfflineOutput {
    graph: Option<SharedGraph>,
    fail_open: Option<String>,
}

impl OfflineOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `open` always fails, as when no audio subsystem exists
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            fail_open: Some(reason.into()),
            ..Self::default()
        }
    }
}

impl OutputBackend for OfflineOutput {
    fn open(&mut self, audio: &AudioConfig, master_gain: f64) -> Result<SharedGraph, EngineError> {
        if let Some(reason) = &self.fail_open {
            return Err(EngineError::Unavailable(reason.clone()));
        }
        let graph = Graph::new(audio.sample_rate as f64, master_gain).shared();
        self.graph = Some(graph.clone());
        Ok(graph)
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        if self.graph.is_none() {
            return Err(EngineError::NotOpen);
        }
        Ok(())
    }
}
