//! Errors raised inside the voice engine

use thiserror::Error;

/// Failures the engine absorbs and logs rather than surfacing to triggers
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no output device available")]
    NoDevice,

    #[error("output device '{0}' not found")]
    DeviceNotFound(String),

    #[error("failed to list output devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query output config: {0}")]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to resume output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("audio output is not open")]
    NotOpen,

    #[error("audio subsystem unavailable: {0}")]
    Unavailable(String),

    #[error("invalid chord: {0}")]
    InvalidChord(String),
}
