//! Real-time audio output using cpal

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, SampleFormat, Stream, StreamConfig};

use super::context::{Graph, SharedGraph};
use super::output::OutputBackend;
use super::EngineError;
use crate::config::AudioConfig;

/// Output backend that renders the graph to a cpal device
#[derive(Default)]
pub struct CpalPlayer {
    stream: Option<Stream>,
}

impl CpalPlayer {
    pub fn new() -> Self {
        Self::default()
    }

}

impl OutputBackend for CpalPlayer {
    fn open(&mut self, audio: &AudioConfig, master_gain: f64) -> Result<SharedGraph, EngineError> {
        let host = cpal::default_host();
        let device = select_device(&host, audio.device.as_deref())?;

        let config = device.default_output_config()?;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        let graph = Graph::new(stream_config.sample_rate.0 as f64, master_gain).shared();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, graph.clone())?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, graph.clone())?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, graph.clone())?,
            other => return Err(EngineError::UnsupportedFormat(other)),
        };

        // Some hosts start streams as soon as they are built
        if let Err(e) = stream.pause() {
            log::debug!("could not pause new stream: {}", e);
        }

        log::info!(
            "opened output '{}' at {} Hz, {} channels",
            device.name().unwrap_or_default(),
            stream_config.sample_rate.0,
            stream_config.channels
        );

        self.stream = Some(stream);
        Ok(graph)
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        let stream = self.stream.as_ref().ok_or(EngineError::NotOpen)?;
        stream.play()?;
        Ok(())
    }
}

fn select_device(host: &Host, name: Option<&str>) -> Result<Device, EngineError> {
    match name {
        None => host.default_output_device().ok_or(EngineError::NoDevice),
        Some(name) => host
            .output_devices()?
            .find(|d| d.name().is_ok_and(|n| n == name))
            .ok_or_else(|| EngineError::DeviceNotFound(name.to_string())),
    }
}

fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
    device: &Device,
    config: &StreamConfig,
    graph: SharedGraph,
) -> Result<Stream, EngineError> {
    let channels = config.channels as usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            render_block(&graph, data, channels);
        },
        |err| {
            log::error!("audio stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}

/// Render one interleaved device block, copying the mono mix to every channel
///
/// Blocks on the graph lock so the clock never falls behind the device.
/// Halted voices are left for the control side to reclaim.
fn render_block<T: cpal::Sample + cpal::FromSample<f32>>(
    graph: &SharedGraph,
    data: &mut [T],
    channels: usize,
) {
    let mut graph = graph.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for frame in data.chunks_mut(channels) {
        let sample = T::from_sample(graph.process() as f32);
        for channel_sample in frame.iter_mut() {
            *channel_sample = sample;
        }
    }
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// List all available output devices
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
