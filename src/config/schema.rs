//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::synth::{Envelope, Waveform};

/// Main configuration for Chordpad
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChordpadConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Voice engine tunables
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl ChordpadConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }

        let voice = &self.voice;
        for (name, value) in [
            ("Master gain", voice.master_gain),
            ("Attack time", voice.attack),
            ("Release time", voice.release),
            ("Release floor", voice.release_floor),
            ("Halt margin", voice.halt_margin),
        ] {
            if !value.is_finite() {
                bail!("{} must be a finite number", name);
            }
        }

        if !(0.0..=1.0).contains(&voice.master_gain) {
            bail!("Master gain must be between 0.0 and 1.0");
        }
        if voice.attack <= 0.0 {
            bail!("Attack time must be greater than zero");
        }
        if voice.release <= 0.0 {
            bail!("Release time must be greater than zero");
        }
        if voice.release_floor <= 0.0 || voice.release_floor >= 1.0 {
            bail!("Release floor must be between 0.0 and 1.0 (exclusive)");
        }
        if voice.halt_margin < 0.0 {
            bail!("Halt margin must not be negative");
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,

    /// Sample rate in Hz for offline rendering (default: 44100)
    ///
    /// Device output always runs at the device's own rate.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: default_sample_rate(),
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }

/// Voice engine tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Fixed attenuation of the master bus (default: 0.4)
    #[serde(default = "default_master_gain")]
    pub master_gain: f64,

    /// Attack time in seconds (default: 0.05)
    #[serde(default = "default_attack")]
    pub attack: f64,

    /// Release time in seconds (default: 1.5)
    #[serde(default = "default_release")]
    pub release: f64,

    /// Level the release decays to (default: 0.001)
    #[serde(default = "default_release_floor")]
    pub release_floor: f64,

    /// Extra time a generator runs after its release, in seconds (default: 0.1)
    #[serde(default = "default_halt_margin")]
    pub halt_margin: f64,

    /// Oscillator shape (default: triangle)
    #[serde(default)]
    pub waveform: Waveform,
}

impl VoiceConfig {
    /// The attack/release envelope these tunables describe
    pub fn envelope(&self) -> Envelope {
        Envelope::new(self.attack, self.release, self.release_floor, self.halt_margin)
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            master_gain: default_master_gain(),
            attack: default_attack(),
            release: default_release(),
            release_floor: default_release_floor(),
            halt_margin: default_halt_margin(),
            waveform: Waveform::default(),
        }
    }
}

fn default_master_gain() -> f64 { 0.4 }
fn default_attack() -> f64 { 0.05 }
fn default_release() -> f64 { 1.5 }
fn default_release_floor() -> f64 { 0.001 }
fn default_halt_margin() -> f64 { 0.1 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_audio_config() {
        let yaml = "device: Speakers";
        let config: AudioConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.device.as_deref(), Some("Speakers"));
        assert_eq!(config.sample_rate, 44100); // default
    }

    #[test]
    fn test_voice_config_defaults() {
        let config: VoiceConfig = serde_yaml::from_str("attack: 0.1").unwrap();
        assert_eq!(config.attack, 0.1);
        assert_eq!(config.master_gain, 0.4);
        assert_eq!(config.release, 1.5);
        assert_eq!(config.release_floor, 0.001);
        assert_eq!(config.halt_margin, 0.1);
        assert_eq!(config.waveform, Waveform::Triangle);
    }

    #[test]
    fn test_voice_config_envelope() {
        let config = VoiceConfig::default();
        let env = config.envelope();
        assert_eq!(env.attack(), 0.05);
        assert_eq!(env.release(), 1.5);
    }

    #[test]
    fn test_config_validation() {
        let config = ChordpadConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_master_gain() {
        let mut config = ChordpadConfig::default();
        config.voice.master_gain = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_release_floor() {
        let mut config = ChordpadConfig::default();
        config.voice.release_floor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_sample_rate() {
        let mut config = ChordpadConfig::default();
        config.audio.sample_rate = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_non_finite_tunables() {
        let cases: [fn(&mut VoiceConfig); 6] = [
            |v: &mut VoiceConfig| v.master_gain = f64::NAN,
            |v: &mut VoiceConfig| v.attack = f64::NAN,
            |v: &mut VoiceConfig| v.release = f64::NAN,
            |v: &mut VoiceConfig| v.release = f64::INFINITY,
            |v: &mut VoiceConfig| v.release_floor = f64::NAN,
            |v: &mut VoiceConfig| v.halt_margin = f64::INFINITY,
        ];

        for set in cases {
            let mut config = ChordpadConfig::default();
            set(&mut config.voice);
            assert!(config.validate().is_err(), "accepted {:?}", config.voice);
        }
    }

    #[test]
    fn test_non_finite_yaml_rejected() {
        let yaml = "voice:\n  release: .nan\n  attack: .inf\n  halt_margin: .nan\n";
        let config: ChordpadConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.voice.release.is_nan());
        assert!(config.validate().is_err());
    }
}
