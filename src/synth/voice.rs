//! A single sounding tone: one oscillator feeding one gain stage

use super::{AudioParam, Envelope, EnvelopeStage, Oscillator, Waveform};

/// Identifies a voice inside the render graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

/// Oscillator + gain pair
#[derive(Debug, Clone)]
pub struct Voice {
    id: VoiceId,
    oscillator: Oscillator,
    gain: AudioParam,
    started_at: f64,
    attack_ends_at: f64,
    released_at: Option<f64>,
    halt_at: Option<f64>,
}

impl Voice {
    /// Create a voice that starts sounding at `now`, fading in to `peak`
    pub fn start(
        id: VoiceId,
        waveform: Waveform,
        frequency: f64,
        sample_rate: f64,
        envelope: &Envelope,
        now: f64,
        peak: f64,
    ) -> Self {
        let mut gain = AudioParam::default();
        envelope.schedule_attack(&mut gain, now, peak);

        Self {
            id,
            oscillator: Oscillator::new(waveform, frequency, sample_rate),
            gain,
            started_at: now,
            attack_ends_at: now + envelope.attack(),
            released_at: None,
            halt_at: None,
        }
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    /// The gain automation driving this voice
    pub fn gain(&self) -> &AudioParam {
        &self.gain
    }

    /// When the generator halts, if a release has been scheduled
    pub fn halt_at(&self) -> Option<f64> {
        self.halt_at
    }

    /// Fade out from the current level at `now` and halt after the tail
    ///
    /// Returns the level the release starts from. Releasing twice is a no-op
    /// that reports the level at `now`.
    pub fn release(&mut self, envelope: &Envelope, now: f64) -> f64 {
        if self.released_at.is_some() {
            return self.gain.value_at(now);
        }
        let level = envelope.schedule_release(&mut self.gain, now);
        self.released_at = Some(now);
        self.halt_at = Some(envelope.halt_time(now));
        level
    }

    /// Envelope stage at time `t`
    pub fn stage(&self, t: f64) -> EnvelopeStage {
        if self.is_finished(t) {
            EnvelopeStage::Silent
        } else if self.released_at.is_some() {
            EnvelopeStage::Release
        } else if t < self.attack_ends_at {
            EnvelopeStage::Attack
        } else {
            EnvelopeStage::Sustain
        }
    }

    /// True once the generator has passed its scheduled halt
    pub fn is_finished(&self, t: f64) -> bool {
        self.halt_at.is_some_and(|halt| t >= halt)
    }

    /// Render the sample for time `t`
    pub fn process(&mut self, t: f64) -> f64 {
        if t < self.started_at || self.is_finished(t) {
            return 0.0;
        }
        self.oscillator.generate() * self.gain.value_at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice_at(now: f64) -> Voice {
        Voice::start(
            VoiceId(1),
            Waveform::Square,
            100.0,
            1000.0,
            &Envelope::default(),
            now,
            0.5,
        )
    }

    #[test]
    fn test_voice_stages() {
        let env = Envelope::default();
        let mut voice = voice_at(0.0);

        assert_eq!(voice.stage(0.0), EnvelopeStage::Attack);
        assert_eq!(voice.stage(0.06), EnvelopeStage::Sustain);

        voice.release(&env, 1.0);
        assert_eq!(voice.stage(1.0), EnvelopeStage::Release);
        assert_eq!(voice.stage(2.59), EnvelopeStage::Release);
        assert_eq!(voice.stage(2.61), EnvelopeStage::Silent);
    }

    #[test]
    fn test_voice_output_follows_gain() {
        let mut voice = voice_at(0.0);

        // Square wave starts high; gain at 0.1s is the sustained peak
        let sample = voice.process(0.1);
        assert!((sample - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_voice_silent_after_halt() {
        let env = Envelope::default();
        let mut voice = voice_at(0.0);
        voice.release(&env, 0.5);

        let halt = voice.halt_at().unwrap();
        assert!((halt - 2.1).abs() < 1e-9);
        assert!(voice.is_finished(halt));
        assert_eq!(voice.process(2.2), 0.0);
    }

    #[test]
    fn test_double_release_keeps_first_schedule() {
        let env = Envelope::default();
        let mut voice = voice_at(0.0);
        voice.release(&env, 0.5);
        voice.release(&env, 1.0);

        assert!((voice.halt_at().unwrap() - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_voice_silent_before_start() {
        let mut voice = voice_at(1.0);
        assert_eq!(voice.process(0.5), 0.0);
    }
}
