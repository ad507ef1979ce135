//! Attack/release envelope scheduling
//!
//! Rather than stepping a state machine per sample, the envelope writes
//! absolute-time automation onto a voice's gain [`AudioParam`] at the moment
//! a chord is started or stopped. The render side then follows the schedule
//! without further involvement from the control side.

use super::AudioParam;

/// Where a voice is along its amplitude arc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Ramping linearly up to its share of the chord
    Attack,
    /// Holding the attack target until stopped
    Sustain,
    /// Decaying exponentially toward the floor
    Release,
    /// Halted; waiting to be reclaimed
    Silent,
}

/// Attack/release envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    attack: f64,
    release: f64,
    floor: f64,
    halt_margin: f64,
}

impl Envelope {
    /// Create an envelope
    ///
    /// # Arguments
    /// * `attack` - Linear fade-in time in seconds
    /// * `release` - Exponential fade-out time in seconds
    /// * `floor` - Level the release decays to, just above zero
    /// * `halt_margin` - How long the generator outlives the release, in seconds
    pub fn new(attack: f64, release: f64, floor: f64, halt_margin: f64) -> Self {
        Self {
            attack: attack.max(0.001),
            release: release.max(0.001),
            floor: floor.max(f64::MIN_POSITIVE),
            halt_margin: halt_margin.max(0.0),
        }
    }

    pub fn attack(&self) -> f64 {
        self.attack
    }

    pub fn release(&self) -> f64 {
        self.release
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn halt_margin(&self) -> f64 {
        self.halt_margin
    }

    /// Schedule a fade-in from silence at `now` to `peak`
    pub fn schedule_attack(&self, gain: &mut AudioParam, now: f64, peak: f64) {
        gain.set_value_at_time(0.0, now);
        gain.linear_ramp_to_value_at_time(peak, now + self.attack);
    }

    /// Schedule a fade-out starting from wherever the gain actually is at `now`
    ///
    /// Returns the captured starting level.
    pub fn schedule_release(&self, gain: &mut AudioParam, now: f64) -> f64 {
        // Read before cancelling: an in-flight attack ramp must be sampled, not dropped
        let level = gain.value_at(now);
        gain.cancel_scheduled_values(now);
        gain.set_value_at_time(level, now);
        gain.exponential_ramp_to_value_at_time(self.floor, now + self.release);
        level
    }

    /// When a generator released at `now` should halt
    pub fn halt_time(&self, now: f64) -> f64 {
        now + self.release + self.halt_margin
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(0.05, 1.5, 0.001, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_defaults() {
        let env = Envelope::default();
        assert_eq!(env.attack(), 0.05);
        assert_eq!(env.release(), 1.5);
        assert_eq!(env.floor(), 0.001);
        assert_eq!(env.halt_margin(), 0.1);
    }

    #[test]
    fn test_attack_ramps_linearly() {
        let env = Envelope::default();
        let mut gain = AudioParam::default();
        env.schedule_attack(&mut gain, 1.0, 0.5);

        assert_eq!(gain.value_at(1.0), 0.0);
        assert!((gain.value_at(1.025) - 0.25).abs() < 1e-6);
        assert!((gain.value_at(1.05) - 0.5).abs() < 1e-9);
        assert!((gain.value_at(10.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_release_after_sustain() {
        let env = Envelope::default();
        let mut gain = AudioParam::default();
        env.schedule_attack(&mut gain, 0.0, 1.0 / 3.0);

        let level = env.schedule_release(&mut gain, 2.0);

        assert!((level - 1.0 / 3.0).abs() < 1e-9);
        assert!((gain.value_at(2.0) - 1.0 / 3.0).abs() < 1e-9);
        assert!((gain.value_at(3.5) - 0.001).abs() < 1e-9);
        // Exponential: strictly decreasing, never below the floor
        assert!(gain.value_at(2.75) < level);
        assert!(gain.value_at(2.75) > 0.001);
    }

    #[test]
    fn test_release_mid_attack_starts_from_actual_level() {
        let env = Envelope::default();
        let mut gain = AudioParam::default();
        env.schedule_attack(&mut gain, 0.0, 1.0);

        let level = env.schedule_release(&mut gain, 0.02);

        assert!((level - 0.4).abs() < 1e-6);
        assert!((gain.value_at(0.02) - 0.4).abs() < 1e-6);
        // The cancelled attack no longer pulls the gain upward
        assert!(gain.value_at(0.05) < 0.4);
    }

    #[test]
    fn test_halt_time() {
        let env = Envelope::default();
        assert!((env.halt_time(2.0) - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_parameters_are_clamped() {
        let env = Envelope::new(0.0, -1.0, 0.0, -0.5);
        assert_eq!(env.attack(), 0.001);
        assert_eq!(env.release(), 0.001);
        assert!(env.floor() > 0.0);
        assert_eq!(env.halt_margin(), 0.0);
    }
}
