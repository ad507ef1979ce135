//! Sample-accurate parameter automation
//!
//! An [`AudioParam`] holds a timeline of automation events expressed in
//! absolute context time (seconds). The control side schedules events
//! ahead of time; the render side only ever asks for [`AudioParam::value_at`].

/// How the value travels to an event's target
#[derive(Debug, Clone, Copy, PartialEq)]
enum Curve {
    /// Jump to the value at the event time
    Set,
    /// Straight line from the previous event
    Linear,
    /// Constant-ratio curve from the previous event
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Event {
    time: f64,
    value: f64,
    curve: Curve,
}

/// An automatable value such as a voice's gain
#[derive(Debug, Clone)]
pub struct AudioParam {
    default_value: f64,
    events: Vec<Event>,
}

impl AudioParam {
    /// Create a parameter that holds `default_value` until automated
    pub fn new(default_value: f64) -> Self {
        Self {
            default_value,
            events: Vec::new(),
        }
    }

    /// Jump to `value` at `time`
    pub fn set_value_at_time(&mut self, value: f64, time: f64) {
        self.insert(Event {
            time,
            value,
            curve: Curve::Set,
        });
    }

    /// Ramp linearly from the previous event, reaching `value` at `time`
    pub fn linear_ramp_to_value_at_time(&mut self, value: f64, time: f64) {
        self.insert(Event {
            time,
            value,
            curve: Curve::Linear,
        });
    }

    /// Ramp exponentially from the previous event, reaching `value` at `time`
    ///
    /// An exponential curve cannot pass through zero: if either end is zero
    /// or the ends differ in sign, the start value holds until `time`.
    pub fn exponential_ramp_to_value_at_time(&mut self, value: f64, time: f64) {
        self.insert(Event {
            time,
            value,
            curve: Curve::Exponential,
        });
    }

    /// Drop every event scheduled at or after `time`
    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|e| e.time < time);
    }

    /// Number of pending automation events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// The value the parameter takes at `time`
    pub fn value_at(&self, time: f64) -> f64 {
        // Index of the first event strictly after `time`
        let next = self.events.partition_point(|e| e.time <= time);

        let (start_time, start_value) = match next.checked_sub(1) {
            Some(i) => (self.events[i].time, self.events[i].value),
            None => (0.0, self.default_value),
        };

        let Some(upcoming) = self.events.get(next) else {
            return start_value;
        };

        match upcoming.curve {
            Curve::Set => start_value,
            Curve::Linear => {
                let span = upcoming.time - start_time;
                if span <= 0.0 {
                    return upcoming.value;
                }
                let progress = (time - start_time) / span;
                start_value + (upcoming.value - start_value) * progress
            }
            Curve::Exponential => {
                let span = upcoming.time - start_time;
                if span <= 0.0 {
                    return upcoming.value;
                }
                if start_value * upcoming.value <= 0.0 {
                    return start_value;
                }
                let progress = (time - start_time) / span;
                start_value * (upcoming.value / start_value).powf(progress)
            }
        }
    }

    fn insert(&mut self, event: Event) {
        let at = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(at, event);
    }
}

impl Default for AudioParam {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_holds() {
        let param = AudioParam::new(0.7);
        assert_eq!(param.value_at(0.0), 0.7);
        assert_eq!(param.value_at(10.0), 0.7);
    }

    #[test]
    fn test_set_value_steps() {
        let mut param = AudioParam::new(1.0);
        param.set_value_at_time(0.25, 2.0);

        assert_eq!(param.value_at(1.999), 1.0);
        assert_eq!(param.value_at(2.0), 0.25);
        assert_eq!(param.value_at(5.0), 0.25);
    }

    #[test]
    fn test_linear_ramp() {
        let mut param = AudioParam::new(1.0);
        param.set_value_at_time(0.0, 1.0);
        param.linear_ramp_to_value_at_time(0.5, 1.1);

        assert_eq!(param.value_at(1.0), 0.0);
        assert!((param.value_at(1.05) - 0.25).abs() < 1e-9);
        assert_eq!(param.value_at(1.1), 0.5);
        assert_eq!(param.value_at(3.0), 0.5);
    }

    #[test]
    fn test_exponential_ramp() {
        let mut param = AudioParam::new(1.0);
        param.set_value_at_time(1.0, 0.0);
        param.exponential_ramp_to_value_at_time(0.01, 2.0);

        // Halfway through a constant-ratio curve is the geometric mean
        assert!((param.value_at(1.0) - 0.1).abs() < 1e-9);
        assert!((param.value_at(2.0) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_ramp_from_zero_holds() {
        let mut param = AudioParam::new(1.0);
        param.set_value_at_time(0.0, 0.0);
        param.exponential_ramp_to_value_at_time(0.001, 1.0);

        assert_eq!(param.value_at(0.5), 0.0);
        assert_eq!(param.value_at(1.0), 0.001);
    }

    #[test]
    fn test_cancel_scheduled_values() {
        let mut param = AudioParam::new(1.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 1.0);
        param.set_value_at_time(0.2, 2.0);

        param.cancel_scheduled_values(1.0);

        assert_eq!(param.event_count(), 1);
        assert_eq!(param.value_at(0.5), 0.0);
        assert_eq!(param.value_at(3.0), 0.0);
    }

    #[test]
    fn test_same_time_events_keep_insertion_order() {
        let mut param = AudioParam::new(1.0);
        param.set_value_at_time(0.3, 1.0);
        param.set_value_at_time(0.6, 1.0);

        assert_eq!(param.value_at(1.0), 0.6);
    }
}
