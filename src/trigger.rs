//! Schmitt Trigger
//!
//! Hysteresis edge detector: converts a continuous signal into a single
//! "just crossed" event per excursion above the high threshold.

/// Narrowest dead band; a zero-width band would chatter on a flat signal
pub const MIN_HYSTERESIS: f64 = 1e-6;

/// Latch state of a [`SchmittTrigger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    /// Disarmed: waiting for the signal to reach the high threshold
    #[default]
    Low,
    /// Armed: waiting for the signal to fall back to the low threshold
    High,
}

/// Rising-edge detector with a dead band between `low` and `high`
#[derive(Debug, Clone, Copy)]
pub struct SchmittTrigger {
    low: f64,
    high: f64,
    state: TriggerState,
}

impl SchmittTrigger {
    /// Create a trigger with the given hysteresis band
    pub fn new(low: f64, high: f64) -> Self {
        let mut trigger = Self {
            low: 0.0,
            high: 0.0,
            state: TriggerState::Low,
        };
        trigger.set_thresholds(low, high);
        trigger
    }

    /// Update the hysteresis band. A reversed band is swapped and a band
    /// narrower than [`MIN_HYSTERESIS`] is widened upward from `low`.
    pub fn set_thresholds(&mut self, low: f64, high: f64) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        self.low = low;
        self.high = if high - low >= MIN_HYSTERESIS {
            high
        } else {
            low + MIN_HYSTERESIS
        };
    }

    /// Process a sample. Returns true only on the sample that crosses
    /// from the low state to the high state.
    pub fn process(&mut self, input: f64) -> bool {
        match self.state {
            TriggerState::Low => {
                if input >= self.high {
                    self.state = TriggerState::High;
                    return true;
                }
            }
            TriggerState::High => {
                if input <= self.low {
                    self.state = TriggerState::Low;
                }
            }
        }
        false
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn is_high(&self) -> bool {
        self.state == TriggerState::High
    }

    pub fn thresholds(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    /// Return to the disarmed state
    pub fn reset(&mut self) {
        self.state = TriggerState::Low;
    }
}

impl Default for SchmittTrigger {
    fn default() -> Self {
        Self::new(0.0, 0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event_while_held_high() {
        let mut trigger = SchmittTrigger::new(0.0, 1.0);
        assert!(!trigger.process(0.0));
        assert!(trigger.process(2.0));
        let extra = (0..1000).filter(|_| trigger.process(2.0)).count();
        assert_eq!(extra, 0);
        assert!(trigger.is_high());
    }

    #[test]
    fn test_dead_band_does_not_rearm() {
        let mut trigger = SchmittTrigger::new(0.0, 1.0);
        assert!(trigger.process(1.5));
        // Dips into the band but never reaches low
        for _ in 0..10 {
            assert!(!trigger.process(0.5));
            assert!(!trigger.process(1.5));
        }
    }

    #[test]
    fn test_counts_every_full_oscillation() {
        let mut trigger = SchmittTrigger::new(0.0, 0.01);
        let n = 37;
        let mut events = 0;
        for _ in 0..n {
            if trigger.process(0.011) {
                events += 1;
            }
            if trigger.process(-0.001) {
                events += 1;
            }
        }
        assert_eq!(events, n);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let mut trigger = SchmittTrigger::new(0.0, 0.01);
        assert!(trigger.process(0.01));
        assert!(!trigger.process(0.0));
        assert_eq!(trigger.state(), TriggerState::Low);
        assert!(trigger.process(0.01));
    }

    #[test]
    fn test_trigger_pulse_back_to_zero_rearms() {
        let mut trigger = SchmittTrigger::new(0.0, 0.01);
        let pulses = [0.0, 10.0, 10.0, 0.0, 0.0, 10.0, 0.0];
        let events = pulses.iter().filter(|&&v| trigger.process(v)).count();
        assert_eq!(events, 2);
    }

    #[test]
    fn test_reversed_band_is_swapped() {
        let trigger = SchmittTrigger::new(1.0, -1.0);
        assert_eq!(trigger.thresholds(), (-1.0, 1.0));
    }

    #[test]
    fn test_zero_width_band_is_widened() {
        let mut trigger = SchmittTrigger::new(0.0, 0.0);
        let (low, high) = trigger.thresholds();
        assert_eq!(low, 0.0);
        assert!(high > low);

        // A flat signal sitting on the threshold must not chatter
        let events = (0..100).filter(|_| trigger.process(0.0)).count();
        assert_eq!(events, 0);
        assert!(trigger.process(1.0));
        assert!(!trigger.process(0.0));
        assert!(!trigger.process(0.0));
    }

    #[test]
    fn test_nan_keeps_state() {
        let mut trigger = SchmittTrigger::default();
        assert!(!trigger.process(f64::NAN));
        assert_eq!(trigger.state(), TriggerState::Low);
        assert!(trigger.process(5.0));
        assert!(!trigger.process(f64::NAN));
        assert!(trigger.is_high());
    }

    #[test]
    fn test_reset_disarms() {
        let mut trigger = SchmittTrigger::default();
        assert!(trigger.process(5.0));
        trigger.reset();
        assert!(trigger.process(5.0));
    }
}
