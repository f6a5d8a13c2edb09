//! Smoothed panel light
//!
//! Lights snap up to a brighter target and fade down exponentially, so a
//! fast oscillator reads as a steady glow rather than flicker.

/// Default fade-out rate in 1/seconds
pub const DEFAULT_LIGHT_DECAY: f64 = 60.0;

#[derive(Debug, Clone, Copy)]
pub struct SmoothLight {
    brightness: f64,
    decay: f64,
}

impl SmoothLight {
    pub fn new(decay: f64) -> Self {
        Self {
            brightness: 0.0,
            decay: decay.max(0.0),
        }
    }

    /// Move toward `target` (clamped to 0–1) over `dt` seconds
    pub fn set_brightness_smooth(&mut self, target: f64, dt: f64) {
        let target = target.max(0.0).min(1.0);
        if target >= self.brightness {
            self.brightness = target;
        } else {
            let amount = (self.decay * dt).max(0.0).min(1.0);
            self.brightness += (target - self.brightness) * amount;
        }
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn reset(&mut self) {
        self.brightness = 0.0;
    }
}

impl Default for SmoothLight {
    fn default() -> Self {
        Self::new(DEFAULT_LIGHT_DECAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rises_immediately() {
        let mut light = SmoothLight::default();
        light.set_brightness_smooth(0.8, 1.0 / 44100.0);
        assert_eq!(light.brightness(), 0.8);
    }

    #[test]
    fn test_decays_monotonically_toward_target() {
        let mut light = SmoothLight::default();
        light.set_brightness_smooth(1.0, 0.0);

        let dt = 1.0 / 1000.0;
        let mut last = light.brightness();
        for _ in 0..1000 {
            light.set_brightness_smooth(0.2, dt);
            let now = light.brightness();
            assert!(now <= last);
            assert!(now >= 0.2);
            last = now;
        }
        assert!((last - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_bounded_for_any_target() {
        let mut light = SmoothLight::default();
        for target in [-3.0, 7.0, f64::NAN, f64::INFINITY, 0.5] {
            light.set_brightness_smooth(target, 0.5);
            assert!((0.0..=1.0).contains(&light.brightness()));
        }
    }

    #[test]
    fn test_huge_step_lands_on_target() {
        let mut light = SmoothLight::new(60.0);
        light.set_brightness_smooth(1.0, 0.0);
        light.set_brightness_smooth(0.0, 10.0);
        assert_eq!(light.brightness(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut light = SmoothLight::default();
        light.set_brightness_smooth(1.0, 0.0);
        light.reset();
        assert_eq!(light.brightness(), 0.0);
    }
}
