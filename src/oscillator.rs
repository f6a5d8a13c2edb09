//! Low-Frequency Oscillator
//!
//! Phase-accumulating oscillator producing sine, triangle, saw and square
//! simultaneously. Every waveform is a pure function of the current phase
//! and the offset/invert/pulse-width settings, so reading one never
//! disturbs another.

use crate::trigger::SchmittTrigger;
use libm::Libm;
use std::f64::consts::TAU;

/// Pitch is clamped to this before exponentiation (256 Hz)
pub const MAX_PITCH: f64 = 8.0;

/// Narrowest allowed duty cycle; the widest is `1.0 - MIN_PULSE_WIDTH`
pub const MIN_PULSE_WIDTH: f64 = 0.01;

/// Largest phase advance per step, so phase never wraps twice
pub const MAX_PHASE_STEP: f64 = 0.5;

/// Multi-waveform LFO with 1/octave pitch and a reset input
#[derive(Debug, Clone)]
pub struct LowFrequencyOscillator {
    phase: f64,
    pulse_width: f64,
    frequency: f64,
    offset: bool,
    invert: bool,
    reset_trigger: SchmittTrigger,
}

impl LowFrequencyOscillator {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            pulse_width: 0.5,
            frequency: 1.0,
            offset: false,
            invert: false,
            reset_trigger: SchmittTrigger::new(0.0, 0.01),
        }
    }

    /// Set pitch in octaves relative to 1 Hz. Frequency stays positive
    /// however low the pitch goes.
    pub fn set_pitch(&mut self, pitch: f64) {
        let pitch = pitch.min(MAX_PITCH);
        self.frequency = Libm::<f64>::pow(2.0, pitch).max(f64::MIN_POSITIVE);
    }

    pub fn set_pulse_width(&mut self, pulse_width: f64) {
        self.pulse_width = pulse_width
            .max(MIN_PULSE_WIDTH)
            .min(1.0 - MIN_PULSE_WIDTH);
    }

    /// Unipolar (0..2) rather than bipolar (-1..1) waveforms
    pub fn set_offset(&mut self, offset: bool) {
        self.offset = offset;
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    /// Feed the reset input; a rising edge restarts the cycle
    pub fn set_reset(&mut self, reset: f64) {
        if self.reset_trigger.process(reset) {
            self.phase = 0.0;
        }
    }

    /// Advance the phase by `dt` seconds
    pub fn step(&mut self, dt: f64) {
        let delta_phase = (self.frequency * dt).max(0.0).min(MAX_PHASE_STEP);
        self.phase += delta_phase;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
    }

    pub fn sin(&self) -> f64 {
        if self.offset {
            1.0 - Libm::<f64>::cos(TAU * self.phase) * self.polarity()
        } else {
            Libm::<f64>::sin(TAU * self.phase) * self.polarity()
        }
    }

    pub fn tri(&self) -> f64 {
        if self.offset {
            tri(if self.invert {
                self.phase - 0.5
            } else {
                self.phase
            })
        } else {
            -1.0 + tri(if self.invert {
                self.phase - 0.25
            } else {
                self.phase - 0.75
            })
        }
    }

    pub fn saw(&self) -> f64 {
        if self.offset {
            if self.invert {
                2.0 * (1.0 - self.phase)
            } else {
                2.0 * self.phase
            }
        } else {
            saw(self.phase) * self.polarity()
        }
    }

    pub fn sqr(&self) -> f64 {
        let high = (self.phase < self.pulse_width) ^ self.invert;
        let sqr = if high { 1.0 } else { -1.0 };
        if self.offset {
            sqr + 1.0
        } else {
            sqr
        }
    }

    /// Plain sine for panel lights, unaffected by offset and invert
    pub fn light(&self) -> f64 {
        Libm::<f64>::sin(TAU * self.phase)
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn pulse_width(&self) -> f64 {
        self.pulse_width
    }

    pub fn offset(&self) -> bool {
        self.offset
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Restart at phase 0 and re-arm the reset input. Pitch and shape
    /// settings are kept.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.reset_trigger.reset();
    }

    fn polarity(&self) -> f64 {
        if self.invert {
            -1.0
        } else {
            1.0
        }
    }
}

impl Default for LowFrequencyOscillator {
    fn default() -> Self {
        Self::new()
    }
}

/// Reflected ramp: 0 at integers, 2 at half-integers
fn tri(x: f64) -> f64 {
    4.0 * Libm::<f64>::fabs(x - Libm::<f64>::round(x))
}

/// Bipolar ramp in [-1, 1)
fn saw(x: f64) -> f64 {
    2.0 * (x - Libm::<f64>::round(x))
}
