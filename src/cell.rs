//! Quantussy Cell
//!
//! An LFO whose own square wave clocks two sample-and-hold stages. The
//! "castle" stage samples an external signal onto the castle output; the
//! "cv" stage samples another signal and feeds it back into the cell's
//! pitch on the following sample, so a cell patched into a ring of others
//! wanders between rates.

use crate::config::CellConfig;
use crate::light::SmoothLight;
use crate::oscillator::LowFrequencyOscillator;
use crate::port::{
    GraphModule, ParamDef, ParamId, ParamRange, PortDef, PortId, PortSpec, PortValues, SignalKind,
};
use crate::trigger::SchmittTrigger;

pub const CASTLE_INPUT: PortId = 0;
pub const CV_INPUT: PortId = 1;
pub const RESET_INPUT: PortId = 2;

pub const CASTLE_OUTPUT: PortId = 10;
pub const SIN_OUTPUT: PortId = 11;
pub const TRI_OUTPUT: PortId = 12;
pub const SAW_OUTPUT: PortId = 13;
pub const SQR_OUTPUT: PortId = 14;

const WAVEFORM_OUTPUTS: [PortId; 4] = [SIN_OUTPUT, TRI_OUTPUT, SAW_OUTPUT, SQR_OUTPUT];

pub const FREQ_PARAM: ParamId = 0;
pub const PW_PARAM: ParamId = 1;
pub const OFFSET_PARAM: ParamId = 2;
pub const INVERT_PARAM: ParamId = 3;

pub const BLINK_LIGHT: usize = 0;

/// Input signals for one sample. `None` means unconnected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellInputs {
    pub castle: Option<f64>,
    pub cv: Option<f64>,
    pub reset: Option<f64>,
}

/// Output signals for one sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellOutputs {
    pub sin: f64,
    pub tri: f64,
    pub saw: f64,
    pub sqr: f64,
    pub castle: f64,
    /// Blink light brightness, 0–1
    pub brightness: f64,
}

/// Self-clocked LFO with dual sample-and-hold
pub struct QuantussyCell {
    oscillator: LowFrequencyOscillator,
    castle_trigger: SchmittTrigger,
    cv_trigger: SchmittTrigger,
    castle_held: f64,
    cv_held: f64,
    light: SmoothLight,
    freq: f64,
    sample_rate: f64,
    config: CellConfig,
    spec: PortSpec,
    params: Vec<ParamDef>,
}

impl QuantussyCell {
    pub fn new(sample_rate: f64) -> Self {
        Self::with_config(sample_rate, CellConfig::default())
    }

    /// Build a cell from `config`. A config that fails validation is
    /// replaced by the defaults.
    pub fn with_config(sample_rate: f64, config: CellConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!(%err, "rejecting cell config, using defaults");
                CellConfig::default()
            }
        };
        let mut cell = Self {
            oscillator: LowFrequencyOscillator::new(),
            castle_trigger: SchmittTrigger::new(config.clock_low, config.clock_high),
            cv_trigger: SchmittTrigger::new(config.clock_low, config.clock_high),
            castle_held: 0.0,
            cv_held: 0.0,
            light: SmoothLight::new(config.light_decay),
            freq: 0.0,
            sample_rate: 44100.0,
            config,
            spec: PortSpec {
                inputs: vec![
                    PortDef::new(CASTLE_INPUT, "castle", SignalKind::CvBipolar),
                    PortDef::new(CV_INPUT, "cv", SignalKind::VoltPerOctave),
                    PortDef::new(RESET_INPUT, "reset", SignalKind::Trigger),
                ],
                outputs: vec![
                    PortDef::new(CASTLE_OUTPUT, "castle", SignalKind::CvBipolar),
                    PortDef::new(SIN_OUTPUT, "sin", SignalKind::CvBipolar),
                    PortDef::new(TRI_OUTPUT, "tri", SignalKind::CvBipolar),
                    PortDef::new(SAW_OUTPUT, "saw", SignalKind::CvBipolar),
                    PortDef::new(SQR_OUTPUT, "sqr", SignalKind::CvBipolar),
                ],
            },
            params: vec![
                ParamDef::new(
                    FREQ_PARAM,
                    "freq",
                    0.0,
                    ParamRange::Linear {
                        min: -3.0,
                        max: 3.0,
                    },
                ),
                ParamDef::new(
                    PW_PARAM,
                    "pw",
                    0.5,
                    ParamRange::Linear {
                        min: 0.01,
                        max: 0.99,
                    },
                ),
                ParamDef::new(OFFSET_PARAM, "offset", 0.0, ParamRange::Switch),
                ParamDef::new(INVERT_PARAM, "invert", 0.0, ParamRange::Switch),
            ],
        };
        cell.set_sample_rate(sample_rate);
        cell
    }

    /// Run one sample.
    pub fn process(&mut self, inputs: CellInputs) -> CellOutputs {
        let sample_time = 1.0 / self.sample_rate;

        // Previous sample's cv hold; the stage below overwrites it
        self.oscillator.set_pitch(self.freq + self.cv_held);
        self.oscillator.step(sample_time);
        self.oscillator.set_reset(inputs.reset.unwrap_or(0.0));

        let gain = self.config.output_gain;
        let square = gain * self.oscillator.sqr();
        let outputs = CellOutputs {
            sin: gain * self.oscillator.sin(),
            tri: gain * self.oscillator.tri(),
            saw: gain * self.oscillator.saw(),
            sqr: square,
            castle: self.sample_castle(square, inputs.castle),
            brightness: 0.0,
        };
        self.sample_cv(square, inputs.cv);

        self.light
            .set_brightness_smooth(self.oscillator.light().max(0.0), sample_time);

        CellOutputs {
            brightness: self.light.brightness(),
            ..outputs
        }
    }

    fn sample_castle(&mut self, clock: f64, input: Option<f64>) -> f64 {
        if self.castle_trigger.process(clock) {
            self.castle_held = input.unwrap_or(0.0);
        }
        self.castle_held
    }

    fn sample_cv(&mut self, clock: f64, input: Option<f64>) {
        if self.cv_trigger.process(clock) {
            self.cv_held = input.unwrap_or(0.0);
        }
    }

    pub fn set_freq(&mut self, freq: f64) {
        self.freq = freq;
    }

    pub fn set_pulse_width(&mut self, pulse_width: f64) {
        self.oscillator.set_pulse_width(pulse_width);
    }

    /// Switch the waveforms between bipolar and unipolar; the waveform
    /// outputs' signal kinds follow.
    pub fn set_offset(&mut self, offset: bool) {
        self.oscillator.set_offset(offset);
        let kind = if offset {
            SignalKind::CvUnipolar
        } else {
            SignalKind::CvBipolar
        };
        for port in &mut self.spec.outputs {
            if WAVEFORM_OUTPUTS.contains(&port.id) {
                port.kind = kind;
            }
        }
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.oscillator.set_invert(invert);
    }

    pub fn castle_held(&self) -> f64 {
        self.castle_held
    }

    pub fn cv_held(&self) -> f64 {
        self.cv_held
    }

    pub fn brightness(&self) -> f64 {
        self.light.brightness()
    }

    pub fn oscillator(&self) -> &LowFrequencyOscillator {
        &self.oscillator
    }

    pub fn config(&self) -> &CellConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl Default for QuantussyCell {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl GraphModule for QuantussyCell {
    fn port_spec(&self) -> &PortSpec {
        &self.spec
    }

    fn tick(&mut self, inputs: &PortValues, outputs: &mut PortValues) {
        let out = self.process(CellInputs {
            castle: inputs.get(CASTLE_INPUT),
            cv: inputs.get(CV_INPUT),
            reset: inputs.get(RESET_INPUT),
        });

        outputs.set(CASTLE_OUTPUT, out.castle);
        outputs.set(SIN_OUTPUT, out.sin);
        outputs.set(TRI_OUTPUT, out.tri);
        outputs.set(SAW_OUTPUT, out.saw);
        outputs.set(SQR_OUTPUT, out.sqr);
    }

    fn reset(&mut self) {
        self.oscillator.reset();
        self.castle_trigger.reset();
        self.cv_trigger.reset();
        self.castle_held = 0.0;
        self.cv_held = 0.0;
        self.light.reset();
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        } else {
            tracing::warn!(
                sample_rate,
                kept = self.sample_rate,
                "ignoring invalid sample rate"
            );
        }
    }

    fn params(&self) -> &[ParamDef] {
        &self.params
    }

    fn get_param(&self, id: ParamId) -> Option<f64> {
        match id {
            FREQ_PARAM => Some(self.freq),
            PW_PARAM => Some(self.oscillator.pulse_width()),
            OFFSET_PARAM => Some(if self.oscillator.offset() { 1.0 } else { 0.0 }),
            INVERT_PARAM => Some(if self.oscillator.invert() { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    fn set_param(&mut self, id: ParamId, value: f64) {
        match id {
            FREQ_PARAM => self.set_freq(value),
            PW_PARAM => self.set_pulse_width(value),
            OFFSET_PARAM => self.set_offset(ParamRange::Switch.clamp(value) > 0.0),
            INVERT_PARAM => self.set_invert(ParamRange::Switch.clamp(value) > 0.0),
            _ => {}
        }
    }

    fn light(&self, index: usize) -> Option<f64> {
        (index == BLINK_LIGHT).then(|| self.light.brightness())
    }

    fn type_id(&self) -> &'static str {
        "quantussy_cell"
    }
}
