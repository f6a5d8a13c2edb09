//! Ports, Parameters and the Module Interface
//!
//! A host talks to a cell through named, numbered ports carrying plain
//! voltages. This module describes those ports, carries their per-sample
//! values and defines [`GraphModule`], the object-safe interface the patch
//! host drives.

use crate::StdMap;
use serde::{Deserialize, Serialize};

/// Port number, unique among a module's inputs and among its outputs
pub type PortId = u32;

/// Parameter number, unique within a module
pub type ParamId = u32;

/// What a port's voltage means, following modular conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// ±5V modulation (bipolar waveforms, held values)
    CvBipolar,

    /// 0–10V modulation (offset-mode waveforms)
    CvUnipolar,

    /// Pitch offset, one octave per volt
    VoltPerOctave,

    /// Edge-sensitive input; only rising edges matter
    Trigger,
}

impl SignalKind {
    /// Nominal (min, max) voltage a well-behaved source stays within
    pub fn voltage_range(&self) -> (f64, f64) {
        match self {
            SignalKind::CvBipolar | SignalKind::VoltPerOctave => (-5.0, 5.0),
            SignalKind::CvUnipolar => (0.0, 10.0),
            SignalKind::Trigger => (0.0, 5.0),
        }
    }
}

/// One input or output jack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDef {
    pub id: PortId,
    /// Name used to patch by, e.g. "castle" or "sqr"
    pub name: String,
    pub kind: SignalKind,
}

impl PortDef {
    pub fn new(id: PortId, name: impl Into<String>, kind: SignalKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }
}

/// Every jack on a module. An input and an output may share a name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortSpec {
    pub inputs: Vec<PortDef>,
    pub outputs: Vec<PortDef>,
}

impl PortSpec {
    pub fn input_by_name(&self, name: &str) -> Option<&PortDef> {
        self.inputs.iter().find(|p| p.name == name)
    }

    pub fn output_by_name(&self, name: &str) -> Option<&PortDef> {
        self.outputs.iter().find(|p| p.name == name)
    }

    pub fn input_by_id(&self, id: PortId) -> Option<&PortDef> {
        self.inputs.iter().find(|p| p.id == id)
    }

    pub fn output_by_id(&self, id: PortId) -> Option<&PortDef> {
        self.outputs.iter().find(|p| p.id == id)
    }
}

/// Voltages on a module's ports for one sample.
///
/// An input with no entry is unconnected; that is distinct from an input
/// connected to 0V.
#[derive(Debug, Clone, Default)]
pub struct PortValues {
    pub values: StdMap<PortId, f64>,
}

impl PortValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the port is unconnected
    pub fn get(&self, id: PortId) -> Option<f64> {
        self.values.get(&id).copied()
    }

    pub fn set(&mut self, id: PortId, value: f64) {
        self.values.insert(id, value);
    }

    /// Add to a port, connecting it at 0V first if needed. Several cables
    /// into one jack sum this way.
    pub fn accumulate(&mut self, id: PortId, value: f64) {
        *self.values.entry(id).or_insert(0.0) += value;
    }

    pub fn has(&self, id: PortId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// How a panel control's raw value is constrained
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ParamRange {
    /// Knob between min and max
    Linear { min: f64, max: f64 },

    /// Toggle; values at or above 0.5 are "on"
    Switch,
}

impl ParamRange {
    pub fn clamp(&self, value: f64) -> f64 {
        match self {
            ParamRange::Linear { min, max } => value.max(*min).min(*max),
            ParamRange::Switch => {
                if value >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// A panel control as a host would lay it out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    pub id: ParamId,
    pub name: String,
    pub default: f64,
    pub range: ParamRange,
}

impl ParamDef {
    pub fn new(id: ParamId, name: impl Into<String>, default: f64, range: ParamRange) -> Self {
        Self {
            id,
            name: name.into(),
            default,
            range,
        }
    }
}

/// Object-safe interface a host uses to run a module sample by sample
pub trait GraphModule: Send + Sync {
    fn port_spec(&self) -> &PortSpec;

    /// Consume one sample of inputs and write every output
    fn tick(&mut self, inputs: &PortValues, outputs: &mut PortValues);

    /// Back to power-on state; parameters are kept
    fn reset(&mut self);

    fn set_sample_rate(&mut self, sample_rate: f64);

    fn params(&self) -> &[ParamDef] {
        &[]
    }

    fn get_param(&self, _id: ParamId) -> Option<f64> {
        None
    }

    fn set_param(&mut self, _id: ParamId, _value: f64) {}

    /// Brightness (0–1) of a panel light, if the module has one at `index`
    fn light(&self, _index: usize) -> Option<f64> {
        None
    }

    fn type_id(&self) -> &'static str {
        "unknown"
    }
}
