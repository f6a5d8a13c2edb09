//! # Quantussy: Self-Clocked LFO with Dual Sample-and-Hold
//!
//! `quantussy` implements a modular synthesis "cell": a low-frequency
//! oscillator whose own square wave clocks two sample-and-hold stages.
//! One stage ("castle") samples an external signal onto an output; the
//! other ("cv") samples a second signal and feeds it back into the
//! oscillator's pitch one sample later.
//!
//! ## Layout
//!
//! - [`trigger`] - hysteresis edge detection
//! - [`oscillator`] - phase accumulation and waveform synthesis
//! - [`light`] - smoothed brightness for panel lights
//! - [`cell`] - the cell itself, usable directly or as a [`GraphModule`]
//! - [`port`] / [`graph`] - port conventions and a small patching host
//! - [`config`] - JSON-loadable tuning constants
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quantussy::prelude::*;
//!
//! let mut cell = QuantussyCell::new(44100.0);
//! cell.set_freq(1.0);
//!
//! let out = cell.process(CellInputs {
//!     castle: Some(2.0),
//!     ..CellInputs::default()
//! });
//! println!("sin {} castle {} light {}", out.sin, out.castle, out.brightness);
//! ```
//!
//! Cells can also be patched together, including in feedback rings:
//!
//! ```rust,no_run
//! use quantussy::prelude::*;
//!
//! let mut patch = Patch::new(44100.0);
//! let a = patch.add("a", QuantussyCell::new(44100.0));
//! let b = patch.add("b", QuantussyCell::new(44100.0));
//!
//! patch.connect(a.out("castle").unwrap(), b.in_("castle").unwrap()).unwrap();
//! patch.connect(b.out("castle").unwrap(), a.in_("castle").unwrap()).unwrap();
//!
//! patch.tick();
//! ```

pub mod cell;
pub mod config;
pub mod graph;
pub mod light;
pub mod oscillator;
pub mod port;
pub mod trigger;

pub(crate) type StdMap<K, V> = std::collections::BTreeMap<K, V>;

/// Prelude module for convenient imports
pub mod prelude {
    // Signal path
    pub use crate::cell::{CellInputs, CellOutputs, QuantussyCell};
    pub use crate::light::SmoothLight;
    pub use crate::oscillator::LowFrequencyOscillator;
    pub use crate::trigger::{SchmittTrigger, TriggerState};

    // Port system
    pub use crate::port::{
        GraphModule, ParamDef, ParamId, ParamRange, PortDef, PortId, PortSpec, PortValues,
        SignalKind,
    };

    // Patch graph
    pub use crate::graph::{Cable, CableId, NodeHandle, NodeId, Patch, PatchError, PortRef};

    // Configuration
    pub use crate::config::{CellConfig, ConfigError};
}

// Re-export key types at crate root for convenience
pub use prelude::*;
