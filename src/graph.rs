//! Patch Graph
//!
//! A minimal host that owns modules, routes cables between their ports and
//! ticks every module once per sample. Each cable delivers the value its
//! source produced on the previous sample, so execution order never matters
//! and feedback loops (such as a ring of cells) are valid patches.

use crate::port::{GraphModule, ParamId, PortId, PortSpec, PortValues};
use serde::{Deserialize, Serialize};
use slotmap::{DefaultKey, SlotMap};
use std::collections::HashMap;

/// Unique identifier for a node in the patch graph
pub type NodeId = DefaultKey;

/// Unique identifier for a cable connection
pub type CableId = usize;

/// Reference to a specific port on a specific node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub node: NodeId,
    pub port: PortId,
}

/// A cable connecting an output port to an input port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cable {
    pub from: PortRef,
    pub to: PortRef,
}

struct Node {
    module: Box<dyn GraphModule>,
    name: String,
}

/// Error types for patch operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    InvalidNode,
    InvalidPort,
    InvalidCable,
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchError::InvalidNode => write!(f, "Invalid node"),
            PatchError::InvalidPort => write!(f, "Invalid port"),
            PatchError::InvalidCable => write!(f, "Invalid cable"),
        }
    }
}

impl std::error::Error for PatchError {}

/// Handle to a node for ergonomic port references
#[derive(Clone)]
pub struct NodeHandle {
    id: NodeId,
    spec: PortSpec,
}

impl NodeHandle {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Reference an output port by name
    pub fn out(&self, name: &str) -> Option<PortRef> {
        self.spec.output_by_name(name).map(|port| PortRef {
            node: self.id,
            port: port.id,
        })
    }

    /// Reference an input port by name
    pub fn in_(&self, name: &str) -> Option<PortRef> {
        self.spec.input_by_name(name).map(|port| PortRef {
            node: self.id,
            port: port.id,
        })
    }

    pub fn spec(&self) -> &PortSpec {
        &self.spec
    }
}

/// The patch: modules, cables and the last value seen on every output
pub struct Patch {
    nodes: SlotMap<NodeId, Node>,
    cables: Vec<Cable>,
    // Outputs from the previous sample (read) and the current one (written)
    current: HashMap<PortRef, f64>,
    next: HashMap<PortRef, f64>,
    sample_rate: f64,
}

impl Patch {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            nodes: SlotMap::new(),
            cables: Vec::new(),
            current: HashMap::new(),
            next: HashMap::new(),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Change the sample rate of the patch and every module in it
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        for (_, node) in &mut self.nodes {
            node.module.set_sample_rate(sample_rate);
        }
    }

    /// Add a module to the patch
    pub fn add<M: GraphModule + 'static>(
        &mut self,
        name: impl Into<String>,
        module: M,
    ) -> NodeHandle {
        self.add_boxed(name, Box::new(module))
    }

    /// Add a boxed module to the patch
    pub fn add_boxed(
        &mut self,
        name: impl Into<String>,
        mut module: Box<dyn GraphModule>,
    ) -> NodeHandle {
        module.set_sample_rate(self.sample_rate);
        let spec = module.port_spec().clone();
        let name = name.into();
        tracing::debug!(%name, module = module.type_id(), "adding module");
        let id = self.nodes.insert(Node { module, name });
        NodeHandle { id, spec }
    }

    /// Remove a module and every cable attached to it
    pub fn remove(&mut self, node: NodeId) -> Result<(), PatchError> {
        let removed = self.nodes.remove(node).ok_or(PatchError::InvalidNode)?;
        self.cables
            .retain(|cable| cable.from.node != node && cable.to.node != node);
        self.current.retain(|port, _| port.node != node);
        self.next.retain(|port, _| port.node != node);
        tracing::debug!(name = %removed.name, "removed module");
        Ok(())
    }

    /// Connect an output port to an input port
    pub fn connect(&mut self, from: PortRef, to: PortRef) -> Result<CableId, PatchError> {
        self.validate_output_port(from)?;
        self.validate_input_port(to)?;

        self.cables.push(Cable { from, to });
        tracing::debug!(?from, ?to, "connected cable");
        Ok(self.cables.len() - 1)
    }

    /// Disconnect a cable by ID. Later cable IDs shift down by one.
    pub fn disconnect(&mut self, cable_id: CableId) -> Result<(), PatchError> {
        if cable_id >= self.cables.len() {
            return Err(PatchError::InvalidCable);
        }
        let cable = self.cables.remove(cable_id);
        tracing::debug!(from = ?cable.from, to = ?cable.to, "disconnected cable");
        Ok(())
    }

    pub fn set_param(
        &mut self,
        node: NodeId,
        param: ParamId,
        value: f64,
    ) -> Result<(), PatchError> {
        let node = self.nodes.get_mut(node).ok_or(PatchError::InvalidNode)?;
        node.module.set_param(param, value);
        Ok(())
    }

    pub fn get_param(&self, node: NodeId, param: ParamId) -> Option<f64> {
        self.nodes.get(node).and_then(|n| n.module.get_param(param))
    }

    pub fn get_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.name.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cable_count(&self) -> usize {
        self.cables.len()
    }

    pub fn cables(&self) -> &[Cable] {
        &self.cables
    }

    fn validate_output_port(&self, port_ref: PortRef) -> Result<(), PatchError> {
        let node = self.nodes.get(port_ref.node).ok_or(PatchError::InvalidNode)?;
        node.module
            .port_spec()
            .output_by_id(port_ref.port)
            .map(|_| ())
            .ok_or(PatchError::InvalidPort)
    }

    fn validate_input_port(&self, port_ref: PortRef) -> Result<(), PatchError> {
        let node = self.nodes.get(port_ref.node).ok_or(PatchError::InvalidNode)?;
        node.module
            .port_spec()
            .input_by_id(port_ref.port)
            .map(|_| ())
            .ok_or(PatchError::InvalidPort)
    }

    /// Process one sample through every module
    pub fn tick(&mut self) {
        let ids: Vec<NodeId> = self.nodes.keys().collect();
        let mut outputs = PortValues::new();
        for node_id in ids {
            let inputs = self.gather_inputs(node_id);
            outputs.clear();

            if let Some(node) = self.nodes.get_mut(node_id) {
                node.module.tick(&inputs, &mut outputs);
            }

            for (&port, &value) in &outputs.values {
                self.next.insert(PortRef { node: node_id, port }, value);
            }
        }
        std::mem::swap(&mut self.current, &mut self.next);
    }

    // Inputs without a cable are left out so the module sees them as unconnected
    fn gather_inputs(&self, node_id: NodeId) -> PortValues {
        let mut values = PortValues::new();
        for cable in self.cables.iter().filter(|c| c.to.node == node_id) {
            let value = self.current.get(&cable.from).copied().unwrap_or(0.0);
            values.accumulate(cable.to.port, value);
        }
        values
    }

    /// Value an output port produced on the most recent tick
    pub fn output(&self, port: PortRef) -> f64 {
        self.current.get(&port).copied().unwrap_or(0.0)
    }

    /// Brightness of a module's panel light
    pub fn light(&self, node: NodeId, index: usize) -> Option<f64> {
        self.nodes.get(node).and_then(|n| n.module.light(index))
    }

    /// Reset all modules and clear cable values
    pub fn reset(&mut self) {
        for (_, node) in &mut self.nodes {
            node.module.reset();
        }
        self.current.clear();
        self.next.clear();
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &str, &dyn GraphModule)> {
        self.nodes
            .iter()
            .map(|(id, node)| (id, node.name.as_str(), node.module.as_ref()))
    }
}
