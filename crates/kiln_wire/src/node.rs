//! Data-flow nodes of one composition.
//!
//! A composition of N designs has N + 2 nodes: a start node producing the
//! composite's own inputs, one instance node per design, and an end node
//! consuming the composite's own outputs.

use kiln_hdl::{std_signals, Port, Signal};

/// What a node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The composite's inputs, seen as sources.
    Start,
    /// One instantiated design, identified by its instance name.
    Instance(String),
    /// The composite's outputs, seen as sinks.
    End,
}

/// A node with the signals it consumes (sinks) and produces (sources).
///
/// Absent signals (width 0) are dropped when the node is built.
#[derive(Debug, Clone)]
pub struct DataFlowNode {
    kind: NodeKind,
    sinks: Vec<Signal>,
    sources: Vec<Signal>,
}

impl DataFlowNode {
    /// The start node, producing `x`, `y_address`, `enable` and `clock`.
    pub fn start(x_width: u32, y_address_width: u32) -> Self {
        Self::build(
            NodeKind::Start,
            vec![],
            vec![
                std_signals::x(x_width),
                std_signals::y_address(y_address_width),
                std_signals::enable(),
                std_signals::clock(),
            ],
        )
    }

    /// The end node, consuming `y`, `x_address` and `done`.
    pub fn end(y_width: u32, x_address_width: u32) -> Self {
        Self::build(
            NodeKind::End,
            vec![
                std_signals::y(y_width),
                std_signals::x_address(x_address_width),
                std_signals::done(),
            ],
            vec![],
        )
    }

    /// A node for one design instance, consuming the port's incoming
    /// signals and producing its outgoing ones.
    pub fn instance(instance: &str, port: &Port) -> Self {
        Self::build(
            NodeKind::Instance(instance.to_string()),
            port.incoming().to_vec(),
            port.outgoing().to_vec(),
        )
    }

    fn build(kind: NodeKind, sinks: Vec<Signal>, sources: Vec<Signal>) -> Self {
        Self {
            kind,
            sinks: sinks.into_iter().filter(Signal::is_present).collect(),
            sources: sources.into_iter().filter(Signal::is_present).collect(),
        }
    }

    /// The node kind.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Prefix prepended to signal names: `<instance>_` for instances and
    /// empty for the composite's own boundary.
    pub fn prefix(&self) -> String {
        match &self.kind {
            NodeKind::Instance(instance) => format!("{instance}_"),
            NodeKind::Start | NodeKind::End => String::new(),
        }
    }

    /// Consumed signals in declaration order.
    pub fn sinks(&self) -> impl Iterator<Item = OwnedSignal<'_>> {
        self.sinks.iter().map(move |signal| OwnedSignal { signal, owner: self })
    }

    /// Produced signals in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = OwnedSignal<'_>> {
        self.sources.iter().map(move |signal| OwnedSignal { signal, owner: self })
    }
}

/// A signal together with the node it belongs to.
///
/// The owner is only consulted to build the qualified name.
#[derive(Debug, Clone, Copy)]
pub struct OwnedSignal<'a> {
    signal: &'a Signal,
    owner: &'a DataFlowNode,
}

impl<'a> OwnedSignal<'a> {
    /// Unqualified signal name.
    pub fn name(&self) -> &'a str {
        &self.signal.name
    }

    /// Width in bits.
    pub fn width(&self) -> u32 {
        self.signal.width
    }

    /// Name prefixed with the owner's instance prefix.
    pub fn qualified_name(&self) -> String {
        format!("{}{}", self.owner.prefix(), self.signal.name)
    }
}
