//! Name-driven wiring of sequentially composed designs.
//!
//! Nodes are visited in order. Every sink of a node is resolved against the
//! sources produced by earlier nodes before the node's own sources become
//! available, so a node never feeds itself. When several earlier nodes
//! produce the same name, the most recent one wins.

use std::collections::HashMap;

use kiln_hdl::HdlError;
use serde::{Deserialize, Serialize};

use crate::node::{DataFlowNode, OwnedSignal};

/// Acceptable producer names per sink name, most preferred first.
const COMPATIBLE_SOURCES: [(&str, &[&str]); 7] = [
    ("x", &["x", "y"]),
    ("y", &["y", "x"]),
    ("x_address", &["x_address", "y_address"]),
    ("y_address", &["y_address", "x_address"]),
    ("enable", &["enable", "done"]),
    ("done", &["done", "enable"]),
    ("clock", &["clock"]),
];

/// One `sink <= source` assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Qualified name of the consuming signal.
    pub sink: String,
    /// Qualified name of the chosen producer.
    pub source: String,
}

/// The result of one wiring pass, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connections {
    entries: Vec<Connection>,
}

impl Connections {
    /// All connections in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.entries.iter()
    }

    /// The source chosen for a qualified sink name.
    pub fn get(&self, sink: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|c| c.sink == sink)
            .map(|c| c.source.as_str())
    }

    /// Number of connections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was connected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the connections as sorted `sink <= source;` lines.
    pub fn to_lines(&self) -> Vec<String> {
        kiln_hdl::vhdl::create_connections(
            self.entries
                .iter()
                .map(|c| (c.sink.as_str(), c.source.as_str())),
        )
    }
}

/// Connects the sinks of an ordered node list to compatible sources.
#[derive(Debug, Clone, Copy)]
pub struct AutoWirer {
    strict_widths: bool,
}

impl Default for AutoWirer {
    fn default() -> Self {
        Self {
            strict_widths: true,
        }
    }
}

impl AutoWirer {
    /// Creates a wirer that rejects sink/source width mismatches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the sink/source width check.
    pub fn with_strict_widths(mut self, strict: bool) -> Self {
        self.strict_widths = strict;
        self
    }

    /// Resolves every sink of every node.
    ///
    /// The availability table lives only for the duration of this call.
    #[tracing::instrument(skip_all, fields(nodes = nodes.len()))]
    pub fn connect(&self, nodes: &[DataFlowNode]) -> Result<Connections, HdlError> {
        let mut available: HashMap<&str, OwnedSignal<'_>> = HashMap::new();
        let mut connections = Connections::default();
        for node in nodes {
            for sink in node.sinks() {
                let connection = self.resolve(&sink, &available)?;
                tracing::debug!(sink = %connection.sink, source = %connection.source, "wired");
                connections.entries.push(connection);
            }
            for source in node.sources() {
                available.insert(source.name(), source);
            }
        }
        Ok(connections)
    }

    fn resolve(
        &self,
        sink: &OwnedSignal<'_>,
        available: &HashMap<&str, OwnedSignal<'_>>,
    ) -> Result<Connection, HdlError> {
        let sink_name = sink.qualified_name();
        let found = candidates(sink.name())
            .iter()
            .find_map(|name| available.get(name));
        let Some(source) = found else {
            tracing::warn!(
                sink = %sink_name,
                "no compatible source, passing through top-level '{}'",
                sink.name()
            );
            return Ok(Connection {
                sink: sink_name,
                source: sink.name().to_string(),
            });
        };
        let source_name = source.qualified_name();
        if self.strict_widths && source.width() != sink.width() {
            return Err(HdlError::WidthMismatch {
                sink: sink_name,
                driver: source_name,
                sink_width: sink.width(),
                driver_width: source.width(),
            });
        }
        Ok(Connection {
            sink: sink_name,
            source: source_name,
        })
    }
}

/// Producer names a sink accepts. Names outside the standard vocabulary
/// only match themselves.
fn candidates<'a>(sink: &'a str) -> Vec<&'a str> {
    COMPATIBLE_SOURCES
        .iter()
        .find(|(name, _)| *name == sink)
        .map_or_else(|| vec![sink], |(_, sources)| sources.to_vec())
}
