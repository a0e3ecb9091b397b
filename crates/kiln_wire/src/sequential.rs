//! Sequential composition of designs into one network entity.

use std::collections::HashSet;

use kiln_emit::{Destination, Parameters, Template};
use kiln_hdl::vhdl::{create_instance, create_signal_definitions};
use kiln_hdl::{Design, HdlError, Port, Signal};

use crate::autowire::{AutoWirer, Connections};
use crate::node::DataFlowNode;

const NETWORK_TEMPLATE: &str = include_str!("../templates/network.tpl.vhd");

const INSTANCE_LIBRARY: &str = "work";
const INSTANCE_ARCHITECTURE: &str = "rtl";

/// Widths of the composite's own interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialWidths {
    /// Width of `x`.
    pub x_width: u32,
    /// Width of `y`.
    pub y_width: u32,
    /// Width of `x_address`.
    pub x_address_width: u32,
    /// Width of `y_address`.
    pub y_address_width: u32,
}

impl Default for SequentialWidths {
    fn default() -> Self {
        Self {
            x_width: 1,
            y_width: 1,
            x_address_width: 1,
            y_address_width: 1,
        }
    }
}

/// An ordered chain of designs, auto-wired into one entity.
///
/// Each sub-design with a non-null port is instantiated as `i_<name>`; its
/// signals are declared as `i_<name>_<signal>`.
pub struct Sequential {
    name: String,
    designs: Vec<Box<dyn Design>>,
    widths: SequentialWidths,
    port: Port,
    wirer: AutoWirer,
}

impl Sequential {
    /// Creates a composition with explicit top-level widths.
    pub fn new(
        name: &str,
        designs: Vec<Box<dyn Design>>,
        widths: SequentialWidths,
    ) -> Result<Self, HdlError> {
        let mut seen = HashSet::new();
        for design in &designs {
            if !seen.insert(design.name().to_string()) {
                return Err(HdlError::DuplicateInstance(design.name().to_string()));
            }
        }
        let port = sequential_port(&widths);
        Ok(Self {
            name: name.to_string(),
            designs,
            widths,
            port,
            wirer: AutoWirer::new(),
        })
    }

    /// Creates a composition whose interface widths follow the designs wired
    /// to it: `x` and `y_address` from their first consumer, `y` and
    /// `x_address` from their last producer. Missing widths default to 1.
    pub fn from_designs(name: &str, designs: Vec<Box<dyn Design>>) -> Result<Self, HdlError> {
        let widths = derive_widths(&designs);
        Self::new(name, designs, widths)
    }

    /// Enables or disables the sink/source width check during wiring.
    pub fn with_strict_widths(mut self, strict: bool) -> Self {
        self.wirer = self.wirer.with_strict_widths(strict);
        self
    }

    /// The composed designs in order.
    pub fn designs(&self) -> &[Box<dyn Design>] {
        &self.designs
    }

    /// The top-level widths.
    pub fn widths(&self) -> SequentialWidths {
        self.widths
    }

    fn instances(&self) -> impl Iterator<Item = (String, &dyn Design)> {
        self.designs
            .iter()
            .filter(|d| !d.port().is_null())
            .map(|d| (format!("i_{}", d.name()), d.as_ref()))
    }

    fn nodes(&self) -> Vec<DataFlowNode> {
        let mut nodes = vec![DataFlowNode::start(
            self.widths.x_width,
            self.widths.y_address_width,
        )];
        nodes.extend(
            self.instances()
                .map(|(instance, design)| DataFlowNode::instance(&instance, design.port())),
        );
        nodes.push(DataFlowNode::end(
            self.widths.y_width,
            self.widths.x_address_width,
        ));
        nodes
    }

    /// Wires the composition.
    pub fn connections(&self) -> Result<Connections, HdlError> {
        self.wirer.connect(&self.nodes())
    }

    /// Instantiation lines for every non-null sub-design.
    pub fn instantiations(&self) -> Vec<String> {
        let mut code = Vec::new();
        for (instance, design) in self.instances() {
            let mapping: Vec<(String, String)> = design
                .port()
                .signals()
                .filter(|s| s.is_present())
                .map(|s| (s.name.clone(), format!("{instance}_{}", s.name)))
                .collect();
            code.extend(create_instance(
                &instance,
                design.name(),
                INSTANCE_LIBRARY,
                INSTANCE_ARCHITECTURE,
                &mapping,
            ));
        }
        code
    }

    /// Sorted internal signal declarations for every instance.
    pub fn signal_definitions(&self) -> Vec<String> {
        let mut definitions: Vec<String> = self
            .instances()
            .flat_map(|(instance, design)| {
                create_signal_definitions(&format!("{instance}_"), design.port().signals())
            })
            .collect();
        definitions.sort();
        definitions
    }

    /// Renders the network entity.
    pub fn render(&self) -> Result<Vec<String>, HdlError> {
        let params = Parameters::new()
            .with("layer_connections", self.connections()?.to_lines())
            .with("layer_instantiations", self.instantiations())
            .with("signal_definitions", self.signal_definitions())
            .with("x_width", self.widths.x_width.to_string())
            .with("y_width", self.widths.y_width.to_string())
            .with("x_address_width", self.widths.x_address_width.to_string())
            .with("y_address_width", self.widths.y_address_width.to_string())
            .with("layer_name", self.name.as_str());
        Ok(Template::new("network", NETWORK_TEMPLATE).render(&params)?)
    }
}

impl Design for Sequential {
    fn name(&self) -> &str {
        &self.name
    }

    fn port(&self) -> &Port {
        &self.port
    }

    #[tracing::instrument(skip_all, fields(name = %self.name, designs = self.designs.len()))]
    fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        // Wiring errors must surface before any file is written.
        let lines = self.render()?;
        for design in &self.designs {
            design.persist(destination.create_subpath(design.name())?.as_ref())?;
        }
        let target = destination.create_subpath(&self.name)?;
        target.write_file(".vhd", &lines)?;
        tracing::info!(file = %format!("{}.vhd", target.path()), "persisted network");
        Ok(())
    }
}

fn sequential_port(widths: &SequentialWidths) -> Port {
    Port::standard(
        widths.x_width,
        widths.y_width,
        widths.x_address_width,
        widths.y_address_width,
    )
}

fn derive_widths(designs: &[Box<dyn Design>]) -> SequentialWidths {
    SequentialWidths {
        x_width: first_consumer_width(designs, "x"),
        y_width: last_producer_width(designs, "y"),
        x_address_width: last_producer_width(designs, "x_address"),
        y_address_width: first_consumer_width(designs, "y_address"),
    }
}

/// Width of `name` in the first design that consumes it, which is the sink
/// the start node's signal is wired to.
fn first_consumer_width(designs: &[Box<dyn Design>], name: &str) -> u32 {
    designs
        .iter()
        .find_map(|d| present_width(d.port().incoming(), name))
        .unwrap_or(1)
}

/// Width of `name` in the last design that produces it, which is the source
/// the end node's sink is wired to.
fn last_producer_width(designs: &[Box<dyn Design>], name: &str) -> u32 {
    designs
        .iter()
        .rev()
        .find_map(|d| present_width(d.port().outgoing(), name))
        .unwrap_or(1)
}

fn present_width(signals: &[Signal], name: &str) -> Option<u32> {
    signals
        .iter()
        .find(|s| s.name == name && s.is_present())
        .map(|s| s.width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_emit::{InMemoryPath, OnDiskPath};
    use kiln_hdl::vhdl::signal_definition;
    use kiln_hdl::{create_port, NullDesign, Signal};

    struct Stub {
        name: String,
        port: Port,
    }

    impl Stub {
        fn activation(name: &str, width: u32) -> Box<dyn Design> {
            Box::new(Self {
                name: name.into(),
                port: Port::new(vec![Signal::input("x", width)], vec![Signal::output("y", width)])
                    .unwrap(),
            })
        }

        fn buffered(name: &str, width: u32, x_count: usize, y_count: usize) -> Box<dyn Design> {
            Box::new(Self {
                name: name.into(),
                port: create_port(width, width, x_count, y_count),
            })
        }
    }

    impl Design for Stub {
        fn name(&self) -> &str {
            &self.name
        }
        fn port(&self) -> &Port {
            &self.port
        }
        fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
            destination
                .create_subpath(&self.name)?
                .write_file(".vhd", &[format!("-- {}", self.name)])?;
            Ok(())
        }
    }

    fn lines_between<'a>(lines: &'a [String], start: &str, end: &str) -> &'a [String] {
        let s = lines.iter().position(|l| l.trim() == start).unwrap();
        let e = lines.iter().position(|l| l.trim() == end).unwrap();
        &lines[s + 1..e]
    }

    #[test]
    fn empty_sequential() {
        let seq = Sequential::from_designs("sequential", vec![]).unwrap();
        assert_eq!(seq.widths(), SequentialWidths::default());
        let root = InMemoryPath::new();
        seq.persist(&root).unwrap();
        assert_eq!(root.files(), vec!["sequential.vhd"]);

        let lines = root.lines("sequential.vhd").unwrap();
        assert!(lines.contains(&"entity sequential is".to_string()));
        assert!(lines.contains(&"        x : in std_logic_vector(1-1 downto 0);".to_string()));
        let body = lines_between(&lines, "begin", "end rtl;");
        assert_eq!(
            body,
            &[
                "    done <= enable;",
                "    x_address <= y_address;",
                "    y <= x;",
            ]
        );
    }

    #[test]
    fn single_activation() {
        let seq = Sequential::from_designs("sequential", vec![Stub::activation("hs", 16)]).unwrap();
        assert_eq!(
            seq.connections().unwrap().to_lines(),
            vec![
                "done <= enable;",
                "i_hs_x <= x;",
                "x_address <= y_address;",
                "y <= i_hs_y;",
            ]
        );
        assert_eq!(
            seq.instantiations(),
            vec![
                "i_hs : entity work.hs(rtl)",
                "port map(",
                "    x => i_hs_x,",
                "    y => i_hs_y",
                ");",
            ]
        );
        let mut expected = vec![signal_definition("i_hs_x", 16), signal_definition("i_hs_y", 16)];
        expected.sort();
        assert_eq!(seq.signal_definitions(), expected);
        assert_eq!(
            seq.widths(),
            SequentialWidths {
                x_width: 16,
                y_width: 16,
                x_address_width: 1,
                y_address_width: 1,
            }
        );
    }

    #[test]
    fn single_buffered_layer() {
        let seq =
            Sequential::from_designs("net", vec![Stub::buffered("fc", 16, 6, 3)]).unwrap();
        assert_eq!(seq.widths().x_address_width, 3);
        assert_eq!(seq.widths().y_address_width, 2);
        let connections = seq.connections().unwrap();
        assert_eq!(connections.get("x_address"), Some("i_fc_x_address"));
        assert_eq!(connections.get("i_fc_y_address"), Some("y_address"));
        assert_eq!(connections.get("done"), Some("i_fc_done"));
        assert_eq!(seq.signal_definitions().len(), 7);
        assert_eq!(seq.port().width_of("x_address"), 3);
        assert_eq!(seq.port().width_of("y_address"), 2);
    }

    #[test]
    fn null_designs_are_skipped() {
        let designs: Vec<Box<dyn Design>> = vec![
            Stub::activation("hs", 8),
            Box::new(NullDesign::new("flatten")),
        ];
        let seq = Sequential::from_designs("net", designs).unwrap();
        assert!(seq.instantiations().iter().all(|l| !l.contains("flatten")));
        assert!(seq.signal_definitions().iter().all(|l| !l.contains("flatten")));
        assert_eq!(seq.connections().unwrap().len(), 4);
        assert_eq!(seq.widths().y_width, 8);
    }

    #[test]
    fn subdesigns_persist_below_their_name() {
        let seq = Sequential::from_designs(
            "net",
            vec![Stub::activation("a", 8), Stub::activation("b", 8)],
        )
        .unwrap();
        let root = InMemoryPath::new();
        seq.persist(&root).unwrap();
        assert_eq!(root.files(), vec!["a/a.vhd", "b/b.vhd", "net.vhd"]);
    }

    #[test]
    fn duplicate_names_rejected() {
        let result = Sequential::from_designs(
            "net",
            vec![Stub::activation("a", 8), Stub::activation("a", 8)],
        );
        assert!(matches!(result, Err(HdlError::DuplicateInstance(ref n)) if n == "a"));
    }

    #[test]
    fn width_mismatch_fails_persist_without_output() {
        let seq = Sequential::new(
            "net",
            vec![Stub::activation("a", 8)],
            SequentialWidths {
                x_width: 16,
                ..SequentialWidths::default()
            },
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = seq.persist(&OnDiskPath::new(dir.path())).unwrap_err();
        assert!(matches!(err, HdlError::WidthMismatch { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let relaxed = Sequential::new(
            "net",
            vec![Stub::activation("a", 8)],
            SequentialWidths {
                x_width: 16,
                y_width: 8,
                ..SequentialWidths::default()
            },
        )
        .unwrap()
        .with_strict_widths(false);
        assert!(relaxed.connections().is_ok());
    }

    #[test]
    fn widths_follow_the_wired_designs() {
        let seq = Sequential::from_designs(
            "net",
            vec![Stub::buffered("fc1", 8, 6, 3), Stub::activation("act", 8)],
        )
        .unwrap();
        assert_eq!(
            seq.widths(),
            SequentialWidths {
                x_width: 8,
                y_width: 8,
                x_address_width: 3,
                y_address_width: 2,
            }
        );
        let root = InMemoryPath::new();
        seq.persist(&root).unwrap();
        assert_eq!(root.files(), vec!["act/act.vhd", "fc1/fc1.vhd", "net.vhd"]);
    }

    #[test]
    fn address_widths_skip_activations() {
        let seq = Sequential::from_designs(
            "net",
            vec![Stub::activation("act", 8), Stub::buffered("fc", 8, 4, 5)],
        )
        .unwrap();
        assert_eq!(seq.widths().x_address_width, 2);
        assert_eq!(seq.widths().y_address_width, 3);
        assert!(seq.connections().is_ok());
    }

    #[test]
    fn rendering_is_deterministic() {
        let build = || {
            Sequential::from_designs(
                "net",
                vec![Stub::buffered("fc1", 8, 4, 4), Stub::activation("act", 8)],
            )
            .unwrap()
            .with_strict_widths(false)
        };
        assert_eq!(build().render().unwrap(), build().render().unwrap());
    }
}
