//! VHDL code building blocks.
//!
//! [`language`] models the few VHDL constructs generators assemble
//! programmatically (packages, typed port signals, entities, architectures)
//! and [`DesignBuilder`] renders them into one file. [`code`] holds the line
//! helpers used by composite designs: signal declarations, component
//! instantiations and connections.

mod builder;
pub mod code;
pub mod language;

pub use builder::DesignBuilder;
pub use code::{create_connections, create_instance, create_signal_definitions, signal_definition};
pub use language::{ieee, Architecture, Entity, VhdlPackage, VhdlSignal, VhdlType};
