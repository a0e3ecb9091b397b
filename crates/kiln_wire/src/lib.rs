//! Composition of designs into a connected network.
//!
//! The [`AutoWirer`] connects an ordered list of component interfaces by
//! signal name, [`Sequential`] turns that wiring into a composite VHDL
//! design, and [`Skeleton`] wraps a finished network in the host interface
//! of the target board.

#![warn(missing_docs)]

pub mod autowire;
pub mod node;
pub mod sequential;
pub mod skeleton;

pub use autowire::{AutoWirer, Connection, Connections};
pub use node::{DataFlowNode, NodeKind, OwnedSignal};
pub use sequential::{Sequential, SequentialWidths};
pub use skeleton::{Skeleton, SkeletonVersion};
