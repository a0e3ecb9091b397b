//! Hardware description model for kiln.
//!
//! This crate defines the component interface vocabulary shared by every
//! generator: [`Signal`]s grouped into a [`Port`], the standard buffered
//! signal set in [`std_signals`], the [`Design`] trait that concrete
//! components implement, and the small VHDL building blocks in [`vhdl`] used
//! to render declarations, instantiations and connections.

#![warn(missing_docs)]

pub mod design;
pub mod error;
pub mod port;
pub mod signal;
pub mod std_signals;
pub mod vhdl;

pub use design::{Design, NullDesign, SignalProcessingDesign};
pub use error::HdlError;
pub use port::{create_null_port, create_port, Port};
pub use signal::{Direction, Signal};
