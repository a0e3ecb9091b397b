//! Quantized neural-network layer designs.
//!
//! Every layer implements [`kiln_hdl::Design`]: it exposes the standard
//! auto-wiring port and persists its VHDL entity together with any ROMs
//! holding its trained parameters. Parameters arrive as rationals and are
//! quantized with the fixed-point codec when the layer is constructed, so an
//! unrepresentable weight fails before anything is written.
//!
//! [`build_network`] turns a loaded `kiln.toml` into a [`kiln_wire::Sequential`]
//! composition of these layers.

#![warn(missing_docs)]

pub mod activation;
pub mod conv1d;
pub mod error;
pub mod linear;
pub mod mac;
pub mod network;
mod quantize;

pub use activation::{HardSigmoid, Silu};
pub use conv1d::Conv1d;
pub use error::NnError;
pub use linear::Linear;
pub use mac::{FxpMac, FXP_MAC_NAME};
pub use network::{build_network, build_skeleton, conv1d_from_config, layer_from_config};
