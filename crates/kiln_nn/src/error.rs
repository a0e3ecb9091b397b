//! Errors raised while constructing layer designs.

use kiln_config::ConfigError;
use kiln_fxp::FxpError;
use kiln_hdl::HdlError;

/// Errors raised by layer construction and network assembly.
#[derive(Debug, thiserror::Error)]
pub enum NnError {
    /// A trained parameter does not match the declared layer shape.
    #[error("layer '{layer}': {what} has {actual} entries, expected {expected}")]
    ShapeMismatch {
        /// The offending layer.
        layer: String,
        /// Which parameter tensor, e.g. `weights[1]`.
        what: String,
        /// Entries implied by the layer shape.
        expected: usize,
        /// Entries supplied.
        actual: usize,
    },

    /// A layer shape is unusable, e.g. a kernel wider than the signal.
    #[error("layer '{layer}': {reason}")]
    InvalidShape {
        /// The offending layer.
        layer: String,
        /// Why the shape was rejected.
        reason: String,
    },

    /// A layer named by the configuration does not exist or has the wrong kind.
    #[error("no conv1d layer named '{0}'")]
    UnknownLayer(String),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A trained parameter or input cannot be quantized.
    #[error(transparent)]
    Fxp(#[from] FxpError),

    /// The composed network is structurally invalid.
    #[error(transparent)]
    Hdl(#[from] HdlError),
}
