//! Structural errors raised while building ports and composing designs.

use kiln_emit::EmitError;

use crate::signal::Direction;

/// Errors produced by the hardware model and by design persistence.
#[derive(Debug, thiserror::Error)]
pub enum HdlError {
    /// Two signals of one direction group share a name.
    #[error("duplicate {direction} signal '{name}'")]
    DuplicateSignal {
        /// The repeated signal name.
        name: String,
        /// The direction group it was repeated in.
        direction: Direction,
    },

    /// A signal was placed in the wrong direction group.
    #[error("signal '{name}' declared {declared} but listed as {expected}")]
    DirectionMismatch {
        /// The signal name.
        name: String,
        /// Direction stored on the signal.
        declared: Direction,
        /// Direction of the group it was listed in.
        expected: Direction,
    },

    /// An auto-wired sink and its chosen source disagree on width.
    #[error("width mismatch wiring '{sink}' ({sink_width} bits) <= '{driver}' ({driver_width} bits)")]
    WidthMismatch {
        /// Qualified sink name.
        sink: String,
        /// Qualified name of the driving source.
        driver: String,
        /// Width of the sink.
        sink_width: u32,
        /// Width of the driving source.
        driver_width: u32,
    },

    /// Two sub-designs of one composition share a name.
    #[error("duplicate design name '{0}' in composition")]
    DuplicateInstance(String),

    /// A skeleton id has the wrong number of bytes for its version.
    #[error("skeleton {version} requires an id of {expected} byte(s), got {actual}")]
    InvalidSkeletonId {
        /// Version tag, `v1` or `v2`.
        version: String,
        /// Required id length in bytes.
        expected: usize,
        /// Supplied id length in bytes.
        actual: usize,
    },

    /// An unrecognized skeleton version tag.
    #[error("skeleton version '{0}' does not exist")]
    UnknownSkeletonVersion(String),

    /// Rendering or writing a generated file failed.
    #[error(transparent)]
    Emit(#[from] EmitError),
}
