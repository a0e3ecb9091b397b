//! Error types for fixed-point conversion and arithmetic.

use kiln_common::BitsError;

/// Errors raised by the fixed-point codec and the reference MAC.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FxpError {
    /// The fixed-point format itself is malformed.
    #[error("invalid fixed-point format (total_bits={total_bits}, frac_bits={frac_bits}): {reason}")]
    InvalidParams {
        /// Requested total width.
        total_bits: i64,
        /// Requested number of fractional bits.
        frac_bits: i64,
        /// Why the combination was rejected.
        reason: &'static str,
    },

    /// A value's scaled integer does not fit the format.
    #[error("value {value} scales to {scaled}, outside the representable range [{min}, {max}]")]
    OutOfRange {
        /// The rational value as supplied.
        value: f64,
        /// The value after scaling and rounding.
        scaled: f64,
        /// Smallest representable integer.
        min: i64,
        /// Largest representable integer.
        max: i64,
    },

    /// A bit string has the wrong width for the format.
    #[error("expected {expected} bits, got {actual} in \"{bits}\"")]
    WidthMismatch {
        /// Width required by the format.
        expected: u32,
        /// Width of the supplied bit string.
        actual: u32,
        /// The supplied bit string.
        bits: String,
    },

    /// A bit string could not be parsed or contains undefined values.
    #[error("invalid bit string: {0}")]
    InvalidBits(#[from] BitsError),

    /// Two operand vectors have different lengths.
    #[error("operand length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Length of the left operand.
        left: usize,
        /// Length of the right operand.
        right: usize,
    },
}
