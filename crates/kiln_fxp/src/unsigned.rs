//! Unsigned integer codec for auxiliary report fields.

use crate::error::FxpError;
use kiln_common::Bits;

/// Codec for unsigned integers of a fixed width.
///
/// Used for fields that are not fixed-point data, such as the batch index
/// in a multiplexed simulator report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsignedCodec {
    width: u32,
}

/// The 8-bit codec used for batch indices in simulator reports.
pub const BATCH_INDEX_CODEC: UnsignedCodec = UnsignedCodec { width: 8 };

impl UnsignedCodec {
    /// Creates a codec for `width`-bit unsigned values (`1..=64`).
    pub const fn new(width: u32) -> Self {
        Self { width }
    }

    /// The width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Encodes a value, failing if it needs more than `width` bits.
    pub fn encode(&self, value: u64) -> Result<Bits, FxpError> {
        let max = if self.width >= 64 {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        };
        if value > max {
            return Err(FxpError::OutOfRange {
                value: value as f64,
                scaled: value as f64,
                min: 0,
                max: max.min(i64::MAX as u64) as i64,
            });
        }
        Ok(Bits::from_unsigned(value, self.width))
    }

    /// Decodes a bit string of exactly `width` bits.
    pub fn decode(&self, bits: &Bits) -> Result<u64, FxpError> {
        if bits.width() != self.width {
            return Err(FxpError::WidthMismatch {
                expected: self.width,
                actual: bits.width(),
                bits: bits.to_string(),
            });
        }
        Ok(bits.to_unsigned()?)
    }

    /// Parses and decodes a textual bit string, ignoring surrounding whitespace.
    pub fn decode_str(&self, text: &str) -> Result<u64, FxpError> {
        let bits: Bits = text.trim().parse()?;
        self.decode(&bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_codec_decodes_eight_bits() {
        assert_eq!(BATCH_INDEX_CODEC.decode_str("00000011").unwrap(), 3);
        assert_eq!(BATCH_INDEX_CODEC.decode_str("11111111").unwrap(), 255);
    }

    #[test]
    fn top_bit_is_not_a_sign() {
        assert_eq!(UnsignedCodec::new(3).decode_str("100").unwrap(), 4);
    }

    #[test]
    fn wrong_width_rejected() {
        let err = BATCH_INDEX_CODEC.decode_str("011").unwrap_err();
        assert!(matches!(err, FxpError::WidthMismatch { expected: 8, .. }));
    }

    #[test]
    fn encode_roundtrip() {
        let codec = UnsignedCodec::new(4);
        for v in 0..16 {
            assert_eq!(codec.decode(&codec.encode(v).unwrap()).unwrap(), v);
        }
        assert!(codec.encode(16).is_err());
    }
}
