//! Bit-exact conversion between rationals and fixed-point bit strings.
//!
//! Quantization scales by `2^frac_bits` and rounds to the nearest integer,
//! ties away from zero. Values whose scaled integer falls outside the format
//! are rejected, never wrapped or clamped.

use crate::error::FxpError;
use crate::params::FxpParams;
use kiln_common::Bits;

impl FxpParams {
    /// Scales `value` by `2^frac_bits`, rounds to nearest (ties away from
    /// zero) and checks the result against the representable range.
    pub fn quantize(&self, value: f64) -> Result<i64, FxpError> {
        let scaled = (value * self.scale()).round();
        let bound = 2f64.powi(self.total_bits() as i32 - 1);
        if !scaled.is_finite() || scaled < -bound || scaled >= bound {
            return Err(FxpError::OutOfRange {
                value,
                scaled,
                min: self.min_int(),
                max: self.max_int(),
            });
        }
        Ok(scaled as i64)
    }

    /// Encodes a rational as a `total_bits`-wide two's-complement bit string.
    pub fn encode(&self, value: f64) -> Result<Bits, FxpError> {
        let scaled = self.quantize(value)?;
        Ok(Bits::from_signed(scaled, self.total_bits()))
    }

    /// Encodes an already scaled integer.
    pub fn encode_int(&self, scaled: i64) -> Result<Bits, FxpError> {
        if !self.contains_int(scaled) {
            return Err(FxpError::OutOfRange {
                value: self.to_rational(scaled),
                scaled: scaled as f64,
                min: self.min_int(),
                max: self.max_int(),
            });
        }
        Ok(Bits::from_signed(scaled, self.total_bits()))
    }

    /// Decodes a bit string to its scaled integer.
    pub fn decode_int(&self, bits: &Bits) -> Result<i64, FxpError> {
        if bits.width() != self.total_bits() {
            return Err(FxpError::WidthMismatch {
                expected: self.total_bits(),
                actual: bits.width(),
                bits: bits.to_string(),
            });
        }
        Ok(bits.to_signed()?)
    }

    /// Decodes a bit string to the rational it represents.
    pub fn decode(&self, bits: &Bits) -> Result<f64, FxpError> {
        Ok(self.to_rational(self.decode_int(bits)?))
    }

    /// Parses and decodes a textual bit string such as `"0101"`.
    ///
    /// Surrounding whitespace is ignored.
    pub fn decode_str(&self, text: &str) -> Result<f64, FxpError> {
        let bits: Bits = text.trim().parse()?;
        self.decode(&bits)
    }

    /// Returns the representable value nearest to `value`.
    pub fn round_trip(&self, value: f64) -> Result<f64, FxpError> {
        self.quantize(value).map(|scaled| self.to_rational(scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fxp(total: i64, frac: i64) -> FxpParams {
        FxpParams::new(total, frac).unwrap()
    }

    #[test]
    fn encode_positive() {
        assert_eq!(fxp(3, 0).encode(2.0).unwrap().to_string(), "010");
        assert_eq!(fxp(4, 1).encode(0.5).unwrap().to_string(), "0001");
    }

    #[test]
    fn encode_negative() {
        assert_eq!(fxp(3, 0).encode(-1.0).unwrap().to_string(), "111");
        assert_eq!(fxp(4, 1).encode(-0.5).unwrap().to_string(), "1111");
        assert_eq!(fxp(5, 2).encode(-4.0).unwrap().to_string(), "10000");
    }

    #[test]
    fn encode_rounds_to_nearest() {
        let p = fxp(8, 2);
        assert_eq!(p.quantize(0.3).unwrap(), 1);
        assert_eq!(p.quantize(0.4).unwrap(), 2);
        assert_eq!(p.quantize(-0.3).unwrap(), -1);
    }

    #[test]
    fn encode_ties_away_from_zero() {
        let p = fxp(8, 1);
        assert_eq!(p.quantize(0.25).unwrap(), 1);
        assert_eq!(p.quantize(-0.25).unwrap(), -1);
        assert_eq!(p.quantize(0.75).unwrap(), 2);
        assert_eq!(p.quantize(-0.75).unwrap(), -2);
    }

    #[test]
    fn encode_out_of_range() {
        let p = fxp(5, 2);
        let err = p.encode(4.0).unwrap_err();
        assert_eq!(
            err,
            FxpError::OutOfRange {
                value: 4.0,
                scaled: 16.0,
                min: -16,
                max: 15
            }
        );
        assert!(p.encode(-4.25).is_err());
        assert!(p.encode(3.75).is_ok());
        assert!(p.encode(-4.0).is_ok());
    }

    #[test]
    fn rounding_into_range_is_accepted() {
        // 3.8 * 4 = 15.2 rounds to 15, which fits.
        assert_eq!(fxp(5, 2).quantize(3.8).unwrap(), 15);
        // 3.9 * 4 = 15.6 rounds to 16, which does not.
        assert!(fxp(5, 2).quantize(3.9).is_err());
    }

    #[test]
    fn encode_non_finite() {
        assert!(fxp(8, 0).encode(f64::NAN).is_err());
        assert!(fxp(8, 0).encode(f64::INFINITY).is_err());
    }

    #[test]
    fn encode_full_width() {
        let p = fxp(64, 0);
        assert!(p.encode(9.3e18).is_err());
        assert_eq!(p.encode_int(i64::MIN).unwrap().to_signed().unwrap(), i64::MIN);
    }

    #[test]
    fn decode_examples() {
        assert_eq!(fxp(3, 0).decode_str("010").unwrap(), 2.0);
        assert_eq!(fxp(3, 0).decode_str("111").unwrap(), -1.0);
        assert_eq!(fxp(4, 1).decode_str("0001").unwrap(), 0.5);
        assert_eq!(fxp(4, 1).decode_str(" 1111 ").unwrap(), -0.5);
    }

    #[test]
    fn decode_wrong_width() {
        let err = fxp(4, 1).decode_str("010").unwrap_err();
        assert!(matches!(err, FxpError::WidthMismatch { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn decode_undefined_bits() {
        let err = fxp(3, 0).decode_str("0U1").unwrap_err();
        assert!(matches!(err, FxpError::InvalidBits(_)));
    }

    #[test]
    fn int_roundtrip_exhaustive() {
        for total in 1..=8 {
            for frac in 0..total {
                let p = fxp(total, frac);
                for k in p.min_int()..=p.max_int() {
                    let bits = p.encode_int(k).unwrap();
                    assert_eq!(p.decode_int(&bits).unwrap(), k, "{p} k={k}");
                    assert_eq!(p.quantize(p.decode(&bits).unwrap()).unwrap(), k);
                }
            }
        }
    }

    #[test]
    fn bits_idempotence_exhaustive() {
        for total in 1..=8u32 {
            for frac in 0..total {
                let p = fxp(total as i64, frac as i64);
                for raw in 0..(1u64 << total) {
                    let bits = Bits::from_unsigned(raw, total);
                    let value = p.decode(&bits).unwrap();
                    assert_eq!(p.encode(value).unwrap(), bits, "{p} bits={bits}");
                }
            }
        }
    }

    #[test]
    fn round_trip_is_nearest_representable() {
        let p = fxp(8, 3);
        assert_eq!(p.round_trip(1.06).unwrap(), 1.0);
        assert_eq!(p.round_trip(1.07).unwrap(), 1.125);
        assert_eq!(p.round_trip(-2.5).unwrap(), -2.5);
    }

    #[test]
    fn encode_int_out_of_range() {
        assert!(fxp(3, 0).encode_int(4).is_err());
        assert!(fxp(3, 0).encode_int(-5).is_err());
    }
}
