//! Fixed-point format parameters.

use crate::error::FxpError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported total width; scaled integers are held in an `i64`.
pub const MAX_TOTAL_BITS: u32 = 64;

/// A two's-complement fixed-point format of `total_bits` bits, `frac_bits`
/// of which are fractional.
///
/// The representable range is
/// `[-2^(total_bits-1-frac_bits), 2^(total_bits-1-frac_bits) - 2^-frac_bits]`.
/// Construction is validated, so every `FxpParams` in circulation satisfies
/// `1 <= total_bits <= 64` and `frac_bits < total_bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFxpParams", into = "RawFxpParams")]
pub struct FxpParams {
    total_bits: u32,
    frac_bits: u32,
}

/// Unvalidated wire form used for (de)serialization.
#[derive(Serialize, Deserialize)]
struct RawFxpParams {
    total_bits: i64,
    frac_bits: i64,
}

impl FxpParams {
    /// Creates a validated format.
    pub fn new(total_bits: i64, frac_bits: i64) -> Result<Self, FxpError> {
        let reject = |reason| FxpError::InvalidParams {
            total_bits,
            frac_bits,
            reason,
        };
        if total_bits < 1 {
            return Err(reject("total_bits must be at least 1"));
        }
        if total_bits > MAX_TOTAL_BITS as i64 {
            return Err(reject("total_bits must not exceed 64"));
        }
        if frac_bits < 0 {
            return Err(reject("frac_bits must not be negative"));
        }
        if frac_bits >= total_bits {
            return Err(reject("frac_bits must be smaller than total_bits"));
        }
        Ok(Self {
            total_bits: total_bits as u32,
            frac_bits: frac_bits as u32,
        })
    }

    /// Total width in bits.
    pub fn total_bits(&self) -> u32 {
        self.total_bits
    }

    /// Number of fractional bits.
    pub fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    /// Smallest representable scaled integer, `-2^(total_bits-1)`.
    pub fn min_int(&self) -> i64 {
        (-(1i128 << (self.total_bits - 1))) as i64
    }

    /// Largest representable scaled integer, `2^(total_bits-1) - 1`.
    pub fn max_int(&self) -> i64 {
        ((1i128 << (self.total_bits - 1)) - 1) as i64
    }

    /// The scale factor `2^frac_bits`.
    pub fn scale(&self) -> f64 {
        (1u64 << self.frac_bits) as f64
    }

    /// Smallest representable rational.
    pub fn min_value(&self) -> f64 {
        self.to_rational(self.min_int())
    }

    /// Largest representable rational.
    pub fn max_value(&self) -> f64 {
        self.to_rational(self.max_int())
    }

    /// Distance between two adjacent representable values, `2^-frac_bits`.
    pub fn resolution(&self) -> f64 {
        1.0 / self.scale()
    }

    /// Returns true if `scaled` lies in `[min_int, max_int]`.
    pub fn contains_int(&self, scaled: i64) -> bool {
        (self.min_int()..=self.max_int()).contains(&scaled)
    }

    /// Interprets a scaled integer as a rational, dividing by `2^frac_bits`.
    pub fn to_rational(&self, scaled: i64) -> f64 {
        scaled as f64 / self.scale()
    }
}

impl TryFrom<RawFxpParams> for FxpParams {
    type Error = FxpError;

    fn try_from(raw: RawFxpParams) -> Result<Self, Self::Error> {
        Self::new(raw.total_bits, raw.frac_bits)
    }
}

impl From<FxpParams> for RawFxpParams {
    fn from(params: FxpParams) -> Self {
        Self {
            total_bits: params.total_bits as i64,
            frac_bits: params.frac_bits as i64,
        }
    }
}

impl fmt::Display for FxpParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fxp(total_bits={}, frac_bits={})",
            self.total_bits, self.frac_bits
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_params() {
        let p = FxpParams::new(5, 2).unwrap();
        assert_eq!(p.total_bits(), 5);
        assert_eq!(p.frac_bits(), 2);
    }

    #[test]
    fn integer_range() {
        let p = FxpParams::new(5, 2).unwrap();
        assert_eq!(p.min_int(), -16);
        assert_eq!(p.max_int(), 15);
    }

    #[test]
    fn rational_range() {
        let p = FxpParams::new(5, 2).unwrap();
        assert_eq!(p.min_value(), -4.0);
        assert_eq!(p.max_value(), 3.75);
        assert_eq!(p.resolution(), 0.25);
    }

    #[test]
    fn full_width_range() {
        let p = FxpParams::new(64, 0).unwrap();
        assert_eq!(p.min_int(), i64::MIN);
        assert_eq!(p.max_int(), i64::MAX);
    }

    #[test]
    fn single_bit_format() {
        let p = FxpParams::new(1, 0).unwrap();
        assert_eq!(p.min_int(), -1);
        assert_eq!(p.max_int(), 0);
    }

    #[test]
    fn frac_bits_equal_to_total_rejected() {
        let err = FxpParams::new(4, 4).unwrap_err();
        assert!(matches!(err, FxpError::InvalidParams { .. }));
    }

    #[test]
    fn negative_frac_bits_rejected() {
        assert!(FxpParams::new(8, -1).is_err());
    }

    #[test]
    fn zero_total_bits_rejected() {
        assert!(FxpParams::new(0, 0).is_err());
    }

    #[test]
    fn oversized_total_bits_rejected() {
        assert!(FxpParams::new(65, 0).is_err());
    }

    #[test]
    fn contains_int() {
        let p = FxpParams::new(3, 0).unwrap();
        assert!(p.contains_int(-4));
        assert!(p.contains_int(3));
        assert!(!p.contains_int(4));
        assert!(!p.contains_int(-5));
    }

    #[test]
    fn display() {
        let p = FxpParams::new(16, 8).unwrap();
        assert_eq!(p.to_string(), "fxp(total_bits=16, frac_bits=8)");
    }

    #[test]
    fn serde_roundtrip() {
        let p = FxpParams::new(16, 8).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"total_bits":16,"frac_bits":8}"#);
        let back: FxpParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn deserialize_rejects_invalid() {
        let result: Result<FxpParams, _> =
            serde_json::from_str(r#"{"total_bits":4,"frac_bits":5}"#);
        assert!(result.is_err());
    }
}
