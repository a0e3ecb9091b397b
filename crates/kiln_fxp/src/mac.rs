//! Software reference for the hardware fixed-point multiply-accumulate unit.
//!
//! The hardware MAC has two rounding stages that behave differently:
//! operands are quantized round-to-nearest on the way in, while the
//! accumulated product is rescaled, clamped and truncated toward zero on the
//! way out. The functions here reproduce both stages bit for bit.

use crate::error::FxpError;
use crate::params::FxpParams;

/// Computes the MAC result as a scaled integer.
///
/// Every operand is quantized with [`FxpParams::quantize`]; an out-of-range
/// operand fails immediately. The integer dot product is divided by
/// `2^frac_bits`, clamped to `[min_int, max_int]` and rounded toward zero.
pub fn mac_int(a: &[f64], b: &[f64], params: FxpParams) -> Result<i64, FxpError> {
    if a.len() != b.len() {
        return Err(FxpError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let mut sum: i128 = 0;
    for (x, y) in a.iter().zip(b) {
        let x = params.quantize(*x)? as i128;
        let y = params.quantize(*y)? as i128;
        sum += x * y;
    }
    // Integer division truncates toward zero; the bounds are integers, so
    // truncating before clamping gives the same result as after.
    let rescaled = sum / (1i128 << params.frac_bits());
    let clamped = rescaled.clamp(params.min_int() as i128, params.max_int() as i128);
    Ok(clamped as i64)
}

/// Computes the MAC result as the rational the hardware reports.
pub fn mac(a: &[f64], b: &[f64], params: FxpParams) -> Result<f64, FxpError> {
    mac_int(a, b, params).map(|scaled| params.to_rational(scaled))
}
