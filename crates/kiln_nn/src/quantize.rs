//! Shape checks and quantization of trained parameters.

use kiln_fxp::FxpParams;

use crate::error::NnError;

/// Fails unless `values` has exactly `expected` entries.
pub(crate) fn check_len<T>(
    layer: &str,
    what: &str,
    values: &[T],
    expected: usize,
) -> Result<(), NnError> {
    if values.len() != expected {
        return Err(NnError::ShapeMismatch {
            layer: layer.to_string(),
            what: what.to_string(),
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Quantizes every value, failing on the first unrepresentable one.
pub(crate) fn quantize_all(fxp: FxpParams, values: &[f64]) -> Result<Vec<i64>, NnError> {
    values
        .iter()
        .map(|v| fxp.quantize(*v).map_err(NnError::from))
        .collect()
}

/// Quantizes `value`, saturating at the format bounds instead of failing.
///
/// Used for constants baked into activation functions, where a threshold
/// outside the format simply means the branch is unreachable.
pub(crate) fn quantize_saturating(fxp: FxpParams, value: f64) -> i64 {
    let scaled = (value * fxp.scale()).round();
    if scaled <= fxp.min_int() as f64 {
        fxp.min_int()
    } else if scaled >= fxp.max_int() as f64 {
        fxp.max_int()
    } else {
        scaled as i64
    }
}

/// A bias vector, defaulting to zeros when none was trained.
pub(crate) fn bias_or_zeros(
    layer: &str,
    fxp: FxpParams,
    bias: &[f64],
    len: usize,
) -> Result<Vec<i64>, NnError> {
    if bias.is_empty() {
        return Ok(vec![0; len]);
    }
    check_len(layer, "bias", bias, len)?;
    quantize_all(fxp, bias)
}

/// One output of a biased fixed-point dot product, as a scaled integer.
///
/// The weighted sum follows [`kiln_fxp::mac_int`]; the bias is then added
/// with saturation at the format bounds.
pub(crate) fn biased_mac(
    fxp: FxpParams,
    inputs: &[f64],
    weights: &[i64],
    bias: i64,
) -> Result<i64, NnError> {
    let weights: Vec<f64> = weights.iter().map(|w| fxp.to_rational(*w)).collect();
    let sum = kiln_fxp::mac_int(inputs, &weights, fxp)?;
    Ok(sum.saturating_add(bias).clamp(fxp.min_int(), fxp.max_int()))
}
