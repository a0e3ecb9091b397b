//! Encoding of test inputs into per-signal bit strings.

use std::path::{Path, PathBuf};

use kiln_common::Bits;
use kiln_fxp::FxpParams;

use crate::error::TestbenchError;

/// File name the testbench reads its inputs from.
pub const INPUTS_CSV: &str = "inputs.csv";

/// The encoded inputs of one batch element, in signal order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreparedInput {
    signals: Vec<(String, Bits)>,
}

impl PreparedInput {
    /// Signal names and values, channel-major then time-major.
    pub fn signals(&self) -> &[(String, Bits)] {
        &self.signals
    }

    /// Looks up a signal such as `x_0_3`.
    pub fn get(&self, name: &str) -> Option<&Bits> {
        self.signals
            .iter()
            .find(|(signal, _)| signal == name)
            .map(|(_, bits)| bits)
    }

    /// Number of encoded values.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Whether no values were encoded.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Encodes `[batch][channel][time step]` values.
///
/// Each batch element yields one [`PreparedInput`] whose signals are named
/// `x_<channel>_<time step>`. Any value outside the format fails the whole
/// call.
pub fn prepare_inputs(
    fxp: FxpParams,
    batches: &[Vec<Vec<f64>>],
) -> Result<Vec<PreparedInput>, TestbenchError> {
    let mut prepared = Vec::with_capacity(batches.len());
    for batch in batches {
        let mut signals = Vec::new();
        for (channel_id, channel) in batch.iter().enumerate() {
            for (time_step_id, value) in channel.iter().enumerate() {
                signals.push((format!("x_{channel_id}_{time_step_id}"), fxp.encode(*value)?));
            }
        }
        prepared.push(PreparedInput { signals });
    }
    Ok(prepared)
}

/// Writes the prepared inputs to `<dir>/inputs.csv`.
///
/// The first row holds the signal names of the first batch element, each
/// following row the bit strings of one element.
pub fn write_inputs_csv(dir: &Path, prepared: &[PreparedInput]) -> Result<PathBuf, TestbenchError> {
    let path = dir.join(INPUTS_CSV);
    let mut rows = Vec::with_capacity(prepared.len() + 1);
    if let Some(first) = prepared.first() {
        rows.push(
            first
                .signals
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    for input in prepared {
        rows.push(
            input
                .signals
                .iter()
                .map(|(_, bits)| bits.to_string())
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    let mut content = rows.join("\n");
    content.push('\n');
    std::fs::create_dir_all(dir)
        .and_then(|_| std::fs::write(&path, content))
        .map_err(|source| TestbenchError::Io {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(path = %path.display(), batches = prepared.len(), "wrote testbench inputs");
    Ok(path)
}
