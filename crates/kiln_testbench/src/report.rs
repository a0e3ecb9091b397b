//! Decoding of simulator reports.
//!
//! Testbenches print one `result: ...` line per output value. Two layouts
//! exist: plain lines holding one or more comma-separated values, and
//! batched lines `result: <batch>,<value>[,<status>]` whose first field is an
//! 8-bit unsigned batch index. Every other line is ignored.

use std::fmt;

use kiln_common::Bits;
use kiln_fxp::{FxpParams, BATCH_INDEX_CODEC};

use crate::error::TestbenchError;

/// Prefix marking a reported value.
pub const RESULT_PREFIX: &str = "result: ";

/// Layout of the `result: ` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportConvention {
    /// Every value of every line belongs to one group.
    #[default]
    PerLine,
    /// Values are grouped by a leading batch index.
    Batched,
}

/// One reported value.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportedValue {
    /// A decoded rational.
    Number(f64),
    /// A value that could not be decoded, e.g. with undefined bits, kept
    /// verbatim.
    Raw(String),
}

impl ReportedValue {
    /// The decoded number, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ReportedValue::Number(value) => Some(*value),
            ReportedValue::Raw(_) => None,
        }
    }
}

impl fmt::Display for ReportedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportedValue::Number(value) => write!(f, "{value}"),
            ReportedValue::Raw(text) => write!(f, "{text}"),
        }
    }
}

/// Decodes a value field, keeping it raw if any bit is undefined.
fn decode_value(fxp: FxpParams, field: &str) -> Result<ReportedValue, TestbenchError> {
    let field = field.trim();
    let bits: Bits = field.parse().map_err(kiln_fxp::FxpError::from)?;
    if !bits.is_defined() {
        return Ok(ReportedValue::Raw(field.to_string()));
    }
    Ok(ReportedValue::Number(fxp.decode(&bits)?))
}

/// Decodes the `result: ` lines of a simulator report into groups.
///
/// With [`ReportConvention::PerLine`] the result is a single group holding
/// every value in report order. With [`ReportConvention::Batched`] there is
/// one group per batch index, in order of first appearance; a value followed
/// by a status field is reported as [`ReportedValue::Raw`].
///
/// A report without any `result: ` line is an error carrying the raw
/// content.
pub fn parse_reported_content<S: AsRef<str>>(
    content: &[S],
    fxp: FxpParams,
    convention: ReportConvention,
) -> Result<Vec<Vec<ReportedValue>>, TestbenchError> {
    let results: Vec<&str> = content
        .iter()
        .filter_map(|line| line.as_ref().trim().strip_prefix(RESULT_PREFIX))
        .collect();
    if results.is_empty() {
        return Err(TestbenchError::NoResults {
            content: content.iter().map(|l| l.as_ref().to_string()).collect(),
        });
    }
    match convention {
        ReportConvention::PerLine => {
            let mut group = Vec::new();
            for result in results {
                for field in result.split(',') {
                    group.push(decode_value(fxp, field)?);
                }
            }
            Ok(vec![group])
        }
        ReportConvention::Batched => {
            let mut groups: Vec<(u64, Vec<ReportedValue>)> = Vec::new();
            for result in results {
                let fields: Vec<&str> = result.split(',').collect();
                let (batch, value, status) = match fields.as_slice() {
                    [batch, value] => (batch, value, None),
                    [batch, value, status] => (batch, value, Some(status)),
                    _ => {
                        return Err(TestbenchError::MalformedLine {
                            line: format!("{RESULT_PREFIX}{result}"),
                        })
                    }
                };
                let batch = BATCH_INDEX_CODEC.decode_str(batch)?;
                let value = match status {
                    Some(_) => ReportedValue::Raw(value.trim().to_string()),
                    None => decode_value(fxp, value)?,
                };
                match groups.iter_mut().find(|(index, _)| *index == batch) {
                    Some((_, group)) => group.push(value),
                    None => groups.push((batch, vec![value])),
                }
            }
            tracing::debug!(batches = groups.len(), "decoded batched report");
            Ok(groups.into_iter().map(|(_, group)| group).collect())
        }
    }
}
