//! `kiln report`: decodes the `result: ` lines of a simulator log.

use kiln_fxp::FxpParams;
use kiln_testbench::{parse_reported_content, ReportConvention, ReportedValue, TestbenchError};

use crate::{ReportArgs, ReportFormat};

/// Runs the `kiln report` command.
pub fn run(args: &ReportArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("cannot read {}: {e}", args.file))?;
    let lines: Vec<&str> = content.lines().collect();
    let groups = decode(args, &lines)?;
    match args.format {
        ReportFormat::Text => {
            for line in render_text(&groups) {
                println!("{line}");
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&groups))?),
    }
    Ok(0)
}

fn decode(args: &ReportArgs, lines: &[&str]) -> Result<Vec<Vec<ReportedValue>>, TestbenchError> {
    let fxp = FxpParams::new(args.fxp.total_bits, args.fxp.frac_bits)?;
    let convention = if args.batched {
        ReportConvention::Batched
    } else {
        ReportConvention::PerLine
    };
    parse_reported_content(lines, fxp, convention)
}

/// One comma-separated line per group.
fn render_text(groups: &[Vec<ReportedValue>]) -> Vec<String> {
    groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect()
}

/// Numbers stay numbers, raw values become strings.
fn to_json(groups: &[Vec<ReportedValue>]) -> serde_json::Value {
    serde_json::Value::Array(
        groups
            .iter()
            .map(|group| {
                serde_json::Value::Array(
                    group
                        .iter()
                        .map(|value| match value {
                            ReportedValue::Number(n) => serde_json::json!(n),
                            ReportedValue::Raw(raw) => serde_json::json!(raw),
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}
