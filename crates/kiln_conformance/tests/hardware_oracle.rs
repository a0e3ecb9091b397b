//! Integration tests for the hardware/software oracle round trip.
//!
//! A conv1d layer is built from configuration and flushed to disk with its
//! testbench. Inputs go through the codec and `inputs.csv`, a reference
//! simulator answers with `result: ` lines, and the decoded report is
//! compared against the fixed-point MAC computed independently here.

use std::path::Path;

use kiln_conformance::{configured_conv1d, full_build, network_toml, ReferenceSimulator};
use kiln_fxp::FxpParams;
use kiln_testbench::{Conv1dTestbench, ReportedValue, SimulatedLayer, TestbenchError};

const CONV: &str = r#"
[[layers]]
kind = "conv1d"
name = "c1"
in_channels = 1
out_channels = 2
signal_length = 4
kernel_size = 2
weights = [[[0.5, -0.5]], [[1, 1]]]
bias = [0.25, 0]

[testbench]
name = "c1_tb"
uut = "c1"
"#;

const WEIGHTS: [[f64; 2]; 2] = [[0.5, -0.5], [1.0, 1.0]];
const BIAS: [f64; 2] = [0.25, 0.0];

/// Builds the design into a temporary directory and returns its testbench.
fn flushed_build() -> (tempfile::TempDir, Conv1dTestbench, kiln_nn::Conv1d) {
    let result = full_build(&network_toml(8, 4, true, CONV)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    result.tree.flush_to(dir.path(), "test").unwrap();
    let (conv, fxp) = configured_conv1d(&result.config, "c1").unwrap();
    let testbench = Conv1dTestbench::new("c1_tb", &conv, fxp);
    (dir, testbench, conv)
}

/// Output of one batch element, computed with the reference MAC.
fn expected(fxp: FxpParams, signal: &[f64]) -> Vec<f64> {
    let mut out = Vec::new();
    for (weights, bias) in WEIGHTS.iter().zip(BIAS) {
        for window in signal.windows(2) {
            let sum = kiln_fxp::mac_int(window, weights, fxp).unwrap();
            let biased = (sum + fxp.quantize(bias).unwrap()).clamp(fxp.min_int(), fxp.max_int());
            out.push(fxp.to_rational(biased));
        }
    }
    out
}

fn numbers(group: &[ReportedValue]) -> Vec<f64> {
    group.iter().map(|v| v.as_number().unwrap()).collect()
}

// ===========================================================================
// Category A: Agreement with the reference MAC
// ===========================================================================

#[test]
fn simulated_layer_matches_reference_mac() {
    let (dir, testbench, conv) = flushed_build();
    let layer = SimulatedLayer::new(&testbench, dir.path(), |workdir: &Path, top: &str| {
        ReferenceSimulator::new(workdir, top, conv.clone())
    });
    let signals = [vec![0.5, 1.0, -0.25, 2.0], vec![-1.0, 0.0, 0.75, 0.125]];
    let batches: Vec<Vec<Vec<f64>>> = signals.iter().map(|s| vec![s.clone()]).collect();
    let groups = layer.call(&batches).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(numbers(&groups[0]), vec![0.0, 0.875, -0.875, 1.5, 0.75, 1.75]);
    let fxp = FxpParams::new(8, 4).unwrap();
    for (group, signal) in groups.iter().zip(&signals) {
        assert_eq!(numbers(group), expected(fxp, signal));
    }
}

#[test]
fn saturated_outputs_agree() {
    let (dir, testbench, conv) = flushed_build();
    let layer = SimulatedLayer::new(&testbench, dir.path(), |workdir: &Path, top: &str| {
        ReferenceSimulator::new(workdir, top, conv.clone())
    });
    let signal = vec![7.0, 7.0, -8.0, -8.0];
    let groups = layer.call(&[vec![signal.clone()]]).unwrap();
    let values = numbers(&groups[0]);
    assert_eq!(values, expected(FxpParams::new(8, 4).unwrap(), &signal));
    // 7 + 7 and -8 + -8 clamp to the format bounds
    assert_eq!(values[3], 7.9375);
    assert_eq!(values[5], -8.0);
}

#[test]
fn inputs_csv_is_left_for_inspection() {
    let (dir, testbench, conv) = flushed_build();
    let layer = SimulatedLayer::new(&testbench, dir.path(), |workdir: &Path, top: &str| {
        ReferenceSimulator::new(workdir, top, conv.clone())
    });
    layer.call(&[vec![vec![0.5, 1.0, -0.25, 2.0]]]).unwrap();
    let csv = std::fs::read_to_string(dir.path().join("inputs.csv")).unwrap();
    assert_eq!(
        csv,
        "x_0_0,x_0_1,x_0_2,x_0_3\n00001000,00010000,11111100,00100000\n"
    );
}

// ===========================================================================
// Category B: Reports the oracle cannot decode
// ===========================================================================

#[test]
fn undefined_output_is_kept_raw() {
    let (dir, testbench, conv) = flushed_build();
    let layer = SimulatedLayer::new(&testbench, dir.path(), |workdir: &Path, top: &str| {
        ReferenceSimulator::new(workdir, top, conv.clone()).with_undefined_output(1)
    });
    let groups = layer.call(&[vec![vec![0.5, 1.0, -0.25, 2.0]]]).unwrap();
    assert_eq!(groups[0][0], ReportedValue::Number(0.0));
    assert_eq!(groups[0][1], ReportedValue::Raw("00001110".to_string()));
    assert_eq!(groups[0].len(), 6);
}

#[test]
fn missing_testbench_fails_to_initialize() {
    let (_build, testbench, conv) = flushed_build();
    let empty = tempfile::tempdir().unwrap();
    let layer = SimulatedLayer::new(&testbench, empty.path(), |workdir: &Path, top: &str| {
        ReferenceSimulator::new(workdir, top, conv.clone())
    });
    let err = layer.call(&[vec![vec![0.0; 4]]]).unwrap_err();
    match err {
        TestbenchError::Simulator { command, reason } => {
            assert_eq!(command, "reference c1_tb");
            assert!(reason.contains("c1_tb.vhd"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unrepresentable_input_fails_before_simulation() {
    let (dir, testbench, conv) = flushed_build();
    let layer = SimulatedLayer::new(&testbench, dir.path(), |workdir: &Path, top: &str| {
        ReferenceSimulator::new(workdir, top, conv.clone())
    });
    let err = layer.call(&[vec![vec![9.0, 0.0, 0.0, 0.0]]]).unwrap_err();
    assert!(matches!(err, TestbenchError::Fxp(_)));
    assert!(!dir.path().join("inputs.csv").exists());
}
