//! Hardware/software equivalence testing for generated layers.
//!
//! A [`Conv1dTestbench`] wraps a layer under test. Inputs are encoded with
//! the fixed-point codec ([`prepare_inputs`]) and written as CSV for the
//! testbench to read; a [`Simulator`] compiles and runs the design; the
//! textual `result: ...` lines it reports are decoded back into rationals
//! ([`parse_reported_content`]). [`SimulatedLayer`] drives the whole round.

#![warn(missing_docs)]

pub mod conv1d;
pub mod error;
pub mod inputs;
pub mod report;
pub mod simulated;
pub mod simulator;

pub use conv1d::Conv1dTestbench;
pub use error::TestbenchError;
pub use inputs::{prepare_inputs, write_inputs_csv, PreparedInput, INPUTS_CSV};
pub use report::{parse_reported_content, ReportConvention, ReportedValue, RESULT_PREFIX};
pub use simulated::SimulatedLayer;
pub use simulator::{GhdlSimulator, Simulator};
