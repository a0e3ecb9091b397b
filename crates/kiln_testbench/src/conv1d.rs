//! Testbench for signal-processing layers such as conv1d.

use kiln_emit::{Destination, Parameters, Template};
use kiln_fxp::FxpParams;
use kiln_hdl::{HdlError, SignalProcessingDesign};

use crate::error::TestbenchError;
use crate::inputs::{prepare_inputs, PreparedInput, INPUTS_CSV};
use crate::report::{parse_reported_content, ReportConvention, ReportedValue};

const TESTBENCH_TEMPLATE: &str = include_str!("../templates/conv1d_testbench.tpl.vhd");

/// A testbench feeding one layer from `inputs.csv` and printing one batched
/// `result: ` line per output value.
#[derive(Debug, Clone)]
pub struct Conv1dTestbench {
    name: String,
    uut_name: String,
    fxp: FxpParams,
    signal_length: usize,
    in_channels: usize,
    output_values: usize,
    x_address_width: u32,
    y_address_width: u32,
    convention: ReportConvention,
}

impl Conv1dTestbench {
    /// Creates a testbench for `uut`, reading its shape and address widths.
    pub fn new(name: &str, uut: &dyn SignalProcessingDesign, fxp: FxpParams) -> Self {
        Self {
            name: name.to_string(),
            uut_name: uut.name().to_string(),
            fxp,
            signal_length: uut.input_length(),
            in_channels: uut.in_channels(),
            output_values: uut.output_length() * uut.out_channels(),
            x_address_width: uut.port().width_of("x_address"),
            y_address_width: uut.port().width_of("y_address"),
            convention: ReportConvention::Batched,
        }
    }

    /// Overrides how reports are parsed.
    pub fn with_convention(mut self, convention: ReportConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Entity name of the testbench.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the layer under test.
    pub fn uut_name(&self) -> &str {
        &self.uut_name
    }

    /// The report layout expected from the simulator.
    pub fn convention(&self) -> ReportConvention {
        self.convention
    }

    /// Template parameters.
    pub fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("testbench_name", self.name.as_str())
            .with("signal_length", self.signal_length.to_string())
            .with("total_bits", self.fxp.total_bits().to_string())
            .with("x_address_width", self.x_address_width.to_string())
            .with("y_address_width", self.y_address_width.to_string())
            .with("uut_name", self.uut_name.as_str())
            .with("in_channels", self.in_channels.to_string())
            .with("output_values", self.output_values.to_string())
            .with("inputs_file", INPUTS_CSV)
    }

    /// Writes `<name>.vhd` below `destination`.
    pub fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        let lines = Template::new("conv1d_testbench", TESTBENCH_TEMPLATE).render(&self.parameters())?;
        destination
            .create_subpath(&self.name)?
            .write_file(".vhd", &lines)?;
        tracing::info!(testbench = %self.name, uut = %self.uut_name, "persisted testbench");
        Ok(())
    }

    /// Encodes `[batch][channel][time step]` inputs for this testbench.
    pub fn prepare_inputs(
        &self,
        batches: &[Vec<Vec<f64>>],
    ) -> Result<Vec<PreparedInput>, TestbenchError> {
        prepare_inputs(self.fxp, batches)
    }

    /// Decodes the simulator's report with this testbench's convention.
    pub fn parse_reported_content<S: AsRef<str>>(
        &self,
        content: &[S],
    ) -> Result<Vec<Vec<ReportedValue>>, TestbenchError> {
        parse_reported_content(content, self.fxp, self.convention)
    }
}
