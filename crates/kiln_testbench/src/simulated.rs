//! A layer evaluated by simulating its hardware.

use std::path::{Path, PathBuf};

use crate::conv1d::Conv1dTestbench;
use crate::error::TestbenchError;
use crate::inputs::write_inputs_csv;
use crate::report::ReportedValue;
use crate::simulator::Simulator;

/// Evaluates a layer by running its testbench in an external simulator.
///
/// The sources of the layer and the testbench must already be persisted
/// below the working directory.
pub struct SimulatedLayer<'a, F> {
    testbench: &'a Conv1dTestbench,
    working_dir: PathBuf,
    make_simulator: F,
}

impl<'a, F, S> SimulatedLayer<'a, F>
where
    F: Fn(&Path, &str) -> S,
    S: Simulator,
{
    /// `make_simulator` receives the working directory and the top-level
    /// design name.
    pub fn new(testbench: &'a Conv1dTestbench, working_dir: &Path, make_simulator: F) -> Self {
        Self {
            testbench,
            working_dir: working_dir.to_path_buf(),
            make_simulator,
        }
    }

    /// Writes the inputs, runs the simulation and decodes the report.
    #[tracing::instrument(skip_all, fields(testbench = %self.testbench.name()))]
    pub fn call(&self, batches: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<ReportedValue>>, TestbenchError> {
        let prepared = self.testbench.prepare_inputs(batches)?;
        write_inputs_csv(&self.working_dir, &prepared)?;
        let mut simulator = (self.make_simulator)(&self.working_dir, self.testbench.name());
        simulator.initialize()?;
        simulator.run()?;
        self.testbench
            .parse_reported_content(&simulator.reported_content())
    }
}
