//! Conformance test helpers for the kiln compiler.
//!
//! Provides the full build pipeline (configuration → network → emitted file
//! set) as a single call, and a [`ReferenceSimulator`] that stands in for an
//! HDL simulator by answering a conv1d testbench with the software
//! reference, so the input/report round trip can be tested without `ghdl`.

#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use kiln_config::{find_conv1d, fxp_params, load_config_from_str, ConfigError, KilnConfig};
use kiln_emit::InMemoryPath;
use kiln_fxp::{FxpParams, BATCH_INDEX_CODEC};
use kiln_hdl::{Design, HdlError, SignalProcessingDesign};
use kiln_nn::{build_network, build_skeleton, conv1d_from_config, Conv1d, NnError};
use kiln_testbench::{Conv1dTestbench, Simulator, TestbenchError, INPUTS_CSV, RESULT_PREFIX};
use kiln_wire::Connections;

/// Failure anywhere in the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConformanceError {
    /// The configuration did not load.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A layer could not be built.
    #[error(transparent)]
    Nn(#[from] NnError),

    /// Wiring or emission failed.
    #[error(transparent)]
    Hdl(#[from] HdlError),
}

/// Result of running the full configuration → file set pipeline.
pub struct BuildResult {
    /// The validated configuration.
    pub config: KilnConfig,
    /// Every generated file.
    pub tree: InMemoryPath,
    /// The wiring of the top-level network.
    pub connections: Connections,
}

/// A `kiln.toml` with a `[network]` header over the given layer tables.
pub fn network_toml(total_bits: i64, frac_bits: i64, strict_widths: bool, layers: &str) -> String {
    format!(
        r#"
[network]
name = "net"
total_bits = {total_bits}
frac_bits = {frac_bits}
strict_widths = {strict_widths}

{layers}
"#
    )
}

/// Loads `toml` and generates the network, skeleton and testbench into memory.
pub fn full_build(toml: &str) -> Result<BuildResult, ConformanceError> {
    let config = load_config_from_str(toml)?;
    let tree = InMemoryPath::new();
    let network = build_network(&config)?;
    let connections = network.connections()?;
    network.persist(&tree)?;
    if let Some(skeleton) = build_skeleton(&config, &network)? {
        skeleton.persist(&tree)?;
    }
    if let Some(testbench) = &config.testbench {
        let (uut, fxp) = configured_conv1d(&config, &testbench.uut)?;
        Conv1dTestbench::new(&testbench.name, &uut, fxp).persist(&tree)?;
    }
    Ok(BuildResult {
        config,
        tree,
        connections,
    })
}

/// Builds the conv1d layer called `name` together with the network format.
pub fn configured_conv1d(
    config: &KilnConfig,
    name: &str,
) -> Result<(Conv1d, FxpParams), ConformanceError> {
    let fxp = fxp_params(config)?;
    let layer = find_conv1d(config, name)?;
    Ok((conv1d_from_config(layer, fxp, &config.build.rom_style)?, fxp))
}

/// A simulator that answers a conv1d testbench with the software reference.
///
/// It reads `inputs.csv` from the working directory and reports every output
/// value as a batched `result: <batch>,<value>` line, channel-major. Selected
/// outputs can be reported as undefined to mimic an unfinished computation.
pub struct ReferenceSimulator {
    workdir: PathBuf,
    top: String,
    layer: Conv1d,
    undefined: Vec<usize>,
    initialized: bool,
    output: Vec<String>,
}

impl ReferenceSimulator {
    /// Creates a simulator for the testbench `top` of `layer`.
    pub fn new(workdir: &Path, top: &str, layer: Conv1d) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            top: top.to_string(),
            layer,
            undefined: Vec::new(),
            initialized: false,
            output: Vec::new(),
        }
    }

    /// Reports the output at flat index `index` of every batch element with
    /// a trailing `U` status.
    pub fn with_undefined_output(mut self, index: usize) -> Self {
        self.undefined.push(index);
        self
    }

    fn failure(&self, reason: String) -> TestbenchError {
        TestbenchError::Simulator {
            command: format!("reference {}", self.top),
            reason,
        }
    }

    /// Parses `inputs.csv` into `[batch][channel][time step]` values.
    fn read_inputs(&self) -> Result<Vec<Vec<Vec<f64>>>, TestbenchError> {
        let path = self.workdir.join(INPUTS_CSV);
        let content = std::fs::read_to_string(&path).map_err(|source| TestbenchError::Io {
            path: path.clone(),
            source,
        })?;
        let mut rows = content.lines();
        let header = rows
            .next()
            .ok_or_else(|| self.failure(format!("{INPUTS_CSV} is empty")))?;
        let positions = header
            .split(',')
            .map(|name| self.signal_position(name))
            .collect::<Result<Vec<_>, _>>()?;
        let fxp = self.layer.fxp();
        let mut batches = Vec::new();
        for row in rows {
            let mut batch = vec![vec![0.0; self.layer.input_length()]; self.layer.in_channels()];
            for ((channel, step), bits) in positions.iter().zip(row.split(',')) {
                batch[*channel][*step] = fxp.decode_str(bits)?;
            }
            batches.push(batch);
        }
        Ok(batches)
    }

    /// Maps `x_<channel>_<time step>` to its indices.
    fn signal_position(&self, name: &str) -> Result<(usize, usize), TestbenchError> {
        let parsed = name.strip_prefix("x_").and_then(|rest| {
            let (channel, step) = rest.split_once('_')?;
            Some((channel.parse().ok()?, step.parse().ok()?))
        });
        match parsed {
            Some((channel, step))
                if channel < self.layer.in_channels() && step < self.layer.input_length() =>
            {
                Ok((channel, step))
            }
            _ => Err(self.failure(format!("unexpected input signal '{name}'"))),
        }
    }
}

impl Simulator for ReferenceSimulator {
    fn initialize(&mut self) -> Result<(), TestbenchError> {
        let testbench = self.workdir.join(format!("{}.vhd", self.top));
        if !testbench.is_file() {
            return Err(self.failure(format!("{} not found", testbench.display())));
        }
        self.initialized = true;
        Ok(())
    }

    fn run(&mut self) -> Result<(), TestbenchError> {
        if !self.initialized {
            return Err(self.failure("run before initialize".to_string()));
        }
        let fxp = self.layer.fxp();
        let mut output = vec![format!("simulating {}", self.top)];
        for (index, batch) in self.read_inputs()?.iter().enumerate() {
            let batch_bits = BATCH_INDEX_CODEC.encode(index as u64)?;
            let values = self
                .layer
                .forward(batch)
                .map_err(|e| self.failure(e.to_string()))?;
            for (flat, value) in values.iter().flatten().enumerate() {
                let bits = fxp.encode(*value)?;
                let status = if self.undefined.contains(&flat) { ",U" } else { "" };
                output.push(format!("{RESULT_PREFIX}{batch_bits},{bits}{status}"));
            }
        }
        output.push("simulation finished".to_string());
        self.output = output;
        Ok(())
    }

    fn reported_content(&self) -> Vec<String> {
        self.output.clone()
    }
}
