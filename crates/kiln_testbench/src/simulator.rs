//! External HDL simulators.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::TestbenchError;

/// A simulator run over the sources in one working directory.
///
/// Calls block until the external process exits; timeouts and retries are
/// left to the implementation.
pub trait Simulator {
    /// Imports and compiles the sources.
    fn initialize(&mut self) -> Result<(), TestbenchError>;

    /// Runs the top-level design.
    fn run(&mut self) -> Result<(), TestbenchError>;

    /// Lines printed by the last run.
    fn reported_content(&self) -> Vec<String>;
}

/// Drives the `ghdl` command-line simulator.
#[derive(Debug, Clone)]
pub struct GhdlSimulator {
    workdir: PathBuf,
    top_design_name: String,
    program: String,
    standard: String,
    output: Vec<String>,
}

impl GhdlSimulator {
    /// Creates a runner for `top_design_name` in `workdir`.
    pub fn new(workdir: &Path, top_design_name: &str) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            top_design_name: top_design_name.to_string(),
            program: "ghdl".to_string(),
            standard: "08".to_string(),
            output: Vec::new(),
        }
    }

    /// Uses another executable, e.g. an absolute path to `ghdl`.
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    /// Selects the VHDL standard passed as `--std`.
    pub fn with_standard(mut self, standard: &str) -> Self {
        self.standard = standard.to_string();
        self
    }

    fn execute(&self, args: &[String]) -> Result<Vec<String>, TestbenchError> {
        let command_line = format!("{} {}", self.program, args.join(" "));
        tracing::debug!(command = %command_line, workdir = %self.workdir.display(), "running simulator");
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| TestbenchError::Simulator {
                command: command_line.clone(),
                reason: e.to_string(),
            })?;
        let mut lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();
        lines.extend(String::from_utf8_lossy(&output.stderr).lines().map(str::to_string));
        if !output.status.success() {
            return Err(TestbenchError::Simulator {
                command: command_line,
                reason: format!("{}\n{}", output.status, lines.join("\n")),
            });
        }
        Ok(lines)
    }

    fn std_flag(&self) -> String {
        format!("--std={}", self.standard)
    }
}

impl Simulator for GhdlSimulator {
    fn initialize(&mut self) -> Result<(), TestbenchError> {
        let mut sources = Vec::new();
        collect_sources(&self.workdir, &self.workdir, &mut sources)?;
        sources.sort();
        let mut import = vec!["-i".to_string(), self.std_flag()];
        import.extend(sources);
        self.execute(&import)?;
        self.execute(&[
            "-m".to_string(),
            self.std_flag(),
            self.top_design_name.clone(),
        ])?;
        Ok(())
    }

    fn run(&mut self) -> Result<(), TestbenchError> {
        self.output = self.execute(&[
            "-r".to_string(),
            self.std_flag(),
            self.top_design_name.clone(),
        ])?;
        tracing::info!(top = %self.top_design_name, lines = self.output.len(), "simulation finished");
        Ok(())
    }

    fn reported_content(&self) -> Vec<String> {
        self.output.clone()
    }
}

/// Collects every `.vhd` file below `dir`, relative to `root`.
fn collect_sources(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<(), TestbenchError> {
    let io_err = |source| TestbenchError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_sources(root, &path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "vhd") {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            out.push(relative.to_string_lossy().into_owned());
        }
    }
    Ok(())
}
