//! Error types for testbench preparation, simulation and report parsing.

use std::path::PathBuf;

use kiln_fxp::FxpError;
use kiln_hdl::HdlError;

/// Errors raised while testing a design against its software reference.
#[derive(Debug, thiserror::Error)]
pub enum TestbenchError {
    /// The simulator report contains no `result: ` line.
    #[error("no result lines in simulator report:\n{}", content.join("\n"))]
    NoResults {
        /// The raw report, surfaced for diagnosis.
        content: Vec<String>,
    },

    /// A `result: ` line does not follow the expected convention.
    #[error("malformed result line: {line}")]
    MalformedLine {
        /// The offending line.
        line: String,
    },

    /// An input could not be encoded or a reported value decoded.
    #[error(transparent)]
    Fxp(#[from] FxpError),

    /// The testbench could not be rendered or written.
    #[error(transparent)]
    Hdl(#[from] HdlError),

    /// A file in the working directory could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The simulator could not be started or exited unsuccessfully.
    #[error("simulator command `{command}` failed: {reason}")]
    Simulator {
        /// The command line that was run.
        command: String,
        /// Exit status or spawn error, followed by captured output.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_results_surfaces_content() {
        let err = TestbenchError::NoResults {
            content: vec!["ghdl: compilation error".into(), "line 2".into()],
        };
        assert_eq!(
            err.to_string(),
            "no result lines in simulator report:\nghdl: compilation error\nline 2"
        );
    }

    #[test]
    fn malformed_line_display() {
        let err = TestbenchError::MalformedLine {
            line: "result: 0101".into(),
        };
        assert_eq!(err.to_string(), "malformed result line: result: 0101");
    }

    #[test]
    fn simulator_display() {
        let err = TestbenchError::Simulator {
            command: "ghdl -r tb".into(),
            reason: "exit status: 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "simulator command `ghdl -r tb` failed: exit status: 1"
        );
    }
}
