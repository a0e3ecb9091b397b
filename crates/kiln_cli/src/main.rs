//! kiln CLI, the command-line interface for the kiln quantized-circuit compiler.
//!
//! Provides `kiln build` for generating the VHDL of a configured network,
//! `kiln encode`, `kiln decode` and `kiln mac` for working with the
//! fixed-point format by hand, and `kiln report` for decoding the output of a
//! simulated testbench.

#![warn(missing_docs)]

mod build;
mod fxp;
mod pipeline;
mod report;

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// kiln, a compiler from quantized networks to VHDL.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "kiln quantized-circuit compiler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the VHDL sources of the configured network.
    Build(BuildArgs),
    /// Encode rationals as fixed-point bit strings.
    Encode(EncodeArgs),
    /// Decode fixed-point bit strings to rationals.
    Decode(DecodeArgs),
    /// Evaluate the reference multiply-accumulate.
    Mac(MacArgs),
    /// Decode the `result: ` lines of a simulator report.
    Report(ReportArgs),
}

/// Arguments for the `kiln build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Path to `kiln.toml` (default: `./kiln.toml`).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory, overriding `[build] output`.
    #[arg(short, long)]
    pub out: Option<String>,
}

/// The fixed-point format shared by the numeric subcommands.
#[derive(Args, Debug, Clone, Copy)]
pub struct FxpArgs {
    /// Total number of bits, sign included.
    #[arg(long)]
    pub total_bits: i64,

    /// Number of fractional bits.
    #[arg(long)]
    pub frac_bits: i64,
}

/// Arguments for the `kiln encode` subcommand.
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// Fixed-point format.
    #[command(flatten)]
    pub fxp: FxpArgs,

    /// Values to encode.
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
}

/// Arguments for the `kiln decode` subcommand.
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Fixed-point format.
    #[command(flatten)]
    pub fxp: FxpArgs,

    /// Bit strings to decode, most significant bit first.
    #[arg(required = true)]
    pub bits: Vec<String>,
}

/// Arguments for the `kiln mac` subcommand.
#[derive(Parser, Debug)]
pub struct MacArgs {
    /// Fixed-point format.
    #[command(flatten)]
    pub fxp: FxpArgs,

    /// First operand vector, comma separated.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub a: Vec<f64>,

    /// Second operand vector, comma separated.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub b: Vec<f64>,
}

/// Arguments for the `kiln report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// File holding the simulator output.
    pub file: String,

    /// Fixed-point format of the reported values.
    #[command(flatten)]
    pub fxp: FxpArgs,

    /// Lines carry a leading batch index.
    #[arg(long)]
    pub batched: bool,

    /// Output format for the decoded values.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Output format of `kiln report`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One line per group.
    Text,
    /// A JSON array of groups.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Encode(ref args) => fxp::run_encode(args),
        Command::Decode(ref args) => fxp::run_decode(args),
        Command::Mac(ref args) => fxp::run_mac(args),
        Command::Report(ref args) => report::run(args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Selects the log filter: the flags win over `RUST_LOG`, which wins over `info`.
fn log_filter(global: &GlobalArgs) -> EnvFilter {
    if global.verbose {
        EnvFilter::new("debug")
    } else if global.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn init_tracing(global: &GlobalArgs) {
    let _ = tracing_subscriber::registry()
        .with(log_filter(global))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
