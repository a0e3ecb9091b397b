//! Parsing and validation of `kiln.toml` network descriptions.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`KilnConfig`]: the fixed-point format, the ordered layer list with its
//! trained parameters, and the optional skeleton, testbench and build
//! settings.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use resolve::{find_conv1d, fxp_params, output_dir};
pub use types::*;
