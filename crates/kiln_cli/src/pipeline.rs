//! Shared pipeline helpers for CLI commands.
//!
//! Resolves the configuration file and turns a loaded configuration into the
//! complete in-memory file set of a build.

use std::path::{Path, PathBuf};

use kiln_config::{find_conv1d, fxp_params, KilnConfig, CONFIG_FILE};
use kiln_emit::InMemoryPath;
use kiln_hdl::Design;
use kiln_nn::{build_network, build_skeleton, conv1d_from_config};
use kiln_testbench::Conv1dTestbench;

/// Resolves the configuration file from `--config`, defaulting to
/// `./kiln.toml`. A directory argument names the directory holding it.
pub fn resolve_config_path(config: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = match config {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?.join(CONFIG_FILE),
    };
    if path.is_dir() {
        Ok(path.join(CONFIG_FILE))
    } else {
        Ok(path)
    }
}

/// Directory that relative paths in the configuration are resolved against.
pub fn project_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Generates every file of the configured build into a fresh in-memory tree.
///
/// The network comes first, followed by the skeleton and the testbench when
/// they are configured. Nothing reaches the disk until the caller flushes
/// the returned tree.
#[tracing::instrument(skip_all, fields(network = %config.network.name))]
pub fn build_in_memory(config: &KilnConfig) -> Result<InMemoryPath, Box<dyn std::error::Error>> {
    let root = InMemoryPath::new();
    let network = build_network(config)?;
    network.persist(&root)?;

    if let Some(skeleton) = build_skeleton(config, &network)? {
        skeleton.persist(&root)?;
    }

    if let Some(testbench) = &config.testbench {
        let fxp = fxp_params(config)?;
        let layer = find_conv1d(config, &testbench.uut)?;
        let uut = conv1d_from_config(layer, fxp, &config.build.rom_style)?;
        Conv1dTestbench::new(&testbench.name, &uut, fxp).persist(&root)?;
    }

    tracing::debug!(files = root.len(), "generated build in memory");
    Ok(root)
}
