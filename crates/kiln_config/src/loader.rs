//! Configuration file loading and validation.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::resolve::{find_conv1d, fxp_params};
use crate::types::{KilnConfig, LayerConfig};

/// File name looked up inside a project directory.
pub const CONFIG_FILE: &str = "kiln.toml";

/// Loads and validates `<project_dir>/kiln.toml`.
pub fn load_config(project_dir: &Path) -> Result<KilnConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates the configuration file at `path`.
pub fn load_config_file(path: &Path) -> Result<KilnConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<KilnConfig, ConfigError> {
    let config: KilnConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates names, the number format, layer shapes and cross references.
fn validate_config(config: &KilnConfig) -> Result<(), ConfigError> {
    if config.network.name.is_empty() {
        return Err(ConfigError::Empty("network.name".to_string()));
    }
    fxp_params(config)?;

    let mut names = HashSet::new();
    names.insert(config.network.name.as_str());
    for layer in &config.layers {
        if layer.name().is_empty() {
            return Err(ConfigError::Empty(format!("name of {} layer", layer.kind())));
        }
        if !names.insert(layer.name()) {
            return Err(ConfigError::DuplicateName(layer.name().to_string()));
        }
        validate_layer(layer)?;
    }

    if let Some(skeleton) = &config.skeleton {
        if skeleton.id.len() != skeleton.version.id_len() {
            return Err(ConfigError::SkeletonId {
                version: skeleton.version.to_string(),
                expected: skeleton.version.id_len(),
                actual: skeleton.id.len(),
            });
        }
    }

    if let Some(testbench) = &config.testbench {
        if testbench.name.is_empty() {
            return Err(ConfigError::Empty("testbench.name".to_string()));
        }
        find_conv1d(config, &testbench.uut)?;
    }

    if config.build.rom_style.is_empty() {
        return Err(ConfigError::Empty("build.rom_style".to_string()));
    }
    Ok(())
}

fn validate_layer(layer: &LayerConfig) -> Result<(), ConfigError> {
    let name = layer.name();
    let invalid = |reason: String| {
        Err(ConfigError::LayerShape {
            layer: name.to_string(),
            reason,
        })
    };
    match layer {
        LayerConfig::Linear {
            in_features,
            out_features,
            weights,
            bias,
            ..
        } => {
            if *in_features == 0 || *out_features == 0 {
                return invalid("in_features and out_features must be non-zero".to_string());
            }
            if weights.len() != *out_features || weights.iter().any(|row| row.len() != *in_features) {
                return invalid(format!(
                    "weights must have shape [{out_features}][{in_features}]"
                ));
            }
            if !bias.is_empty() && bias.len() != *out_features {
                return invalid(format!("bias must have {out_features} entries"));
            }
        }
        LayerConfig::Conv1d {
            in_channels,
            out_channels,
            signal_length,
            kernel_size,
            weights,
            bias,
            ..
        } => {
            if *in_channels == 0 || *out_channels == 0 || *kernel_size == 0 {
                return invalid("channel counts and kernel_size must be non-zero".to_string());
            }
            if kernel_size > signal_length {
                return invalid(format!(
                    "kernel_size {kernel_size} exceeds signal_length {signal_length}"
                ));
            }
            let shaped = weights.len() == *out_channels
                && weights.iter().all(|per_input| {
                    per_input.len() == *in_channels
                        && per_input.iter().all(|taps| taps.len() == *kernel_size)
                });
            if !shaped {
                return invalid(format!(
                    "weights must have shape [{out_channels}][{in_channels}][{kernel_size}]"
                ));
            }
            if !bias.is_empty() && bias.len() != *out_channels {
                return invalid(format!("bias must have {out_channels} entries"));
            }
        }
        LayerConfig::HardSigmoid { .. } | LayerConfig::Silu { .. } | LayerConfig::Flatten { .. } => {}
    }
    Ok(())
}
