//! Derived values looked up from a validated configuration.

use std::path::{Path, PathBuf};

use kiln_fxp::FxpParams;

use crate::error::ConfigError;
use crate::types::{KilnConfig, LayerConfig};

/// The network's fixed-point format.
pub fn fxp_params(config: &KilnConfig) -> Result<FxpParams, ConfigError> {
    Ok(FxpParams::new(
        config.network.total_bits,
        config.network.frac_bits,
    )?)
}

/// Finds the conv1d layer called `name`.
pub fn find_conv1d<'a>(config: &'a KilnConfig, name: &str) -> Result<&'a LayerConfig, ConfigError> {
    config
        .layers
        .iter()
        .find(|layer| layer.name() == name && matches!(layer, LayerConfig::Conv1d { .. }))
        .ok_or_else(|| ConfigError::NotConv1d(name.to_string()))
}

/// The output directory: `override_dir` if given, else `build.output`
/// relative to `base_dir`.
pub fn output_dir(config: &KilnConfig, base_dir: &Path, override_dir: Option<&Path>) -> PathBuf {
    match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => base_dir.join(&config.build.output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    fn config() -> KilnConfig {
        load_config_from_str(
            r#"
[network]
name = "net"
total_bits = 6
frac_bits = 2

[[layers]]
kind = "conv1d"
name = "conv"
in_channels = 1
out_channels = 1
signal_length = 3
kernel_size = 2
weights = [[[1, 1]]]

[[layers]]
kind = "silu"
name = "act"

[build]
output = "out"
"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_fxp_params() {
        let fxp = fxp_params(&config()).unwrap();
        assert_eq!(fxp.total_bits(), 6);
        assert_eq!(fxp.frac_bits(), 2);
    }

    #[test]
    fn finds_conv1d_by_name() {
        let config = config();
        assert_eq!(find_conv1d(&config, "conv").unwrap().name(), "conv");
        assert!(matches!(
            find_conv1d(&config, "act"),
            Err(ConfigError::NotConv1d(_))
        ));
        assert!(find_conv1d(&config, "missing").is_err());
    }

    #[test]
    fn output_dir_override_wins() {
        let config = config();
        assert_eq!(
            output_dir(&config, Path::new("/proj"), None),
            PathBuf::from("/proj/out")
        );
        assert_eq!(
            output_dir(&config, Path::new("/proj"), Some(Path::new("/tmp/x"))),
            PathBuf::from("/tmp/x")
        );
    }
}
