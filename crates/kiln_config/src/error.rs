//! Errors raised while reading a `kiln.toml` and checking it against the
//! shapes the network builder expects.

use std::path::PathBuf;

use kiln_fxp::FxpError;

/// Why a network description was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid TOML or does not match the schema.
    #[error("invalid kiln.toml: {0}")]
    Toml(#[from] toml::de::Error),

    /// `total_bits`/`frac_bits` do not describe a fixed-point format.
    #[error("network format: {0}")]
    Format(#[from] FxpError),

    /// A name that must be set is empty.
    #[error("{0} must not be empty")]
    Empty(String),

    /// The network or two layers share a name.
    #[error("name '{0}' is used more than once")]
    DuplicateName(String),

    /// Trained parameters or dimensions disagree with the declared shape.
    #[error("layer '{layer}': {reason}")]
    LayerShape {
        /// Offending layer.
        layer: String,
        /// What is wrong with its shape.
        reason: String,
    },

    /// The skeleton id does not fit the skeleton version.
    #[error("skeleton {version} needs a {expected}-byte id, got {actual}")]
    SkeletonId {
        /// Version tag.
        version: String,
        /// Id length the version requires.
        expected: usize,
        /// Id length supplied.
        actual: usize,
    },

    /// The testbench target is missing or not a conv1d layer.
    #[error("'{0}' is not a conv1d layer of this network")]
    NotConv1d(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_shape_names_the_layer() {
        let err = ConfigError::LayerShape {
            layer: "fc1".into(),
            reason: "weights must have shape [2][3]".into(),
        };
        assert_eq!(err.to_string(), "layer 'fc1': weights must have shape [2][3]");
    }

    #[test]
    fn read_error_shows_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/proj/kiln.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "cannot read /proj/kiln.toml: gone");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn format_error_wraps_fxp() {
        let err: ConfigError = kiln_fxp::FxpParams::new(4, 4).unwrap_err().into();
        assert!(err.to_string().starts_with("network format: "));
    }

    #[test]
    fn skeleton_id_display() {
        let err = ConfigError::SkeletonId {
            version: "v1".into(),
            expected: 1,
            actual: 0,
        };
        assert_eq!(err.to_string(), "skeleton v1 needs a 1-byte id, got 0");
    }
}
