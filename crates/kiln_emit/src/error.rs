//! Error types for templating and artifact output.

use std::path::PathBuf;

/// Errors that can occur while rendering templates or writing artifacts.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// An I/O error occurred while writing an artifact.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A template placeholder has no matching parameter.
    #[error("template '{template}' has no value for parameter '{parameter}'")]
    MissingParameter {
        /// Name of the template being rendered.
        template: String,
        /// Name of the unresolved placeholder.
        parameter: String,
    },

    /// A list parameter was used in the middle of a line.
    #[error("template '{template}' uses list parameter '{parameter}' inline")]
    ListInline {
        /// Name of the template being rendered.
        template: String,
        /// Name of the list parameter.
        parameter: String,
    },

    /// A `${` without a closing brace.
    #[error("template '{template}' has an unterminated placeholder on line {line}")]
    MalformedPlaceholder {
        /// Name of the template being rendered.
        template: String,
        /// One-based line number.
        line: usize,
    },

    /// A destination name is empty or contains a path separator.
    #[error("invalid destination name '{0}'")]
    InvalidName(String),

    /// Two different contents were written to the same in-memory file.
    #[error("conflicting contents written to '{0}'")]
    ConflictingWrite(String),

    /// A manifest could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = EmitError::Io {
            path: PathBuf::from("build/network.vhd"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("network.vhd"));
    }

    #[test]
    fn missing_parameter_display() {
        let err = EmitError::MissingParameter {
            template: "network".into(),
            parameter: "x_width".into(),
        };
        assert_eq!(
            err.to_string(),
            "template 'network' has no value for parameter 'x_width'"
        );
    }

    #[test]
    fn conflicting_write_display() {
        let err = EmitError::ConflictingWrite("fxp_mac.vhd".into());
        assert_eq!(err.to_string(), "conflicting contents written to 'fxp_mac.vhd'");
    }

    #[test]
    fn malformed_placeholder_display() {
        let err = EmitError::MalformedPlaceholder {
            template: "rom".into(),
            line: 3,
        };
        assert!(err.to_string().contains("line 3"));
    }
}
