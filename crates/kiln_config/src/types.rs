//! Configuration types deserialized from `kiln.toml`.

use kiln_wire::SkeletonVersion;
use serde::Deserialize;

/// The top-level configuration parsed from `kiln.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct KilnConfig {
    /// Network name and number format.
    pub network: NetworkConfig,
    /// Layers in data-flow order.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
    /// Host-interface wrapper, generated when present.
    #[serde(default)]
    pub skeleton: Option<SkeletonConfig>,
    /// Conv1d testbench, generated when present.
    #[serde(default)]
    pub testbench: Option<TestbenchConfig>,
    /// Output settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Network-wide settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Entity name of the composed network.
    pub name: String,
    /// Total width of every fixed-point value.
    pub total_bits: i64,
    /// Fractional bits of every fixed-point value.
    pub frac_bits: i64,
    /// Reject auto-wired connections whose widths differ.
    #[serde(default = "default_true")]
    pub strict_widths: bool,
}

fn default_true() -> bool {
    true
}

/// One layer of the network, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerConfig {
    /// Fully connected layer.
    Linear {
        /// Entity name.
        name: String,
        /// Input vector length.
        in_features: usize,
        /// Output vector length.
        out_features: usize,
        /// `[out_features][in_features]` weights.
        weights: Vec<Vec<f64>>,
        /// `[out_features]` bias; empty for none.
        #[serde(default)]
        bias: Vec<f64>,
    },
    /// One-dimensional convolution.
    Conv1d {
        /// Entity name.
        name: String,
        /// Number of input channels.
        in_channels: usize,
        /// Number of output channels.
        out_channels: usize,
        /// Time steps per input channel.
        signal_length: usize,
        /// Kernel width.
        kernel_size: usize,
        /// `[out_channels][in_channels][kernel_size]` weights.
        weights: Vec<Vec<Vec<f64>>>,
        /// `[out_channels]` bias; empty for none.
        #[serde(default)]
        bias: Vec<f64>,
    },
    /// Piecewise-linear sigmoid.
    HardSigmoid {
        /// Entity name.
        name: String,
    },
    /// SiLU approximation.
    Silu {
        /// Entity name.
        name: String,
    },
    /// Reshape without a hardware counterpart.
    Flatten {
        /// Name used for diagnostics only.
        name: String,
    },
}

impl LayerConfig {
    /// The layer's name.
    pub fn name(&self) -> &str {
        match self {
            LayerConfig::Linear { name, .. }
            | LayerConfig::Conv1d { name, .. }
            | LayerConfig::HardSigmoid { name }
            | LayerConfig::Silu { name }
            | LayerConfig::Flatten { name } => name,
        }
    }

    /// The `kind` tag as written in `kiln.toml`.
    pub fn kind(&self) -> &'static str {
        match self {
            LayerConfig::Linear { .. } => "linear",
            LayerConfig::Conv1d { .. } => "conv1d",
            LayerConfig::HardSigmoid { .. } => "hard_sigmoid",
            LayerConfig::Silu { .. } => "silu",
            LayerConfig::Flatten { .. } => "flatten",
        }
    }

    /// Number of values the layer reads, when it buffers its input.
    pub fn input_count(&self) -> Option<usize> {
        match self {
            LayerConfig::Linear { in_features, .. } => Some(*in_features),
            LayerConfig::Conv1d {
                in_channels,
                signal_length,
                ..
            } => Some(in_channels * signal_length),
            _ => None,
        }
    }

    /// Number of values the layer produces, when it buffers its output.
    pub fn output_count(&self) -> Option<usize> {
        match self {
            LayerConfig::Linear { out_features, .. } => Some(*out_features),
            LayerConfig::Conv1d {
                out_channels,
                signal_length,
                kernel_size,
                ..
            } => Some(out_channels * (signal_length + 1).saturating_sub(*kernel_size)),
            _ => None,
        }
    }
}

/// Host-interface wrapper settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SkeletonConfig {
    /// Template variant.
    #[serde(default = "default_skeleton_version")]
    pub version: SkeletonVersion,
    /// Identifier bytes: one for `v1`, sixteen for `v2`.
    pub id: Vec<u8>,
    /// Values the host writes; derived from the first buffered layer if absent.
    #[serde(default)]
    pub x_num_values: Option<usize>,
    /// Values the host reads; derived from the last buffered layer if absent.
    #[serde(default)]
    pub y_num_values: Option<usize>,
}

fn default_skeleton_version() -> SkeletonVersion {
    SkeletonVersion::V1
}

/// Conv1d testbench settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TestbenchConfig {
    /// Entity name of the testbench.
    pub name: String,
    /// Name of the conv1d layer under test.
    pub uut: String,
}

/// Output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Output directory, relative to the configuration file.
    #[serde(default = "default_output")]
    pub output: String,
    /// `rom_style` attribute of every generated ROM.
    #[serde(default = "default_rom_style")]
    pub rom_style: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            rom_style: default_rom_style(),
        }
    }
}

fn default_output() -> String {
    "build".to_string()
}

fn default_rom_style() -> String {
    "auto".to_string()
}
