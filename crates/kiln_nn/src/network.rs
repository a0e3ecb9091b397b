//! Network construction from a loaded configuration.

use kiln_config::{fxp_params, KilnConfig, LayerConfig};
use kiln_fxp::FxpParams;
use kiln_hdl::{Design, NullDesign};
use kiln_wire::{Sequential, Skeleton};

use crate::activation::{HardSigmoid, Silu};
use crate::conv1d::Conv1d;
use crate::error::NnError;
use crate::linear::Linear;

/// Builds the design for one configured layer.
///
/// Flatten layers become a [`NullDesign`], which composition skips.
pub fn layer_from_config(
    layer: &LayerConfig,
    fxp: FxpParams,
    rom_style: &str,
) -> Result<Box<dyn Design>, NnError> {
    let design: Box<dyn Design> = match layer {
        LayerConfig::Linear {
            name,
            in_features,
            out_features,
            weights,
            bias,
        } => Box::new(
            Linear::new(name, fxp, *in_features, *out_features, weights, bias)?
                .with_rom_style(rom_style),
        ),
        LayerConfig::Conv1d { .. } => Box::new(conv1d_from_config(layer, fxp, rom_style)?),
        LayerConfig::HardSigmoid { name } => Box::new(HardSigmoid::new(name, fxp)),
        LayerConfig::Silu { name } => Box::new(Silu::new(name, fxp)),
        LayerConfig::Flatten { name } => Box::new(NullDesign::new(name)),
    };
    Ok(design)
}

/// Builds a [`Conv1d`] from its configuration entry.
pub fn conv1d_from_config(
    layer: &LayerConfig,
    fxp: FxpParams,
    rom_style: &str,
) -> Result<Conv1d, NnError> {
    match layer {
        LayerConfig::Conv1d {
            name,
            in_channels,
            out_channels,
            signal_length,
            kernel_size,
            weights,
            bias,
        } => Ok(Conv1d::new(
            name,
            fxp,
            *in_channels,
            *out_channels,
            *signal_length,
            *kernel_size,
            weights,
            bias,
        )?
        .with_rom_style(rom_style)),
        other => Err(NnError::UnknownLayer(other.name().to_string())),
    }
}

/// Builds the auto-wired network described by `config`.
#[tracing::instrument(skip_all, fields(network = %config.network.name))]
pub fn build_network(config: &KilnConfig) -> Result<Sequential, NnError> {
    let fxp = fxp_params(config)?;
    let designs = config
        .layers
        .iter()
        .map(|layer| layer_from_config(layer, fxp, &config.build.rom_style))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(layers = designs.len(), %fxp, "constructed layers");
    Ok(Sequential::from_designs(&config.network.name, designs)?
        .with_strict_widths(config.network.strict_widths))
}

/// Builds the skeleton wrapping `network`, if one is configured.
///
/// Value counts not given explicitly are taken from the first and last
/// layers that buffer their data, falling back to 1.
pub fn build_skeleton(
    config: &KilnConfig,
    network: &Sequential,
) -> Result<Option<Skeleton>, NnError> {
    let Some(skeleton) = &config.skeleton else {
        return Ok(None);
    };
    let x_num_values = skeleton
        .x_num_values
        .or_else(|| config.layers.iter().find_map(LayerConfig::input_count))
        .unwrap_or(1);
    let y_num_values = skeleton
        .y_num_values
        .or_else(|| config.layers.iter().rev().find_map(LayerConfig::output_count))
        .unwrap_or(1);
    Ok(Some(Skeleton::new(
        network.name(),
        network.port(),
        x_num_values,
        y_num_values,
        skeleton.id.clone(),
        skeleton.version,
    )?))
}
