//! Fully connected layer.

use kiln_common::address_width;
use kiln_emit::{Destination, Parameters, Template};
use kiln_fxp::FxpParams;
use kiln_hdl::{create_port, Design, HdlError, Port};
use kiln_rom::{Rom, DEFAULT_ROM_STYLE};

use crate::error::NnError;
use crate::quantize::{bias_or_zeros, biased_mac, check_len, quantize_all};

const LINEAR_TEMPLATE: &str = include_str!("../templates/linear.tpl.vhd");

/// A quantized `y = W x + b` layer.
///
/// Weights are stored row-major (`out_features` rows of `in_features`
/// values) in `<name>_w_rom`, the bias in `<name>_b_rom`.
#[derive(Debug, Clone)]
pub struct Linear {
    name: String,
    fxp: FxpParams,
    in_features: usize,
    out_features: usize,
    weights: Vec<i64>,
    bias: Vec<i64>,
    rom_style: String,
    port: Port,
}

impl Linear {
    /// Creates the layer, quantizing `weights` and `bias`.
    ///
    /// An empty `bias` means the layer has none.
    pub fn new(
        name: &str,
        fxp: FxpParams,
        in_features: usize,
        out_features: usize,
        weights: &[Vec<f64>],
        bias: &[f64],
    ) -> Result<Self, NnError> {
        if in_features == 0 || out_features == 0 {
            return Err(NnError::InvalidShape {
                layer: name.to_string(),
                reason: "in_features and out_features must be non-zero".to_string(),
            });
        }
        check_len(name, "weights", weights, out_features)?;
        let mut flat = Vec::with_capacity(in_features * out_features);
        for (row_index, row) in weights.iter().enumerate() {
            check_len(name, &format!("weights[{row_index}]"), row, in_features)?;
            flat.extend(quantize_all(fxp, row)?);
        }
        let bias = bias_or_zeros(name, fxp, bias, out_features)?;
        let port = create_port(fxp.total_bits(), fxp.total_bits(), in_features, out_features);
        Ok(Self {
            name: name.to_string(),
            fxp,
            in_features,
            out_features,
            weights: flat,
            bias,
            rom_style: DEFAULT_ROM_STYLE.to_string(),
            port,
        })
    }

    /// Overrides the `rom_style` of the parameter ROMs.
    pub fn with_rom_style(mut self, style: &str) -> Self {
        self.rom_style = style.to_string();
        self
    }

    /// Quantized weights, row-major.
    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    /// Quantized bias.
    pub fn bias(&self) -> &[i64] {
        &self.bias
    }

    /// Computes the layer output the hardware is expected to report.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>, NnError> {
        check_len(&self.name, "input", input, self.in_features)?;
        self.weights
            .chunks(self.in_features)
            .zip(&self.bias)
            .map(|(row, bias)| {
                biased_mac(self.fxp, input, row, *bias).map(|y| self.fxp.to_rational(y))
            })
            .collect()
    }

    fn weights_rom(&self) -> Rom {
        Rom::new(&format!("{}_w_rom", self.name), self.fxp.total_bits(), &self.weights)
            .with_rom_style(&self.rom_style)
    }

    fn bias_rom(&self) -> Rom {
        Rom::new(&format!("{}_b_rom", self.name), self.fxp.total_bits(), &self.bias)
            .with_rom_style(&self.rom_style)
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("layer_name", self.name.as_str())
            .with("data_width", self.fxp.total_bits().to_string())
            .with("frac_width", self.fxp.frac_bits().to_string())
            .with("x_address_width", self.port.width_of("x_address").to_string())
            .with("y_address_width", self.port.width_of("y_address").to_string())
            .with("in_feature_num", self.in_features.to_string())
            .with("out_feature_num", self.out_features.to_string())
            .with("weights_rom_name", format!("{}_w_rom", self.name))
            .with("bias_rom_name", format!("{}_b_rom", self.name))
            .with("w_address_width", address_width(self.weights.len()).to_string())
            .with("b_address_width", address_width(self.bias.len()).to_string())
    }
}

impl Design for Linear {
    fn name(&self) -> &str {
        &self.name
    }

    fn port(&self) -> &Port {
        &self.port
    }

    fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        let lines = Template::new("linear", LINEAR_TEMPLATE).render(&self.parameters())?;
        destination
            .create_subpath(&self.name)?
            .write_file(".vhd", &lines)?;
        self.weights_rom().persist(destination)?;
        self.bias_rom().persist(destination)?;
        tracing::info!(layer = %self.name, in_features = self.in_features, out_features = self.out_features, "persisted linear layer");
        Ok(())
    }
}
