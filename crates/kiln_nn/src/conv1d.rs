//! One-dimensional convolution layer.
//!
//! The adapter entity streams each kernel window through the shared
//! [`FxpMac`], adds the channel bias with saturation and buffers the result
//! for reading through `y_address`. Weights are flattened channel-major:
//! output channel, then input channel, then kernel tap.

use kiln_common::address_width;
use kiln_emit::{Destination, Parameters, Template};
use kiln_fxp::FxpParams;
use kiln_hdl::{create_port, Design, HdlError, Port, SignalProcessingDesign};
use kiln_rom::{Rom, DEFAULT_ROM_STYLE};

use crate::error::NnError;
use crate::mac::FxpMac;
use crate::quantize::{bias_or_zeros, biased_mac, check_len, quantize_all};

const CONV1D_TEMPLATE: &str = include_str!("../templates/conv1d.tpl.vhd");

/// A quantized 1-D convolution without padding and with stride 1.
#[derive(Debug, Clone)]
pub struct Conv1d {
    name: String,
    fxp: FxpParams,
    in_channels: usize,
    out_channels: usize,
    signal_length: usize,
    kernel_size: usize,
    weights: Vec<i64>,
    bias: Vec<i64>,
    rom_style: String,
    port: Port,
}

impl Conv1d {
    /// Creates the layer, quantizing `weights` (`[out][in][kernel]`) and
    /// `bias` (`[out]`, or empty for none).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        fxp: FxpParams,
        in_channels: usize,
        out_channels: usize,
        signal_length: usize,
        kernel_size: usize,
        weights: &[Vec<Vec<f64>>],
        bias: &[f64],
    ) -> Result<Self, NnError> {
        if in_channels == 0 || out_channels == 0 || kernel_size == 0 {
            return Err(NnError::InvalidShape {
                layer: name.to_string(),
                reason: "channel counts and kernel_size must be non-zero".to_string(),
            });
        }
        if kernel_size > signal_length {
            return Err(NnError::InvalidShape {
                layer: name.to_string(),
                reason: format!(
                    "kernel_size {kernel_size} exceeds signal_length {signal_length}"
                ),
            });
        }
        check_len(name, "weights", weights, out_channels)?;
        let mut flat = Vec::with_capacity(out_channels * in_channels * kernel_size);
        for (o, per_input) in weights.iter().enumerate() {
            check_len(name, &format!("weights[{o}]"), per_input, in_channels)?;
            for (i, taps) in per_input.iter().enumerate() {
                check_len(name, &format!("weights[{o}][{i}]"), taps, kernel_size)?;
                flat.extend(quantize_all(fxp, taps)?);
            }
        }
        let bias = bias_or_zeros(name, fxp, bias, out_channels)?;
        let output_length = signal_length - kernel_size + 1;
        let port = create_port(
            fxp.total_bits(),
            fxp.total_bits(),
            signal_length * in_channels,
            output_length * out_channels,
        );
        Ok(Self {
            name: name.to_string(),
            fxp,
            in_channels,
            out_channels,
            signal_length,
            kernel_size,
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

    /// The fixed-point format of data, weights and bias.
    pub fn fxp(&self) -> FxpParams {
        self.fxp
    }

    /// Quantized weights, flattened channel-major.
    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    /// Quantized bias, one entry per output channel.
    pub fn bias(&self) -> &[i64] {
        &self.bias
    }

    /// Computes the output the hardware is expected to report for one
    /// `[in_channels][signal_length]` input.
    pub fn forward(&self, input: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, NnError> {
        check_len(&self.name, "input", input, self.in_channels)?;
        for (c, channel) in input.iter().enumerate() {
            check_len(&self.name, &format!("input[{c}]"), channel, self.signal_length)?;
        }
        let taps = self.in_channels * self.kernel_size;
        let mut output = Vec::with_capacity(self.out_channels);
        for (kernel, bias) in self.weights.chunks(taps).zip(&self.bias) {
            let mut channel_out = Vec::with_capacity(self.output_length());
            for t in 0..self.output_length() {
                let window: Vec<f64> = input
                    .iter()
                    .flat_map(|channel| channel[t..t + self.kernel_size].iter().copied())
                    .collect();
                let y = biased_mac(self.fxp, &window, kernel, *bias)?;
                channel_out.push(self.fxp.to_rational(y));
            }
            output.push(channel_out);
        }
        Ok(output)
    }

    fn rom_name(&self, suffix: &str) -> String {
        format!("{}_{suffix}_rom", self.name)
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new()
            .with("name", self.name.as_str())
            .with("frac_width", self.fxp.frac_bits().to_string())
            .with("in_channels", self.in_channels.to_string())
            .with("out_channels", self.out_channels.to_string())
            .with("kernel_size", self.kernel_size.to_string())
            .with("vector_width", self.signal_length.to_string())
            .with("w_address_width", address_width(self.weights.len()).to_string())
            .with("b_address_width", address_width(self.bias.len()).to_string());
        for signal in self.port.signals().filter(|s| s.is_present()) {
            params.set(&format!("{}_width", signal.name), signal.width.to_string());
        }
        params
    }
}

impl Design for Conv1d {
    fn name(&self) -> &str {
        &self.name
    }

    fn port(&self) -> &Port {
        &self.port
    }

    #[tracing::instrument(skip_all, fields(layer = %self.name))]
    fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        let lines = Template::new("conv1d", CONV1D_TEMPLATE).render(&self.parameters())?;
        destination
            .create_subpath(&self.name)?
            .write_file(".vhd", &lines)?;
        let width = self.fxp.total_bits();
        Rom::new(&self.rom_name("w"), width, &self.weights)
            .with_rom_style(&self.rom_style)
            .persist(destination)?;
        Rom::new(&self.rom_name("b"), width, &self.bias)
            .with_rom_style(&self.rom_style)
            .persist(destination)?;
        FxpMac::new(width).persist(destination)?;
        tracing::info!(
            in_channels = self.in_channels,
            out_channels = self.out_channels,
            kernel_size = self.kernel_size,
            "persisted conv1d layer"
        );
        Ok(())
    }
}

impl SignalProcessingDesign for Conv1d {
    fn input_length(&self) -> usize {
        self.signal_length
    }

    fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    fn in_channels(&self) -> usize {
        self.in_channels
    }

    fn out_channels(&self) -> usize {
        self.out_channels
    }
}
