//! Element-wise activation layers.
//!
//! Both activations are combinational and expose only `x` and `y`. Their
//! breakpoints are quantized with saturation: a breakpoint outside the
//! format sits at the format bound and its branch is never taken.

use kiln_emit::{Destination, Parameters, Template};
use kiln_fxp::FxpParams;
use kiln_hdl::{Design, HdlError, Port, Signal};

use crate::error::NnError;
use crate::quantize::quantize_saturating;

const HARD_SIGMOID_TEMPLATE: &str = include_str!("../templates/hard_sigmoid.tpl.vhd");
const SILU_TEMPLATE: &str = include_str!("../templates/silu.tpl.vhd");

fn activation_port(fxp: FxpParams) -> Port {
    Port::new(
        vec![Signal::input("x", fxp.total_bits())],
        vec![Signal::output("y", fxp.total_bits())],
    )
    .unwrap_or_default()
}

fn persist_template(
    name: &str,
    template: Template,
    params: &Parameters,
    destination: &dyn Destination,
) -> Result<(), HdlError> {
    let lines = template.render(params)?;
    destination.create_subpath(name)?.write_file(".vhd", &lines)?;
    tracing::info!(layer = %name, kind = %template.name(), "persisted activation");
    Ok(())
}

/// Breakpoints shared by both activations, as scaled integers.
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    three: i64,
    minus_three: i64,
}

impl Thresholds {
    fn new(fxp: FxpParams) -> Self {
        Self {
            three: quantize_saturating(fxp, 3.0),
            minus_three: quantize_saturating(fxp, -3.0),
        }
    }
}

/// `y = clamp(x / 6 + 1/2, 0, 1)`, the piecewise-linear sigmoid.
#[derive(Debug, Clone)]
pub struct HardSigmoid {
    name: String,
    fxp: FxpParams,
    port: Port,
}

impl HardSigmoid {
    /// Creates the activation for the given format.
    pub fn new(name: &str, fxp: FxpParams) -> Self {
        Self {
            name: name.to_string(),
            fxp,
            port: activation_port(fxp),
        }
    }

    /// Computes the value the hardware produces for `x`.
    pub fn forward(&self, x: f64) -> Result<f64, NnError> {
        let q = self.fxp.quantize(x)?;
        let t = Thresholds::new(self.fxp);
        let y = if q <= t.minus_three {
            0
        } else if q >= t.three {
            quantize_saturating(self.fxp, 1.0)
        } else {
            let slope = quantize_saturating(self.fxp, 1.0 / 6.0);
            q * slope / (1i64 << self.fxp.frac_bits()) + quantize_saturating(self.fxp, 0.5)
        };
        Ok(self.fxp.to_rational(y.clamp(self.fxp.min_int(), self.fxp.max_int())))
    }

    fn parameters(&self) -> Parameters {
        let t = Thresholds::new(self.fxp);
        Parameters::new()
            .with("layer_name", self.name.as_str())
            .with("data_width", self.fxp.total_bits().to_string())
            .with("frac_width", self.fxp.frac_bits().to_string())
            .with("one", quantize_saturating(self.fxp, 1.0).to_string())
            .with("half", quantize_saturating(self.fxp, 0.5).to_string())
            .with("slope", quantize_saturating(self.fxp, 1.0 / 6.0).to_string())
            .with("three_threshold", t.three.to_string())
            .with("minus_three_threshold", t.minus_three.to_string())
    }
}

impl Design for HardSigmoid {
    fn name(&self) -> &str {
        &self.name
    }

    fn port(&self) -> &Port {
        &self.port
    }

    fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        let template = Template::new("hard_sigmoid", HARD_SIGMOID_TEMPLATE);
        persist_template(&self.name, template, &self.parameters(), destination)
    }
}

/// SiLU approximated as `x * hard_sigmoid(x)`.
#[derive(Debug, Clone)]
pub struct Silu {
    name: String,
    fxp: FxpParams,
    port: Port,
}

impl Silu {
    /// Creates the activation for the given format.
    pub fn new(name: &str, fxp: FxpParams) -> Self {
        Self {
            name: name.to_string(),
            fxp,
            port: activation_port(fxp),
        }
    }

    /// Computes the value the hardware produces for `x`.
    pub fn forward(&self, x: f64) -> Result<f64, NnError> {
        let q = self.fxp.quantize(x)?;
        let t = Thresholds::new(self.fxp);
        let y = if q <= t.minus_three {
            0
        } else if q >= t.three {
            q
        } else {
            let divisor = 6 * (1i128 << self.fxp.frac_bits());
            (i128::from(q) * i128::from(q + t.three) / divisor) as i64
        };
        Ok(self.fxp.to_rational(y.clamp(self.fxp.min_int(), self.fxp.max_int())))
    }

    fn parameters(&self) -> Parameters {
        let t = Thresholds::new(self.fxp);
        Parameters::new()
            .with("layer_name", self.name.as_str())
            .with("data_width", self.fxp.total_bits().to_string())
            .with("frac_width", self.fxp.frac_bits().to_string())
            .with("three_threshold", t.three.to_string())
            .with("minus_three_threshold", t.minus_three.to_string())
    }
}

impl Design for Silu {
    fn name(&self) -> &str {
        &self.name
    }

    fn port(&self) -> &Port {
        &self.port
    }

    fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        let template = Template::new("silu", SILU_TEMPLATE);
        persist_template(&self.name, template, &self.parameters(), destination)
    }
}
