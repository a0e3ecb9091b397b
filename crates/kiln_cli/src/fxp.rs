//! `kiln encode`, `kiln decode` and `kiln mac`: the fixed-point format by hand.

use kiln_fxp::{FxpError, FxpParams};

use crate::{DecodeArgs, EncodeArgs, FxpArgs, MacArgs};

impl FxpArgs {
    fn params(&self) -> Result<FxpParams, FxpError> {
        FxpParams::new(self.total_bits, self.frac_bits)
    }
}

/// One bit string per value, most significant bit first.
fn encode_lines(args: &EncodeArgs) -> Result<Vec<String>, FxpError> {
    let params = args.fxp.params()?;
    args.values
        .iter()
        .map(|value| params.encode(*value).map(|bits| bits.to_string()))
        .collect()
}

fn decode_lines(args: &DecodeArgs) -> Result<Vec<String>, FxpError> {
    let params = args.fxp.params()?;
    args.bits
        .iter()
        .map(|bits| params.decode_str(bits).map(|value| value.to_string()))
        .collect()
}

/// The reported rational followed by its bit string.
fn mac_line(args: &MacArgs) -> Result<String, FxpError> {
    let params = args.fxp.params()?;
    let scaled = kiln_fxp::mac_int(&args.a, &args.b, params)?;
    let bits = params.encode_int(scaled)?;
    Ok(format!("{} {}", params.to_rational(scaled), bits))
}

/// Runs the `kiln encode` command.
pub fn run_encode(args: &EncodeArgs) -> Result<i32, Box<dyn std::error::Error>> {
    for line in encode_lines(args)? {
        println!("{line}");
    }
    Ok(0)
}

/// Runs the `kiln decode` command.
pub fn run_decode(args: &DecodeArgs) -> Result<i32, Box<dyn std::error::Error>> {
    for line in decode_lines(args)? {
        println!("{line}");
    }
    Ok(0)
}

/// Runs the `kiln mac` command.
pub fn run_mac(args: &MacArgs) -> Result<i32, Box<dyn std::error::Error>> {
    println!("{}", mac_line(args)?);
    Ok(0)
}
