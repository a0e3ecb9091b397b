//! The shared fixed-point multiply-accumulate entity.
//!
//! `fxp_mac` is generic over vector, total and fractional width, so one file
//! serves every layer that instantiates it. Its arithmetic is the hardware
//! counterpart of [`kiln_fxp::mac`].

use kiln_emit::{Destination, Parameters, Template};
use kiln_hdl::{Design, HdlError, Port, Signal};

const FXP_MAC_TEMPLATE: &str = include_str!("../templates/fxp_mac.tpl.vhd");

/// Entity and file name of the shared MAC.
pub const FXP_MAC_NAME: &str = "fxp_mac";

/// The generic MAC entity as seen by a layer using `total_bits` data.
#[derive(Debug, Clone)]
pub struct FxpMac {
    port: Port,
}

impl FxpMac {
    /// Describes the MAC for `total_bits` wide operands.
    pub fn new(total_bits: u32) -> Self {
        let port = Port::new(
            vec![
                Signal::input("reset", 1),
                Signal::input("next_sample", 1),
                Signal::input("x1", total_bits),
                Signal::input("x2", total_bits),
            ],
            vec![Signal::output("sum", total_bits), Signal::output("done", 1)],
        )
        .unwrap_or_default();
        Self { port }
    }
}

impl Design for FxpMac {
    fn name(&self) -> &str {
        FXP_MAC_NAME
    }

    fn port(&self) -> &Port {
        &self.port
    }

    fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        let lines = Template::new(FXP_MAC_NAME, FXP_MAC_TEMPLATE).render(&Parameters::new())?;
        destination
            .create_subpath(FXP_MAC_NAME)?
            .write_file(".vhd", &lines)?;
        tracing::debug!(path = %destination.path(), "persisted shared mac");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_emit::InMemoryPath;

    #[test]
    fn persists_generic_entity() {
        let root = InMemoryPath::new();
        FxpMac::new(8).persist(&root).unwrap();
        let text = root.text("fxp_mac.vhd").unwrap();
        assert!(text.contains("entity fxp_mac is"));
        assert!(text.contains("FRAC_WIDTH : natural"));
    }

    #[test]
    fn repeated_persist_is_idempotent() {
        let root = InMemoryPath::new();
        let mac = FxpMac::new(8);
        mac.persist(&root).unwrap();
        mac.persist(&root).unwrap();
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn port_widths() {
        let mac = FxpMac::new(6);
        assert_eq!(mac.port().width_of("x1"), 6);
        assert_eq!(mac.port().width_of("sum"), 6);
        assert_eq!(mac.port().width_of("done"), 1);
    }
}
