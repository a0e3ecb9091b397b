//! ROM designs.

use kiln_emit::Destination;
use kiln_hdl::{Design, HdlError, Port, Signal};

use crate::addressing::{StdLogicAddressing, UnsignedAddressing};
use crate::description::RomDescription;

fn rom_port(description: &RomDescription) -> Port {
    Port::new(
        vec![
            Signal::input("clk", 1),
            Signal::input("en", 1),
            Signal::input("addr", description.address_width()),
        ],
        vec![Signal::output("data", description.data_width())],
    )
    .unwrap_or_default()
}

fn persist_rom(description: &RomDescription, destination: &dyn Destination) -> Result<(), HdlError> {
    destination
        .create_subpath(description.name())?
        .write_file(".vhd", &description.render())?;
    tracing::info!(
        rom = description.name(),
        words = description.words().len(),
        address_width = description.address_width(),
        "persisted rom"
    );
    Ok(())
}

/// A ROM with `std_logic_vector` data and address ports.
#[derive(Debug, Clone)]
pub struct Rom {
    description: RomDescription,
    port: Port,
}

impl Rom {
    /// Creates a ROM holding `values`, each `data_width` bits wide.
    pub fn new(name: &str, data_width: u32, values: &[i64]) -> Self {
        let description = RomDescription::build(
            name,
            "std_logic_vector",
            data_width,
            values,
            &StdLogicAddressing,
        );
        let port = rom_port(&description);
        Self { description, port }
    }

    /// Overrides the `rom_style` synthesis attribute.
    pub fn with_rom_style(mut self, style: &str) -> Self {
        self.description = self.description.with_rom_style(style);
        self
    }

    /// The underlying memory description.
    pub fn description(&self) -> &RomDescription {
        &self.description
    }
}

impl Design for Rom {
    fn name(&self) -> &str {
        self.description.name()
    }

    fn port(&self) -> &Port {
        &self.port
    }

    fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        persist_rom(&self.description, destination)
    }
}

/// A ROM with `signed` data and an `unsigned` address.
#[derive(Debug, Clone)]
pub struct SignedRom {
    description: RomDescription,
    port: Port,
}

impl SignedRom {
    /// Creates a ROM holding `values`, each `data_width` bits wide.
    pub fn new(name: &str, data_width: u32, values: &[i64]) -> Self {
        let description =
            RomDescription::build(name, "signed", data_width, values, &UnsignedAddressing);
        let port = rom_port(&description);
        Self { description, port }
    }

    /// Overrides the `rom_style` synthesis attribute.
    pub fn with_rom_style(mut self, style: &str) -> Self {
        self.description = self.description.with_rom_style(style);
        self
    }

    /// The underlying memory description.
    pub fn description(&self) -> &RomDescription {
        &self.description
    }
}

impl Design for SignedRom {
    fn name(&self) -> &str {
        self.description.name()
    }

    fn port(&self) -> &Port {
        &self.port
    }

    fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError> {
        persist_rom(&self.description, destination)
    }
}
