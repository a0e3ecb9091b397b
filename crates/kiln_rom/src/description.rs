//! The pure ROM description and its VHDL rendering.

use kiln_common::{address_width, to_vhdl_binary_literal};
use kiln_hdl::vhdl::{Architecture, DesignBuilder, Entity, VhdlSignal, VhdlType};
use kiln_hdl::Direction;

use crate::addressing::AddressingStrategy;

/// Synthesis hint used unless overridden.
pub const DEFAULT_ROM_STYLE: &str = "auto";

/// A constant memory ready to be rendered.
///
/// The stored words are padded with trailing zeros to `2^address_width`
/// entries. Words are expected to fit `data_width` bits as two's complement;
/// wider values are truncated to their low bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomDescription {
    name: String,
    data_type: VhdlType,
    address: VhdlSignal,
    conversion: &'static str,
    packages: Vec<kiln_hdl::vhdl::VhdlPackage>,
    words: Vec<i64>,
    rom_style: String,
}

impl RomDescription {
    /// Builds the description of a memory holding `values`.
    ///
    /// `data_type_name` is the VHDL vector type of the data port, e.g.
    /// `std_logic_vector` or `signed`. The same inputs always yield the same
    /// description.
    pub fn build(
        name: &str,
        data_type_name: &str,
        data_width: u32,
        values: &[i64],
        addressing: &dyn AddressingStrategy,
    ) -> Self {
        let address = addressing.address_signal("addr", values.len());
        let depth = 1usize << address_width(values.len());
        let mut words = values.to_vec();
        words.resize(depth.max(values.len()), 0);
        Self {
            name: name.to_string(),
            data_type: VhdlType::vector(data_type_name, data_width),
            address,
            conversion: addressing.conversion_function(),
            packages: addressing.extra_packages(),
            words,
            rom_style: DEFAULT_ROM_STYLE.to_string(),
        }
    }

    /// Overrides the `rom_style` synthesis attribute.
    pub fn with_rom_style(mut self, style: &str) -> Self {
        self.rom_style = style.to_string();
        self
    }

    /// Entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of one word in bits.
    pub fn data_width(&self) -> u32 {
        self.data_type.width()
    }

    /// Width of the address input.
    pub fn address_width(&self) -> u32 {
        self.address.ty.width()
    }

    /// The padded words.
    pub fn words(&self) -> &[i64] {
        &self.words
    }

    /// The padded words as quoted two's-complement literals.
    pub fn literals(&self) -> Vec<String> {
        self.words
            .iter()
            .map(|w| to_vhdl_binary_literal(*w, self.data_width()))
            .collect()
    }

    /// The `rom_style` attribute value.
    pub fn rom_style(&self) -> &str {
        &self.rom_style
    }

    /// Renders the complete VHDL file.
    pub fn render(&self) -> Vec<String> {
        let std_logic = VhdlType::std_logic();
        let entity = Entity {
            name: self.name.clone(),
            signals: vec![
                VhdlSignal::new("clk", Direction::In, std_logic.clone()),
                VhdlSignal::new("en", Direction::In, std_logic),
                self.address.clone(),
                VhdlSignal::new("data", Direction::Out, self.data_type.clone()),
            ],
        };
        let mut builder = DesignBuilder::new(entity);
        builder.packages.extend(self.packages.iter().copied());
        let name = &self.name;
        builder.architecture = Architecture {
            name: "rtl".to_string(),
            entity_name: name.clone(),
            decl: vec![
                format!(
                    "type {name}_array_t is array (0 to 2**{}-1) of {};",
                    self.address_width(),
                    self.data_type
                ),
                format!("signal ROM : {name}_array_t:=({});", self.literals().join(",")),
                "attribute rom_style : string;".to_string(),
                format!(
                    "attribute rom_style of ROM : signal is \"{}\";",
                    self.rom_style
                ),
            ],
            body: vec![
                "ROM_process: process(clk)".to_string(),
                "begin".to_string(),
                "    if rising_edge(clk) then".to_string(),
                "        if (en = '1') then".to_string(),
                format!("            data <= ROM({}(addr));", self.conversion),
                "        end if;".to_string(),
                "    end if;".to_string(),
                "end process ROM_process;".to_string(),
            ],
        };
        builder.build()
    }
}
