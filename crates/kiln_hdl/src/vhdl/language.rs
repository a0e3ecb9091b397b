//! A minimal model of the VHDL constructs kiln generates directly.

use std::fmt;

use crate::signal::Direction;

/// A package imported with `use <library>.<name>.all;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VhdlPackage {
    /// Package name.
    pub name: &'static str,
    /// Library the package belongs to.
    pub library: &'static str,
}

impl VhdlPackage {
    /// Creates a package reference.
    pub const fn new(name: &'static str, library: &'static str) -> Self {
        Self { name, library }
    }
}

/// Packages of the `ieee` library.
pub mod ieee {
    use super::VhdlPackage;

    /// `ieee.std_logic_1164`.
    pub const STD_LOGIC_1164: VhdlPackage = VhdlPackage::new("std_logic_1164", "ieee");
    /// `ieee.std_logic_unsigned`.
    pub const STD_LOGIC_UNSIGNED: VhdlPackage = VhdlPackage::new("std_logic_unsigned", "ieee");
    /// `ieee.std_logic_signed`.
    pub const STD_LOGIC_SIGNED: VhdlPackage = VhdlPackage::new("std_logic_signed", "ieee");
    /// `ieee.numeric_std`.
    pub const NUMERIC_STD: VhdlPackage = VhdlPackage::new("numeric_std", "ieee");
}

/// A scalar or vector VHDL type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VhdlType {
    /// A scalar type such as `std_logic`.
    Scalar(String),
    /// A vector type rendered as `<name>(<width>-1 downto 0)`.
    Vector {
        /// Type name, e.g. `std_logic_vector` or `signed`.
        name: String,
        /// Width in bits.
        width: u32,
    },
}

impl VhdlType {
    /// `std_logic`.
    pub fn std_logic() -> Self {
        VhdlType::Scalar("std_logic".to_string())
    }

    /// A vector type of the given name and width.
    pub fn vector(name: &str, width: u32) -> Self {
        VhdlType::Vector {
            name: name.to_string(),
            width,
        }
    }

    /// Width in bits; scalars are one bit wide.
    pub fn width(&self) -> u32 {
        match self {
            VhdlType::Scalar(_) => 1,
            VhdlType::Vector { width, .. } => *width,
        }
    }
}

impl fmt::Display for VhdlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VhdlType::Scalar(name) => write!(f, "{name}"),
            VhdlType::Vector { name, width } => write!(f, "{name}({width}-1 downto 0)"),
        }
    }
}

/// A typed entity port signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VhdlSignal {
    /// Signal name.
    pub name: String,
    /// Port mode.
    pub direction: Direction,
    /// Signal type.
    pub ty: VhdlType,
}

impl VhdlSignal {
    /// Creates a port signal.
    pub fn new(name: &str, direction: Direction, ty: VhdlType) -> Self {
        Self {
            name: name.to_string(),
            direction,
            ty,
        }
    }
}

impl fmt::Display for VhdlSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} {}", self.name, self.direction, self.ty)
    }
}

/// An entity declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Entity name.
    pub name: String,
    /// Port signals in declaration order.
    pub signals: Vec<VhdlSignal>,
}

impl Entity {
    /// Renders the entity declaration.
    ///
    /// The port clause is omitted when the entity has no signals.
    pub fn build_code(&self) -> Vec<String> {
        let mut code = vec![format!("entity {} is", self.name)];
        if let Some((last, rest)) = self.signals.split_last() {
            code.push("    port (".to_string());
            code.extend(rest.iter().map(|s| format!("        {s};")));
            code.push(format!("        {last}"));
            code.push("    );".to_string());
        }
        code.push(format!("end entity {};", self.name));
        code
    }
}

/// An architecture body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Architecture {
    /// Architecture name, usually `rtl`.
    pub name: String,
    /// Entity the architecture implements.
    pub entity_name: String,
    /// Declarative part.
    pub decl: Vec<String>,
    /// Statement part.
    pub body: Vec<String>,
}

impl Architecture {
    /// Renders the architecture body.
    pub fn build_code(&self) -> Vec<String> {
        let mut code = vec![format!(
            "architecture {} of {} is",
            self.name, self.entity_name
        )];
        code.extend(self.decl.iter().map(|l| format!("    {l}")));
        code.push("begin".to_string());
        code.extend(self.body.iter().map(|l| format!("    {l}")));
        code.push(format!("end architecture {};", self.name));
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_display() {
        assert_eq!(VhdlType::std_logic().to_string(), "std_logic");
        assert_eq!(
            VhdlType::vector("signed", 8).to_string(),
            "signed(8-1 downto 0)"
        );
        assert_eq!(VhdlType::vector("unsigned", 3).width(), 3);
    }

    #[test]
    fn signal_display() {
        let s = VhdlSignal::new("addr", Direction::In, VhdlType::vector("std_logic_vector", 2));
        assert_eq!(s.to_string(), "addr : in std_logic_vector(2-1 downto 0)");
    }

    #[test]
    fn entity_code() {
        let entity = Entity {
            name: "rom".into(),
            signals: vec![
                VhdlSignal::new("clk", Direction::In, VhdlType::std_logic()),
                VhdlSignal::new("data", Direction::Out, VhdlType::std_logic()),
            ],
        };
        assert_eq!(
            entity.build_code(),
            vec![
                "entity rom is",
                "    port (",
                "        clk : in std_logic;",
                "        data : out std_logic",
                "    );",
                "end entity rom;",
            ]
        );
    }

    #[test]
    fn entity_without_signals() {
        let entity = Entity {
            name: "empty".into(),
            signals: vec![],
        };
        assert_eq!(entity.build_code(), vec!["entity empty is", "end entity empty;"]);
    }

    #[test]
    fn architecture_code() {
        let arch = Architecture {
            name: "rtl".into(),
            entity_name: "rom".into(),
            decl: vec!["signal a : std_logic;".into()],
            body: vec!["a <= '0';".into()],
        };
        assert_eq!(
            arch.build_code(),
            vec![
                "architecture rtl of rom is",
                "    signal a : std_logic;",
                "begin",
                "    a <= '0';",
                "end architecture rtl;",
            ]
        );
    }
}
