//! Address-input idioms.
//!
//! Both strategies share one read contract and differ only in how the
//! address port is typed, which conversion turns it into an array index,
//! and which extra packages that conversion needs.

use kiln_common::address_width;
use kiln_hdl::vhdl::{ieee, VhdlPackage, VhdlSignal, VhdlType};
use kiln_hdl::Direction;

/// How a ROM declares and converts its address input.
pub trait AddressingStrategy {
    /// The address port for a memory holding `num_values` words.
    fn address_signal(&self, name: &str, num_values: usize) -> VhdlSignal;

    /// Function converting the address port to an integer index.
    fn conversion_function(&self) -> &'static str;

    /// Packages required in addition to the defaults.
    fn extra_packages(&self) -> Vec<VhdlPackage>;
}

/// `std_logic_vector` address converted with `conv_integer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdLogicAddressing;

impl AddressingStrategy for StdLogicAddressing {
    fn address_signal(&self, name: &str, num_values: usize) -> VhdlSignal {
        VhdlSignal::new(
            name,
            Direction::In,
            VhdlType::vector("std_logic_vector", address_width(num_values)),
        )
    }

    fn conversion_function(&self) -> &'static str {
        "conv_integer"
    }

    fn extra_packages(&self) -> Vec<VhdlPackage> {
        Vec::new()
    }
}

/// `unsigned` address converted with `to_integer`, requiring `numeric_std`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsignedAddressing;

impl AddressingStrategy for UnsignedAddressing {
    fn address_signal(&self, name: &str, num_values: usize) -> VhdlSignal {
        VhdlSignal::new(
            name,
            Direction::In,
            VhdlType::vector("unsigned", address_width(num_values)),
        )
    }

    fn conversion_function(&self) -> &'static str {
        "to_integer"
    }

    fn extra_packages(&self) -> Vec<VhdlPackage> {
        vec![ieee::NUMERIC_STD]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_logic_addressing() {
        let s = StdLogicAddressing;
        assert_eq!(
            s.address_signal("addr", 5).to_string(),
            "addr : in std_logic_vector(3-1 downto 0)"
        );
        assert_eq!(s.conversion_function(), "conv_integer");
        assert!(s.extra_packages().is_empty());
    }

    #[test]
    fn unsigned_addressing() {
        let s = UnsignedAddressing;
        assert_eq!(
            s.address_signal("addr", 2).to_string(),
            "addr : in unsigned(1-1 downto 0)"
        );
        assert_eq!(s.conversion_function(), "to_integer");
        assert_eq!(s.extra_packages(), vec![ieee::NUMERIC_STD]);
    }
}
