//! Read-only memories holding trained constants.
//!
//! [`RomDescription`] is the pure memory description: padded words, widths
//! and the addressing idiom. [`Rom`] and [`SignedRom`] wrap it as designs
//! that render a synchronous, registered-read VHDL entity.

#![warn(missing_docs)]

pub mod addressing;
pub mod description;
pub mod design;

pub use addressing::{AddressingStrategy, StdLogicAddressing, UnsignedAddressing};
pub use description::{RomDescription, DEFAULT_ROM_STYLE};
pub use design::{Rom, SignedRom};
