//! Shared foundational types used across the kiln quantized-circuit compiler.
//!
//! This crate provides IEEE 1164 `std_logic` values, bit strings as they are
//! exchanged with generated VHDL and simulator reports, content hashing for
//! build digests, and the address-width computation shared by ports, ROMs
//! and testbenches.

#![warn(missing_docs)]

pub mod addressable;
pub mod bits;
pub mod hash;
pub mod logic;

pub use addressable::address_width;
pub use bits::{to_vhdl_binary_literal, Bits, BitsError};
pub use hash::ContentHash;
pub use logic::Logic;
