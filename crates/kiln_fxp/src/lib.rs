//! Fixed-point numerics for the kiln quantized-circuit compiler.
//!
//! [`FxpParams`] describes a two's-complement fixed-point format. The codec
//! converts rationals to and from the bit strings embedded in generated
//! hardware, and [`mac`] is the software reference the hardware
//! multiply-accumulate unit is checked against.

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod mac;
pub mod params;
pub mod unsigned;

pub use error::FxpError;
pub use mac::{mac, mac_int};
pub use params::FxpParams;
pub use unsigned::{UnsignedCodec, BATCH_INDEX_CODEC};
