//! Text emission for generated hardware sources.
//!
//! Generated designs never format files themselves. They hand finished
//! parameter strings to a [`Template`] and write the resulting lines to a
//! [`Destination`], which is either an in-memory tree ([`InMemoryPath`]) or a
//! directory on disk ([`OnDiskPath`]). A completed in-memory build can be
//! flushed to disk together with a [`BuildManifest`].

#![warn(missing_docs)]

pub mod destination;
pub mod disk;
pub mod error;
pub mod manifest;
pub mod memory;
pub mod template;

pub use destination::Destination;
pub use disk::OnDiskPath;
pub use error::EmitError;
pub use manifest::{BuildManifest, MANIFEST_FILE};
pub use memory::InMemoryPath;
pub use template::{Param, Parameters, Template};
