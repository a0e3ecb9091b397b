//! The component interface every generated design implements.

use kiln_emit::Destination;

use crate::error::HdlError;
use crate::port::Port;

/// A hardware component that can be composed and persisted.
///
/// A design is constructed once and is immutable afterwards. Its name must
/// be unique among the siblings of one composition, since instance
/// identifiers are derived from it.
pub trait Design {
    /// Entity name of the design.
    fn name(&self) -> &str;

    /// External interface.
    fn port(&self) -> &Port;

    /// Writes every file the design consists of below `destination`.
    fn persist(&self, destination: &dyn Destination) -> Result<(), HdlError>;
}

/// A design that processes a multi-channel signal with a sliding kernel.
///
/// Testbenches read the input and output shape through this trait.
pub trait SignalProcessingDesign: Design {
    /// Number of time steps per input channel.
    fn input_length(&self) -> usize;

    /// Width of the sliding kernel.
    fn kernel_size(&self) -> usize;

    /// Number of input channels.
    fn in_channels(&self) -> usize;

    /// Number of output channels.
    fn out_channels(&self) -> usize;

    /// Number of time steps per output channel.
    fn output_length(&self) -> usize {
        (self.input_length() + 1).saturating_sub(self.kernel_size())
    }
}

/// A design with a null port that persists nothing.
///
/// Used for layers without a hardware counterpart, such as flatten.
/// Composition skips it entirely.
#[derive(Debug, Clone)]
pub struct NullDesign {
    name: String,
    port: Port,
}

impl NullDesign {
    /// Creates a null design with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            port: Port::null(),
        }
    }
}

impl Design for NullDesign {
    fn name(&self) -> &str {
        &self.name
    }

    fn port(&self) -> &Port {
        &self.port
    }

    fn persist(&self, _destination: &dyn Destination) -> Result<(), HdlError> {
        Ok(())
    }
}
