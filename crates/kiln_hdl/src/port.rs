//! Component interfaces.
//!
//! A [`Port`] lists the signals a component consumes and the signals it
//! produces, each group in declaration order. Names are unique per group.

use crate::error::HdlError;
use crate::signal::{Direction, Signal};
use crate::std_signals;
use kiln_common::address_width;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The external interface of one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    incoming: Vec<Signal>,
    outgoing: Vec<Signal>,
}

impl Port {
    /// Creates a port, checking name uniqueness and direction consistency.
    pub fn new(incoming: Vec<Signal>, outgoing: Vec<Signal>) -> Result<Self, HdlError> {
        check_group(&incoming, Direction::In)?;
        check_group(&outgoing, Direction::Out)?;
        Ok(Self { incoming, outgoing })
    }

    /// The port without any signal.
    pub fn null() -> Self {
        Self::default()
    }

    /// The standard buffered interface with explicit address widths.
    ///
    /// Incoming: `x`, `y_address`, `clock`, `enable`. Outgoing: `y`,
    /// `x_address`, `done`.
    pub fn standard(x_width: u32, y_width: u32, x_address_width: u32, y_address_width: u32) -> Self {
        Self {
            incoming: vec![
                std_signals::x(x_width),
                std_signals::y_address(y_address_width),
                std_signals::clock(),
                std_signals::enable(),
            ],
            outgoing: vec![
                std_signals::y(y_width),
                std_signals::x_address(x_address_width),
                std_signals::done(),
            ],
        }
    }

    /// Consumed signals in declaration order.
    pub fn incoming(&self) -> &[Signal] {
        &self.incoming
    }

    /// Produced signals in declaration order.
    pub fn outgoing(&self) -> &[Signal] {
        &self.outgoing
    }

    /// All signals, incoming first.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.incoming.iter().chain(self.outgoing.iter())
    }

    /// Looks a signal up by name, searching incoming signals first.
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals().find(|s| s.name == name)
    }

    /// Width of the named signal, or 0 if the port has no such signal.
    pub fn width_of(&self, name: &str) -> u32 {
        self.signal(name).map_or(0, |s| s.width)
    }

    /// Returns true for the null port, which composition skips entirely.
    pub fn is_null(&self) -> bool {
        self.incoming.is_empty() && self.outgoing.is_empty()
    }
}

fn check_group(signals: &[Signal], expected: Direction) -> Result<(), HdlError> {
    let mut seen = HashSet::new();
    for signal in signals {
        if signal.direction != expected {
            return Err(HdlError::DirectionMismatch {
                name: signal.name.clone(),
                declared: signal.direction,
                expected,
            });
        }
        if !seen.insert(signal.name.as_str()) {
            return Err(HdlError::DuplicateSignal {
                name: signal.name.clone(),
                direction: expected,
            });
        }
    }
    Ok(())
}

/// Builds the standard buffered interface, deriving the address widths
/// from the number of values held in the input and output buffers.
pub fn create_port(x_width: u32, y_width: u32, x_count: usize, y_count: usize) -> Port {
    Port::standard(
        x_width,
        y_width,
        address_width(x_count),
        address_width(y_count),
    )
}

/// Builds the null port.
pub fn create_null_port() -> Port {
    Port::null()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_port_layout() {
        let port = create_port(16, 8, 6, 3);
        let incoming: Vec<_> = port.incoming().iter().map(|s| s.name.as_str()).collect();
        let outgoing: Vec<_> = port.outgoing().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(incoming, ["x", "y_address", "clock", "enable"]);
        assert_eq!(outgoing, ["y", "x_address", "done"]);
        assert_eq!(port.width_of("x"), 16);
        assert_eq!(port.width_of("y"), 8);
        assert_eq!(port.width_of("x_address"), 3);
        assert_eq!(port.width_of("y_address"), 2);
    }

    #[test]
    fn small_buffers_get_one_address_bit() {
        let port = create_port(8, 8, 1, 2);
        assert_eq!(port.width_of("x_address"), 1);
        assert_eq!(port.width_of("y_address"), 1);
    }

    #[test]
    fn duplicate_name_rejected() {
        let err = Port::new(
            vec![Signal::input("x", 8), Signal::input("x", 8)],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, HdlError::DuplicateSignal { ref name, .. } if name == "x"));
    }

    #[test]
    fn same_name_in_both_groups_allowed() {
        let port = Port::new(vec![Signal::input("d", 1)], vec![Signal::output("d", 1)]);
        assert!(port.is_ok());
    }

    #[test]
    fn wrong_direction_rejected() {
        let err = Port::new(vec![Signal::output("y", 8)], vec![]).unwrap_err();
        assert!(matches!(err, HdlError::DirectionMismatch { .. }));
    }

    #[test]
    fn null_port() {
        let port = create_null_port();
        assert!(port.is_null());
        assert_eq!(port.signals().count(), 0);
        assert!(!create_port(1, 1, 1, 1).is_null());
    }

    #[test]
    fn lookup_missing_signal() {
        let port = create_port(8, 8, 4, 4);
        assert!(port.signal("reset").is_none());
        assert_eq!(port.width_of("reset"), 0);
    }
}
