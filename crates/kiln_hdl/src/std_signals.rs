//! The standard signal vocabulary understood by the auto-wiring engine.
//!
//! A component that wants automatic wiring exposes exactly these names:
//! `x` and `y` for data, `x_address` and `y_address` for buffer addressing,
//! and `enable`, `done` and `clock` for control.

use crate::signal::Signal;

/// Primary data input.
pub fn x(width: u32) -> Signal {
    Signal::input("x", width)
}

/// Primary data output.
pub fn y(width: u32) -> Signal {
    Signal::output("y", width)
}

/// Address into the component's input buffer, driven by the component.
pub fn x_address(width: u32) -> Signal {
    Signal::output("x_address", width)
}

/// Address into the component's output buffer, driven from outside.
pub fn y_address(width: u32) -> Signal {
    Signal::input("y_address", width)
}

/// Starts computation.
pub fn enable() -> Signal {
    Signal::input("enable", 1)
}

/// Signals that the output buffer holds a complete result.
pub fn done() -> Signal {
    Signal::output("done", 1)
}

/// System clock.
pub fn clock() -> Signal {
    Signal::input("clock", 1)
}

/// Every standard signal name, in declaration order.
pub const NAMES: [&str; 7] = ["x", "y", "x_address", "y_address", "enable", "done", "clock"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Direction;

    #[test]
    fn control_signals_are_single_bit() {
        assert_eq!(enable().width, 1);
        assert_eq!(done().width, 1);
        assert_eq!(clock().width, 1);
    }

    #[test]
    fn directions() {
        assert_eq!(x(8).direction, Direction::In);
        assert_eq!(y_address(2).direction, Direction::In);
        assert_eq!(y(8).direction, Direction::Out);
        assert_eq!(x_address(2).direction, Direction::Out);
        assert_eq!(done().direction, Direction::Out);
    }
}
