//! Named, sized signals on a component boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a signal as seen from the component that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Consumed by the component (a sink).
    In,
    /// Produced by the component (a source).
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// A signal in a component interface.
///
/// A width of zero marks an absent signal: it takes part in wiring lookups
/// by name but is never declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signal {
    /// Signal name, e.g. `x` or `y_address`.
    pub name: String,
    /// Width in bits.
    pub width: u32,
    /// Direction relative to the declaring component.
    pub direction: Direction,
}

impl Signal {
    /// Creates an input signal.
    pub fn input(name: &str, width: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            direction: Direction::In,
        }
    }

    /// Creates an output signal.
    pub fn output(name: &str, width: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            direction: Direction::Out,
        }
    }

    /// Returns true if the signal is present, i.e. has a non-zero width.
    pub fn is_present(&self) -> bool {
        self.width > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_direction() {
        assert_eq!(Signal::input("x", 8).direction, Direction::In);
        assert_eq!(Signal::output("y", 8).direction, Direction::Out);
    }

    #[test]
    fn zero_width_is_absent() {
        assert!(!Signal::input("x", 0).is_present());
        assert!(Signal::input("x", 1).is_present());
    }

    #[test]
    fn serde_roundtrip() {
        let s = Signal::output("x_address", 3);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"name":"x_address","width":3,"direction":"out"}"#);
        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
