//! IEEE 1164 nine-valued `std_logic` as printed by VHDL simulators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `std_logic` value.
///
/// Generated designs only ever drive `Zero` and `One`, but a simulator report
/// may contain any of the nine states, most commonly `U` for a register that
/// was never written.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Logic {
    /// Uninitialized (`U`).
    Uninitialized,
    /// Forcing unknown (`X`).
    X,
    /// Forcing low (`0`).
    Zero,
    /// Forcing high (`1`).
    One,
    /// High impedance (`Z`).
    Z,
    /// Weak unknown (`W`).
    WeakUnknown,
    /// Weak low (`L`).
    WeakZero,
    /// Weak high (`H`).
    WeakOne,
    /// Don't care (`-`).
    DontCare,
}

impl Logic {
    /// Converts a character to a [`Logic`] value.
    ///
    /// Accepts the nine `std_logic` characters, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'U' | 'u' => Some(Logic::Uninitialized),
            'X' | 'x' => Some(Logic::X),
            '0' => Some(Logic::Zero),
            '1' => Some(Logic::One),
            'Z' | 'z' => Some(Logic::Z),
            'W' | 'w' => Some(Logic::WeakUnknown),
            'L' | 'l' => Some(Logic::WeakZero),
            'H' | 'h' => Some(Logic::WeakOne),
            '-' => Some(Logic::DontCare),
            _ => None,
        }
    }

    /// Returns the VHDL character for this value.
    pub fn as_char(self) -> char {
        match self {
            Logic::Uninitialized => 'U',
            Logic::X => 'X',
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::Z => 'Z',
            Logic::WeakUnknown => 'W',
            Logic::WeakZero => 'L',
            Logic::WeakOne => 'H',
            Logic::DontCare => '-',
        }
    }

    /// Strength-strips the value to a definite bit, following `to_X01`.
    ///
    /// `0`/`L` map to `false`, `1`/`H` to `true`, everything else is undefined.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Logic::Zero | Logic::WeakZero => Some(false),
            Logic::One | Logic::WeakOne => Some(true),
            _ => None,
        }
    }

    /// Returns the forcing value for a boolean.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Logic::One
        } else {
            Logic::Zero
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
