//! Bit strings exchanged with generated VHDL and simulator reports.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors produced when parsing or interpreting a [`Bits`] value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitsError {
    /// A character is not one of the nine `std_logic` characters.
    #[error("invalid std_logic character '{ch}' at position {position} in \"{text}\"")]
    InvalidChar {
        /// The full input text.
        text: String,
        /// The offending character.
        ch: char,
        /// Position of the character, counted from the left.
        position: usize,
    },

    /// The bit string contains values other than `0`/`1` (or `L`/`H`).
    #[error("bit string {bits} contains undefined values")]
    Undefined {
        /// The rendered bit string.
        bits: String,
    },

    /// The bit string is too wide to be interpreted as a 64-bit integer.
    #[error("bit string of width {width} exceeds 64 bits")]
    TooWide {
        /// The width of the bit string.
        width: u32,
    },
}

/// An ordered vector of [`Logic`] values.
///
/// Index 0 is the least significant bit; the textual form (display, parsing)
/// is most significant bit first, matching VHDL bit-string literals.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bits {
    values: Vec<Logic>,
}

impl Bits {
    /// Creates a bit string of the given width, initialized to all `Zero`.
    pub fn new(width: u32) -> Self {
        Self {
            values: vec![Logic::Zero; width as usize],
        }
    }

    /// Returns the number of bits.
    pub fn width(&self) -> u32 {
        self.values.len() as u32
    }

    /// Gets the value at the given index (0 = LSB).
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        assert!(
            index < self.width(),
            "index {index} out of bounds for width {}",
            self.width()
        );
        self.values[index as usize]
    }

    /// Sets the value at the given index (0 = LSB).
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, value: Logic) {
        assert!(
            index < self.width(),
            "index {index} out of bounds for width {}",
            self.width()
        );
        self.values[index as usize] = value;
    }

    /// Creates the `width`-bit two's-complement representation of `value`.
    ///
    /// Bits above `width` are discarded, so values that do not fit wrap.
    pub fn from_signed(value: i64, width: u32) -> Self {
        let wide = value as i128;
        let values = (0..width)
            .map(|i| {
                let bit = if i < 127 { (wide >> i) & 1 } else { (wide >> 127) & 1 };
                Logic::from_bool(bit != 0)
            })
            .collect();
        Self { values }
    }

    /// Creates the `width`-bit unsigned representation of `value`.
    pub fn from_unsigned(value: u64, width: u32) -> Self {
        let values = (0..width)
            .map(|i| Logic::from_bool(i < 64 && (value >> i) & 1 != 0))
            .collect();
        Self { values }
    }

    /// Parses a string like `"10U1"` (MSB first) into a bit string.
    pub fn from_binary_str(s: &str) -> Result<Self, BitsError> {
        let mut values = Vec::with_capacity(s.len());
        for (position, ch) in s.chars().enumerate() {
            let value = Logic::from_char(ch).ok_or_else(|| BitsError::InvalidChar {
                text: s.to_string(),
                ch,
                position,
            })?;
            values.push(value);
        }
        values.reverse();
        Ok(Self { values })
    }

    /// Returns true if every bit has a definite value.
    pub fn is_defined(&self) -> bool {
        self.values.iter().all(|v| v.to_bool().is_some())
    }

    /// Interprets the bits as an unsigned integer.
    pub fn to_unsigned(&self) -> Result<u64, BitsError> {
        if self.width() > 64 {
            return Err(BitsError::TooWide {
                width: self.width(),
            });
        }
        let mut result = 0u64;
        for (i, value) in self.values.iter().enumerate() {
            match value.to_bool() {
                Some(true) => result |= 1 << i,
                Some(false) => {}
                None => return Err(self.undefined()),
            }
        }
        Ok(result)
    }

    /// Interprets the bits as a two's-complement signed integer.
    ///
    /// The most significant bit is the sign bit. An empty bit string is 0.
    pub fn to_signed(&self) -> Result<i64, BitsError> {
        let width = self.width();
        let raw = self.to_unsigned()?;
        if width == 0 || width == 64 {
            return Ok(raw as i64);
        }
        let sign = 1u64 << (width - 1);
        if raw & sign != 0 {
            Ok((raw as i128 - (1i128 << width)) as i64)
        } else {
            Ok(raw as i64)
        }
    }

    fn undefined(&self) -> BitsError {
        BitsError::Undefined {
            bits: self.to_string(),
        }
    }
}

impl FromStr for Bits {
    type Err = BitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_binary_str(s)
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.values.iter().rev() {
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits({self})")
    }
}

/// Renders `value` as a quoted `width`-bit two's-complement VHDL literal.
///
/// ```
/// assert_eq!(kiln_common::to_vhdl_binary_literal(-1, 4), "\"1111\"");
/// ```
pub fn to_vhdl_binary_literal(value: i64, width: u32) -> String {
    format!("\"{}\"", Bits::from_signed(value, width))
}
