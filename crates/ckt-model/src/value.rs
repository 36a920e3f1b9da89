#![forbid(unsafe_code)]

//! Signal values held in simulation state.

use std::fmt;

/// A runtime signal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// Not yet driven / floating.
    #[default]
    Unknown,
    /// A single bit.
    Bit(bool),
    /// A multi-bit bus value. Bits above `width` are always zero.
    Word { width: u8, bits: u64 },
}

impl Value {
    /// Logic low.
    pub const LOW: Self = Self::Bit(false);
    /// Logic high.
    pub const HIGH: Self = Self::Bit(true);

    /// Build a bus value, masking `bits` to `width` bits (max 64).
    #[must_use]
    pub const fn word(width: u8, bits: u64) -> Self {
        let width = if width > 64 { 64 } else { width };
        let mask = if width == 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        Self::Word {
            width,
            bits: bits & mask,
        }
    }

    /// Whether the value is driven.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// The bit, if this is a single-bit value.
    #[must_use]
    pub const fn as_bit(self) -> Option<bool> {
        match self {
            Self::Bit(b) => Some(b),
            _ => None,
        }
    }

    /// Numeric interpretation of a known value.
    #[must_use]
    pub const fn as_u64(self) -> Option<u64> {
        match self {
            Self::Unknown => None,
            Self::Bit(b) => Some(b as u64),
            Self::Word { bits, .. } => Some(bits),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("x"),
            Self::Bit(false) => f.write_str("0"),
            Self::Bit(true) => f.write_str("1"),
            Self::Word { width, bits } => write!(f, "{width}'h{bits:x}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bit(b)
    }
}
