//! 4-character SMC register keys and their packed wire form
//!
//! Every SMC register is addressed by exactly four printable ASCII
//! characters. On the wire the key travels as a big-endian packed `u32`
//! (first character in the most significant byte). The same packing is used
//! for the `dataType` tag the controller returns, so [`Key`] doubles as the
//! type-tag representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SmcError;

/// A 4-character SMC key (register name or data-type tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key([u8; 4]);

impl Key {
    /// Build a key from its four raw bytes
    ///
    /// `const` so the static registry tables can be built from literals.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Key(bytes)
    }

    /// Pack into the big-endian `u32` transport representation
    pub fn encode(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Unpack from the big-endian `u32` transport representation
    pub fn from_u32(value: u32) -> Self {
        Key(value.to_be_bytes())
    }

    /// Raw bytes of the key
    pub fn bytes(self) -> [u8; 4] {
        self.0
    }

    /// Whether all four bytes are printable ASCII
    ///
    /// Index enumeration can hand back garbage slots; callers filter on this.
    pub fn is_printable(self) -> bool {
        self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Key {
    type Err = SmcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return Err(SmcError::InvalidKey(s.to_string()));
        }
        Ok(Key([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
