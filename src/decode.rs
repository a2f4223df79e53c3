//! Decoding of typed register payloads into numeric readings
//!
//! The controller tags every payload with a 4-character type code. Only the
//! two codes the read paths rely on are wired up: `sp78` (temperatures) and
//! `fpe2` (fan speeds). Everything else decodes to
//! [`UnsupportedType`](SmcError::UnsupportedType) — the voltage, current,
//! power, and frequency registers are in the registry but their fixed-point
//! tables are not implemented yet, and an unknown tag must never take the
//! read path down.

use crate::error::{Result, SmcError};
use crate::key::Key;
use crate::protocol::TypedValue;

/// Temperature fixed-point tag (8.8-style)
pub const TYPE_SP78: Key = Key::from_bytes(*b"sp78");
/// Fan-speed fixed-point tag (16-bit integer scaled by 1/4)
pub const TYPE_FPE2: Key = Key::from_bytes(*b"fpe2");

/// How a payload's bytes map onto a number, selected by the type tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataFormat {
    /// `sp78`: `(byte0 * 256 + byte1) / 256`, both bytes taken unsigned
    ///
    /// True 8.8 fixed point would sign-extend byte0, so this can never go
    /// below zero even where sub-zero readings are physically plausible.
    /// That matches the deployed behavior; do not "fix" it without captures
    /// from real hardware.
    FixedPoint8_8,
    /// Big-endian u16 divided by a constant scale (`fpe2` uses 4.0)
    FixedPointScaled(f64),
    /// Big-endian unsigned integer of the payload bytes, unscaled
    ///
    /// Extension point for the integer-typed registers; no tag maps here
    /// today.
    Raw,
    /// No mapping for this tag
    Unsupported,
}

impl DataFormat {
    /// Look up the format for a type tag
    pub fn for_tag(tag: Key) -> DataFormat {
        match tag {
            TYPE_SP78 => DataFormat::FixedPoint8_8,
            TYPE_FPE2 => DataFormat::FixedPointScaled(4.0),
            _ => DataFormat::Unsupported,
        }
    }
}

/// Decode a typed payload into a numeric reading
///
/// Pure function of the value's tag, size, and bytes; `key` is only carried
/// into the error for context. Unknown tags fail with `UnsupportedType`,
/// undersized payloads with `TruncatedValue` — never a panic.
pub fn decode(key: Key, value: &TypedValue) -> Result<f64> {
    let payload = value.payload();
    match DataFormat::for_tag(value.data_type) {
        DataFormat::FixedPoint8_8 => {
            let [hi, lo] = two_bytes(key, payload)?;
            Ok(f64::from(u32::from(hi) * 256 + u32::from(lo)) / 256.0)
        }
        DataFormat::FixedPointScaled(scale) => {
            let [hi, lo] = two_bytes(key, payload)?;
            Ok(f64::from(u16::from_be_bytes([hi, lo])) / scale)
        }
        DataFormat::Raw => {
            let mut raw: u64 = 0;
            for &b in payload.iter().take(8) {
                raw = raw << 8 | u64::from(b);
            }
            Ok(raw as f64)
        }
        DataFormat::Unsupported => Err(SmcError::UnsupportedType {
            key,
            data_type: value.data_type,
        }),
    }
}

fn two_bytes(key: Key, payload: &[u8]) -> Result<[u8; 2]> {
    if payload.len() < 2 {
        return Err(SmcError::TruncatedValue {
            key,
            len: payload.len(),
        });
    }
    Ok([payload[0], payload[1]])
}
