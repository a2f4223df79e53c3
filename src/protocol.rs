//! SMC call protocol: fixed-size call structures and the two-phase read
//!
//! A read is two round trips over the same connection: `READ_KEYINFO` asks
//! the controller for a register's size and type tag, `READ_BYTES` then
//! fetches that many raw payload bytes. The kernel serializes individual
//! calls but nothing pairs the two phases together — callers that share a
//! transport must hold their own lock across both (see
//! [`SmcReader`](crate::reader::SmcReader)).

use crate::error::{Result, SmcError};
use crate::key::Key;

/// Function index selecting the SMC handler in the kernel extension
pub const KERNEL_INDEX: u32 = 2;

/// Read a register's raw payload bytes
pub const CMD_READ_BYTES: u8 = 5;
/// Write a register's payload bytes (not issued by this crate)
pub const CMD_WRITE_BYTES: u8 = 6;
/// Look up the key stored at a numeric index (key-space enumeration)
pub const CMD_READ_INDEX: u8 = 8;
/// Query a register's size, type tag, and attributes
pub const CMD_READ_KEYINFO: u8 = 9;
/// Query power-limit information (not issued by this crate)
pub const CMD_READ_PLIMIT: u8 = 11;
/// Query the SMC firmware version (not issued by this crate)
pub const CMD_READ_VERS: u8 = 12;

/// Payload buffer size; no register carries more than 32 bytes
pub const MAX_DATA_SIZE: usize = 32;

/// Key whose payload is the total number of registers the controller exposes
pub const KEY_COUNT: Key = Key::from_bytes(*b"#KEY");

/// Version sub-block of the call structure
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SmcVersion {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub reserved: u8,
    pub release: u16,
}

/// Power-limit sub-block of the call structure
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SmcPLimitData {
    pub version: u16,
    pub length: u16,
    pub cpu_p_limit: u32,
    pub gpu_p_limit: u32,
    pub mem_p_limit: u32,
}

/// Key-info sub-block of the call structure
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SmcKeyInfoData {
    pub data_size: u32,
    pub data_type: u32,
    pub data_attributes: u8,
}

/// The fixed-size structure exchanged with the kernel in both directions
///
/// Field order and widths are dictated by the kernel extension and must not
/// change.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SmcCallData {
    pub key: u32,
    pub vers: SmcVersion,
    pub p_limit_data: SmcPLimitData,
    pub key_info: SmcKeyInfoData,
    pub result: u8,
    pub status: u8,
    pub data8: u8,
    pub data32: u32,
    pub bytes: [u8; MAX_DATA_SIZE],
}

/// The "send a struct, receive a struct" primitive a connection provides
///
/// Implementations map a closed handle to
/// [`ConnectionUnavailable`](SmcError::ConnectionUnavailable) and a nonzero
/// kernel return to [`CallFailed`](SmcError::CallFailed) carrying the input
/// key. Each call is atomic on its own; sequences of calls are not.
pub trait Transport {
    /// One request/response exchange against the controller
    fn call(&mut self, selector: u32, input: &SmcCallData) -> Result<SmcCallData>;

    /// Release the underlying handle; later calls fail with
    /// `ConnectionUnavailable`
    fn close(&mut self) -> Result<()>;
}

/// Result of the `READ_KEYINFO` phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo {
    /// Meaningful payload length, never above [`MAX_DATA_SIZE`]
    pub data_size: u8,
    /// 4-character type tag, e.g. `sp78` or `fpe2`
    pub data_type: Key,
    pub attributes: u8,
}

impl KeyInfo {
    fn from_wire(wire: &SmcKeyInfoData) -> Self {
        KeyInfo {
            data_size: wire.data_size.min(MAX_DATA_SIZE as u32) as u8,
            data_type: Key::from_u32(wire.data_type),
            attributes: wire.data_attributes,
        }
    }
}

/// A register's raw payload together with its type tag
///
/// Only the first `data_size` bytes are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedValue {
    pub data_type: Key,
    pub data_size: u8,
    pub bytes: [u8; MAX_DATA_SIZE],
}

impl TypedValue {
    /// The meaningful prefix of the payload buffer
    pub fn payload(&self) -> &[u8] {
        &self.bytes[..self.data_size as usize]
    }
}

fn check_result(key: Key, output: &SmcCallData) -> Result<()> {
    if output.result != 0 {
        return Err(SmcError::CallFailed {
            key,
            code: output.result as i32,
        });
    }
    Ok(())
}

/// Query a register's size and type tag (phase A of a read)
pub fn read_key_info<T: Transport + ?Sized>(transport: &mut T, key: Key) -> Result<KeyInfo> {
    let input = SmcCallData {
        key: key.encode(),
        data8: CMD_READ_KEYINFO,
        ..Default::default()
    };
    let output = transport.call(KERNEL_INDEX, &input)?;
    check_result(key, &output)?;
    Ok(KeyInfo::from_wire(&output.key_info))
}

/// Read a register's typed payload: `READ_KEYINFO` then `READ_BYTES`
///
/// Either phase failing aborts the read with `CallFailed`; there is no
/// retry. The phases are not atomic with respect to other callers on the
/// same transport.
pub fn read_key<T: Transport + ?Sized>(transport: &mut T, key: Key) -> Result<TypedValue> {
    let info = read_key_info(transport, key)?;

    let input = SmcCallData {
        key: key.encode(),
        key_info: SmcKeyInfoData {
            data_size: info.data_size as u32,
            ..Default::default()
        },
        data8: CMD_READ_BYTES,
        ..Default::default()
    };
    let output = transport.call(KERNEL_INDEX, &input)?;
    check_result(key, &output)?;

    let size = info.data_size as usize;
    let mut bytes = [0u8; MAX_DATA_SIZE];
    bytes[..size].copy_from_slice(&output.bytes[..size]);
    Ok(TypedValue {
        data_type: info.data_type,
        data_size: info.data_size,
        bytes,
    })
}

/// Look up the key stored at a numeric register index
pub fn key_at_index<T: Transport + ?Sized>(transport: &mut T, index: u32) -> Result<Key> {
    let input = SmcCallData {
        data8: CMD_READ_INDEX,
        data32: index,
        ..Default::default()
    };
    let output = transport.call(KERNEL_INDEX, &input)?;
    Ok(Key::from_u32(output.key))
}

/// Number of registers the controller exposes, from the `#KEY` register
pub fn key_count<T: Transport + ?Sized>(transport: &mut T) -> Result<u32> {
    let value = read_key(transport, KEY_COUNT)?;
    let payload = value.payload();
    if payload.len() < 4 {
        return Err(SmcError::TruncatedValue {
            key: KEY_COUNT,
            len: payload.len(),
        });
    }
    Ok(u32::from_be_bytes([
        payload[0], payload[1], payload[2], payload[3],
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    #[test]
    fn test_read_key_two_phases() {
        let mut transport = MockTransport::new();
        transport.seed("TC0P", "sp78", &[0x19, 0x80]);

        let value = read_key(&mut transport, "TC0P".parse().unwrap()).unwrap();
        assert_eq!(value.data_type, "sp78".parse().unwrap());
        assert_eq!(value.data_size, 2);
        assert_eq!(value.payload(), &[0x19, 0x80]);
        // one keyinfo call plus one bytes call
        assert_eq!(transport.calls_with_command(CMD_READ_KEYINFO), 1);
        assert_eq!(transport.calls_with_command(CMD_READ_BYTES), 1);
    }

    #[test]
    fn test_unknown_key_is_call_failed() {
        let mut transport = MockTransport::new();
        let key: Key = "ZZZZ".parse().unwrap();

        match read_key(&mut transport, key) {
            Err(SmcError::CallFailed { key: k, .. }) => assert_eq!(k, key),
            other => panic!("expected CallFailed, got {:?}", other),
        }
        // phase A failed, phase B never issued
        assert_eq!(transport.calls_with_command(CMD_READ_BYTES), 0);
    }

    #[test]
    fn test_payload_clamped_to_buffer() {
        let mut transport = MockTransport::new();
        transport.seed_with_size("BIGK", "ch8*", &[0xAB; 32], 64);

        let value = read_key(&mut transport, "BIGK".parse().unwrap()).unwrap();
        assert_eq!(value.data_size as usize, MAX_DATA_SIZE);
    }

    #[test]
    fn test_key_count_and_enumeration() {
        let mut transport = MockTransport::new();
        transport.seed("TC0P", "sp78", &[0x19, 0x80]);
        transport.seed("F0Ac", "fpe2", &[0x12, 0xC0]);

        assert_eq!(key_count(&mut transport).unwrap(), 2);
        assert_eq!(
            key_at_index(&mut transport, 0).unwrap(),
            "TC0P".parse().unwrap()
        );
        assert_eq!(
            key_at_index(&mut transport, 1).unwrap(),
            "F0Ac".parse().unwrap()
        );
    }

    #[test]
    fn test_closed_transport_is_unavailable() {
        let mut transport = MockTransport::new();
        transport.seed("TC0P", "sp78", &[0x19, 0x80]);
        transport.close().unwrap();

        assert_eq!(
            read_key(&mut transport, "TC0P".parse().unwrap()),
            Err(SmcError::ConnectionUnavailable)
        );
    }
}
