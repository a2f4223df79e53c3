//! In-memory controller double used by the unit tests
//!
//! Emulates the behavior the protocol layer has to cope with: a register
//! space addressed by 4-character keys, a nonzero result byte for unknown
//! keys, and a staged-key `READ_BYTES` phase — the controller serves the
//! payload of whichever key the *last* `READ_KEYINFO` named, which is what
//! makes unsynchronized two-phase reads hazardous on a shared connection.
//! Individual calls are serialized (as the kernel does); call pairs are not.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Result, SmcError};
use crate::key::Key;
use crate::protocol::{
    SmcCallData, Transport, CMD_READ_BYTES, CMD_READ_INDEX, CMD_READ_KEYINFO, KEY_COUNT,
    MAX_DATA_SIZE,
};

// Result byte the real controller returns for a key it does not know.
const RESULT_KEY_NOT_FOUND: u8 = 0x84;

#[derive(Clone)]
struct Register {
    data_type: Key,
    wire_size: u32,
    bytes: [u8; MAX_DATA_SIZE],
}

struct Controller {
    registers: HashMap<Key, Register>,
    order: Vec<Key>,
    staged: Option<Key>,
    failing: Vec<Key>,
    command_counts: HashMap<u8, u64>,
}

impl Controller {
    fn register(&self, key: Key) -> Option<Register> {
        if key == KEY_COUNT {
            let mut bytes = [0u8; MAX_DATA_SIZE];
            bytes[..4].copy_from_slice(&(self.order.len() as u32).to_be_bytes());
            return Some(Register {
                data_type: Key::from_bytes(*b"ui32"),
                wire_size: 4,
                bytes,
            });
        }
        self.registers.get(&key).cloned()
    }

    fn handle(&mut self, input: &SmcCallData) -> SmcCallData {
        let mut output = *input;
        output.result = 0;
        *self.command_counts.entry(input.data8).or_insert(0) += 1;

        match input.data8 {
            CMD_READ_KEYINFO => {
                let key = Key::from_u32(input.key);
                if self.failing.contains(&key) {
                    output.result = RESULT_KEY_NOT_FOUND;
                    return output;
                }
                match self.register(key) {
                    Some(reg) => {
                        output.key_info.data_size = reg.wire_size;
                        output.key_info.data_type = reg.data_type.encode();
                        self.staged = Some(key);
                    }
                    None => output.result = RESULT_KEY_NOT_FOUND,
                }
            }
            CMD_READ_BYTES => {
                // Staged-key semantics: payload comes from the register the
                // last READ_KEYINFO named, not from the input key.
                match self.staged.and_then(|key| self.register(key)) {
                    Some(reg) => output.bytes = reg.bytes,
                    None => output.result = RESULT_KEY_NOT_FOUND,
                }
            }
            CMD_READ_INDEX => match self.order.get(input.data32 as usize) {
                Some(key) => output.key = key.encode(),
                None => output.result = RESULT_KEY_NOT_FOUND,
            },
            _ => output.result = RESULT_KEY_NOT_FOUND,
        }
        output
    }
}

/// Cloneable handle to a simulated controller
///
/// Clones share the controller state, so several handles can exercise the
/// same register space from different threads the way separate callers
/// share one kernel connection.
#[derive(Clone)]
pub(crate) struct MockTransport {
    controller: Arc<Mutex<Controller>>,
    open: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            controller: Arc::new(Mutex::new(Controller {
                registers: HashMap::new(),
                order: Vec::new(),
                staged: None,
                failing: Vec::new(),
                command_counts: HashMap::new(),
            })),
            open: true,
        }
    }

    /// Add a register with the given type tag and payload
    pub fn seed(&mut self, key: &str, data_type: &str, payload: &[u8]) {
        self.seed_with_size(key, data_type, payload, payload.len() as u32);
    }

    /// Add a register whose advertised wire size differs from the payload
    pub fn seed_with_size(&mut self, key: &str, data_type: &str, payload: &[u8], wire_size: u32) {
        let key: Key = key.parse().unwrap();
        let mut bytes = [0u8; MAX_DATA_SIZE];
        bytes[..payload.len()].copy_from_slice(payload);
        let mut controller = self.controller.lock().unwrap();
        controller.registers.insert(
            key,
            Register {
                data_type: data_type.parse().unwrap(),
                wire_size,
                bytes,
            },
        );
        controller.order.push(key);
    }

    /// Make `READ_KEYINFO` for this key fail with a nonzero result byte
    pub fn fail_key(&mut self, key: &str) {
        let key: Key = key.parse().unwrap();
        self.controller.lock().unwrap().failing.push(key);
    }

    /// How many calls carried the given command byte
    pub fn calls_with_command(&self, command: u8) -> u64 {
        self.controller
            .lock()
            .unwrap()
            .command_counts
            .get(&command)
            .copied()
            .unwrap_or(0)
    }
}

impl Transport for MockTransport {
    fn call(&mut self, _selector: u32, input: &SmcCallData) -> Result<SmcCallData> {
        if !self.open {
            return Err(SmcError::ConnectionUnavailable);
        }
        // Lock held for this single call only; pairs of calls interleave.
        let mut controller = self.controller.lock().unwrap();
        Ok(controller.handle(input))
    }

    fn close(&mut self) -> Result<()> {
        if !self.open {
            return Err(SmcError::ConnectionUnavailable);
        }
        self.open = false;
        Ok(())
    }
}
