//! Error types for SMC operations

use thiserror::Error;

use crate::key::Key;

/// Result type alias for smckit operations
pub type Result<T> = std::result::Result<T, SmcError>;

/// Error type covering the connection lifecycle, the call protocol, and
/// payload decoding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SmcError {
    /// No AppleSMC service instance exists on this host
    #[error("SMC service not found")]
    ServiceNotFound,

    /// The service refused the connection because the caller lacks privileges
    #[error("SMC access denied: not privileged")]
    NotPrivileged,

    /// The service refused the connection request
    #[error("failed to open SMC service: kernel error {0:#x}")]
    OpenFailed(i32),

    /// A call was issued on a closed (or never opened) handle
    #[error("SMC connection unavailable")]
    ConnectionUnavailable,

    /// A protocol phase returned a non-success status
    #[error("SMC call failed for key {key}: code {code}")]
    CallFailed { key: Key, code: i32 },

    /// The controller answered with a data type the decoder has no mapping for
    #[error("unsupported data type {data_type} for key {key}")]
    UnsupportedType { key: Key, data_type: Key },

    /// The payload was shorter than the decoder requires for its type
    #[error("truncated payload for key {key}: {len} bytes")]
    TruncatedValue { key: Key, len: usize },

    /// The requested sensor name is not in the registry
    #[error("unknown sensor: {0}")]
    UnknownSensor(String),

    /// A key literal was not exactly 4 printable ASCII characters
    #[error("invalid SMC key: {0:?}")]
    InvalidKey(String),
}
