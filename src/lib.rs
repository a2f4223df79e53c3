//! # SMC Kit (smckit)
//!
//! A Rust client library for the Apple System Management Controller (SMC),
//! the embedded controller that exposes temperatures, fan speeds, voltages,
//! and power readings on Mac hardware. SMC Kit speaks the controller's call
//! protocol over IOKit and turns raw register payloads into plain numbers.
//!
//! ## Features
//!
//! - **Named Sensors**: A curated registry mapping readable names to the
//!   controller's four-character key codes
//! - **Two-Phase Protocol**: Key-info then read-bytes, serialized per reader
//!   so concurrent callers never cross wires
//! - **Fixed-Point Decoding**: `sp78` temperatures and `fpe2` fan speeds
//! - **Graceful Degradation**: Failed sensors report sentinel values instead
//!   of aborting a snapshot
//! - **Key Space Enumeration**: Walk every register the controller exposes
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(target_os = "macos")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use smckit::Smc;
//!
//! let smc = Smc::open()?;
//!
//! // Single sensors: failures come back as sentinels, not errors.
//! println!("CPU proximity: {:.1}°C", smc.temperature("cpu_0_proximity"));
//! println!("Fan 0: {:.0} RPM", smc.fan_rpm("fan_0"));
//!
//! // Or take a full snapshot, one register read per field.
//! let temps = smc.temperatures();
//! println!("{}", serde_json::to_string_pretty(&temps)?);
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "macos"))]
//! # fn main() {}
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - The `smc` command-line tool (list, temps, fans)
//!
//! ## Platform Support
//!
//! The live connection requires macOS and the AppleSMC kernel service. The
//! key codec, call protocol, decoders, and registry are platform-neutral
//! and usable against any [`protocol::Transport`] implementation.

pub mod decode; // Fixed-point payload decoding (sp78, fpe2)
pub mod error;
pub mod key; // Four-character key codec
pub mod protocol; // Two-phase call protocol over a transport
pub mod reader; // High-level sensor facade with sentinel semantics
pub mod registry; // Named sensor catalog

#[cfg(target_os = "macos")]
pub mod connection; // Live IOKit transport
#[cfg(target_os = "macos")]
mod iokit;

#[cfg(test)]
pub(crate) mod mock;

// Re-export main types
pub use decode::DataFormat;
pub use error::{Result, SmcError};
pub use key::Key;
pub use protocol::{KeyInfo, Transport, TypedValue};
pub use reader::{Powers, SmcReader, Temperatures, Voltages};
pub use registry::{SensorEntry, SensorFamily};

#[cfg(target_os = "macos")]
pub use connection::IoKitTransport;
#[cfg(target_os = "macos")]
pub use reader::Smc;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
