//! High-level sensor reading on top of the call protocol
//!
//! [`SmcReader`] owns the transport behind a mutex and holds that lock
//! across both phases of every read, so concurrent callers cannot interleave
//! their key-info and read-bytes phases on the shared connection. Single-key
//! reads come back as plain numbers with the sentinel convention the rest of
//! the system relies on: `0.0` for a failed temperature (harmless
//! placeholder), `-1.0` for a failed fan speed (`0` RPM is a real reading
//! for a stalled fan, so failures must be unambiguously invalid).

use std::sync::Mutex;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::decode;
use crate::error::{Result, SmcError};
use crate::key::Key;
use crate::protocol::{self, Transport, TypedValue};
use crate::registry::{self, SensorFamily};

#[cfg(target_os = "macos")]
use crate::connection::IoKitTransport;

/// Sensor reader over one controller connection
pub struct SmcReader<T: Transport> {
    transport: Mutex<T>,
}

/// Reader over the live IOKit connection
#[cfg(target_os = "macos")]
pub type Smc = SmcReader<IoKitTransport>;

#[cfg(target_os = "macos")]
impl Smc {
    /// Open a connection to the AppleSMC service and wrap it in a reader
    pub fn open() -> Result<Self> {
        Ok(SmcReader::new(IoKitTransport::open()?))
    }
}

impl<T: Transport> SmcReader<T> {
    /// Wrap an already-open transport
    pub fn new(transport: T) -> Self {
        SmcReader {
            transport: Mutex::new(transport),
        }
    }

    /// Read one register's typed payload
    ///
    /// The transport lock is held across both protocol phases.
    pub fn read_key(&self, key: Key) -> Result<TypedValue> {
        let mut guard = self.lock();
        protocol::read_key(&mut *guard, key)
    }

    /// Close the underlying connection; later reads fail with
    /// `ConnectionUnavailable` (and the sentinel at the façade level)
    pub fn close(&self) -> Result<()> {
        self.lock().close()
    }

    /// Decoded reading for a registry entry; errors propagate
    pub fn value(&self, family: SensorFamily, name: &str) -> Result<f64> {
        let entry = registry::find(family, name)
            .ok_or_else(|| SmcError::UnknownSensor(name.to_string()))?;
        self.value_for_key(entry.key)
    }

    /// Decoded reading for a raw key; errors propagate
    pub fn value_for_key(&self, key: Key) -> Result<f64> {
        let value = self.read_key(key)?;
        decode::decode(key, &value)
    }

    /// Temperature in Celsius; `0.0` on any failure
    pub fn temperature(&self, name: &str) -> f64 {
        self.value_or_sentinel(SensorFamily::Temperature, name, 0.0)
    }

    /// Fan speed in RPM; `-1.0` on any failure
    pub fn fan_rpm(&self, name: &str) -> f32 {
        self.value_or_sentinel(SensorFamily::Fan, name, -1.0) as f32
    }

    fn value_or_sentinel(&self, family: SensorFamily, name: &str, sentinel: f64) -> f64 {
        match self.value(family, name) {
            Ok(v) => v,
            Err(SmcError::UnsupportedType { key, data_type }) => {
                // Distinct from a refused call: the controller answered, we
                // just have no decode table for the tag.
                debug!("no decode table for {} ({}): {}", name, key, data_type);
                sentinel
            }
            Err(err) => {
                warn!("failed to read {:?} sensor {}: {}", family, name, err);
                sentinel
            }
        }
    }

    /// Full temperature snapshot, one independent round trip per field
    pub fn temperatures(&self) -> Temperatures {
        Temperatures {
            ambient_0: self.temperature("ambient_0"),
            ambient_1: self.temperature("ambient_1"),
            heatpipe_0: self.temperature("heatpipe_0"),
            heatpipe_1: self.temperature("heatpipe_1"),
            heatpipe_2: self.temperature("heatpipe_2"),
            heatpipe_3: self.temperature("heatpipe_3"),
            thermal_zone_0: self.temperature("thermal_zone_0"),
            thermal_zone_1: self.temperature("thermal_zone_1"),
            cpu_0_die: self.temperature("cpu_0_die"),
            cpu_0_diode: self.temperature("cpu_0_diode"),
            cpu_0_heatsink: self.temperature("cpu_0_heatsink"),
            cpu_0_proximity: self.temperature("cpu_0_proximity"),
            cpu_1_die: self.temperature("cpu_1_die"),
            cpu_1_diode: self.temperature("cpu_1_diode"),
            cpu_1_heatsink: self.temperature("cpu_1_heatsink"),
            cpu_1_proximity: self.temperature("cpu_1_proximity"),
            cpu_core_1: self.temperature("cpu_core_1"),
            cpu_core_2: self.temperature("cpu_core_2"),
            cpu_core_3: self.temperature("cpu_core_3"),
            cpu_core_4: self.temperature("cpu_core_4"),
            cpu_core_5: self.temperature("cpu_core_5"),
            cpu_core_6: self.temperature("cpu_core_6"),
            cpu_core_7: self.temperature("cpu_core_7"),
            cpu_core_8: self.temperature("cpu_core_8"),
            gpu_diode: self.temperature("gpu_diode"),
            gpu_heatsink: self.temperature("gpu_heatsink"),
            gpu_proximity: self.temperature("gpu_proximity"),
            mem_proximity: self.temperature("mem_proximity"),
            mem_slot_0: self.temperature("mem_slot_0"),
            mem_slot_1: self.temperature("mem_slot_1"),
            mem_slot_2: self.temperature("mem_slot_2"),
            mem_slot_3: self.temperature("mem_slot_3"),
            pci_proximity: self.temperature("pci_proximity"),
            pci_slot_0: self.temperature("pci_slot_0"),
            pci_slot_1: self.temperature("pci_slot_1"),
            pci_slot_2: self.temperature("pci_slot_2"),
            pci_slot_3: self.temperature("pci_slot_3"),
            mainboard_proximity: self.temperature("mainboard_proximity"),
            powerboard_proximity: self.temperature("powerboard_proximity"),
            battery_proximity: self.temperature("battery_proximity"),
            airport_proximity: self.temperature("airport_proximity"),
            lcd_proximity: self.temperature("lcd_proximity"),
            odd_proximity: self.temperature("odd_proximity"),
            northbridge_die: self.temperature("northbridge_die"),
            northbridge_proximity: self.temperature("northbridge_proximity"),
            hdd_0: self.temperature("hdd_0"),
            hdd_1: self.temperature("hdd_1"),
            hdd_2: self.temperature("hdd_2"),
            hdd_3: self.temperature("hdd_3"),
            thunderbolt_0: self.temperature("thunderbolt_0"),
            thunderbolt_1: self.temperature("thunderbolt_1"),
            thunderbolt_2: self.temperature("thunderbolt_2"),
            thunderbolt_3: self.temperature("thunderbolt_3"),
        }
    }

    /// Full voltage snapshot
    ///
    /// The voltage decode table is not implemented, so every field currently
    /// lands on the `0.0` sentinel via the unsupported-type path; the loop
    /// and struct shape are the extension point.
    pub fn voltages(&self) -> Voltages {
        let v = |name: &str| self.value_or_sentinel(SensorFamily::Voltage, name, 0.0);
        Voltages {
            cpu_vrm: v("cpu_vrm"),
            cpu_core_0: v("cpu_core_0"),
            cpu_core_1: v("cpu_core_1"),
            cpu_core_2: v("cpu_core_2"),
            cpu_core_3: v("cpu_core_3"),
            cpu_core_4: v("cpu_core_4"),
            cpu_core_5: v("cpu_core_5"),
            cpu_core_6: v("cpu_core_6"),
            cpu_core_7: v("cpu_core_7"),
            cpu_core_8: v("cpu_core_8"),
            gpu: v("gpu"),
            memory: v("memory"),
            battery: v("battery"),
            cmos: v("cmos"),
            mainboard: v("mainboard"),
            rail_12v: v("rail_12v"),
            vcc_12v: v("vcc_12v"),
            rail_3v: v("rail_3v"),
            rail_3_3v: v("rail_3_3v"),
            rail_5v: v("rail_5v"),
            rail_12v_aux: v("rail_12v_aux"),
            pci_12v: v("pci_12v"),
            battery_0: v("battery_0"),
        }
    }

    /// Full package-power snapshot; same extension-point status as
    /// [`voltages`](Self::voltages)
    pub fn powers(&self) -> Powers {
        let p = |name: &str| self.value_or_sentinel(SensorFamily::Power, name, 0.0);
        Powers {
            cpu_package_core: p("cpu_package_core"),
            cpu_package_total: p("cpu_package_total"),
            igpu_package: p("igpu_package"),
        }
    }

    /// Enumerate the controller's whole key space
    ///
    /// Reads the `#KEY` count, then walks the index space, skipping slots
    /// that fail or hold non-printable garbage.
    pub fn keys(&self) -> Result<Vec<Key>> {
        let mut guard = self.lock();
        let count = protocol::key_count(&mut *guard)?;
        let mut keys = Vec::with_capacity(count as usize);
        for index in 0..count {
            match protocol::key_at_index(&mut *guard, index) {
                Ok(key) if key.is_printable() => keys.push(key),
                Ok(_) | Err(_) => continue,
            }
        }
        Ok(keys)
    }

    /// Number of fans the controller reports (`FNum`), if readable
    pub fn fan_count(&self) -> Option<u32> {
        let value = self.read_key(Key::from_bytes(*b"FNum")).ok()?;
        let payload = value.payload();
        if payload.is_empty() || payload.len() > 4 {
            return None;
        }
        let mut count: u32 = 0;
        for &b in payload {
            count = count << 8 | u32::from(b);
        }
        Some(count)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, T> {
        // A poisoned lock only means another reader panicked mid-call; the
        // connection itself is still usable.
        self.transport
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One aggregate temperature reading per registry entry, in Celsius
///
/// Failed fields hold `0.0`; there is no carry-over between snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperatures {
    pub ambient_0: f64,
    pub ambient_1: f64,
    pub heatpipe_0: f64,
    pub heatpipe_1: f64,
    pub heatpipe_2: f64,
    pub heatpipe_3: f64,
    pub thermal_zone_0: f64,
    pub thermal_zone_1: f64,
    pub cpu_0_die: f64,
    pub cpu_0_diode: f64,
    pub cpu_0_heatsink: f64,
    pub cpu_0_proximity: f64,
    pub cpu_1_die: f64,
    pub cpu_1_diode: f64,
    pub cpu_1_heatsink: f64,
    pub cpu_1_proximity: f64,
    pub cpu_core_1: f64,
    pub cpu_core_2: f64,
    pub cpu_core_3: f64,
    pub cpu_core_4: f64,
    pub cpu_core_5: f64,
    pub cpu_core_6: f64,
    pub cpu_core_7: f64,
    pub cpu_core_8: f64,
    pub gpu_diode: f64,
    pub gpu_heatsink: f64,
    pub gpu_proximity: f64,
    pub mem_proximity: f64,
    pub mem_slot_0: f64,
    pub mem_slot_1: f64,
    pub mem_slot_2: f64,
    pub mem_slot_3: f64,
    pub pci_proximity: f64,
    pub pci_slot_0: f64,
    pub pci_slot_1: f64,
    pub pci_slot_2: f64,
    pub pci_slot_3: f64,
    pub mainboard_proximity: f64,
    pub powerboard_proximity: f64,
    pub battery_proximity: f64,
    pub airport_proximity: f64,
    pub lcd_proximity: f64,
    pub odd_proximity: f64,
    pub northbridge_die: f64,
    pub northbridge_proximity: f64,
    pub hdd_0: f64,
    pub hdd_1: f64,
    pub hdd_2: f64,
    pub hdd_3: f64,
    pub thunderbolt_0: f64,
    pub thunderbolt_1: f64,
    pub thunderbolt_2: f64,
    pub thunderbolt_3: f64,
}

/// One aggregate voltage reading per registry entry, in volts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voltages {
    pub cpu_vrm: f64,
    pub cpu_core_0: f64,
    pub cpu_core_1: f64,
    pub cpu_core_2: f64,
    pub cpu_core_3: f64,
    pub cpu_core_4: f64,
    pub cpu_core_5: f64,
    pub cpu_core_6: f64,
    pub cpu_core_7: f64,
    pub cpu_core_8: f64,
    pub gpu: f64,
    pub memory: f64,
    pub battery: f64,
    pub cmos: f64,
    pub mainboard: f64,
    pub rail_12v: f64,
    pub vcc_12v: f64,
    pub rail_3v: f64,
    pub rail_3_3v: f64,
    pub rail_5v: f64,
    pub rail_12v_aux: f64,
    pub pci_12v: f64,
    pub battery_0: f64,
}

/// One aggregate package-power reading per registry entry, in watts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powers {
    pub cpu_package_core: f64,
    pub cpu_package_total: f64,
    pub igpu_package: f64,
}
