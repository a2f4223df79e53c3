//! Static registry of semantic sensor names and their SMC keys
//!
//! The key literals are a versioned hardware contract and are reproduced
//! verbatim from the shipped register map; do not "correct" entries that
//! look inconsistent (e.g. the swapped GPU memory-clock keys) without
//! captures from real machines. Iteration order is declaration order, which
//! fixes the field order of the snapshot structs.

use serde::{Deserialize, Serialize};

use crate::key::Key;

/// Which reading family a registry entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorFamily {
    Temperature,
    Voltage,
    Current,
    Power,
    Frequency,
    Fan,
}

/// One registry entry: a semantic name bound to a protocol key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorEntry {
    pub name: &'static str,
    pub key: Key,
    pub family: SensorFamily,
}

const fn entry(name: &'static str, key: [u8; 4], family: SensorFamily) -> SensorEntry {
    SensorEntry {
        name,
        key: Key::from_bytes(key),
        family,
    }
}

use SensorFamily::{Current, Fan, Frequency, Power, Temperature, Voltage};

/// All known sensors, in declaration order
pub static SENSORS: &[SensorEntry] = &[
    // Temperatures: ambient, heatpipe, thermal zones
    entry("ambient_0", *b"TA0P", Temperature),
    entry("ambient_1", *b"TA1P", Temperature),
    entry("heatpipe_0", *b"Th0H", Temperature),
    entry("heatpipe_1", *b"Th1H", Temperature),
    entry("heatpipe_2", *b"Th2H", Temperature),
    entry("heatpipe_3", *b"Th3H", Temperature),
    entry("thermal_zone_0", *b"TZ0C", Temperature),
    entry("thermal_zone_1", *b"TZ1C", Temperature),
    // Temperatures: CPU packages
    entry("cpu_0_die", *b"TC0F", Temperature),
    entry("cpu_0_diode", *b"TC0D", Temperature),
    entry("cpu_0_heatsink", *b"TC0H", Temperature),
    entry("cpu_0_proximity", *b"TC0P", Temperature),
    entry("cpu_1_die", *b"TCAD", Temperature),
    entry("cpu_1_diode", *b"TC1D", Temperature),
    entry("cpu_1_heatsink", *b"TC1H", Temperature),
    entry("cpu_1_proximity", *b"TC1P", Temperature),
    // Temperatures: CPU cores
    entry("cpu_core_1", *b"TC1C", Temperature),
    entry("cpu_core_2", *b"TC2C", Temperature),
    entry("cpu_core_3", *b"TC3C", Temperature),
    entry("cpu_core_4", *b"TC4C", Temperature),
    entry("cpu_core_5", *b"TC5C", Temperature),
    entry("cpu_core_6", *b"TC6C", Temperature),
    entry("cpu_core_7", *b"TC7C", Temperature),
    entry("cpu_core_8", *b"TC8C", Temperature),
    // Temperatures: GPU
    entry("gpu_diode", *b"TG0D", Temperature),
    entry("gpu_heatsink", *b"TG0H", Temperature),
    entry("gpu_proximity", *b"TG0P", Temperature),
    // Temperatures: memory slots
    entry("mem_proximity", *b"Ts0S", Temperature),
    entry("mem_slot_0", *b"TM0S", Temperature),
    entry("mem_slot_1", *b"TM1S", Temperature),
    entry("mem_slot_2", *b"TM2S", Temperature),
    entry("mem_slot_3", *b"TM3S", Temperature),
    // Temperatures: PCI slots
    entry("pci_proximity", *b"TS0C", Temperature),
    entry("pci_slot_0", *b"TA0S", Temperature),
    entry("pci_slot_1", *b"TA1S", Temperature),
    entry("pci_slot_2", *b"TA2S", Temperature),
    entry("pci_slot_3", *b"TA3S", Temperature),
    // Temperatures: board-level proximity sensors
    entry("mainboard_proximity", *b"Tm0P", Temperature),
    entry("powerboard_proximity", *b"Tp0P", Temperature),
    entry("battery_proximity", *b"TB1T", Temperature),
    entry("airport_proximity", *b"TW0P", Temperature),
    entry("lcd_proximity", *b"TL0P", Temperature),
    entry("odd_proximity", *b"TO0P", Temperature),
    // Temperatures: northbridge
    entry("northbridge_die", *b"TN0D", Temperature),
    entry("northbridge_proximity", *b"TN0P", Temperature),
    // Temperatures: drive bays
    entry("hdd_0", *b"TH0P", Temperature),
    entry("hdd_1", *b"TH1P", Temperature),
    entry("hdd_2", *b"TH2P", Temperature),
    entry("hdd_3", *b"TH3P", Temperature),
    // Temperatures: thunderbolt ports
    entry("thunderbolt_0", *b"TI0P", Temperature),
    entry("thunderbolt_1", *b"TI1P", Temperature),
    entry("thunderbolt_2", *b"TI2P", Temperature),
    entry("thunderbolt_3", *b"TI3P", Temperature),
    // Voltages (registered, decode table not implemented)
    entry("cpu_vrm", *b"VS0C", Voltage),
    entry("cpu_core_0", *b"VC0C", Voltage),
    entry("cpu_core_1", *b"VC1C", Voltage),
    entry("cpu_core_2", *b"VC2C", Voltage),
    entry("cpu_core_3", *b"VC3C", Voltage),
    entry("cpu_core_4", *b"VC4C", Voltage),
    entry("cpu_core_5", *b"VC5C", Voltage),
    entry("cpu_core_6", *b"VC6C", Voltage),
    entry("cpu_core_7", *b"VC7C", Voltage),
    entry("cpu_core_8", *b"VC8C", Voltage),
    entry("gpu", *b"VG0C", Voltage),
    entry("memory", *b"VM0R", Voltage),
    entry("battery", *b"VBAT", Voltage),
    entry("cmos", *b"Vb0R", Voltage),
    entry("mainboard", *b"VD0R", Voltage),
    entry("rail_12v", *b"VP0R", Voltage),
    entry("vcc_12v", *b"Vp0C", Voltage),
    entry("rail_3v", *b"VV2S", Voltage),
    entry("rail_3_3v", *b"VR3R", Voltage),
    entry("rail_5v", *b"VV1S", Voltage),
    entry("rail_12v_aux", *b"VV9S", Voltage),
    entry("pci_12v", *b"VeES", Voltage),
    entry("battery_0", *b"B0AV", Voltage),
    // Currents (registered, decode table not implemented)
    entry("battery_0", *b"B0AC", Current),
    // Powers (registered, decode table not implemented)
    entry("cpu_package_core", *b"PCPC", Power),
    entry("cpu_package_total", *b"PCPT", Power),
    entry("igpu_package", *b"PCPG", Power),
    // Frequencies (registered, decode table not implemented)
    entry("cpu_package_multiplier", *b"MPkC", Frequency),
    entry("cpu_core_0_multiplier", *b"MC0C", Frequency),
    entry("cpu_core_1_multiplier", *b"MC1C", Frequency),
    entry("cpu_core_2_multiplier", *b"MC2C", Frequency),
    entry("cpu_core_3_multiplier", *b"MC3C", Frequency),
    entry("cpu_core_4_multiplier", *b"MC4C", Frequency),
    entry("cpu_core_5_multiplier", *b"MC5C", Frequency),
    entry("cpu_core_6_multiplier", *b"MC6C", Frequency),
    entry("cpu_core_7_multiplier", *b"MC7C", Frequency),
    entry("cpu_core_0", *b"FRC0", Frequency),
    entry("cpu_core_1", *b"FRC1", Frequency),
    entry("cpu_core_2", *b"FRC2", Frequency),
    entry("cpu_core_3", *b"FRC3", Frequency),
    entry("cpu_core_4", *b"FRC4", Frequency),
    entry("cpu_core_5", *b"FRC5", Frequency),
    entry("cpu_core_6", *b"FRC6", Frequency),
    entry("cpu_core_7", *b"FRC7", Frequency),
    entry("gpu_0", *b"CG0C", Frequency),
    entry("gpu_1", *b"CG1C", Frequency),
    entry("gpu_0_shader", *b"CG0S", Frequency),
    entry("gpu_1_shader", *b"CG1S", Frequency),
    // Shipped map has the GPU memory-clock keys crossed; kept as-is.
    entry("gpu_0_memory", *b"CG1M", Frequency),
    entry("gpu_1_memory", *b"CG0M", Frequency),
    // Fans
    entry("fan_0", *b"F0Ac", Fan),
];

/// Look up an entry by family and semantic name
pub fn find(family: SensorFamily, name: &str) -> Option<&'static SensorEntry> {
    SENSORS
        .iter()
        .find(|e| e.family == family && e.name == name)
}

/// All entries of one family, in declaration order
pub fn family(family: SensorFamily) -> impl Iterator<Item = &'static SensorEntry> {
    SENSORS.iter().filter(move |e| e.family == family)
}
