//! Raw IOKit bindings used by the live connection
//!
//! Only the handful of calls needed to locate the AppleSMC service and
//! exchange call structures with it. Handles (`io_object_t`,
//! `io_connect_t`) are plain `u32` port names on this interface.

#![allow(non_snake_case)]

use core_foundation::dictionary::{CFDictionaryRef, CFMutableDictionaryRef};
use std::ffi::c_void;

#[link(name = "IOKit", kind = "framework")]
extern "C" {
    pub fn IOServiceMatching(name: *const libc::c_char) -> CFMutableDictionaryRef;
    pub fn IOServiceGetMatchingServices(
        main_port: u32,
        matching: CFDictionaryRef,
        existing: *mut u32,
    ) -> i32;
    pub fn IOIteratorNext(iterator: u32) -> u32;
    pub fn IOServiceOpen(
        service: u32,
        owning_task: u32,
        conn_type: u32,
        connection: *mut u32,
    ) -> i32;
    pub fn IOServiceClose(connection: u32) -> i32;
    pub fn IOObjectRelease(object: u32) -> u32;
    pub fn IOConnectCallStructMethod(
        connection: u32,
        selector: u32,
        input: *const c_void,
        input_size: usize,
        output: *mut c_void,
        output_size: *mut usize,
    ) -> i32;
    pub fn mach_task_self() -> u32;
}

/// `kIOReturnNotPrivileged`
pub const KIO_RETURN_NOT_PRIVILEGED: i32 = -536_870_174;
