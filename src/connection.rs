//! Live connection to the AppleSMC service
//!
//! [`IoKitTransport`] owns one `io_connect_t` handle. The first matching
//! AppleSMC service is used; machines only expose one. A handle value of
//! zero means the connection is closed.

use std::ffi::CString;
use std::mem;

use log::{debug, trace};

use crate::error::{Result, SmcError};
use crate::iokit;
use crate::key::Key;
use crate::protocol::{SmcCallData, Transport};

const SERVICE_NAME: &str = "AppleSMC";

/// Transport backed by an open IOKit connection
pub struct IoKitTransport {
    connection: u32,
}

impl IoKitTransport {
    /// Locate the AppleSMC service and open a connection to it
    pub fn open() -> Result<Self> {
        // The service name is a fixed ASCII literal; CString cannot fail.
        let name = CString::new(SERVICE_NAME).map_err(|_| SmcError::ServiceNotFound)?;

        let mut iterator = 0u32;
        unsafe {
            let matching = iokit::IOServiceMatching(name.as_ptr());
            if matching.is_null() {
                return Err(SmcError::ServiceNotFound);
            }
            // IOServiceGetMatchingServices consumes the dictionary.
            if iokit::IOServiceGetMatchingServices(0, matching, &mut iterator) != 0 {
                return Err(SmcError::ServiceNotFound);
            }
        }

        let service = unsafe { iokit::IOIteratorNext(iterator) };
        unsafe { iokit::IOObjectRelease(iterator) };
        if service == 0 {
            return Err(SmcError::ServiceNotFound);
        }

        let mut connection = 0u32;
        let result =
            unsafe { iokit::IOServiceOpen(service, iokit::mach_task_self(), 0, &mut connection) };
        unsafe { iokit::IOObjectRelease(service) };

        match result {
            0 => {
                debug!("opened {} connection {}", SERVICE_NAME, connection);
                Ok(IoKitTransport { connection })
            }
            iokit::KIO_RETURN_NOT_PRIVILEGED => Err(SmcError::NotPrivileged),
            code => Err(SmcError::OpenFailed(code)),
        }
    }
}

impl Transport for IoKitTransport {
    fn call(&mut self, selector: u32, input: &SmcCallData) -> Result<SmcCallData> {
        if self.connection == 0 {
            return Err(SmcError::ConnectionUnavailable);
        }

        let mut output = SmcCallData::default();
        let mut output_size = mem::size_of::<SmcCallData>();
        let result = unsafe {
            iokit::IOConnectCallStructMethod(
                self.connection,
                selector,
                input as *const SmcCallData as *const _,
                mem::size_of::<SmcCallData>(),
                &mut output as *mut SmcCallData as *mut _,
                &mut output_size,
            )
        };
        if result != 0 {
            let key = Key::from_u32(input.key);
            trace!("call for {} failed with kernel return {}", key, result);
            return Err(SmcError::CallFailed { key, code: result });
        }
        Ok(output)
    }

    fn close(&mut self) -> Result<()> {
        if self.connection == 0 {
            return Err(SmcError::ConnectionUnavailable);
        }
        let result = unsafe { iokit::IOServiceClose(self.connection) };
        self.connection = 0;
        if result != 0 {
            return Err(SmcError::OpenFailed(result));
        }
        Ok(())
    }
}

impl Drop for IoKitTransport {
    fn drop(&mut self) {
        if self.connection != 0 {
            unsafe { iokit::IOServiceClose(self.connection) };
            self.connection = 0;
        }
    }
}
