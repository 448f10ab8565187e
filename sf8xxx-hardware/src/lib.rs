//! sf8xxx-hardware
//!
//! Hardware crate that contains the low-level serial driver and the stateful,
//! interlocked device session. The console crate uses it to talk to boards.
//!
//! Public API:
//! - `session::DeviceSession` - one connection, cached enable state, driver/TEC interlocks
//! - `serial_driver::SerialDriver` - low-level serial I/O driver
//! - `serial_driver::SerialTransport` - seam for mock transports

pub mod serial_driver;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use serial_driver::{is_disconnect_error, SerialDriver, SerialSettings, SerialTransport};
pub use session::DeviceSession;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_present() {
        let _ = std::any::TypeId::of::<DeviceSession>();
        let _ = std::any::TypeId::of::<SerialDriver>();
    }
}
