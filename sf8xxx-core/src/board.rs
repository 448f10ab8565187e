//! Board definitions and configuration
//!
//! Communication parameters for SF8xxx controller boards, expressed as a trait
//! so the serial driver can be specialised at compile time.
//!
//! Note: Actual hardware I/O is in the `sf8xxx-hardware` crate. This module only
//! contains board specifications.

/// Hardware board configuration trait
///
/// # Example
///
/// ```
/// use sf8xxx_core::board::{BoardConfig, Sf8xxx};
///
/// const BAUD: u32 = Sf8xxx::BAUD_RATE;
/// const NAME: &str = Sf8xxx::NAME;
/// ```
pub trait BoardConfig: Send + Sync + 'static {
    /// Human-readable board name
    const NAME: &'static str;

    /// Serial communication baud rate
    const BAUD_RATE: u32;

    /// Read deadline for one response frame, in milliseconds
    const DEFAULT_TIMEOUT_MS: u64;
}

/// Maiman SF8xxx laser diode driver with integrated TEC controller
///
/// - 115200 baud, 8N1, no flow control
/// - ASCII frames terminated by `\r`
/// - 200 ms response deadline
pub struct Sf8xxx;

impl BoardConfig for Sf8xxx {
    const NAME: &'static str = "SF8xxx";
    const BAUD_RATE: u32 = 115200;
    const DEFAULT_TIMEOUT_MS: u64 = 200;
}

/// Default board type
pub type DefaultBoard = Sf8xxx;
