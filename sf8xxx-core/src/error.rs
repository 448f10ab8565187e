//! Error types for the SF8xxx toolkit

use crate::types::{InterlockReason, ProtocolErrorCode};
use thiserror::Error;

/// Core error type for SF8xxx operations
#[derive(Error, Debug)]
pub enum Sf8Error {
    /// The transport could not be opened, or the connect handshake failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// A Get produced no bytes before the read deadline
    #[error("No response from device")]
    NoResponse,

    /// The board answered with an explicit error frame
    #[error("Protocol error: {0}")]
    Protocol(ProtocolErrorCode),

    /// A success frame whose payload is not four hex digits
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Rejected before transmission by the driver/TEC interlock
    #[error("Interlock violation: {0}")]
    Interlock(InterlockReason),

    /// Register name not present in the register table
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Value cannot be represented on the wire after scaling
    #[error("Value out of range: {value} (must be {min}-{max})")]
    ValueOutOfRange { value: f64, min: f64, max: f64 },

    /// Serial port errors on an open port
    #[error("Serial port error: {0}")]
    Serial(String),

    /// Write or flush deadline elapsed
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Device disconnected (USB unplugged, power cycle) or session already closed
    #[error("Device disconnected: {0}")]
    DeviceDisconnected(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SF8xxx operations
pub type Result<T> = std::result::Result<T, Sf8Error>;
