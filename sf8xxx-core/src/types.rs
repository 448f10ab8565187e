//! Core types and data structures for SF8xxx control

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, Sf8Error};
use crate::status::{DriverState, LockState, TecState};

/// Error codes the board reports in `E####` frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolErrorCode {
    /// `E0000`: missing terminator, buffer overflow or bad format
    NoTerminator,
    /// `E0001`: undefined header byte
    UndefinedHeader,
    /// `E0002`: CRC mismatch
    Crc,
    /// Any other error frame, carrying the text after the `E`
    Unknown(String),
}

impl ProtocolErrorCode {
    /// Classify the code digits that follow the `E` header
    pub fn from_code(code: &str) -> Self {
        match code {
            "0000" => ProtocolErrorCode::NoTerminator,
            "0001" => ProtocolErrorCode::UndefinedHeader,
            "0002" => ProtocolErrorCode::Crc,
            other => ProtocolErrorCode::Unknown(other.to_string()),
        }
    }

    /// Code digits as they appear on the wire
    pub fn code(&self) -> &str {
        match self {
            ProtocolErrorCode::NoTerminator => "0000",
            ProtocolErrorCode::UndefinedHeader => "0001",
            ProtocolErrorCode::Crc => "0002",
            ProtocolErrorCode::Unknown(code) => code,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ProtocolErrorCode::NoTerminator => "no terminator/buffer/format",
            ProtocolErrorCode::UndefinedHeader => "undefined header",
            ProtocolErrorCode::Crc => "CRC",
            ProtocolErrorCode::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for ProtocolErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{} ({})", self.code(), self.description())
    }
}

/// Why a Set was refused before any bytes reached the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterlockReason {
    /// Driver-on requested while temperature control is disabled
    TecOff,
    /// TEC-off requested while the driver is energized
    DriverOn,
}

impl fmt::Display for InterlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterlockReason::TecOff => write!(f, "TEC is off, driver must stay off"),
            InterlockReason::DriverOn => write!(f, "driver is on, TEC must stay on"),
        }
    }
}

/// Result of a Set operation that reached a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum SetOutcome {
    /// Frame written and not rejected by the board
    Applied,
    /// Refused locally; nothing was written
    RejectedByInterlock(InterlockReason),
    /// The board answered with an error frame
    ProtocolFailure(ProtocolErrorCode),
}

impl SetOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SetOutcome::Applied)
    }

    /// Convert a non-applied outcome into the matching error
    pub fn into_result(self) -> Result<()> {
        match self {
            SetOutcome::Applied => Ok(()),
            SetOutcome::RejectedByInterlock(reason) => Err(Sf8Error::Interlock(reason)),
            SetOutcome::ProtocolFailure(code) => Err(Sf8Error::Protocol(code)),
        }
    }
}

impl fmt::Display for SetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOutcome::Applied => write!(f, "applied"),
            SetOutcome::RejectedByInterlock(reason) => write!(f, "rejected by interlock: {}", reason),
            SetOutcome::ProtocolFailure(code) => write!(f, "protocol failure: {}", code),
        }
    }
}

/// Full status sweep of one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rundown {
    pub serial_no: u16,
    pub driver: DriverState,
    pub tec: TecState,
    pub lock: LockState,
    /// Driver current setpoint in mA
    pub driver_current_setpoint: f64,
    /// Measured driver current in mA
    pub driver_current: f64,
    /// Driver current ceiling in mA
    pub driver_current_max: f64,
    /// TEC temperature setpoint in °C
    pub tec_setpoint: f64,
    /// Measured TEC temperature in °C
    pub tec_temperature: f64,
    /// Measured TEC current in A
    pub tec_current: f64,
    /// TEC current limit in A
    pub tec_current_limit: f64,
}
