//! Bitfield decoders for the `*_STATE` registers
//!
//! A status payload is four ASCII hex characters. Each flag is one bit of the
//! nibble held by byte index 2 or 3 (index 3 is the least significant digit).

use serde::{Deserialize, Serialize};

use crate::error::{Result, Sf8Error};
use crate::frame::{hex4, ResponseFrame, PAYLOAD_LEN};
use crate::response::payload_of;

/// Raw 4-byte status payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusWord([u8; PAYLOAD_LEN]);

impl StatusWord {
    /// Wrap four payload bytes, rejecting anything that is not a hex digit
    pub fn new(bytes: [u8; PAYLOAD_LEN]) -> Result<Self> {
        if !bytes.iter().all(u8::is_ascii_hexdigit) {
            return Err(Sf8Error::MalformedPayload(format!(
                "status word {:?} is not hex",
                String::from_utf8_lossy(&bytes)
            )));
        }
        Ok(Self(bytes))
    }

    pub fn from_frame(frame: &ResponseFrame) -> Result<Self> {
        Self::new(payload_of(frame)?)
    }

    pub fn from_value(value: u16) -> Self {
        Self(hex4(value))
    }

    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.0
    }

    fn nibble(&self, index: usize) -> u8 {
        // Validated in `new`; `from_value` only produces hex digits
        (self.0[index] as char).to_digit(16).unwrap_or(0) as u8
    }

    fn flag(&self, index: usize, mask: u8) -> bool {
        self.nibble(index) & mask != 0
    }
}

/// Laser driver status (`DRIVER_STATE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DriverState {
    /// Device powered
    pub device_on: bool,
    /// Driver output energized
    pub driver_on: bool,
    /// Current setpoint from the internal register (else external input)
    pub current_internal: bool,
    /// Enable signal from the internal register (else external input)
    pub enable_internal: bool,
    /// External NTC interlock denied
    pub ntc_deny: bool,
    /// External interlock denied
    pub interlock_deny: bool,
}

impl From<StatusWord> for DriverState {
    fn from(word: StatusWord) -> Self {
        Self {
            device_on: word.flag(3, 0x1),
            driver_on: word.flag(3, 0x2),
            current_internal: word.flag(3, 0x4),
            enable_internal: word.flag(2, 0x1),
            ntc_deny: word.flag(2, 0x4),
            interlock_deny: word.flag(2, 0x8),
        }
    }
}

/// TEC status (`TEC_STATE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TecState {
    pub tec_on: bool,
    /// Temperature setpoint from the internal register
    pub temp_internal: bool,
    /// Enable signal from the internal register
    pub enable_internal: bool,
}

impl From<StatusWord> for TecState {
    fn from(word: StatusWord) -> Self {
        Self {
            tec_on: word.flag(3, 0x2),
            temp_internal: word.flag(3, 0x4),
            enable_internal: word.flag(2, 0x1),
        }
    }
}

/// Protection and fault flags (`LOCK_STATE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockState {
    pub interlock: bool,
    pub ld_overcurrent: bool,
    pub ld_overheat: bool,
    pub ntc_external: bool,
    pub tec_error: bool,
    pub tec_self_heat: bool,
}

impl LockState {
    /// True when any protection has tripped
    pub fn any(&self) -> bool {
        self.interlock
            || self.ld_overcurrent
            || self.ld_overheat
            || self.ntc_external
            || self.tec_error
            || self.tec_self_heat
    }
}

impl From<StatusWord> for LockState {
    fn from(word: StatusWord) -> Self {
        Self {
            interlock: word.flag(3, 0x2),
            ld_overcurrent: word.flag(3, 0x8),
            ld_overheat: word.flag(2, 0x1),
            ntc_external: word.flag(2, 0x2),
            tec_error: word.flag(2, 0x4),
            tec_self_heat: word.flag(2, 0x8),
        }
    }
}
