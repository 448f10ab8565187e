//! Register table
//!
//! Maps semantic parameter names to the 16-bit addresses the board exposes,
//! together with the fixed-point scale of each numeric register.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, Sf8Error};

/// Wire multiplier for driver and TEC currents (0.1 mA / 0.1 A per count)
pub const CURRENT_SCALE: u16 = 10;

/// Wire multiplier for TEC temperatures (0.01 °C per count)
pub const TEMPERATURE_SCALE: u16 = 100;

/// 16-bit register identifier, rendered as four uppercase hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegisterAddress(u16);

impl RegisterAddress {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// The four ASCII hex digits sent on the wire
    pub fn to_hex(self) -> [u8; 4] {
        crate::frame::hex4(self.0)
    }
}

impl fmt::Display for RegisterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// Every parameter the board exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Register {
    DriverState,
    DriverCurrentValue,
    DriverCurrentMaximum,
    DriverCurrentMaximumLimit,
    DriverCurrentMeasured,
    DriverVoltageMeasured,
    TecState,
    TecTemperatureValue,
    TecTemperatureMaximum,
    TecTemperatureMaximumLimit,
    TecTemperatureMeasured,
    TecCurrentMeasured,
    TecCurrentLimit,
    TecVoltageMeasured,
    LockState,
    SerialNo,
}

impl Register {
    pub const ALL: [Register; 16] = [
        Register::DriverState,
        Register::DriverCurrentValue,
        Register::DriverCurrentMaximum,
        Register::DriverCurrentMaximumLimit,
        Register::DriverCurrentMeasured,
        Register::DriverVoltageMeasured,
        Register::TecState,
        Register::TecTemperatureValue,
        Register::TecTemperatureMaximum,
        Register::TecTemperatureMaximumLimit,
        Register::TecTemperatureMeasured,
        Register::TecCurrentMeasured,
        Register::TecCurrentLimit,
        Register::TecVoltageMeasured,
        Register::LockState,
        Register::SerialNo,
    ];

    pub const fn address(self) -> RegisterAddress {
        let raw = match self {
            Register::DriverState => 0x0700,
            Register::DriverCurrentValue => 0x0300,
            Register::DriverCurrentMaximum => 0x0302,
            Register::DriverCurrentMaximumLimit => 0x0306,
            Register::DriverCurrentMeasured => 0x0307,
            Register::DriverVoltageMeasured => 0x0407,
            Register::TecState => 0x0A1A,
            Register::TecTemperatureValue => 0x0A10,
            Register::TecTemperatureMaximum => 0x0A11,
            Register::TecTemperatureMaximumLimit => 0x0A13,
            Register::TecTemperatureMeasured => 0x0A15,
            Register::TecCurrentMeasured => 0x0A16,
            Register::TecCurrentLimit => 0x0A17,
            Register::TecVoltageMeasured => 0x0A18,
            Register::LockState => 0x0800,
            Register::SerialNo => 0x0701,
        };
        RegisterAddress::new(raw)
    }

    /// Canonical parameter name
    pub const fn name(self) -> &'static str {
        match self {
            Register::DriverState => "DRIVER_STATE",
            Register::DriverCurrentValue => "DRIVER_CURRENT_VALUE",
            Register::DriverCurrentMaximum => "DRIVER_CURRENT_MAXIMUM",
            Register::DriverCurrentMaximumLimit => "DRIVER_CURRENT_MAXIMUM_LIMIT",
            Register::DriverCurrentMeasured => "DRIVER_CURRENT_MEASURED",
            Register::DriverVoltageMeasured => "DRIVER_VOLTAGE_MEASURED",
            Register::TecState => "TEC_STATE",
            Register::TecTemperatureValue => "TEC_TEMPERATURE_VALUE",
            Register::TecTemperatureMaximum => "TEC_TEMPERATURE_MAXIMUM",
            Register::TecTemperatureMaximumLimit => "TEC_TEMPERATURE_MAXIMUM_LIMIT",
            Register::TecTemperatureMeasured => "TEC_TEMPERATURE_MEASURED",
            Register::TecCurrentMeasured => "TEC_CURRENT_MEASURED",
            Register::TecCurrentLimit => "TEC_CURRENT_LIMIT",
            Register::TecVoltageMeasured => "TEC_VOLTAGE_MEASURED",
            Register::LockState => "LOCK_STATE",
            Register::SerialNo => "SERIAL_NO",
        }
    }

    /// Fixed-point multiplier between physical units and wire counts, if known
    pub const fn scale(self) -> Option<u16> {
        match self {
            Register::DriverCurrentValue
            | Register::DriverCurrentMaximum
            | Register::DriverCurrentMaximumLimit
            | Register::DriverCurrentMeasured
            | Register::TecCurrentMeasured
            | Register::TecCurrentLimit => Some(CURRENT_SCALE),
            Register::TecTemperatureValue
            | Register::TecTemperatureMaximum
            | Register::TecTemperatureMaximumLimit
            | Register::TecTemperatureMeasured => Some(TEMPERATURE_SCALE),
            _ => None,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Register {
    type Err = Sf8Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        Register::ALL
            .iter()
            .copied()
            .find(|register| register.name() == wanted)
            .ok_or_else(|| Sf8Error::UnknownParameter(s.to_string()))
    }
}

/// Look up the address of a named parameter
pub fn address_of(name: &str) -> Result<RegisterAddress> {
    name.parse::<Register>().map(Register::address)
}

/// Single-bit commands written to `DRIVER_STATE` and `TEC_STATE`
pub mod control {
    /// Switch the subsystem on
    pub const ON: u16 = 0x0008;
    /// Switch the subsystem off
    pub const OFF: u16 = 0x0010;
    /// Take the setpoint (current or temperature) from the internal register
    pub const INTERNAL_SETPOINT: u16 = 0x0020;
    /// Take the enable signal from the internal register
    pub const INTERNAL_ENABLE: u16 = 0x0400;
    /// Ignore the external NTC input (driver only)
    pub const DENY_EXTERNAL_NTC: u16 = 0x4000;
}
