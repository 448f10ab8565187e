//! Response classifier
//!
//! Turns a decoded [`ResponseFrame`] into a value, or into the error the board
//! reported.

use crate::error::{Result, Sf8Error};
use crate::frame::{parse_hex4, ResponseFrame, PAYLOAD_LEN, PAYLOAD_OFFSET};

/// The four payload bytes of a success frame
pub fn payload_of(frame: &ResponseFrame) -> Result<[u8; PAYLOAD_LEN]> {
    match frame {
        ResponseFrame::Success(raw) => raw
            .get(PAYLOAD_OFFSET..PAYLOAD_OFFSET + PAYLOAD_LEN)
            .and_then(|bytes| <[u8; PAYLOAD_LEN]>::try_from(bytes).ok())
            .ok_or_else(|| {
                Sf8Error::MalformedPayload(format!(
                    "frame too short for payload: {:?}",
                    String::from_utf8_lossy(raw)
                ))
            }),
        ResponseFrame::Error(code) => Err(Sf8Error::Protocol(code.clone())),
        ResponseFrame::Acknowledged => Err(Sf8Error::NoResponse),
    }
}

/// Unsigned value carried by a success frame
pub fn value_of(frame: &ResponseFrame) -> Result<u16> {
    let payload = payload_of(frame)?;
    parse_hex4(&payload)
}

/// Value divided by the register's fixed-point scale
pub fn scaled_value(frame: &ResponseFrame, scale: u16) -> Result<f64> {
    Ok(f64::from(value_of(frame)?) / f64::from(scale))
}
