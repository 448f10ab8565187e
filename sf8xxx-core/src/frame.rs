//! Frame codec
//!
//! Builds the outbound `J` (Get) and `P` (Set) frames and classifies raw
//! inbound bytes into a [`ResponseFrame`].
//!
//! Wire layout:
//! - Get: `J` + 4 hex digits (address) + `\r` (6 bytes)
//! - Set: `P` + 4 hex digits (address) + ` ` + 4 hex digits (value) + `\r` (11 bytes)
//! - Success response: header, address echo, separator, 4 hex digit payload at offset 6, `\r`
//! - Error response: `E` + 4 digit code + `\r`

use crate::error::{Result, Sf8Error};
use crate::registers::RegisterAddress;
use crate::types::ProtocolErrorCode;

pub const GET_HEADER: u8 = b'J';
pub const SET_HEADER: u8 = b'P';
pub const ERROR_HEADER: u8 = b'E';
pub const SEPARATOR: u8 = b' ';
pub const TERMINATOR: u8 = b'\r';

pub const GET_FRAME_LEN: usize = 6;
pub const SET_FRAME_LEN: usize = 11;

/// Byte offset of the 4-digit payload in a success response
pub const PAYLOAD_OFFSET: usize = 6;
pub const PAYLOAD_LEN: usize = 4;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Render a value as four zero-padded uppercase hex digits
pub fn hex4(value: u16) -> [u8; 4] {
    [
        HEX_DIGITS[usize::from(value >> 12)],
        HEX_DIGITS[usize::from((value >> 8) & 0xF)],
        HEX_DIGITS[usize::from((value >> 4) & 0xF)],
        HEX_DIGITS[usize::from(value & 0xF)],
    ]
}

/// Parse exactly four ASCII hex digits (either case)
pub fn parse_hex4(digits: &[u8]) -> Result<u16> {
    if digits.len() != PAYLOAD_LEN || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(Sf8Error::MalformedPayload(format!(
            "expected 4 hex digits, got {:?}",
            String::from_utf8_lossy(digits)
        )));
    }

    // All bytes are ASCII hex digits at this point
    let text = std::str::from_utf8(digits).map_err(|e| Sf8Error::MalformedPayload(e.to_string()))?;
    u16::from_str_radix(text, 16).map_err(|e| Sf8Error::MalformedPayload(format!("{}: {}", text, e)))
}

/// Which request a frame carries; decides how an empty reply is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Get,
    Set,
}

/// An encoded request, ready to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    kind: FrameKind,
    address: RegisterAddress,
    bytes: Vec<u8>,
}

impl CommandFrame {
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn address(&self) -> RegisterAddress {
        self.address
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Build a 6-byte Get frame
pub fn encode_get(address: RegisterAddress) -> CommandFrame {
    let mut bytes = Vec::with_capacity(GET_FRAME_LEN);
    bytes.push(GET_HEADER);
    bytes.extend_from_slice(&address.to_hex());
    bytes.push(TERMINATOR);

    CommandFrame {
        kind: FrameKind::Get,
        address,
        bytes,
    }
}

/// Build an 11-byte Set frame
pub fn encode_set(address: RegisterAddress, value: u16) -> CommandFrame {
    let mut bytes = Vec::with_capacity(SET_FRAME_LEN);
    bytes.push(SET_HEADER);
    bytes.extend_from_slice(&address.to_hex());
    bytes.push(SEPARATOR);
    bytes.extend_from_slice(&hex4(value));
    bytes.push(TERMINATOR);

    CommandFrame {
        kind: FrameKind::Set,
        address,
        bytes,
    }
}

/// A classified reply from the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFrame {
    /// Any non-error frame; raw bytes kept for payload extraction
    Success(Vec<u8>),
    /// Empty reply to a Set; the board does not echo some writes
    Acknowledged,
    /// Explicit `E####` error frame
    Error(ProtocolErrorCode),
}

impl ResponseFrame {
    pub fn is_error(&self) -> bool {
        matches!(self, ResponseFrame::Error(_))
    }
}

/// Classify raw bytes read after sending a frame of `kind`
pub fn decode(raw: &[u8], kind: FrameKind) -> Result<ResponseFrame> {
    let Some(&header) = raw.first() else {
        return match kind {
            FrameKind::Get => Err(Sf8Error::NoResponse),
            FrameKind::Set => Ok(ResponseFrame::Acknowledged),
        };
    };

    if header == ERROR_HEADER {
        let body = raw[1..].strip_suffix(&[TERMINATOR]).unwrap_or(&raw[1..]);
        let code = String::from_utf8_lossy(body);
        return Ok(ResponseFrame::Error(ProtocolErrorCode::from_code(&code)));
    }

    Ok(ResponseFrame::Success(raw.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::Register;

    #[test]
    fn test_encode_get_shape() {
        let frame = encode_get(Register::DriverState.address());
        assert_eq!(frame.as_bytes(), b"J0700\r");
        assert_eq!(frame.kind(), FrameKind::Get);

        for register in Register::ALL {
            let frame = encode_get(register.address());
            assert_eq!(frame.as_bytes().len(), GET_FRAME_LEN);
            assert_eq!(frame.as_bytes()[0], b'J');
            assert_eq!(*frame.as_bytes().last().unwrap(), 0x0D);
        }
    }

    #[test]
    fn test_encode_set_shape() {
        let frame = encode_set(Register::DriverCurrentValue.address(), 1230);
        assert_eq!(frame.as_bytes(), b"P0300 04CE\r");
        assert_eq!(frame.kind(), FrameKind::Set);

        for value in [0u16, 1, 0x00FF, 0x0A1A, 0x8000, 0xFFFF] {
            let bytes = encode_set(Register::TecState.address(), value).as_bytes().to_vec();
            assert_eq!(bytes.len(), SET_FRAME_LEN);
            assert_eq!(bytes[0], b'P');
            assert_eq!(bytes[5], 0x20);
            assert_eq!(bytes[10], 0x0D);
        }
    }

    #[test]
    fn test_hex4_zero_pads_and_uppercases() {
        assert_eq!(&hex4(0), b"0000");
        assert_eq!(&hex4(0xabc), b"0ABC");
        assert_eq!(&hex4(0xFFFF), b"FFFF");
    }

    #[test]
    fn test_hex_round_trip_full_range() {
        for value in 0..=u16::MAX {
            assert_eq!(parse_hex4(&hex4(value)).unwrap(), value);
        }
    }

    #[test]
    fn test_parse_hex4_rejects_garbage() {
        assert!(matches!(parse_hex4(b"12G4"), Err(Sf8Error::MalformedPayload(_))));
        assert!(matches!(parse_hex4(b"+123"), Err(Sf8Error::MalformedPayload(_))));
        assert!(matches!(parse_hex4(b"123"), Err(Sf8Error::MalformedPayload(_))));
        assert_eq!(parse_hex4(b"abcd").unwrap(), 0xABCD);
    }

    #[test]
    fn test_decode_empty_after_get_is_no_response() {
        assert!(matches!(decode(b"", FrameKind::Get), Err(Sf8Error::NoResponse)));
    }

    #[test]
    fn test_decode_empty_after_set_is_acknowledged() {
        assert_eq!(decode(b"", FrameKind::Set).unwrap(), ResponseFrame::Acknowledged);
    }

    #[test]
    fn test_decode_known_error_frames() {
        assert_eq!(
            decode(b"E0000\r", FrameKind::Get).unwrap(),
            ResponseFrame::Error(ProtocolErrorCode::NoTerminator)
        );
        assert_eq!(
            decode(b"E0001\r", FrameKind::Set).unwrap(),
            ResponseFrame::Error(ProtocolErrorCode::UndefinedHeader)
        );
        assert_eq!(
            decode(b"E0002\r", FrameKind::Get).unwrap(),
            ResponseFrame::Error(ProtocolErrorCode::Crc)
        );
    }

    #[test]
    fn test_decode_unknown_error_frame_keeps_code() {
        let frame = decode(b"E0107\r", FrameKind::Get).unwrap();
        assert_eq!(frame, ResponseFrame::Error(ProtocolErrorCode::Unknown("0107".to_string())));
        assert!(frame.is_error());
    }

    #[test]
    fn test_decode_success_keeps_raw_bytes() {
        let frame = decode(b"K0A15 2710\r", FrameKind::Get).unwrap();
        assert_eq!(frame, ResponseFrame::Success(b"K0A15 2710\r".to_vec()));
    }
}
