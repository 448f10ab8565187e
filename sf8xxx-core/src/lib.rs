//! SF8xxx Core Library
//!
//! Protocol codec, register table and status decoders for SF8xxx laser
//! diode/TEC controllers. This crate performs no I/O; the serial transport and
//! the stateful device session live in `sf8xxx-hardware`.

pub mod board;
pub mod error;
pub mod frame;
pub mod registers;
pub mod response;
pub mod status;
pub mod types;

// Re-export commonly used types
pub use board::*;
pub use error::*;
pub use frame::{decode, encode_get, encode_set, CommandFrame, FrameKind, ResponseFrame};
pub use registers::{address_of, Register, RegisterAddress};
pub use response::{scaled_value, value_of};
pub use status::{DriverState, LockState, StatusWord, TecState};
pub use types::*;
