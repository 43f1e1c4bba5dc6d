//! Constants used across the Wake protocol implementation.
//!
//! This module defines the protocol-wide byte values used for framing and
//! stuffing, along with the buffer sizes derived from them.
//!
//! ## Key Concepts
//!
//! - **Markers**: `FEND` opens every frame, `FESC` introduces a stuffed pair.
//! - **Operands**: `TFEND` and `TFESC` follow `FESC` and stand for `FEND` and `FESC`.
//! - **Layout**: `FEND [addr] cmd n data[n] crc`, with the address omitted
//!   when the address field is ignored.
//! - **Buffer Sizing**: the largest logical package and the largest stuffed frame
//!   are both computed here so callers can size their own buffers.

/// Frame END / start marker. Every frame begins with this byte.
pub const FEND: u8 = 0xC0;

/// Frame ESCape marker. The next byte on the wire is an escape operand.
pub const FESC: u8 = 0xDB;

/// Transposed FEND. `FESC TFEND` on the wire decodes to `FEND`.
pub const TFEND: u8 = 0xDC;

/// Transposed FESC. `FESC TFESC` on the wire decodes to `FESC`.
pub const TFESC: u8 = 0xDD;

/// Initial value of the Wake CRC-8 register.
pub const WAKE_CRC_INIT: u8 = 0xDE;

/// Addresses are 7 bits wide; the top bit is masked off on decode.
pub const WAKE_ADDRESS_MASK: u8 = 0x7F;

/// Maximum number of payload bytes in one packet.
pub const WAKE_MAX_DATA_LEN: usize = u8::MAX as usize;

/// Number of logical bytes in an addressed frame other than its payload:
/// `FEND`, address, command, length and CRC.
pub const WAKE_ADDRESSED_OVERHEAD: u16 = 5;

/// Number of logical bytes in an unaddressed frame other than its payload:
/// `FEND`, command, length and CRC.
pub const WAKE_UNADDRESSED_OVERHEAD: u16 = 4;

/// Maximum length (in bytes) of a logical, unstuffed package.
pub const WAKE_MAX_PACKAGE_LEN: usize = WAKE_ADDRESSED_OVERHEAD as usize + WAKE_MAX_DATA_LEN;

/// Maximum length (in bytes) of a frame on the wire.
///
/// Every byte after the leading `FEND` may be stuffed into two bytes.
pub const WAKE_MAX_FRAME_LEN: usize = 1 + (WAKE_MAX_PACKAGE_LEN - 1) * 2;

/// Default per-byte read timeout for [`WakePort::receive`](crate::port::WakePort::receive),
/// in microseconds.
pub const WAKE_UART_WAIT_TIME_US: u32 = 1_000;

/// Interval between two polls of the serial receiver while waiting for a byte,
/// in microseconds.
pub const WAKE_POLL_STEP_US: u32 = 10;
