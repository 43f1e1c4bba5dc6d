//! Error type shared by the encoder, both decoders and the port.
//!
//! Every decode error is recoverable: the decoder that reported it is back in
//! its idle state and waits for the next `FEND`. Encode errors are reported
//! before anything is written to the transport.

use thiserror::Error;

/// Errors produced while framing, unframing or moving Wake packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// The first byte of an attempted frame was not [`FEND`](crate::consts::FEND).
    ///
    /// Not fatal; the caller should simply try again with the next byte.
    #[error("byte is not a frame start marker")]
    NotStartByte,

    /// The transport yielded no byte within the per-byte timeout, or reported a read error.
    #[error("no byte received within the timeout")]
    ReadFailed,

    /// A complete frame was assembled but its CRC did not match the received one.
    #[error("checksum mismatch: computed {expected:#04x}, received {actual:#04x}")]
    ChecksumMismatch {
        /// CRC computed over the received logical fields.
        expected: u8,
        /// CRC byte carried by the frame.
        actual: u8,
    },

    /// The packet's length field disagrees with its payload, or the payload is too long.
    #[error("length field {n} does not describe a payload of {len} bytes")]
    InvalidLength {
        /// Value of the length field.
        n: u8,
        /// Actual payload length.
        len: usize,
    },

    /// The packet's address does not fit in 7 bits.
    #[error("address {0:#04x} does not fit in 7 bits")]
    InvalidAddress(u8),

    /// The transport refused a write or a flush.
    #[error("transport write failed")]
    WriteFailed,
}
