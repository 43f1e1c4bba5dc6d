//! Frame encoding.
//!
//! Turns a [`Packet`] into the exact bytes to put on the wire:
//!
//! 1. validate the packet's field widths
//! 2. compute the checksum over the logical fields
//! 3. emit `FEND`, then every other byte stuffed through the [`EscapeCodec`]
//!
//! Encoding holds no state and never touches a transport, so concurrent
//! encodes of independent packets are safe. Writing the result is left to
//! [`WakePort::send`](crate::port::WakePort::send).

use crate::consts::WAKE_MAX_FRAME_LEN;
use crate::crc::Checksum;
use crate::error::Error;
use crate::packet::Packet;
use crate::stuffing::EscapeCodec;
use heapless::Vec;

/// A stuffed frame, sized for the worst case.
pub type Frame = Vec<u8, WAKE_MAX_FRAME_LEN>;

/// Encodes `packet` into a stuffed, checksum-terminated frame.
///
/// `packet.crc` is ignored; the checksum is recomputed with `checksum`.
///
/// # Errors
/// - [`Error::InvalidLength`] if `packet.n` does not match the payload
/// - [`Error::InvalidAddress`] if the address is transmitted and wider than 7 bits
///
/// # Example
/// ```rust
/// use wake_serial::{EscapeCodec, Packet, WakeCrc8, encode_frame};
///
/// let packet = Packet::new(0x05, 0x10, &[0xAA]).unwrap();
/// let frame = encode_frame(&packet, false, &EscapeCodec::WAKE, &WakeCrc8).unwrap();
/// assert_eq!(frame.as_slice(), &[0xC0, 0x05, 0x10, 0x01, 0xAA, 0x00]);
/// ```
pub fn encode_frame<C: Checksum>(
    packet: &Packet,
    ignore_address: bool,
    codec: &EscapeCodec,
    checksum: &C,
) -> Result<Frame, Error> {
    packet.validate(ignore_address)?;
    let crc = checksum.compute(packet, ignore_address);

    let mut frame = Frame::new();
    // The leading marker is the only unstuffed byte.
    // WAKE_MAX_FRAME_LEN covers a fully stuffed maximum packet, so pushes cannot fail.
    let pushed = frame.push(codec.fend);
    debug_assert!(pushed.is_ok());
    for byte in packet.logical_fields(ignore_address).chain([crc]) {
        let (bytes, len) = codec.stuff(byte);
        let extended = frame.extend_from_slice(&bytes[..len]);
        debug_assert!(extended.is_ok());
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FEND, FESC, TFEND, TFESC, WAKE_MAX_DATA_LEN};
    use crate::crc::WakeCrc8;

    #[test]
    fn test_encode_addressed_without_stuffing() {
        let packet = Packet::new(0x05, 0x10, &[0xAA]).unwrap();
        let frame = encode_frame(&packet, false, &EscapeCodec::WAKE, &WakeCrc8).unwrap();
        assert_eq!(frame.as_slice(), &[FEND, 0x05, 0x10, 0x01, 0xAA, 0x00]);
    }

    #[test]
    fn test_encode_stuffs_fend_in_payload() {
        let packet = Packet::unaddressed(0x10, &[FEND]).unwrap();
        let frame = encode_frame(&packet, true, &EscapeCodec::WAKE, &WakeCrc8).unwrap();
        assert_eq!(frame.as_slice(), &[FEND, 0x10, 0x01, FESC, TFEND, 0x69]);
    }

    #[test]
    fn test_encode_stuffs_fesc_in_payload() {
        let packet = Packet::unaddressed(0x01, &[FESC, 0x07]).unwrap();
        let frame = encode_frame(&packet, true, &EscapeCodec::WAKE, &WakeCrc8).unwrap();
        assert_eq!(frame.as_slice(), &[FEND, 0x01, 0x02, FESC, TFESC, 0x07, 0xE6]);
    }

    #[test]
    fn test_encode_empty_payload() {
        let packet = Packet::unaddressed(0x22, &[]).unwrap();
        let frame = encode_frame(&packet, true, &EscapeCodec::WAKE, &WakeCrc8).unwrap();
        assert_eq!(frame.as_slice(), &[FEND, 0x22, 0x00, 0xEE]);

        let packet = Packet::new(0x03, 0x22, &[]).unwrap();
        let frame = encode_frame(&packet, false, &EscapeCodec::WAKE, &WakeCrc8).unwrap();
        assert_eq!(frame.as_slice(), &[FEND, 0x03, 0x22, 0x00, 0x99]);
    }

    #[test]
    fn test_encode_ignores_stale_crc_field() {
        let mut packet = Packet::new(0x05, 0x10, &[0xAA]).unwrap();
        packet.crc = 0x42;
        let frame = encode_frame(&packet, false, &EscapeCodec::WAKE, &WakeCrc8).unwrap();
        assert_eq!(frame.last(), Some(&0x00));
    }

    #[test]
    fn test_encode_rejects_invalid_fields() {
        let mut packet = Packet::new(0x05, 0x10, &[0xAA]).unwrap();
        packet.n = 2;
        assert_eq!(
            encode_frame(&packet, false, &EscapeCodec::WAKE, &WakeCrc8),
            Err(Error::InvalidLength { n: 2, len: 1 })
        );

        let mut packet = Packet::new(0x05, 0x10, &[0xAA]).unwrap();
        packet.addr = 0x85;
        assert_eq!(
            encode_frame(&packet, false, &EscapeCodec::WAKE, &WakeCrc8),
            Err(Error::InvalidAddress(0x85))
        );
        // Address is not transmitted, so its width does not matter
        assert!(encode_frame(&packet, true, &EscapeCodec::WAKE, &WakeCrc8).is_ok());
    }

    #[test]
    fn test_worst_case_frame_fits() {
        let data = [FEND; WAKE_MAX_DATA_LEN];
        let packet = Packet::new(0x40, FESC, &data).unwrap();
        let frame = encode_frame(&packet, false, &EscapeCodec::WAKE, &WakeCrc8).unwrap();
        assert_eq!(frame[0], FEND);
        assert!(frame.len() <= WAKE_MAX_FRAME_LEN);
        assert!(frame[1..].iter().all(|&b| b != FEND));
    }
}
