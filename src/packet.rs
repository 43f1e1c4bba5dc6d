//! The logical Wake packet.

use crate::consts::{
    WAKE_ADDRESS_MASK, WAKE_ADDRESSED_OVERHEAD, WAKE_MAX_DATA_LEN, WAKE_UNADDRESSED_OVERHEAD,
};
use crate::error::Error;
use heapless::Vec;

/// A decoded (or to-be-encoded) Wake packet.
///
/// On the wire a packet is laid out as `FEND [addr] cmd n data[n] crc`. The
/// start marker is implicit here; the address is only transmitted when the
/// address field is not ignored.
///
/// Packets handed out by the decoders always satisfy `data.len() == n`. Packets
/// built by hand are checked by [`Packet::validate`] before they are encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Packet {
    /// 7-bit device address. Forced to 0 when the address field is ignored.
    pub addr: u8,
    /// Command code.
    pub cmd: u8,
    /// Number of payload bytes.
    pub n: u8,
    /// Payload.
    pub data: Vec<u8, WAKE_MAX_DATA_LEN>,
    /// Checksum byte as received. Ignored (recomputed) when encoding.
    pub crc: u8,
}

impl Packet {
    /// Builds an addressed packet, with `n` taken from the payload.
    ///
    /// # Errors
    /// - [`Error::InvalidAddress`] if `addr` does not fit in 7 bits
    /// - [`Error::InvalidLength`] if `data` is longer than 255 bytes
    pub fn new(addr: u8, cmd: u8, data: &[u8]) -> Result<Self, Error> {
        if addr > WAKE_ADDRESS_MASK {
            return Err(Error::InvalidAddress(addr));
        }
        let mut packet = Self::unaddressed(cmd, data)?;
        packet.addr = addr;
        Ok(packet)
    }

    /// Builds a packet for links that ignore the address field.
    ///
    /// # Errors
    /// [`Error::InvalidLength`] if `data` is longer than 255 bytes.
    pub fn unaddressed(cmd: u8, data: &[u8]) -> Result<Self, Error> {
        let payload = Vec::from_slice(data).map_err(|_| Error::InvalidLength {
            n: u8::MAX,
            len: data.len(),
        })?;
        Ok(Self {
            addr: 0,
            cmd,
            n: payload.len() as u8,
            data: payload,
            crc: 0,
        })
    }

    /// Checks the field-width invariants required before encoding.
    pub fn validate(&self, ignore_address: bool) -> Result<(), Error> {
        if usize::from(self.n) != self.data.len() {
            return Err(Error::InvalidLength {
                n: self.n,
                len: self.data.len(),
            });
        }
        if !ignore_address && self.addr > WAKE_ADDRESS_MASK {
            return Err(Error::InvalidAddress(self.addr));
        }
        Ok(())
    }

    /// Number of logical bytes this packet occupies on the wire, start marker
    /// and CRC included, before stuffing.
    pub fn frame_len(&self, ignore_address: bool) -> usize {
        usize::from(frame_overhead(ignore_address)) + usize::from(self.n)
    }

    /// The logical fields between the start marker and the CRC:
    /// `[addr] cmd n data...`.
    pub(crate) fn logical_fields(&self, ignore_address: bool) -> impl Iterator<Item = u8> + '_ {
        (!ignore_address)
            .then_some(self.addr & WAKE_ADDRESS_MASK)
            .into_iter()
            .chain([self.cmd, self.n])
            .chain(self.data.iter().copied())
    }
}

/// Logical bytes in a frame other than the payload.
pub(crate) const fn frame_overhead(ignore_address: bool) -> u16 {
    if ignore_address {
        WAKE_UNADDRESSED_OVERHEAD
    } else {
        WAKE_ADDRESSED_OVERHEAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_length_from_payload() {
        let packet = Packet::new(0x05, 0x10, &[1, 2, 3]).unwrap();
        assert_eq!(packet.addr, 0x05);
        assert_eq!(packet.cmd, 0x10);
        assert_eq!(packet.n, 3);
        assert_eq!(packet.data.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_new_rejects_wide_address() {
        assert_eq!(
            Packet::new(0x80, 0x10, &[]),
            Err(Error::InvalidAddress(0x80))
        );
    }

    #[test]
    fn test_unaddressed_rejects_long_payload() {
        let data = [0u8; 256];
        assert_eq!(
            Packet::unaddressed(0x10, &data),
            Err(Error::InvalidLength { n: 255, len: 256 })
        );
        assert!(Packet::unaddressed(0x10, &data[..255]).is_ok());
    }

    #[test]
    fn test_validate_length_mismatch() {
        let mut packet = Packet::unaddressed(0x10, &[1, 2]).unwrap();
        packet.n = 3;
        assert_eq!(
            packet.validate(true),
            Err(Error::InvalidLength { n: 3, len: 2 })
        );
    }

    #[test]
    fn test_validate_address_only_checked_when_present() {
        let mut packet = Packet::unaddressed(0x10, &[]).unwrap();
        packet.addr = 0xFF;
        assert_eq!(packet.validate(true), Ok(()));
        assert_eq!(packet.validate(false), Err(Error::InvalidAddress(0xFF)));
    }

    #[test]
    fn test_frame_len() {
        let packet = Packet::new(1, 2, &[0; 10]).unwrap();
        assert_eq!(packet.frame_len(false), 15);
        assert_eq!(packet.frame_len(true), 14);
    }
}
