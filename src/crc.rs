//! Frame checksums.
//!
//! The framing code only needs the [`Checksum`] contract; [`WakeCrc8`] is the
//! reference Wake CRC-8 used unless another strategy is supplied.

use crate::consts::{FEND, WAKE_CRC_INIT};
use crate::packet::Packet;

/// Computes and verifies the checksum byte of a [`Packet`].
///
/// Implementations must be deterministic and depend only on the logical
/// fields selected by `ignore_address` (the address is excluded when it is ignored).
pub trait Checksum {
    /// Computes the checksum over the packet's logical fields.
    fn compute(&self, packet: &Packet, ignore_address: bool) -> u8;

    /// Returns `true` if `packet.crc` matches [`compute`](Checksum::compute).
    fn verify(&self, packet: &Packet, ignore_address: bool) -> bool {
        self.compute(packet, ignore_address) == packet.crc
    }
}

/// Wake CRC-8: Dallas/Maxim polynomial (reflected `0x8C`), seeded with
/// [`WAKE_CRC_INIT`], run over `FEND [addr] cmd n data...`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct WakeCrc8;

impl Checksum for WakeCrc8 {
    fn compute(&self, packet: &Packet, ignore_address: bool) -> u8 {
        core::iter::once(FEND)
            .chain(packet.logical_fields(ignore_address))
            .fold(WAKE_CRC_INIT, crc8_update)
    }
}

/// Folds one byte into a Wake CRC-8 register, LSB first.
pub fn crc8_update(mut crc: u8, mut byte: u8) -> u8 {
    for _ in 0..8 {
        crc = if (byte ^ crc) & 1 != 0 {
            ((crc ^ 0x18) >> 1) | 0x80
        } else {
            (crc >> 1) & 0x7F
        };
        byte >>= 1;
    }
    crc
}
