//! Incremental Wake frame decoder.
//!
//! [`FrameDecoder`] consumes one raw wire byte per call and reports, in the
//! usual `nb` fashion, whether a packet is ready:
//!
//! - `Ok(packet)`: a complete frame was received and its CRC checked out
//! - `Err(nb::Error::WouldBlock)`: more bytes are needed
//! - `Err(nb::Error::Other(e))`: the byte was rejected or the frame was corrupt
//!
//! This is the path to use when bytes trickle in from a UART interrupt: the
//! decoder never touches a transport and keeps its state between calls.
//!
//! ## State machine
//!
//! ```text
//!            FEND                         last logical byte
//!   Idle ─────────────▶ Receiving ───────────────────────────▶ Idle
//!    ▲ │ other byte:       │ ▲   (Ok(packet) or ChecksumMismatch)
//!    └─┘ NotStartByte      └─┘ WouldBlock
//! ```
//!
//! Once a frame has started, a `FEND` byte is just data: synchronization is
//! only regained from `Idle`.
//!
//! Field placement is shared with the blocking
//! [`WakePort::receive`](crate::port::WakePort::receive) through
//! [`FrameAssembler`], so both paths lay out fields identically.

use crate::consts::WAKE_ADDRESS_MASK;
use crate::crc::{Checksum, WakeCrc8};
use crate::error::Error;
use crate::packet::{Packet, frame_overhead};
use crate::stuffing::EscapeCodec;

/// The packet field a logical byte lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Address,
    Command,
    Length,
    /// Payload byte at the given index.
    Data(usize),
    Checksum,
}

/// Maps a logical byte position to its field.
///
/// `position` counts logical bytes from the start marker (which is position 0,
/// so callers pass 1 or more). `expected_total` is the current frame length
/// estimate.
pub(crate) fn field_at(ignore_address: bool, position: u16, expected_total: u16) -> Field {
    let first_data = frame_overhead(ignore_address) - 1;
    match (ignore_address, position) {
        (false, 1) => Field::Address,
        (true, 1) | (false, 2) => Field::Command,
        (true, 2) | (false, 3) => Field::Length,
        (_, p) if p + 1 < expected_total => Field::Data(usize::from(p - first_data)),
        _ => Field::Checksum,
    }
}

/// A frame being put together, one logical byte at a time.
///
/// The address mode is fixed when the frame starts; later changes to the
/// owner's flag only apply to the next frame.
#[derive(Debug)]
pub(crate) struct FrameAssembler {
    packet: Packet,
    /// Logical bytes placed so far, start marker included.
    consumed: u16,
    expected_total: u16,
    escape_pending: bool,
    ignore_address: bool,
}

impl FrameAssembler {
    /// Begins a frame whose start marker has just been seen.
    pub(crate) fn start(ignore_address: bool) -> Self {
        Self {
            packet: Packet::default(),
            consumed: 1,
            expected_total: frame_overhead(ignore_address),
            escape_pending: false,
            ignore_address,
        }
    }

    /// Pushes one raw byte.
    ///
    /// # Returns
    /// `true` once the frame's last logical byte (the CRC) has been placed.
    pub(crate) fn push(&mut self, codec: &EscapeCodec, byte: u8) -> bool {
        let Some(byte) = codec.unstuff(byte, &mut self.escape_pending) else {
            return false;
        };
        match field_at(self.ignore_address, self.consumed, self.expected_total) {
            Field::Address => self.packet.addr = byte & WAKE_ADDRESS_MASK,
            Field::Command => self.packet.cmd = byte,
            Field::Length => {
                self.packet.n = byte;
                self.expected_total = frame_overhead(self.ignore_address) + u16::from(byte);
            }
            Field::Data(index) => {
                debug_assert_eq!(index, self.packet.data.len());
                // Capacity is 255 and `n` is a u8, so this never overflows
                let _ = self.packet.data.push(byte);
            }
            Field::Checksum => self.packet.crc = byte,
        }
        self.consumed += 1;
        self.consumed >= self.expected_total
    }

    /// Verifies a finished frame.
    ///
    /// # Returns
    /// The packet and the number of logical bytes it occupied.
    pub(crate) fn finish<C: Checksum>(self, checksum: &C) -> Result<(Packet, u16), Error> {
        let mut packet = self.packet;
        if !checksum.verify(&packet, self.ignore_address) {
            return Err(Error::ChecksumMismatch {
                expected: checksum.compute(&packet, self.ignore_address),
                actual: packet.crc,
            });
        }
        if self.ignore_address {
            packet.addr = 0;
        }
        Ok((packet, self.consumed))
    }
}

/// Byte-at-a-time Wake frame decoder.
///
/// One instance per byte stream. Calls to [`feed`](FrameDecoder::feed) must be
/// serialized by the caller (e.g. a single reader task, or the
/// [`isr`](crate::isr) helpers).
///
/// ## Example
///
/// ```rust
/// use wake_serial::FrameDecoder;
///
/// let mut decoder = FrameDecoder::new();
/// let frame = [0xC0, 0x05, 0x10, 0x01, 0xAA, 0x00];
///
/// let (used, result) = decoder.feed_slice(&frame);
/// let packet = result.unwrap();
/// assert_eq!(used, frame.len());
/// assert_eq!((packet.addr, packet.cmd, packet.data.as_slice()), (0x05, 0x10, &[0xAA][..]));
/// ```
#[derive(Debug)]
pub struct FrameDecoder<C = WakeCrc8> {
    codec: EscapeCodec,
    checksum: C,
    ignore_address: bool,
    frame: Option<FrameAssembler>,
}

impl FrameDecoder<WakeCrc8> {
    /// Creates an idle decoder using the standard Wake constants and CRC-8,
    /// with the address field present.
    pub const fn new() -> Self {
        Self::with_checksum(EscapeCodec::WAKE, WakeCrc8)
    }
}

impl Default for FrameDecoder<WakeCrc8> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FrameDecoder<C> {
    /// Creates an idle decoder with custom protocol constants and checksum strategy.
    pub const fn with_checksum(codec: EscapeCodec, checksum: C) -> Self {
        Self {
            codec,
            checksum,
            ignore_address: false,
            frame: None,
        }
    }

    /// Sets whether frames carry no address field.
    ///
    /// A frame already in progress keeps the mode it started with; the new
    /// value applies from the next start marker.
    pub fn set_ignore_address(&mut self, flag: bool) {
        self.ignore_address = flag;
    }

    /// Returns the configured address mode.
    pub fn ignore_address(&self) -> bool {
        self.ignore_address
    }

    /// Returns `true` while a frame is being assembled.
    pub fn is_receiving(&self) -> bool {
        self.frame.is_some()
    }

    /// Drops any partial frame and returns to idle.
    pub fn reset(&mut self) {
        self.frame = None;
    }

    /// The protocol constants this decoder unstuffs with.
    pub fn codec(&self) -> &EscapeCodec {
        &self.codec
    }

    /// The checksum strategy this decoder verifies with.
    pub fn checksum(&self) -> &C {
        &self.checksum
    }
}

impl<C: Checksum> FrameDecoder<C> {
    /// Feeds one raw wire byte.
    ///
    /// # Returns
    /// - `Ok(packet)` when `byte` completed a frame with a valid CRC
    /// - `Err(nb::Error::WouldBlock)` when the frame is still incomplete
    /// - `Err(nb::Error::Other(Error::NotStartByte))` when idle and `byte` is not `FEND`
    /// - `Err(nb::Error::Other(Error::ChecksumMismatch { .. }))` when the frame was corrupt
    ///
    /// After `Ok` or any error the decoder is idle again.
    pub fn feed(&mut self, byte: u8) -> nb::Result<Packet, Error> {
        let complete = match self.frame.as_mut() {
            Some(frame) => frame.push(&self.codec, byte),
            None => return self.start(byte),
        };
        if !complete {
            return Err(nb::Error::WouldBlock);
        }
        match self.frame.take() {
            Some(frame) => self.complete(frame),
            None => Err(nb::Error::WouldBlock),
        }
    }

    /// Feeds bytes until one of them produces an outcome other than `WouldBlock`.
    ///
    /// # Returns
    /// The number of bytes consumed and the outcome of the last one. Bytes
    /// after that point are left for the next call.
    pub fn feed_slice(&mut self, bytes: &[u8]) -> (usize, nb::Result<Packet, Error>) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Err(nb::Error::WouldBlock) => {}
                outcome => return (i + 1, outcome),
            }
        }
        (bytes.len(), Err(nb::Error::WouldBlock))
    }

    fn start(&mut self, byte: u8) -> nb::Result<Packet, Error> {
        if byte != self.codec.fend {
            trace!("wake: skipping non-start byte {:#x}", byte);
            return Err(nb::Error::Other(Error::NotStartByte));
        }
        trace!("wake: frame start");
        self.frame = Some(FrameAssembler::start(self.ignore_address));
        Err(nb::Error::WouldBlock)
    }

    fn complete(&self, frame: FrameAssembler) -> nb::Result<Packet, Error> {
        match frame.finish(&self.checksum) {
            Ok((packet, len)) => {
                debug!("wake: received cmd {:#x} ({} bytes)", packet.cmd, len);
                Ok(packet)
            }
            Err(e) => {
                warn!("wake: dropped frame: {}", e);
                Err(nb::Error::Other(e))
            }
        }
    }
}
