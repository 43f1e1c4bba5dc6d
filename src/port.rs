//! Wake link over a serial port.
//!
//! This module provides [`WakePort`], which owns a serial peripheral and a
//! delay source and moves whole packets across them. It offers both decode
//! paths:
//!
//! - [`receive()`](WakePort::receive): blocking, pulls bytes with a per-byte
//!   timeout until one frame is complete. Nothing is kept between calls.
//! - [`poll()`](WakePort::poll): non-blocking, drains whatever the UART
//!   already holds into the port's incremental [`FrameDecoder`].
//!
//! The two paths must not be mixed on the same stream while a frame is in
//! flight: a frame half-consumed by `poll()` is invisible to `receive()`.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::serial::{Mock as SerialMock, Transaction as SerialTransaction};
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! use wake_serial::{Packet, WakePort};
//!
//! # let serial = SerialMock::new(&[
//! #     SerialTransaction::write_many(&[0xC0, 0x05, 0x10, 0x01, 0xAA, 0x00]),
//! #     SerialTransaction::flush(),
//! # ]);
//! let mut port = WakePort::new(serial, NoopDelay::new());
//! let packet = Packet::new(0x05, 0x10, &[0xAA]).unwrap();
//! port.send(&packet).unwrap();
//! # port.serial.done();
//! ```
//!
//! ## Transport
//!
//! Any `embedded_hal_nb::serial` implementation works. Timeouts are realized
//! by polling `read()` every [`WAKE_POLL_STEP_US`] microseconds on the
//! supplied [`DelayNs`].

use crate::consts::WAKE_POLL_STEP_US;
use crate::crc::{Checksum, WakeCrc8};
use crate::decoder::{FrameAssembler, FrameDecoder};
use crate::encoder::encode_frame;
use crate::error::Error;
use crate::packet::Packet;
use embedded_hal::delay::DelayNs;
use embedded_hal_nb::serial::{Read, Write};
use nb::block;

/// A Wake endpoint bound to one serial port.
///
/// ## Type Parameters
///
/// - `S`: serial peripheral implementing [`embedded_hal_nb::serial::Read`] and [`Write`]
/// - `D`: delay provider used to pace reads while waiting for a byte
/// - `C`: checksum strategy, [`WakeCrc8`] by default
#[derive(Debug)]
pub struct WakePort<S, D, C = WakeCrc8>
where
    S: Read<u8> + Write<u8>,
    D: DelayNs,
{
    /// Serial peripheral
    pub serial: S,
    /// Delay provider
    pub delay: D,
    decoder: FrameDecoder<C>,

    /// Counter of frames fully written to the serial port.
    pub tx_good: u16,

    /// Counter of frames received with a valid CRC, on either decode path.
    pub rx_good: u16,

    /// Counter of frames dropped because of a CRC mismatch.
    pub rx_bad: u16,
}

impl<S, D> WakePort<S, D, WakeCrc8>
where
    S: Read<u8> + Write<u8>,
    D: DelayNs,
{
    /// Creates a port using the standard Wake constants and CRC-8, with the
    /// address field present.
    pub fn new(serial: S, delay: D) -> Self {
        Self::with_decoder(serial, delay, FrameDecoder::new())
    }
}

impl<S, D, C> WakePort<S, D, C>
where
    S: Read<u8> + Write<u8>,
    D: DelayNs,
    C: Checksum,
{
    /// Creates a port around an existing decoder.
    ///
    /// The decoder's protocol constants, checksum and address mode are used
    /// for sending as well as receiving.
    pub fn with_decoder(serial: S, delay: D, decoder: FrameDecoder<C>) -> Self {
        Self {
            serial,
            delay,
            decoder,
            tx_good: 0,
            rx_good: 0,
            rx_bad: 0,
        }
    }

    /// Sets whether frames carry no address field.
    ///
    /// A frame already half-received by [`poll()`](WakePort::poll) finishes
    /// with the mode it started with.
    pub fn set_ignore_address(&mut self, flag: bool) {
        self.decoder.set_ignore_address(flag);
    }

    /// Returns the configured address mode.
    pub fn ignore_address(&self) -> bool {
        self.decoder.ignore_address()
    }

    /// The incremental decoder used by [`poll()`](WakePort::poll).
    pub fn decoder_mut(&mut self) -> &mut FrameDecoder<C> {
        &mut self.decoder
    }

    /// Encodes `packet` and writes the whole frame, then flushes.
    ///
    /// # Errors
    /// - [`Error::InvalidLength`] / [`Error::InvalidAddress`] before anything is written
    /// - [`Error::WriteFailed`] if the serial port rejects a byte or the flush
    pub fn send(&mut self, packet: &Packet) -> Result<(), Error> {
        let frame = encode_frame(
            packet,
            self.decoder.ignore_address(),
            self.decoder.codec(),
            self.decoder.checksum(),
        )?;
        for &byte in frame.iter() {
            block!(self.serial.write(byte)).map_err(|_| {
                warn!("wake: serial write failed");
                Error::WriteFailed
            })?;
        }
        block!(self.serial.flush()).map_err(|_| {
            warn!("wake: serial flush failed");
            Error::WriteFailed
        })?;
        self.tx_good = self.tx_good.wrapping_add(1);
        trace!("wake: sent cmd {:#x} ({} bytes)", packet.cmd, frame.len());
        Ok(())
    }

    /// Blocks until one frame has been read from the serial port.
    ///
    /// Every byte, the first included, must arrive within `timeout_us`
    /// microseconds of the previous one. There is no resynchronization loop:
    /// if the first byte is not `FEND` the call fails and the caller retries.
    ///
    /// # Returns
    /// The packet and the number of logical (unstuffed) bytes it occupied.
    ///
    /// # Errors
    /// - [`Error::NotStartByte`] if the first byte is not `FEND`
    /// - [`Error::ReadFailed`] if a byte is missing or the port reports an error
    /// - [`Error::ChecksumMismatch`] if the frame is corrupt
    pub fn receive(&mut self, timeout_us: u32) -> Result<(Packet, usize), Error> {
        if self.read_byte(timeout_us)? != self.decoder.codec().fend {
            return Err(Error::NotStartByte);
        }
        let mut frame = FrameAssembler::start(self.decoder.ignore_address());
        loop {
            let byte = self.read_byte(timeout_us)?;
            if frame.push(self.decoder.codec(), byte) {
                break;
            }
        }
        match frame.finish(self.decoder.checksum()) {
            Ok((packet, len)) => {
                self.rx_good = self.rx_good.wrapping_add(1);
                Ok((packet, usize::from(len)))
            }
            Err(e) => {
                self.rx_bad = self.rx_bad.wrapping_add(1);
                warn!("wake: dropped frame: {}", e);
                Err(e)
            }
        }
    }

    /// Feeds every byte the serial port already holds to the incremental decoder.
    ///
    /// Bytes outside of a frame are skipped silently.
    ///
    /// # Returns
    /// - `Ok(packet)` as soon as a frame completes; remaining bytes stay in the UART
    /// - `Err(nb::Error::WouldBlock)` once the UART is drained without a complete frame
    /// - `Err(nb::Error::Other(e))` on a CRC mismatch or a read error
    pub fn poll(&mut self) -> nb::Result<Packet, Error> {
        loop {
            let byte = match self.serial.read() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => return Err(nb::Error::WouldBlock),
                Err(nb::Error::Other(_)) => {
                    warn!("wake: serial read failed");
                    return Err(nb::Error::Other(Error::ReadFailed));
                }
            };
            match self.decoder.feed(byte) {
                Ok(packet) => {
                    self.rx_good = self.rx_good.wrapping_add(1);
                    return Ok(packet);
                }
                Err(nb::Error::WouldBlock) | Err(nb::Error::Other(Error::NotStartByte)) => {}
                Err(nb::Error::Other(e)) => {
                    if matches!(e, Error::ChecksumMismatch { .. }) {
                        self.rx_bad = self.rx_bad.wrapping_add(1);
                    }
                    return Err(nb::Error::Other(e));
                }
            }
        }
    }

    /// Consumes the port, returning the serial peripheral and delay provider.
    pub fn release(self) -> (S, D) {
        (self.serial, self.delay)
    }

    fn read_byte(&mut self, timeout_us: u32) -> Result<u8, Error> {
        let mut waited: u32 = 0;
        loop {
            match self.serial.read() {
                Ok(byte) => return Ok(byte),
                Err(nb::Error::WouldBlock) if waited < timeout_us => {
                    self.delay.delay_us(WAKE_POLL_STEP_US);
                    waited = waited.saturating_add(WAKE_POLL_STEP_US);
                }
                Err(nb::Error::WouldBlock) => {
                    debug!("wake: no byte within {} us", timeout_us);
                    return Err(Error::ReadFailed);
                }
                Err(nb::Error::Other(_)) => {
                    warn!("wake: serial read failed");
                    return Err(Error::ReadFailed);
                }
            }
        }
    }
}
