//! Interrupt-driven decoding with a global [`FrameDecoder`].
//!
//! A UART receive interrupt and the main loop both need the decoder, so it
//! lives in a `static` behind a `critical_section` mutex. Every access goes
//! through `critical_section::with`, which serializes the `feed` calls.
//!
//! # Example
//! ```rust
//! use wake_serial::FrameDecoder;
//! use wake_serial::isr::{GlobalDecoder, global_decoder_feed, global_decoder_init, global_decoder_setup};
//!
//! static WAKE_DECODER: GlobalDecoder = global_decoder_init();
//!
//! global_decoder_setup(&WAKE_DECODER, FrameDecoder::new());
//!
//! // In the UART RX interrupt:
//! for byte in [0xC0, 0x05, 0x10, 0x01, 0xAA, 0x00] {
//!     if let Some(Ok(packet)) = global_decoder_feed(&WAKE_DECODER, byte) {
//!         assert_eq!(packet.cmd, 0x10);
//!     }
//! }
//! ```

use crate::crc::{Checksum, WakeCrc8};
use crate::decoder::FrameDecoder;
use crate::error::Error;
use crate::packet::Packet;
use core::cell::RefCell;
use critical_section::Mutex;

/// A decoder shared between interrupt and thread context.
pub type GlobalDecoder<C = WakeCrc8> = Mutex<RefCell<Option<FrameDecoder<C>>>>;

/// Used to initialize a global static decoder slot.
///
/// # Returns
/// * An empty slot; call [`global_decoder_setup`] before feeding it
pub const fn global_decoder_init<C>() -> GlobalDecoder<C> {
    Mutex::new(RefCell::new(None))
}

/// Installs `decoder` in the global slot, replacing any previous one.
pub fn global_decoder_setup<C>(global: &'static GlobalDecoder<C>, decoder: FrameDecoder<C>) {
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(decoder));
    });
}

/// Feeds one byte to the global decoder.
///
/// # Returns
/// * `None` if no decoder has been installed
/// * `Some(outcome)` with the result of [`FrameDecoder::feed`] otherwise
pub fn global_decoder_feed<C: Checksum>(
    global: &'static GlobalDecoder<C>,
    byte: u8,
) -> Option<nb::Result<Packet, Error>> {
    critical_section::with(|cs| {
        global
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .map(|decoder| decoder.feed(byte))
    })
}

/// Changes the address mode of the global decoder (applies from the next frame).
///
/// # Returns
/// `false` if no decoder has been installed.
pub fn global_decoder_set_ignore_address<C>(global: &'static GlobalDecoder<C>, flag: bool) -> bool {
    critical_section::with(|cs| match global.borrow(cs).borrow_mut().as_mut() {
        Some(decoder) => {
            decoder.set_ignore_address(flag);
            true
        }
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FEND;

    static UNINIT: GlobalDecoder = global_decoder_init();
    static DECODER: GlobalDecoder = global_decoder_init();

    #[test]
    fn test_feed_without_setup() {
        assert_eq!(global_decoder_feed(&UNINIT, FEND), None);
        assert!(!global_decoder_set_ignore_address(&UNINIT, true));
    }

    #[test]
    fn test_feed_global_decoder() {
        global_decoder_setup(&DECODER, FrameDecoder::new());
        assert!(global_decoder_set_ignore_address(&DECODER, true));

        let mut packets = 0;
        for byte in [0x55, FEND, 0x22, 0x00, 0xEE] {
            match global_decoder_feed(&DECODER, byte) {
                Some(Ok(packet)) => {
                    assert_eq!(packet.cmd, 0x22);
                    packets += 1;
                }
                Some(Err(nb::Error::WouldBlock)) => {}
                Some(Err(nb::Error::Other(e))) => assert_eq!(e, Error::NotStartByte),
                None => panic!("decoder not installed"),
            }
        }
        assert_eq!(packets, 1);
    }
}
