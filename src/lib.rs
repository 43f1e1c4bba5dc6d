//! # wake-serial
//!
//! A portable, no_std Rust codec for the Wake serial protocol: framed,
//! byte-stuffed, CRC-8 protected packets exchanged between devices over a UART.
//!
//! ```text
//! FEND [addr] cmd n data[0..n] crc
//! ```
//!
//! This crate implements:
//! - byte stuffing of `FEND`/`FESC` inside frames ([`stuffing`])
//! - a pluggable checksum with the standard Wake CRC-8 ([`crc`])
//! - frame encoding with field validation ([`encoder`])
//! - an incremental, byte-at-a-time decoder for interrupt-driven UARTs ([`decoder`])
//! - a blocking, timeout-bounded receive path and a send path over
//!   `embedded-hal-nb` serial ports ([`port`])
//! - interrupt-safe global decoder helpers with `critical-section` ([`isr`])
//!
//! ## Crate features
//! | Feature                      | Description |
//! |------------------------------|-------------|
//! | `std`                        | Disables `#![no_std]` support |
//! | `critical-section` (default) | Global decoder helpers in [`isr`] |
//! | `defmt-0-3`                  | Uses `defmt` logging and `defmt::Format` derives |
//! | `log`                        | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust
//! # use embedded_hal_mock::eh1::serial::{Mock as SerialMock, Transaction as SerialTransaction};
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! use wake_serial::{Packet, WakePort, consts::WAKE_UART_WAIT_TIME_US};
//!
//! # let serial = SerialMock::new(&[
//! #     SerialTransaction::read_many(&[0xC0, 0x05, 0x10, 0x01, 0xAA, 0x00]),
//! # ]);
//! let mut port = WakePort::new(serial, NoopDelay::new());
//! let (packet, _len) = port.receive(WAKE_UART_WAIT_TIME_US).unwrap();
//! assert_eq!(packet, Packet::new(0x05, 0x10, &[0xAA]).unwrap());
//! # port.serial.done();
//! ```
//!
//! ## Integration Notes
//!
//! - One [`FrameDecoder`] per byte stream; calls to `feed` must not race
//! - The blocking and incremental paths must not interleave on one stream
//! - The address mode is captured when a frame starts; changing it mid-frame
//!   only affects the next frame

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "critical-section")]
pub use critical_section;
pub use heapless;
pub use nb;

pub mod consts;
pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod error;
#[cfg(feature = "critical-section")]
pub mod isr;
pub mod packet;
pub mod port;
pub mod stuffing;

pub use crc::{Checksum, WakeCrc8};
pub use decoder::FrameDecoder;
pub use encoder::{Frame, encode_frame};
pub use error::Error;
pub use packet::Packet;
pub use port::WakePort;
pub use stuffing::EscapeCodec;
