//! Byte stuffing for Wake frames.
//!
//! Inside a frame the start marker `FEND` must never appear on the wire, so it
//! is transposed into the two-byte sequence `FESC TFEND`. The escape marker
//! itself becomes `FESC TFESC`. Every other byte passes through unchanged.
//!
//! | Logical byte | On the wire      |
//! |--------------|------------------|
//! | `FEND`       | `FESC TFEND`     |
//! | `FESC`       | `FESC TFESC`     |
//! | anything else| unchanged        |
//!
//! The leading `FEND` of a frame is never stuffed; that is the job of the
//! encoder, not of this module.
//!
//! ## Functions
//!
//! - [`EscapeCodec::stuff`]: one logical byte to one or two wire bytes
//! - [`EscapeCodec::unstuff`]: one wire byte plus the pending flag to at most one logical byte
//! - [`EscapeCodec::stuff_buffer`] / [`EscapeCodec::unstuff_buffer`]: whole slices

use crate::consts::{FEND, FESC, TFEND, TFESC};

/// The four protocol constants that drive stuffing and unstuffing.
///
/// Encoder and decoder must share the same values. [`EscapeCodec::WAKE`] holds
/// the standard Wake bytes and is what [`Default`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct EscapeCodec {
    /// Start marker.
    pub fend: u8,
    /// Escape marker.
    pub fesc: u8,
    /// Operand following `fesc` that stands for `fend`.
    pub tfend: u8,
    /// Operand following `fesc` that stands for `fesc`.
    pub tfesc: u8,
}

impl Default for EscapeCodec {
    fn default() -> Self {
        Self::WAKE
    }
}

impl EscapeCodec {
    /// Standard Wake constants: `0xC0`, `0xDB`, `0xDC`, `0xDD`.
    pub const WAKE: Self = Self {
        fend: FEND,
        fesc: FESC,
        tfend: TFEND,
        tfesc: TFESC,
    };

    /// Stuffs a single logical byte.
    ///
    /// # Returns
    /// The wire bytes and how many of them are meaningful (1 or 2).
    pub fn stuff(&self, byte: u8) -> ([u8; 2], usize) {
        if byte == self.fend {
            ([self.fesc, self.tfend], 2)
        } else if byte == self.fesc {
            ([self.fesc, self.tfesc], 2)
        } else {
            ([byte, 0], 1)
        }
    }

    /// Unstuffs a single wire byte.
    ///
    /// `pending` is the escape state carried between calls. It is set when
    /// `byte` is the escape marker, and cleared once the operand arrives.
    ///
    /// # Returns
    /// - `None` if `byte` opened an escape sequence and no logical byte exists yet
    /// - `Some(b)` for an ordinary byte or the decoded operand of an escape pair
    ///
    /// An operand other than `tfend`/`tfesc` is passed through as-is.
    pub fn unstuff(&self, byte: u8, pending: &mut bool) -> Option<u8> {
        if *pending {
            *pending = false;
            Some(if byte == self.tfend {
                self.fend
            } else if byte == self.tfesc {
                self.fesc
            } else {
                byte
            })
        } else if byte == self.fesc {
            *pending = true;
            None
        } else {
            Some(byte)
        }
    }

    /// Stuffs every byte of `input` into `output`.
    ///
    /// # Returns
    /// The number of bytes written, or `None` if `output` is too short.
    pub fn stuff_buffer(&self, input: &[u8], output: &mut [u8]) -> Option<usize> {
        let mut i = 0;
        for &byte in input {
            let (bytes, len) = self.stuff(byte);
            output.get_mut(i..i + len)?.copy_from_slice(&bytes[..len]);
            i += len;
        }
        Some(i)
    }

    /// Unstuffs every byte of `input` into `output`.
    ///
    /// # Returns
    /// The number of logical bytes written, or `None` if `output` is too short
    /// or `input` ends in the middle of an escape sequence.
    pub fn unstuff_buffer(&self, input: &[u8], output: &mut [u8]) -> Option<usize> {
        let mut pending = false;
        let mut i = 0;
        for &byte in input {
            if let Some(b) = self.unstuff(byte, &mut pending) {
                *output.get_mut(i)? = b;
                i += 1;
            }
        }
        if pending { None } else { Some(i) }
    }
}
