//! Constants used across the OOK transmit protocol.
//!
//! A frame on air is laid out as:
//!
//! | Section   | Bytes            | Line encoding            |
//! |-----------|------------------|--------------------------|
//! | Training  | [`TRAINING_SEQUENCE`] | raw, MSB first      |
//! | Preamble  | [`PREAMBLE`]     | raw, MSB first           |
//! | Payload   | 1 to [`MAX_PAYLOAD_LEN`] | Manchester, 16 line bits per byte |
//!
//! One line bit is emitted per timer tick, so the timer runs at
//! [`DEFAULT_LINE_RATE`] ticks per second unless configured otherwise.

/// Alternating-bit training bytes sent ahead of every frame.
///
/// Gives the receiver's data slicer and clock recovery something to settle on.
pub const TRAINING_SEQUENCE: [u8; 4] = [0xAA, 0xAA, 0xAA, 0xAA];

/// Frame marker sent between the training bytes and the payload.
pub const PREAMBLE: [u8; 1] = [0x3A];

/// Smallest payload accepted by [`transmit`](crate::driver::MicrfDriver::transmit).
pub const MIN_PAYLOAD_LEN: usize = 1;

/// Largest payload accepted by [`transmit`](crate::driver::MicrfDriver::transmit).
///
/// The byte count travels in a `u8` through the session.
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// Number of line bits in one Manchester symbol (two per payload bit).
pub const SYMBOL_BITS: u8 = 16;

/// Number of bits shifted out of each source byte.
pub const BITS_IN_BYTE: u8 = 8;

/// Default line rate in line bits (timer ticks) per second.
pub const DEFAULT_LINE_RATE: u32 = 2_000;

/// Width of each pause in the power-up calibration sequence, in microseconds.
pub const CALIBRATION_PAUSE_US: u32 = 80;

/// Total number of line bits emitted for a payload of `len` bytes.
pub const fn frame_line_bits(len: usize) -> usize {
    (TRAINING_SEQUENCE.len() + PREAMBLE.len()) * BITS_IN_BYTE as usize
        + len * SYMBOL_BITS as usize
}
