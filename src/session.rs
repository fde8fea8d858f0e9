//! Transmit session state and the per-tick bit sequencer.
//!
//! A [`TxSession`] tracks one transmission from the first training bit to the
//! shutdown tick. It never touches hardware: the
//! [`MicrfDriver`](crate::driver::MicrfDriver) drives pins from the values the
//! session precomputes.
//!
//! ## Phases
//!
//! ```text
//! Training --(table exhausted)--> Preamble --(table exhausted)--> Data
//!                                                                  |
//!                        (symbol exhausted, payload bytes left) <--+
//!                                                                  |
//!                        (symbol exhausted, payload done) --> stop requested
//! ```
//!
//! The byte currently shifted out always comes from a [`ByteSource`], so the
//! exhaustion check is the same for the fixed tables and for the two-byte
//! Manchester symbol.

use crate::config::SymbolOrder;
use crate::consts::{BITS_IN_BYTE, PREAMBLE, TRAINING_SEQUENCE};
use crate::encoding::{manchester_encode, symbol_bytes};

/// Coarse view of where a session is in the frame.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Phase {
    /// Sending [`TRAINING_SEQUENCE`].
    Training,
    /// Sending [`PREAMBLE`].
    Preamble,
    /// Sending Manchester symbols of the payload.
    Data,
}

/// The table a session is currently pulling bytes from, with its cursor.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ByteSource {
    /// Cursor into [`TRAINING_SEQUENCE`].
    Training {
        /// Index of the next byte to pull.
        cursor: u8,
    },
    /// Cursor into [`PREAMBLE`].
    Preamble {
        /// Index of the next byte to pull.
        cursor: u8,
    },
    /// Cursor into the Manchester symbol of the current payload byte, already
    /// split into emission order.
    Data {
        /// Symbol bytes in the order they go out.
        symbol: [u8; 2],
        /// Index of the next byte to pull.
        cursor: u8,
    },
}

impl ByteSource {
    fn bytes(&self) -> (&[u8], u8) {
        match self {
            Self::Training { cursor } => (&TRAINING_SEQUENCE[..], *cursor),
            Self::Preamble { cursor } => (&PREAMBLE[..], *cursor),
            Self::Data { symbol, cursor } => (&symbol[..], *cursor),
        }
    }

    /// Pulls the next byte, or `None` once the source is exhausted.
    pub fn next_byte(&mut self) -> Option<u8> {
        let (bytes, cursor) = self.bytes();
        let byte = *bytes.get(cursor as usize)?;
        match self {
            Self::Training { cursor } | Self::Preamble { cursor } | Self::Data { cursor, .. } => {
                *cursor += 1
            }
        }
        Some(byte)
    }

    /// Bytes left before the source is exhausted.
    pub fn remaining(&self) -> usize {
        let (bytes, cursor) = self.bytes();
        bytes.len().saturating_sub(cursor as usize)
    }

    /// The phase this source belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Training { .. } => Phase::Training,
            Self::Preamble { .. } => Phase::Preamble,
            Self::Data { .. } => Phase::Data,
        }
    }
}

/// The session ran into a state it can never reach in correct operation.
///
/// The driver answers this with an immediate shutdown.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct SessionFault;

/// State of one transmission.
///
/// Created idle, seeded by the driver's `transmit()` from caller context
/// once the payload length has been checked and before the timer is armed,
/// then mutated only by [`TxSession::advance`] from the tick handler until
/// [`TxSession::finish`] marks it complete.
///
/// Only the driver can start a session:
///
/// ```compile_fail
/// let _ = micrf114::session::TxSession::begin(1);
/// ```
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TxSession {
    source: ByteSource,
    /// Index of the next payload byte to encode.
    payload_index: u8,
    /// Payload bytes not yet encoded.
    payload_remaining: u8,
    /// Byte being shifted out; its already-emitted bits are shifted off the top.
    current_byte: u8,
    /// Bits of `current_byte` emitted so far (0..=7).
    bit_index: u8,
    /// Level to drive on the next tick.
    next_bit: bool,
    /// The last bit has been driven; the next tick shuts down.
    stop_requested: bool,
    complete: bool,
}

impl Default for TxSession {
    fn default() -> Self {
        Self::idle()
    }
}

impl TxSession {
    /// A completed session with nothing to send.
    pub const fn idle() -> Self {
        Self {
            source: ByteSource::Training { cursor: 0 },
            payload_index: 0,
            payload_remaining: 0,
            current_byte: 0,
            bit_index: 0,
            next_bit: false,
            stop_requested: false,
            complete: true,
        }
    }

    /// Seeds a session for a payload of `payload_len` bytes.
    ///
    /// The first training bit is already computed, so the first tick only
    /// has to drive it. `payload_len` must be at least `MIN_PAYLOAD_LEN`; a
    /// zero-length session faults once the preamble is out.
    pub(crate) fn begin(payload_len: u8) -> Self {
        let mut source = ByteSource::Training { cursor: 0 };
        let first = source.next_byte().unwrap_or(0);
        let mut session = Self {
            source,
            payload_index: 0,
            payload_remaining: payload_len,
            current_byte: first,
            bit_index: 0,
            next_bit: false,
            stop_requested: false,
            complete: false,
        };
        session.latch_next_bit();
        session
    }

    /// Level to drive on the next tick.
    pub fn next_bit(&self) -> bool {
        self.next_bit
    }

    /// Whether the next tick performs shutdown instead of driving a bit.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Whether the session has shut down (or never started).
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Current phase of the frame.
    pub fn phase(&self) -> Phase {
        self.source.phase()
    }

    /// Bytes left in the active source.
    pub fn remaining(&self) -> usize {
        self.source.remaining()
    }

    /// Payload bytes not yet encoded.
    pub fn payload_remaining(&self) -> u8 {
        self.payload_remaining
    }

    /// Bits of the current byte already emitted.
    pub fn bit_index(&self) -> u8 {
        self.bit_index
    }

    /// Asks the next tick to shut down.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Marks the session complete.
    pub fn finish(&mut self) {
        self.stop_requested = false;
        self.complete = true;
    }

    /// Bookkeeping after the bit in [`next_bit`](Self::next_bit) has been
    /// driven: steps the bit counter, loads the next byte when the current one
    /// is spent and precomputes the level for the following tick.
    ///
    /// # Errors
    /// [`SessionFault`] if the data phase runs out of payload bytes while its
    /// count says more remain.
    pub fn advance(&mut self, payload: &[u8], order: SymbolOrder) -> Result<(), SessionFault> {
        self.bit_index += 1;
        if self.bit_index >= BITS_IN_BYTE {
            self.bit_index = 0;
            self.load_next_byte(payload, order)?;
        }
        if !self.stop_requested {
            self.latch_next_bit();
        }
        Ok(())
    }

    fn load_next_byte(&mut self, payload: &[u8], order: SymbolOrder) -> Result<(), SessionFault> {
        if let Some(byte) = self.source.next_byte() {
            self.current_byte = byte;
            return Ok(());
        }
        match self.source {
            ByteSource::Training { .. } => {
                self.source = ByteSource::Preamble { cursor: 0 };
                self.current_byte = self.source.next_byte().ok_or(SessionFault)?;
            }
            ByteSource::Preamble { .. } | ByteSource::Data { .. } => {
                if self.payload_remaining == 0 {
                    if self.source.phase() == Phase::Preamble {
                        return Err(SessionFault);
                    }
                    self.stop_requested = true;
                    return Ok(());
                }
                let byte = *payload
                    .get(self.payload_index as usize)
                    .ok_or(SessionFault)?;
                self.payload_index += 1;
                self.payload_remaining -= 1;
                self.source = ByteSource::Data {
                    symbol: symbol_bytes(manchester_encode(byte), order),
                    cursor: 0,
                };
                self.current_byte = self.source.next_byte().ok_or(SessionFault)?;
            }
        }
        Ok(())
    }

    fn latch_next_bit(&mut self) {
        self.next_bit = self.current_byte & 0x80 != 0;
        self.current_byte <<= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn run(payload: &[u8], order: SymbolOrder) -> (Vec<bool>, usize) {
        let mut session = TxSession::begin(payload.len() as u8);
        let mut bits = Vec::new();
        let mut ticks = 0;
        while !session.stop_requested() {
            bits.push(session.next_bit());
            session.advance(payload, order).unwrap();
            ticks += 1;
        }
        (bits, ticks)
    }

    fn byte_bits(byte: u8) -> impl Iterator<Item = bool> {
        (0..8).rev().map(move |i| byte & (1 << i) != 0)
    }

    #[test]
    fn test_idle_session_is_complete() {
        let session = TxSession::idle();
        assert!(session.is_complete());
        assert!(!session.stop_requested());
        assert_eq!(session, TxSession::default());
    }

    #[test]
    fn test_begin_primes_first_training_bit() {
        let session = TxSession::begin(1);
        assert!(!session.is_complete());
        assert_eq!(session.phase(), Phase::Training);
        assert!(session.next_bit()); // 0xAA starts with a 1
        assert_eq!(session.remaining(), TRAINING_SEQUENCE.len() - 1);
        assert_eq!(session.payload_remaining(), 1);
        assert_eq!(session.bit_index(), 0);
    }

    #[test]
    fn test_phase_transitions() {
        let payload = [0x42];
        let mut session = TxSession::begin(1);
        for _ in 0..32 {
            assert_eq!(session.phase(), Phase::Training);
            session.advance(&payload, SymbolOrder::HighByteFirst).unwrap();
        }
        for _ in 0..8 {
            assert_eq!(session.phase(), Phase::Preamble);
            session.advance(&payload, SymbolOrder::HighByteFirst).unwrap();
        }
        assert_eq!(session.phase(), Phase::Data);
        assert_eq!(session.payload_remaining(), 0);
        for _ in 0..15 {
            session.advance(&payload, SymbolOrder::HighByteFirst).unwrap();
            assert!(!session.stop_requested());
        }
        session.advance(&payload, SymbolOrder::HighByteFirst).unwrap();
        assert!(session.stop_requested());
    }

    #[test]
    fn test_emits_training_preamble_then_symbols() {
        let payload = [0xA5, 0x00, 0xFF];
        let (bits, ticks) = run(&payload, SymbolOrder::HighByteFirst);
        assert_eq!(ticks, crate::consts::frame_line_bits(payload.len()));

        let mut expected = Vec::new();
        for &b in TRAINING_SEQUENCE.iter().chain(PREAMBLE.iter()) {
            expected.extend(byte_bits(b));
        }
        for &b in &payload {
            let [hi, lo] = manchester_encode(b).to_be_bytes();
            expected.extend(byte_bits(hi));
            expected.extend(byte_bits(lo));
        }
        assert_eq!(bits, expected);
    }

    #[test]
    fn test_low_byte_first_order() {
        let payload = [0xA5];
        let (bits, _) = run(&payload, SymbolOrder::LowByteFirst);
        let data: Vec<bool> = bits[40..].to_vec();
        let expected: Vec<bool> = byte_bits(0x99).chain(byte_bits(0x66)).collect();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_missing_payload_byte_faults() {
        // Count claims two bytes, slice holds one.
        let payload = [0x01];
        let mut session = TxSession::begin(2);
        let mut result = Ok(());
        for _ in 0..(40 + 16) {
            result = session.advance(&payload, SymbolOrder::HighByteFirst);
            if result.is_err() {
                break;
            }
        }
        assert_eq!(result, Err(SessionFault));
    }

    #[test]
    fn test_empty_payload_faults_after_preamble() {
        let mut session = TxSession::begin(0);
        let mut result = Ok(());
        for _ in 0..40 {
            result = session.advance(&[], SymbolOrder::HighByteFirst);
        }
        assert_eq!(result, Err(SessionFault));
    }

    #[test]
    fn test_finish_clears_stop() {
        let mut session = TxSession::begin(1);
        session.request_stop();
        assert!(session.stop_requested());
        session.finish();
        assert!(session.is_complete());
        assert!(!session.stop_requested());
    }
}
