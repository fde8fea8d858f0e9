//! Manchester line coding for OOK payload bytes.
//!
//! Every payload bit becomes a pair of line bits so the carrier changes
//! state in the middle of each bit period:
//!
//! | Payload bit | Line bits | Transition |
//! |-------------|-----------|------------|
//! | `1`         | `01`      | rising     |
//! | `0`         | `10`      | falling    |
//!
//! The most significant payload bit lands in the most significant pair of
//! the 16-bit symbol.
//!
//! ## Functions
//!
//! - [`manchester_encode`]: byte to 16-bit symbol (used by the tick handler)
//! - [`manchester_decode`]: 16-bit symbol back to a byte, rejecting invalid pairs
//! - [`symbol_bytes`]: splits a symbol into the two bytes shifted out on air
//! - [`decode_line_bits`]: recovers payload bytes from a recorded line bit stream
//!
//! The decoding side exists to verify what the transmitter emits; this crate
//! does not demodulate a live receiver.

use crate::config::SymbolOrder;

/// Encodes one payload byte into its 16-bit Manchester symbol.
///
/// Total over all inputs and free of side effects, so it is safe to call
/// from interrupt context.
pub const fn manchester_encode(byte: u8) -> u16 {
    let mut data = byte;
    let mut encoded: u16 = 0;
    let mut i = 0;
    while i < 8 {
        encoded <<= 2;
        encoded |= if data & 0x80 != 0 { 0b01 } else { 0b10 };
        data <<= 1;
        i += 1;
    }
    encoded
}

/// Decodes a 16-bit Manchester symbol back into the original byte.
///
/// Returns `None` if any bit pair is `00` or `11`, which no encoder produces.
pub fn manchester_decode(symbol: u16) -> Option<u8> {
    let mut byte = 0u8;
    for pair in (0..8).rev() {
        byte <<= 1;
        match (symbol >> (pair * 2)) & 0b11 {
            0b01 => byte |= 1,
            0b10 => {}
            _ => return None,
        }
    }
    Some(byte)
}

/// Splits a symbol into the two bytes shifted out on air, in emission order.
pub fn symbol_bytes(symbol: u16, order: SymbolOrder) -> [u8; 2] {
    match order {
        SymbolOrder::HighByteFirst => symbol.to_be_bytes(),
        SymbolOrder::LowByteFirst => symbol.to_le_bytes(),
    }
}

/// Decodes a stream of Manchester line bits (MSB first, one `bool` per line
/// bit) into `output`.
///
/// # Returns
/// The number of bytes written, or `None` if the stream is not a whole number
/// of symbols, `output` is too short, or a symbol is invalid.
pub fn decode_line_bits(bits: &[bool], order: SymbolOrder, output: &mut [u8]) -> Option<usize> {
    if bits.len() % 16 != 0 {
        return None;
    }
    let mut written = 0;
    for chunk in bits.chunks(16) {
        let mut raw = [0u8; 2];
        for (i, &bit) in chunk.iter().enumerate() {
            raw[i / 8] = (raw[i / 8] << 1) | bit as u8;
        }
        let symbol = match order {
            SymbolOrder::HighByteFirst => u16::from_be_bytes(raw),
            SymbolOrder::LowByteFirst => u16::from_le_bytes(raw),
        };
        *output.get_mut(written)? = manchester_decode(symbol)?;
        written += 1;
    }
    Some(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(manchester_encode(0x00), 0b10_10_10_10_10_10_10_10);
        assert_eq!(manchester_encode(0xFF), 0b01_01_01_01_01_01_01_01);
        assert_eq!(manchester_encode(0xA5), 0b01_10_01_10_10_01_10_01);
    }

    #[test]
    fn test_every_pair_is_a_transition() {
        for byte in 0..=u8::MAX {
            let symbol = manchester_encode(byte);
            for pair in 0..8 {
                let bits = (symbol >> (pair * 2)) & 0b11;
                let expected = if byte & (1 << pair) != 0 { 0b01 } else { 0b10 };
                assert_eq!(bits, expected, "byte {byte:#04x} pair {pair}");
            }
            assert_eq!(manchester_decode(symbol), Some(byte));
        }
    }

    #[test]
    fn test_decode_rejects_invalid_pairs() {
        assert_eq!(manchester_decode(0x0000), None);
        assert_eq!(manchester_decode(0xFFFF), None);
        assert_eq!(manchester_decode(0b01_01_01_01_01_01_01_11), None);
    }

    #[test]
    fn test_symbol_bytes_order() {
        let symbol = manchester_encode(0xA5);
        assert_eq!(symbol_bytes(symbol, SymbolOrder::HighByteFirst), [0x66, 0x99]);
        assert_eq!(symbol_bytes(symbol, SymbolOrder::LowByteFirst), [0x99, 0x66]);
    }

    #[test]
    fn test_decode_line_bits() {
        // 0x0F -> 10 10 10 10 01 01 01 01
        let bits = [
            true, false, true, false, true, false, true, false, false, true, false, true, false,
            true, false, true,
        ];
        let mut out = [0u8; 1];
        assert_eq!(
            decode_line_bits(&bits, SymbolOrder::HighByteFirst, &mut out),
            Some(1)
        );
        assert_eq!(out, [0x0F]);
        assert_eq!(
            decode_line_bits(&bits[..15], SymbolOrder::HighByteFirst, &mut out),
            None
        );
        assert_eq!(
            decode_line_bits(&bits, SymbolOrder::HighByteFirst, &mut []),
            None
        );
    }
}
