//! Bit sequence helpers.
//!
//! A bit sequence is a `[u8]` whose elements are `0` or `1`, ordered in time.

/// Unpack a byte slice into individual bits (MSB first per byte).
pub fn to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Pack bits into bytes (MSB first). A trailing partial byte is zero-padded.
pub fn from_bits(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &b)| acc | ((b & 1) << (7 - i)))
        })
        .collect()
}

/// Number of 1-bits in the sequence.
pub fn count_ones(bits: &[u8]) -> usize {
    bits.iter().filter(|&&b| b == 1).count()
}

/// Parse a string of `'0'`/`'1'` characters, ignoring whitespace and `_`.
///
/// Returns `None` on any other character.
pub fn parse_bits(s: &str) -> Option<Vec<u8>> {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| match c {
            '0' => Some(0),
            '1' => Some(1),
            _ => None,
        })
        .collect()
}
