//! Packed bit sequences
//!
//! [`BitSequence`] is the single bit container used throughout the crate: it is
//! the value stored for every code in an encode table, the key of every decode
//! table entry, and the output of the stream encoder.
//!
//! Bits are packed into `u64` blocks and every bit past `len` is kept at zero,
//! so two sequences compare and hash equal exactly when they hold the same bits
//! in the same order.

use crate::error::{HuffError, Result};
use std::fmt;
use std::str::FromStr;

const BITS_PER_BLOCK: usize = 64;

/// A growable, hashable sequence of bits
///
/// # Examples
///
/// ```rust
/// use huffcode::BitSequence;
///
/// let mut bits = BitSequence::new();
/// bits.push(true);
/// bits.push(false);
///
/// assert_eq!(bits.get(0), Some(true));
/// assert_eq!(bits.len(), 2);
/// assert_eq!(bits.to_string(), "10");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitSequence {
    // `len` first so the derived ordering sorts shorter codes before longer ones
    len: usize,
    blocks: Vec<u64>,
}

impl BitSequence {
    /// Create a new empty bit sequence
    #[inline]
    pub fn new() -> Self {
        Self { len: 0, blocks: Vec::new() }
    }

    /// Create a bit sequence with room for `capacity` bits
    pub fn with_capacity(capacity: usize) -> Self {
        let block_capacity = (capacity + BITS_PER_BLOCK - 1) / BITS_PER_BLOCK;
        Self {
            len: 0,
            blocks: Vec::with_capacity(block_capacity),
        }
    }

    /// Get the number of bits
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the sequence holds no bits
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the bit at the specified position
    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }

        let block_index = index / BITS_PER_BLOCK;
        let bit_index = index % BITS_PER_BLOCK;

        Some((self.blocks[block_index] >> bit_index) & 1 == 1)
    }

    /// Append a bit
    pub fn push(&mut self, value: bool) {
        let block_index = self.len / BITS_PER_BLOCK;
        let bit_index = self.len % BITS_PER_BLOCK;

        if block_index == self.blocks.len() {
            self.blocks.push(0);
        }

        if value {
            self.blocks[block_index] |= 1u64 << bit_index;
        }

        self.len += 1;
    }

    /// Remove and return the last bit
    pub fn pop(&mut self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        let block_index = self.len / BITS_PER_BLOCK;
        let bit_index = self.len % BITS_PER_BLOCK;
        let value = (self.blocks[block_index] >> bit_index) & 1 == 1;

        self.blocks[block_index] &= !(1u64 << bit_index);
        if bit_index == 0 {
            self.blocks.pop();
        }

        Some(value)
    }

    /// Remove all bits, keeping the allocation
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.len = 0;
    }

    /// Append every bit of `other`
    pub fn extend_from(&mut self, other: &BitSequence) {
        if self.len % BITS_PER_BLOCK == 0 {
            // block aligned, so whole blocks can be copied
            self.blocks.extend_from_slice(&other.blocks);
            self.len += other.len;
            return;
        }
        self.extend(other.iter());
    }

    /// Check whether `prefix` is a (not necessarily strict) prefix of `self`
    pub fn starts_with(&self, prefix: &BitSequence) -> bool {
        if prefix.len > self.len {
            return false;
        }

        let full_blocks = prefix.len / BITS_PER_BLOCK;
        if self.blocks[..full_blocks] != prefix.blocks[..full_blocks] {
            return false;
        }

        let rem = prefix.len % BITS_PER_BLOCK;
        if rem == 0 {
            return true;
        }
        let mask = (1u64 << rem) - 1;
        self.blocks[full_blocks] & mask == prefix.blocks[full_blocks]
    }

    /// Iterate over the bits in order
    pub fn iter(&self) -> Iter<'_> {
        Iter { bits: self, pos: 0 }
    }

    /// Count the set bits
    pub fn count_ones(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Raw storage blocks, least significant bit first
    pub fn blocks(&self) -> &[u64] {
        &self.blocks
    }
}

/// Parse a textual `0`/`1` rendering into bits
///
/// ASCII whitespace is ignored so that line-wrapped output parses back
/// unchanged. Any other character is a [`HuffError::MalformedCode`].
pub fn parse_bits(text: &str) -> Result<BitSequence> {
    let mut bits = BitSequence::with_capacity(text.len());
    for (pos, ch) in text.char_indices() {
        match ch {
            '0' => bits.push(false),
            '1' => bits.push(true),
            c if c.is_ascii_whitespace() => {}
            c => {
                return Err(HuffError::malformed_code(format!(
                    "invalid bit character {:?} at offset {}",
                    c, pos
                )))
            }
        }
    }
    Ok(bits)
}

impl FromStr for BitSequence {
    type Err = HuffError;

    fn from_str(s: &str) -> Result<Self> {
        parse_bits(s)
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSequence({:?})", self.to_string())
    }
}

impl Extend<bool> for BitSequence {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = BitSequence::new();
        bits.extend(iter);
        bits
    }
}

impl<'a> IntoIterator for &'a BitSequence {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bits of a [`BitSequence`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    bits: &'a BitSequence,
    pos: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.pos)?;
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.len - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bits(text: &str) -> BitSequence {
        parse_bits(text).unwrap()
    }

    #[test]
    fn test_push_get_pop() {
        let mut bv = BitSequence::new();
        assert!(bv.is_empty());

        bv.push(true);
        bv.push(false);
        bv.push(true);
        assert_eq!(bv.len(), 3);
        assert_eq!(bv.get(0), Some(true));
        assert_eq!(bv.get(1), Some(false));
        assert_eq!(bv.get(3), None);

        assert_eq!(bv.pop(), Some(true));
        assert_eq!(bv.pop(), Some(false));
        assert_eq!(bv.pop(), Some(true));
        assert_eq!(bv.pop(), None);
    }

    #[test]
    fn test_equality_after_pop() {
        // popped bits must not leak into equality or hashing
        let mut a = bits("101");
        a.pop();
        assert_eq!(a, bits("10"));

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&bits("10")));
        assert!(!set.contains(&bits("100")));
    }

    #[test]
    fn test_length_distinguishes_codes() {
        assert_ne!(bits("0"), bits("00"));
        assert_ne!(bits(""), bits("0"));
    }

    #[test]
    fn test_block_boundary() {
        let mut bv = BitSequence::new();
        for i in 0..130 {
            bv.push(i % 3 == 0);
        }
        assert_eq!(bv.len(), 130);
        assert_eq!(bv.blocks().len(), 3);
        for i in 0..130 {
            assert_eq!(bv.get(i), Some(i % 3 == 0));
        }

        for _ in 0..66 {
            bv.pop();
        }
        assert_eq!(bv.len(), 64);
        assert_eq!(bv.blocks().len(), 1);
    }

    #[test]
    fn test_extend_from() {
        let mut a = bits("110");
        a.extend_from(&bits("01"));
        assert_eq!(a, bits("11001"));

        let mut aligned = BitSequence::new();
        aligned.extend_from(&bits("0111"));
        assert_eq!(aligned, bits("0111"));
    }

    #[test]
    fn test_starts_with() {
        let code = bits("10110");
        assert!(code.starts_with(&bits("")));
        assert!(code.starts_with(&bits("101")));
        assert!(code.starts_with(&code));
        assert!(!code.starts_with(&bits("11")));
        assert!(!code.starts_with(&bits("101100")));

        let long: BitSequence = (0..100).map(|i| i % 2 == 0).collect();
        let prefix: BitSequence = (0..70).map(|i| i % 2 == 0).collect();
        assert!(long.starts_with(&prefix));
    }

    #[test]
    fn test_display_and_parse() {
        let bv = bits("0010 11\n1");
        assert_eq!(bv.to_string(), "0010111");
        assert_eq!(bv.count_ones(), 4);
        assert_eq!("0010111".parse::<BitSequence>().unwrap(), bv);
        assert_eq!(format!("{:?}", bits("01")), "BitSequence(\"01\")");
    }

    #[test]
    fn test_parse_rejects_non_bits() {
        let err = parse_bits("01a1").unwrap_err();
        assert!(matches!(err, HuffError::MalformedCode { .. }));
        assert!("012".parse::<BitSequence>().is_err());
    }
}
