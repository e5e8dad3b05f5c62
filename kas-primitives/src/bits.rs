#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
// JUSTIFICATION: bit/byte offset arithmetic bounded by the buffer length.
#![allow(clippy::arithmetic_side_effects)]

//! Bit strings
//!
//! SP 800-56A/C define FixedInfo, counters and derived keying material as bit
//! strings, not byte strings. `BitString` keeps an exact bit length; bits are
//! stored MSB-first and the unused low bits of the final byte are always zero.

use kas_prelude::error::{KasError, Result};
use std::fmt;

/// A big-endian, MSB-first string of bits.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitString {
    /// The empty bit string
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole bytes, `8 * bytes.len()` bits.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { bytes: bytes.to_vec(), bit_len: bytes.len() * 8 }
    }

    /// The leftmost `bit_len` bits of `bytes`.
    ///
    /// # Errors
    /// Returns an error if `bytes` holds fewer than `bit_len` bits.
    pub fn from_bits(bytes: &[u8], bit_len: usize) -> Result<Self> {
        let needed = bit_len.div_ceil(8);
        let src = bytes.get(..needed).ok_or_else(|| {
            KasError::InvalidEncoding(format!(
                "{} bits requested from a {}-byte buffer",
                bit_len,
                bytes.len()
            ))
        })?;
        let mut out = Self { bytes: src.to_vec(), bit_len };
        out.clear_padding();
        Ok(out)
    }

    /// Parse a hex string as whole bytes.
    ///
    /// # Errors
    /// Returns an error if `hex_str` is not valid hex.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Encode `value` as an unsigned big-endian integer of exactly `width` bits.
    ///
    /// # Errors
    /// Returns an error if `width` exceeds 32 or `value` does not fit.
    pub fn from_u32(value: u32, width: usize) -> Result<Self> {
        if width > 32 || (width < 32 && u64::from(value) >= (1u64 << width)) {
            return Err(KasError::config(format!("{} does not fit in {} bits", value, width)));
        }
        let mut out = Self::new();
        for i in (0..width).rev() {
            out.push_bit((value >> i) & 1 == 1);
        }
        Ok(out)
    }

    /// Length in bits
    #[must_use]
    pub fn len(&self) -> usize {
        self.bit_len
    }

    /// Whether the string has no bits
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Whether the length is a whole number of bytes
    #[must_use]
    pub fn is_byte_aligned(&self) -> bool {
        self.bit_len % 8 == 0
    }

    /// Backing bytes; the final byte is zero-padded on the right.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into the backing bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Bit at `index`, counting from the most significant bit.
    #[must_use]
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.bit_len {
            return None;
        }
        self.bytes.get(index / 8).map(|b| (b >> (7 - index % 8)) & 1 == 1)
    }

    /// Append a single bit.
    pub fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let mask = 0x80u8 >> (self.bit_len % 8);
            if let Some(last) = self.bytes.last_mut() {
                *last |= mask;
            }
        }
        self.bit_len += 1;
    }

    /// Append `other` to the right of `self`.
    pub fn append(&mut self, other: &BitString) {
        if self.is_byte_aligned() {
            self.bytes.extend_from_slice(&other.bytes);
            self.bit_len += other.bit_len;
            return;
        }
        for i in 0..other.bit_len {
            self.push_bit(other.bit(i).unwrap_or(false));
        }
    }

    /// `self || other`
    #[must_use]
    pub fn concat(&self, other: &BitString) -> BitString {
        let mut out = self.clone();
        out.append(other);
        out
    }

    /// The leftmost `n` bits.
    ///
    /// # Errors
    /// Returns an error if `n` exceeds the length.
    pub fn msb(&self, n: usize) -> Result<BitString> {
        if n > self.bit_len {
            return Err(KasError::computation(format!(
                "cannot take {} bits from a {}-bit string",
                n, self.bit_len
            )));
        }
        Self::from_bits(&self.bytes, n)
    }

    /// `len` bits starting at bit offset `start`.
    ///
    /// # Errors
    /// Returns an error if the range exceeds the string.
    pub fn substring(&self, start: usize, len: usize) -> Result<BitString> {
        let end = start.checked_add(len).filter(|end| *end <= self.bit_len).ok_or_else(|| {
            KasError::computation(format!(
                "substring {}..+{} outside {}-bit string",
                start, len, self.bit_len
            ))
        })?;
        if start % 8 == 0 {
            let bytes = self.bytes.get(start / 8..).unwrap_or(&[]);
            return Self::from_bits(bytes, len);
        }
        let mut out = Self::new();
        for i in start..end {
            out.push_bit(self.bit(i).unwrap_or(false));
        }
        Ok(out)
    }

    /// Lowercase hex of the backing bytes
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    fn clear_padding(&mut self) {
        let rem = self.bit_len % 8;
        if rem != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xFFu8 << (8 - rem);
            }
        }
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({} bits, {})", self.bit_len, self.to_hex())
    }
}

impl From<&[u8]> for BitString {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}
