#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Secret-holding buffers
//!
//! Private scalars, shared secrets (Z), derived keying material and MAC keys
//! live in [`SecureBytes`] so they are wiped on every exit path, including
//! early returns through `?`. Finite-field exponents and intermediate values
//! that must stay integers for `modpow` live in [`SecretUint`].

use num_bigint::BigUint;
use std::ops::Deref;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Secure memory wrapper that automatically zeroizes on drop
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes {
    inner: Vec<u8>,
}

impl SecureBytes {
    /// Take ownership of `data`.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { inner: data }
    }

    /// Copy a slice into a new buffer.
    #[must_use]
    pub fn from_slice(data: &[u8]) -> Self {
        Self { inner: data.to_vec() }
    }

    /// Length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Append a slice
    pub fn extend_from_slice(&mut self, other: &[u8]) {
        self.inner.extend_from_slice(other);
    }

    /// Borrow the contents
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    /// Hex rendering, for test reporting only.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.inner)
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureBytes([REDACTED; {} bytes])", self.len())
    }
}

impl PartialEq for SecureBytes {
    fn eq(&self, other: &Self) -> bool {
        secure_compare(&self.inner, &other.inner)
    }
}

impl Eq for SecureBytes {}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        SecureBytes::new(data)
    }
}

/// Secret arbitrary-precision integer whose limbs are overwritten on drop.
///
/// `BigUint::set_zero` only truncates the limb vector, so wiping goes
/// through `assign_from_slice`, which writes zeros over the existing limbs
/// before normalizing. Temporaries allocated inside `num-bigint` arithmetic
/// are outside its reach.
#[derive(Clone, Default)]
pub struct SecretUint {
    inner: BigUint,
}

impl SecretUint {
    /// Take ownership of `value`.
    #[must_use]
    pub fn new(value: BigUint) -> Self {
        Self { inner: value }
    }

    /// Parse a big-endian secret.
    #[must_use]
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self { inner: BigUint::from_bytes_be(bytes) }
    }

    /// Borrow the value for arithmetic.
    #[must_use]
    pub fn expose(&self) -> &BigUint {
        &self.inner
    }

    /// Big-endian encoding left-padded with zeros to `len` bytes.
    #[must_use]
    pub fn to_secure_bytes(&self, len: usize) -> SecureBytes {
        let raw = Zeroizing::new(self.inner.to_bytes_be());
        let pad = len.saturating_sub(raw.len());
        let mut out = SecureBytes::new(Vec::with_capacity(pad + raw.len()));
        out.extend_from_slice(&vec![0u8; pad]);
        out.extend_from_slice(&raw);
        out
    }
}

impl Zeroize for SecretUint {
    fn zeroize(&mut self) {
        let limbs = self.inner.iter_u32_digits().len();
        self.inner.assign_from_slice(&vec![0u32; limbs]);
    }
}

impl Drop for SecretUint {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SecretUint {}

impl From<BigUint> for SecretUint {
    fn from(value: BigUint) -> Self {
        SecretUint::new(value)
    }
}

impl std::fmt::Debug for SecretUint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretUint([REDACTED])")
    }
}

/// Constant-time comparison of two byte slices.
///
/// Slices of different length compare unequal; the length itself is not secret.
#[must_use]
pub fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;

    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_compare_equal() {
        assert!(secure_compare(b"hello world", b"hello world"));
    }

    #[test]
    fn test_secure_compare_different() {
        assert!(!secure_compare(b"hello world", b"hello xorld"));
    }

    #[test]
    fn test_secure_compare_different_lengths() {
        assert!(!secure_compare(b"hello", b"hello world"));
    }

    #[test]
    fn test_secure_compare_empty() {
        assert!(secure_compare(b"", b""));
    }

    #[test]
    fn test_debug_redacts_contents() {
        let secret = SecureBytes::from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let rendered = format!("{:?}", secret);
        assert_eq!(rendered, "SecureBytes([REDACTED; 4 bytes])");
        assert!(!rendered.contains("dead"));
    }

    #[test]
    fn test_secret_uint_zeroize_leaves_zero() {
        let mut secret = SecretUint::from_bytes_be(&[0xFF; 40]);
        assert_eq!(secret.expose().bits(), 320);
        secret.zeroize();
        assert!(secret.expose().bits() == 0);
    }

    #[test]
    fn test_secret_uint_encoding_padded() {
        let secret = SecretUint::new(BigUint::from(0x0102u32));
        assert_eq!(secret.to_secure_bytes(4).as_slice(), &[0, 0, 1, 2]);
        assert_eq!(SecretUint::default().to_secure_bytes(2).as_slice(), &[0, 0]);
        assert_eq!(format!("{:?}", secret), "SecretUint([REDACTED])");
    }

    #[test]
    fn test_zeroize_clears_buffer() {
        let mut secret = SecureBytes::from_slice(&[1, 2, 3, 4]);
        secret.zeroize();
        assert!(secret.is_empty());
    }
}
