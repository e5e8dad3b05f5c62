#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Finite-Field Cryptography (FFC) groups
//!
//! Domain parameters `(p, q, g)` for the discrete-log schemes of SP 800-56A
//! and key pairs in the order-`q` subgroup. Primality of `p` and `q` is the
//! caller's responsibility; the remaining structural relations are checked
//! when the domain is constructed.

use crate::security::{SecretUint, SecureBytes};
use kas_prelude::error::{KasError, Result};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Validated FFC domain parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfcDomainParameters {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

impl FfcDomainParameters {
    /// Build a domain, checking `p > 3`, `q > 1`, `q | p-1`, `1 < g < p` and
    /// `g^q mod p = 1`.
    ///
    /// # Errors
    /// Returns a configuration error naming the first violated relation.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Self> {
        let three = BigUint::from(3u8);
        if p <= three {
            return Err(KasError::config("FFC modulus p must exceed 3"));
        }
        if q <= BigUint::one() {
            return Err(KasError::config("FFC subgroup order q must exceed 1"));
        }
        let p_minus_1 = &p - 1u8;
        if !(&p_minus_1 % &q).is_zero() {
            return Err(KasError::config("FFC subgroup order q must divide p-1"));
        }
        if g <= BigUint::one() || g >= p {
            return Err(KasError::config("FFC generator g must satisfy 1 < g < p"));
        }
        if !g.modpow(&q, &p).is_one() {
            return Err(KasError::config("FFC generator g must have order q"));
        }
        Ok(Self { p, q, g })
    }

    /// Build a domain from big-endian hex strings.
    ///
    /// # Errors
    /// Returns an error for malformed hex or an invalid domain.
    pub fn from_hex(p: &str, q: &str, g: &str) -> Result<Self> {
        Self::new(parse_hex(p)?, parse_hex(q)?, parse_hex(g)?)
    }

    /// Prime modulus
    #[must_use]
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Subgroup order
    #[must_use]
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// Subgroup generator
    #[must_use]
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Byte length of a field element, `ceil(bitlen(p) / 8)`.
    #[must_use]
    pub fn field_len(&self) -> usize {
        (self.p.bits() as usize).div_ceil(8)
    }

    /// Encode a field element big-endian, left-padded to [`Self::field_len`].
    #[must_use]
    pub fn encode_element(&self, value: &BigUint) -> Vec<u8> {
        encode_fixed(value, self.field_len())
    }

    /// `g^x mod p`
    #[must_use]
    pub fn public_from_private(&self, x: &BigUint) -> BigUint {
        self.g.modpow(x, &self.p)
    }
}

/// An FFC key pair; the private exponent is zeroized on drop.
#[derive(Clone)]
pub struct FfcKeyPair {
    private: SecureBytes,
    public: BigUint,
}

impl FfcKeyPair {
    /// Derive the key pair for private exponent `x`, `1 <= x <= q-1`.
    ///
    /// # Errors
    /// Returns a configuration error when `x` is outside the range.
    pub fn from_private(domain: &FfcDomainParameters, x: &BigUint) -> Result<Self> {
        if x.is_zero() || x >= domain.q() {
            return Err(KasError::config("FFC private key must be in [1, q-1]"));
        }
        Ok(Self {
            private: SecureBytes::new(x.to_bytes_be()),
            public: domain.public_from_private(x),
        })
    }

    /// Generate a key pair with a uniformly random exponent in `[1, q-1]`.
    ///
    /// # Errors
    /// Propagates [`FfcKeyPair::from_private`] failures.
    pub fn generate<R: RngCore + CryptoRng>(
        domain: &FfcDomainParameters,
        rng: &mut R,
    ) -> Result<Self> {
        let x = SecretUint::new(rng.gen_biguint_range(&BigUint::one(), domain.q()));
        Self::from_private(domain, x.expose())
    }

    /// Private exponent as big-endian bytes
    #[must_use]
    pub fn private_bytes(&self) -> &SecureBytes {
        &self.private
    }

    /// Public value `y = g^x mod p`
    #[must_use]
    pub fn public(&self) -> &BigUint {
        &self.public
    }
}

impl std::fmt::Debug for FfcKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfcKeyPair")
            .field("private", &self.private)
            .field("public", &self.public.to_str_radix(16))
            .finish()
    }
}

/// Parse big-endian hex into an integer.
///
/// # Errors
/// Returns `InvalidEncoding` for malformed hex.
pub fn parse_hex(s: &str) -> Result<BigUint> {
    let trimmed: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    BigUint::parse_bytes(trimmed.as_bytes(), 16)
        .ok_or_else(|| KasError::InvalidEncoding(format!("not a hex integer: {}", s)))
}

/// Big-endian encoding left-padded with zeros to `len` bytes.
///
/// A value wider than `len` is returned unpadded.
#[must_use]
pub fn encode_fixed(value: &BigUint, len: usize) -> Vec<u8> {
    let mut raw = value.to_bytes_be();
    if raw.len() >= len {
        if value.is_zero() && len > 0 {
            raw = vec![0u8; len];
        }
        return raw;
    }
    let mut out = vec![0u8; len.saturating_sub(raw.len())];
    out.extend_from_slice(&raw);
    raw.zeroize();
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests use unwrap for simplicity
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn toy_domain() -> FfcDomainParameters {
        FfcDomainParameters::new(23u32.into(), 11u32.into(), 4u32.into()).unwrap()
    }

    #[test]
    fn test_toy_domain_accepted() {
        let domain = toy_domain();
        assert_eq!(domain.field_len(), 1);
    }

    #[test]
    fn test_domain_rejects_bad_relations() {
        // q does not divide p-1
        assert!(FfcDomainParameters::new(23u32.into(), 7u32.into(), 4u32.into()).is_err());
        // g = 5 generates the full group, order 22
        assert!(FfcDomainParameters::new(23u32.into(), 11u32.into(), 5u32.into()).is_err());
        // g out of range
        assert!(FfcDomainParameters::new(23u32.into(), 11u32.into(), 1u32.into()).is_err());
        assert!(FfcDomainParameters::new(3u32.into(), 2u32.into(), 2u32.into()).is_err());
    }

    #[test]
    fn test_key_pair_from_private() {
        let domain = toy_domain();
        let pair = FfcKeyPair::from_private(&domain, &3u32.into()).unwrap();
        // 4^3 mod 23 = 64 mod 23 = 18
        assert_eq!(pair.public(), &BigUint::from(18u32));
        assert!(FfcKeyPair::from_private(&domain, &0u32.into()).is_err());
        assert!(FfcKeyPair::from_private(&domain, &11u32.into()).is_err());
    }

    #[test]
    fn test_generated_keys_in_subgroup() {
        let domain = toy_domain();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..20 {
            let pair = FfcKeyPair::generate(&domain, &mut rng).unwrap();
            assert!(pair.public().modpow(domain.q(), domain.p()).is_one());
        }
    }

    #[test]
    fn test_encode_fixed_pads_left() {
        assert_eq!(encode_fixed(&BigUint::from(0x0102u32), 4), vec![0, 0, 1, 2]);
        assert_eq!(encode_fixed(&BigUint::zero(), 2), vec![0, 0]);
    }

    #[test]
    fn test_debug_redacts_private() {
        let domain = toy_domain();
        let pair = FfcKeyPair::from_private(&domain, &3u32.into()).unwrap();
        assert!(format!("{:?}", pair).contains("REDACTED"));
    }
}
