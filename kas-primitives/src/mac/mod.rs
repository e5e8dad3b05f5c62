#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Message Authentication Codes
//!
//! HMAC (FIPS 198-1), AES-CMAC (SP 800-38B), KMAC (SP 800-185) and AES-CCM
//! (SP 800-38C) behind one [`MacAlgorithm`] tag. The table in
//! [`MacAlgorithm::spec`] fixes each algorithm's full output size and the key
//! sizes it accepts; key confirmation and the MAC-based KDFs both consult it.

pub mod ccm;
pub mod cmac;
pub mod hmac;
pub mod kmac;

pub use ccm::{ccm_encrypt, CcmOutput};
pub use cmac::cmac;
pub use hmac::{hmac, verify_hmac};
pub use kmac::{kmac, KmacVariant};

use crate::hash::HashFunction;
use kas_prelude::error::{KasError, Result};

/// AES key size for CMAC and CCM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AesKeySize {
    /// 128-bit key
    Aes128,
    /// 192-bit key
    Aes192,
    /// 256-bit key
    Aes256,
}

impl AesKeySize {
    /// Key length in bits
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            AesKeySize::Aes128 => 128,
            AesKeySize::Aes192 => 192,
            AesKeySize::Aes256 => 256,
        }
    }

    /// The key size for a key of `bits` bits, if approved.
    #[must_use]
    pub const fn from_bits(bits: usize) -> Option<Self> {
        match bits {
            128 => Some(AesKeySize::Aes128),
            192 => Some(AesKeySize::Aes192),
            256 => Some(AesKeySize::Aes256),
            _ => None,
        }
    }
}

/// MAC algorithms available to key confirmation and MAC-based derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgorithm {
    /// HMAC over the given hash
    Hmac(HashFunction),
    /// AES-CMAC
    Cmac(AesKeySize),
    /// KMAC128
    Kmac128,
    /// KMAC256
    Kmac256,
    /// AES-CCM, tag only
    AesCcm(AesKeySize),
}

/// Output and key-size limits for one MAC algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacSpec {
    /// Largest tag the algorithm produces, in bits
    pub output_bits: usize,
    /// Smallest accepted key, in bits
    pub min_key_bits: usize,
    /// Largest accepted key, in bits
    pub max_key_bits: usize,
}

/// Per-call extras for KMAC and CCM.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacOptions<'a> {
    /// KMAC customization string `S`
    pub customization: &'a [u8],
    /// CCM nonce; required for [`MacAlgorithm::AesCcm`]
    pub nonce: Option<&'a [u8]>,
}

/// KMAC output ceiling used for key confirmation tags
const KMAC_MAX_TAG_BITS: usize = 512;

impl MacAlgorithm {
    /// The specification table for this algorithm.
    #[must_use]
    pub const fn spec(self) -> MacSpec {
        match self {
            MacAlgorithm::Hmac(hash) => {
                MacSpec { output_bits: hash.output_bits(), min_key_bits: 112, max_key_bits: 512 }
            }
            MacAlgorithm::Cmac(size) | MacAlgorithm::AesCcm(size) => {
                MacSpec { output_bits: 128, min_key_bits: size.bits(), max_key_bits: size.bits() }
            }
            MacAlgorithm::Kmac128 | MacAlgorithm::Kmac256 => {
                MacSpec { output_bits: KMAC_MAX_TAG_BITS, min_key_bits: 112, max_key_bits: 512 }
            }
        }
    }

    /// Check a key length against [`MacAlgorithm::spec`].
    ///
    /// # Errors
    /// Returns `InvalidKeyLength` when the key is outside the permitted range.
    pub fn validate_key_bits(self, key_bits: usize) -> Result<()> {
        let spec = self.spec();
        if key_bits < spec.min_key_bits || key_bits > spec.max_key_bits {
            let expected =
                if key_bits < spec.min_key_bits { spec.min_key_bits } else { spec.max_key_bits };
            return Err(KasError::InvalidKeyLength { expected, actual: key_bits });
        }
        Ok(())
    }

    /// Compute a `tag_bits`-bit tag with default options.
    ///
    /// # Errors
    /// See [`MacAlgorithm::compute_with`].
    pub fn compute(self, key: &[u8], data: &[u8], tag_bits: usize) -> Result<Vec<u8>> {
        self.compute_with(key, data, tag_bits, MacOptions::default())
    }

    /// Compute a `tag_bits`-bit tag over `data`.
    ///
    /// HMAC and CMAC tags are the leftmost `tag_bits` of the full output;
    /// KMAC binds `tag_bits` into its input; CCM encrypts an empty payload with
    /// `data` as associated data.
    ///
    /// # Errors
    /// Returns a configuration error when `tag_bits` is zero or exceeds the
    /// algorithm's output, when a CCM nonce is missing, or when an AES key has
    /// the wrong length.
    pub fn compute_with(
        self,
        key: &[u8],
        data: &[u8],
        tag_bits: usize,
        options: MacOptions<'_>,
    ) -> Result<Vec<u8>> {
        let spec = self.spec();
        if tag_bits == 0 || tag_bits > spec.output_bits {
            return Err(KasError::config(format!(
                "{:?} cannot produce a {}-bit tag (max {})",
                self, tag_bits, spec.output_bits
            )));
        }
        match self {
            MacAlgorithm::Hmac(hash) => truncate_bits(hmac(hash, key, &[data])?, tag_bits),
            MacAlgorithm::Cmac(size) => {
                check_aes_key(size, key)?;
                truncate_bits(cmac(key, &[data])?.to_vec(), tag_bits)
            }
            MacAlgorithm::Kmac128 => {
                kmac(KmacVariant::Kmac128, key, data, tag_bits, options.customization)
            }
            MacAlgorithm::Kmac256 => {
                kmac(KmacVariant::Kmac256, key, data, tag_bits, options.customization)
            }
            MacAlgorithm::AesCcm(size) => {
                check_aes_key(size, key)?;
                if tag_bits % 8 != 0 {
                    return Err(KasError::config("CCM tag length must be whole bytes"));
                }
                let nonce = options
                    .nonce
                    .ok_or_else(|| KasError::config("AES-CCM requires a nonce"))?;
                Ok(ccm_encrypt(key, nonce, data, &[], tag_bits / 8)?.tag)
            }
        }
    }
}

fn check_aes_key(size: AesKeySize, key: &[u8]) -> Result<()> {
    if key.len().saturating_mul(8) != size.bits() {
        return Err(KasError::InvalidKeyLength { expected: size.bits(), actual: key.len() * 8 });
    }
    Ok(())
}

/// Keep the leftmost `bits` bits of `bytes`, clearing any trailing bits.
///
/// # Errors
/// Returns a computation error when `bytes` is shorter than `bits`.
pub fn truncate_bits(mut bytes: Vec<u8>, bits: usize) -> Result<Vec<u8>> {
    let needed = bits.div_ceil(8);
    if needed > bytes.len() {
        return Err(KasError::computation(format!(
            "cannot truncate {} bytes to {} bits",
            bytes.len(),
            bits
        )));
    }
    bytes.truncate(needed);
    let rem = bits % 8;
    if rem != 0 {
        if let Some(last) = bytes.last_mut() {
            *last &= 0xFFu8 << (8 - rem);
        }
    }
    Ok(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests use unwrap for simplicity
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_spec_table() {
        assert_eq!(MacAlgorithm::Hmac(HashFunction::Sha2_384).spec().output_bits, 384);
        assert_eq!(MacAlgorithm::Cmac(AesKeySize::Aes192).spec().min_key_bits, 192);
        assert_eq!(MacAlgorithm::AesCcm(AesKeySize::Aes256).spec().output_bits, 128);
        assert_eq!(MacAlgorithm::Kmac256.spec().max_key_bits, 512);
    }

    #[test]
    fn test_validate_key_bits() {
        assert!(MacAlgorithm::Hmac(HashFunction::Sha2_256).validate_key_bits(112).is_ok());
        assert!(MacAlgorithm::Hmac(HashFunction::Sha2_256).validate_key_bits(104).is_err());
        assert!(MacAlgorithm::Cmac(AesKeySize::Aes128).validate_key_bits(256).is_err());
        assert!(MacAlgorithm::Kmac128.validate_key_bits(520).is_err());
    }

    #[test]
    fn test_hmac_tag_truncation() {
        let alg = MacAlgorithm::Hmac(HashFunction::Sha2_256);
        let full = alg.compute(b"key", b"data", 256).unwrap();
        let short = alg.compute(b"key", b"data", 64).unwrap();
        assert_eq!(&full[..8], short.as_slice());
        assert!(alg.compute(b"key", b"data", 264).is_err());
        assert!(alg.compute(b"key", b"data", 0).is_err());
    }

    #[test]
    fn test_cmac_checks_declared_key_size() {
        let alg = MacAlgorithm::Cmac(AesKeySize::Aes256);
        assert!(matches!(
            alg.compute(&[0u8; 16], b"data", 128),
            Err(KasError::InvalidKeyLength { expected: 256, actual: 128 })
        ));
    }

    #[test]
    fn test_ccm_requires_nonce() {
        let alg = MacAlgorithm::AesCcm(AesKeySize::Aes128);
        assert!(alg.compute(&[0u8; 16], b"data", 64).is_err());
        let nonce = hex!("10111213141516");
        let options = MacOptions { customization: b"", nonce: Some(&nonce) };
        assert_eq!(alg.compute_with(&[0u8; 16], b"data", 64, options).unwrap().len(), 8);
    }

    #[test]
    fn test_truncate_bits_masks() {
        assert_eq!(truncate_bits(vec![0xFF, 0xFF], 12).unwrap(), vec![0xFF, 0xF0]);
        assert!(truncate_bits(vec![0xFF], 9).is_err());
    }
}
