//! HKDF (RFC 5869)
//!
//! `PRK = HMAC(salt, Z)`, then `T(i) = HMAC(PRK, T(i-1) || FixedInfo || i)`
//! with a one-byte counter, so at most 255 blocks.

use super::block_count;
use kas_prelude::error::{KasError, Result};
use kas_primitives::mac::hmac;
use kas_primitives::HashFunction;
use zeroize::Zeroizing;

const MAX_BLOCKS: u64 = 255;

/// HKDF parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HkdfParameters {
    /// Underlying hash
    pub hash: HashFunction,
    /// Extraction salt; `HashLen` zero bytes when absent
    pub salt: Option<Vec<u8>>,
}

impl HkdfParameters {
    /// Parameters with the default salt.
    #[must_use]
    pub fn new(hash: HashFunction) -> Self {
        Self { hash, salt: None }
    }

    /// Use an explicit salt.
    #[must_use]
    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = Some(salt.to_vec());
        self
    }

    pub(crate) fn validate(&self, l: usize) -> Result<()> {
        block_count(l, self.hash.output_bits(), MAX_BLOCKS, "HKDF").map(|_| ())
    }

    /// HKDF-Extract
    ///
    /// # Errors
    /// Propagates HMAC failures.
    pub fn extract(&self, ikm: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let default_salt;
        let salt = match &self.salt {
            Some(salt) => salt.as_slice(),
            None => {
                default_salt = vec![0u8; self.hash.output_len()];
                default_salt.as_slice()
            }
        };
        Ok(Zeroizing::new(hmac(self.hash, salt, &[ikm])?))
    }

    /// HKDF-Expand to `l` bits (rounded up to whole bytes).
    ///
    /// # Errors
    /// Returns a configuration error when `l` needs more than 255 blocks.
    pub fn expand(&self, prk: &[u8], info: &[u8], l: usize) -> Result<Vec<u8>> {
        let n = block_count(l, self.hash.output_bits(), MAX_BLOCKS, "HKDF")?;
        let mut out = Vec::new();
        let mut previous: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::new());
        for i in 1..=n {
            let counter = u8::try_from(i).map_err(|_| KasError::config("HKDF counter overflow"))?;
            *previous = hmac(self.hash, prk, &[&previous, info, &[counter]])?;
            out.extend_from_slice(&previous);
        }
        Ok(out)
    }

    pub(crate) fn derive(&self, z: &[u8], fixed_info: &[u8], l: usize) -> Result<Vec<u8>> {
        let prk = self.extract(z)?;
        self.expand(&prk, fixed_info, l)
    }
}
