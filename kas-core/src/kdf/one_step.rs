//! One-step KDF (SP 800-56C §4.1)
//!
//! `K(i) = H(counter_i || Z || FixedInfo)` with a 32-bit big-endian counter
//! starting at 1, concatenated until `L` bits are available. The auxiliary
//! function `H` is a hash, a salted HMAC, or a salted KMAC.

use super::block_count;
use kas_prelude::error::{KasError, Result};
use kas_primitives::mac::{hmac, kmac, KmacVariant};
use kas_primitives::HashFunction;

/// KMAC customization string for derivation
const KDF_CUSTOMIZATION: &[u8] = b"KDF";

/// Auxiliary function `H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneStepAuxFunction {
    /// Plain hash
    Hash(HashFunction),
    /// HMAC keyed with the salt
    Hmac(HashFunction),
    /// KMAC128 keyed with the salt
    Kmac128,
    /// KMAC256 keyed with the salt
    Kmac256,
}

impl OneStepAuxFunction {
    /// Bits produced per invocation of `H`.
    #[must_use]
    pub const fn output_bits(self) -> usize {
        match self {
            OneStepAuxFunction::Hash(hash) | OneStepAuxFunction::Hmac(hash) => hash.output_bits(),
            OneStepAuxFunction::Kmac128 => 256,
            OneStepAuxFunction::Kmac256 => 512,
        }
    }

    /// Length of the all-zero salt used when none is supplied; `None` for a
    /// plain hash, which takes no salt. HMAC uses the hash block length,
    /// KMAC the sponge rate less four bytes (164 and 132 bytes).
    #[must_use]
    pub const fn default_salt_len(self) -> Option<usize> {
        match self {
            OneStepAuxFunction::Hash(_) => None,
            OneStepAuxFunction::Hmac(hash) => Some(hash.block_len()),
            OneStepAuxFunction::Kmac128 => Some(KmacVariant::Kmac128.rate() - 4),
            OneStepAuxFunction::Kmac256 => Some(KmacVariant::Kmac256.rate() - 4),
        }
    }
}

/// One-step parameters: the auxiliary function and an optional salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneStepParameters {
    /// Auxiliary function
    pub aux: OneStepAuxFunction,
    /// Salt for HMAC/KMAC; zeros of the default length when absent
    pub salt: Option<Vec<u8>>,
}

impl OneStepParameters {
    /// Parameters with the default salt.
    #[must_use]
    pub fn new(aux: OneStepAuxFunction) -> Self {
        Self { aux, salt: None }
    }

    /// Use an explicit salt.
    #[must_use]
    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = Some(salt.to_vec());
        self
    }

    pub(crate) fn validate(&self, l: usize, with_counter: bool) -> Result<()> {
        if self.aux.default_salt_len().is_none() && self.salt.is_some() {
            return Err(KasError::config("a hash-based one-step KDF takes no salt"));
        }
        if matches!(self.salt.as_deref(), Some([])) {
            return Err(KasError::config("one-step KDF salt must not be empty"));
        }
        let h = self.aux.output_bits();
        if with_counter {
            block_count(l, h, u64::from(u32::MAX), "one-step KDF")?;
        } else if l > h {
            return Err(KasError::config(format!(
                "one-step KDF without a counter is limited to {} bits, {} requested",
                h, l
            )));
        }
        Ok(())
    }

    fn salt(&self) -> Vec<u8> {
        match (&self.salt, self.aux.default_salt_len()) {
            (Some(salt), _) => salt.clone(),
            (None, Some(len)) => vec![0u8; len],
            (None, None) => Vec::new(),
        }
    }

    fn invoke(&self, salt: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>> {
        match self.aux {
            OneStepAuxFunction::Hash(hash) => Ok(hash.digest_parts(parts)),
            OneStepAuxFunction::Hmac(hash) => hmac(hash, salt, parts),
            OneStepAuxFunction::Kmac128 => {
                kmac(KmacVariant::Kmac128, salt, &parts.concat(), 256, KDF_CUSTOMIZATION)
            }
            OneStepAuxFunction::Kmac256 => {
                kmac(KmacVariant::Kmac256, salt, &parts.concat(), 512, KDF_CUSTOMIZATION)
            }
        }
    }

    /// Run the KDF. Callers validate first.
    pub(crate) fn derive(
        &self,
        z: &[u8],
        fixed_info: &[u8],
        l: usize,
        with_counter: bool,
    ) -> Result<Vec<u8>> {
        let salt = self.salt();
        if !with_counter {
            return self.invoke(&salt, &[z, fixed_info]);
        }
        let reps = block_count(l, self.aux.output_bits(), u64::from(u32::MAX), "one-step KDF")?;
        let mut out = Vec::with_capacity(reps as usize * self.aux.output_bits() / 8);
        for counter in 1..=reps {
            out.extend(self.invoke(&salt, &[&counter.to_be_bytes(), z, fixed_info])?);
        }
        Ok(out)
    }
}
