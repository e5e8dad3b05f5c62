//! Two-step KDF (SP 800-56C §5)
//!
//! Randomness extraction `K_DK = MAC(salt, Z)` followed by SP 800-108 key
//! expansion keyed with `K_DK`, with FixedInfo as the fixed input data. The
//! expansion runs in counter, feedback or double-pipeline mode; where the
//! counter goes and how wide it is are validated together.

use super::block_count;
use kas_prelude::error::{KasError, Result};
use kas_primitives::mac::{cmac, hmac, AesKeySize};
use kas_primitives::{BitString, HashFunction};
use zeroize::Zeroizing;

/// PRF used for both extraction and expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwoStepMac {
    /// HMAC over the given hash
    Hmac(HashFunction),
    /// AES-CMAC; the salt has the given key size, expansion uses AES-128
    Cmac(AesKeySize),
}

impl TwoStepMac {
    /// PRF output size `h` in bits
    #[must_use]
    pub const fn output_bits(self) -> usize {
        match self {
            TwoStepMac::Hmac(hash) => hash.output_bits(),
            TwoStepMac::Cmac(_) => 128,
        }
    }

    /// Length of the default all-zero salt.
    #[must_use]
    pub const fn salt_len(self) -> usize {
        match self {
            TwoStepMac::Hmac(hash) => hash.block_len(),
            TwoStepMac::Cmac(size) => size.bits() / 8,
        }
    }

    fn prf(self, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>> {
        match self {
            TwoStepMac::Hmac(hash) => hmac(hash, key, parts),
            TwoStepMac::Cmac(_) => Ok(cmac(key, parts)?.to_vec()),
        }
    }
}

/// SP 800-108 expansion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KdfMode {
    /// `K(i) = PRF(K_DK, [i] || FixedInfo)`
    Counter,
    /// `K(i) = PRF(K_DK, K(i-1) || [i] || FixedInfo)`, `K(0) = IV`
    Feedback,
    /// `A(i) = PRF(K_DK, A(i-1))`, `K(i) = PRF(K_DK, A(i) || [i] || FixedInfo)`
    DoublePipeline,
}

impl KdfMode {
    /// Every expansion mode
    pub const ALL: [KdfMode; 3] = [KdfMode::Counter, KdfMode::Feedback, KdfMode::DoublePipeline];
}

/// Where the counter is placed in the PRF input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterLocation {
    /// No counter
    None,
    /// Between the iteration variable and the fixed data
    BeforeFixedData,
    /// After the fixed data
    AfterFixedData,
    /// Inside the fixed data, at the given bit offset
    MiddleFixedData(usize),
    /// Before the iteration variable
    BeforeIterator,
}

/// Two-step parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoStepParameters {
    /// Extraction and expansion PRF
    pub mac: TwoStepMac,
    /// Expansion mode
    pub mode: KdfMode,
    /// Counter placement
    pub counter_location: CounterLocation,
    /// Counter width in bits: 0, 8, 16, 24 or 32
    pub counter_bits: usize,
    /// Extraction salt; all zeros of [`TwoStepMac::salt_len`] when absent
    pub salt: Option<Vec<u8>>,
    /// Feedback-mode `K(0)`; empty when absent
    pub iv: Option<Vec<u8>>,
}

impl TwoStepParameters {
    /// Counter mode, counter before the fixed data.
    #[must_use]
    pub fn new(mac: TwoStepMac, counter_bits: usize) -> Self {
        Self {
            mac,
            mode: KdfMode::Counter,
            counter_location: CounterLocation::BeforeFixedData,
            counter_bits,
            salt: None,
            iv: None,
        }
    }

    /// Select the expansion mode.
    #[must_use]
    pub fn with_mode(mut self, mode: KdfMode) -> Self {
        self.mode = mode;
        self
    }

    /// Place the counter.
    #[must_use]
    pub fn with_counter(mut self, location: CounterLocation, bits: usize) -> Self {
        self.counter_location = location;
        self.counter_bits = bits;
        self
    }

    /// Use an explicit extraction salt.
    #[must_use]
    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = Some(salt.to_vec());
        self
    }

    /// Set the feedback IV.
    #[must_use]
    pub fn with_iv(mut self, iv: &[u8]) -> Self {
        self.iv = Some(iv.to_vec());
        self
    }

    pub(crate) fn validate(&self, l: usize) -> Result<()> {
        if !matches!(self.counter_bits, 0 | 8 | 16 | 24 | 32) {
            return Err(KasError::config(format!(
                "counter length {} is not one of 0, 8, 16, 24, 32",
                self.counter_bits
            )));
        }
        let no_counter = self.counter_location == CounterLocation::None;
        if no_counter != (self.counter_bits == 0) {
            return Err(KasError::config(
                "counter length 0 must be paired with counter location None",
            ));
        }
        match self.mode {
            KdfMode::Counter => {
                if matches!(
                    self.counter_location,
                    CounterLocation::None | CounterLocation::BeforeIterator
                ) {
                    return Err(KasError::config(format!(
                        "counter mode does not allow counter location {:?}",
                        self.counter_location
                    )));
                }
            }
            KdfMode::Feedback | KdfMode::DoublePipeline => {
                if matches!(self.counter_location, CounterLocation::MiddleFixedData(_)) {
                    return Err(KasError::config(format!(
                        "{:?} mode does not allow a counter inside the fixed data",
                        self.mode
                    )));
                }
            }
        }
        if self.iv.is_some() && self.mode != KdfMode::Feedback {
            return Err(KasError::config("an IV is only used in feedback mode"));
        }
        if let (TwoStepMac::Cmac(size), Some(salt)) = (self.mac, &self.salt) {
            if salt.len() * 8 != size.bits() {
                return Err(KasError::InvalidKeyLength {
                    expected: size.bits(),
                    actual: salt.len() * 8,
                });
            }
        }
        self.max_blocks(l).map(|_| ())
    }

    fn max_blocks(&self, l: usize) -> Result<u32> {
        let max = if self.counter_bits == 0 {
            u64::from(u32::MAX)
        } else {
            (1u64 << self.counter_bits) - 1
        };
        block_count(l, self.mac.output_bits(), max, "two-step KDF")
    }

    fn counter(&self, i: u32) -> Result<BitString> {
        if self.counter_bits == 0 {
            return Ok(BitString::new());
        }
        BitString::from_u32(i, self.counter_bits)
    }

    /// PRF input for round `i` around the iteration variable.
    fn prf_input(&self, i: u32, iterator: &[u8], fixed: &BitString) -> Result<Vec<u8>> {
        let counter = self.counter(i)?;
        let iterator = BitString::from_bytes(iterator);
        let mut data = BitString::new();
        match self.counter_location {
            CounterLocation::None => {
                data.append(&iterator);
                data.append(fixed);
            }
            CounterLocation::BeforeIterator => {
                data.append(&counter);
                data.append(&iterator);
                data.append(fixed);
            }
            CounterLocation::BeforeFixedData => {
                data.append(&iterator);
                data.append(&counter);
                data.append(fixed);
            }
            CounterLocation::AfterFixedData => {
                data.append(&iterator);
                data.append(fixed);
                data.append(&counter);
            }
            CounterLocation::MiddleFixedData(offset) => {
                data.append(&iterator);
                data.append(&fixed.substring(0, offset).map_err(|_| {
                    KasError::config(format!(
                        "counter offset {} beyond {}-bit fixed data",
                        offset,
                        fixed.len()
                    ))
                })?);
                data.append(&counter);
                data.append(&fixed.substring(offset, fixed.len() - offset)?);
            }
        }
        Ok(data.into_bytes())
    }

    /// SP 800-108 expansion of `key` over `fixed`.
    pub(crate) fn expand(&self, key: &[u8], fixed: &BitString, l: usize) -> Result<Vec<u8>> {
        let n = self.max_blocks(l)?;
        let mut out = Vec::new();
        match self.mode {
            KdfMode::Counter => {
                for i in 1..=n {
                    out.extend(self.mac.prf(key, &[&self.prf_input(i, &[], fixed)?])?);
                }
            }
            KdfMode::Feedback => {
                let mut previous = Zeroizing::new(self.iv.clone().unwrap_or_default());
                for i in 1..=n {
                    let block = self.mac.prf(key, &[&self.prf_input(i, &previous, fixed)?])?;
                    out.extend_from_slice(&block);
                    *previous = block;
                }
            }
            KdfMode::DoublePipeline => {
                let mut a = Zeroizing::new(fixed.as_bytes().to_vec());
                for i in 1..=n {
                    *a = self.mac.prf(key, &[&a])?;
                    out.extend(self.mac.prf(key, &[&self.prf_input(i, &a, fixed)?])?);
                }
            }
        }
        Ok(out)
    }

    /// Extract then expand. Callers validate first.
    pub(crate) fn derive(&self, z: &[u8], fixed: &BitString, l: usize) -> Result<Vec<u8>> {
        let salt = self.salt.clone().unwrap_or_else(|| vec![0u8; self.mac.salt_len()]);
        let key_derivation_key = Zeroizing::new(self.mac.prf(&salt, &[z])?);
        self.expand(&key_derivation_key, fixed, l)
    }
}
