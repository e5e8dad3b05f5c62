//! Key derivation (SP 800-56C, SP 800-108, SP 800-135)
//!
//! [`KdfParameter`] is a closed set of constructions. Every construction
//! validates its parameters against the requested length before any hashing
//! and produces exactly `L` bits; the trailing bits of the last byte are
//! cleared when `L` is not a multiple of eight.
//!
//! | Variant | Construction | Uses FixedInfo |
//! |---------|--------------|----------------|
//! | `OneStep` | `H(counter \|\| Z \|\| FixedInfo)` | yes |
//! | `OneStepNoCounter` | `H(Z \|\| FixedInfo)`, single block | yes |
//! | `TwoStep` | extract with a MAC, SP 800-108 expansion | yes |
//! | `Hkdf` | RFC 5869 extract and expand | yes |
//! | `IkeV1` | SKEYID / SKEYID_d | no |
//! | `IkeV2` | SKEYSEED / prf+ | no |
//! | `Tls12` | TLS 1.2 PRF, master secret then key block | no |

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

pub mod hkdf;
pub mod ike;
pub mod one_step;
pub mod tls;
pub mod two_step;

pub use hkdf::HkdfParameters;
pub use ike::{IkeV1Keys, IkeV1Parameters, IkeV2Parameters};
pub use one_step::{OneStepAuxFunction, OneStepParameters};
pub use tls::Tls12Parameters;
pub use two_step::{CounterLocation, KdfMode, TwoStepMac, TwoStepParameters};

use kas_prelude::error::{KasError, Result};
use kas_primitives::mac::truncate_bits;
use kas_primitives::{BitString, SecureBytes};
use tracing::instrument;

/// A key-derivation construction with its sub-parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KdfParameter {
    /// One-step KDF with a 32-bit counter
    OneStep(OneStepParameters),
    /// One-step KDF without a counter; `L` must fit one block
    OneStepNoCounter(OneStepParameters),
    /// Two-step KDF: extraction then SP 800-108 expansion
    TwoStep(TwoStepParameters),
    /// HKDF
    Hkdf(HkdfParameters),
    /// IKEv1 (SP 800-135 §4.1)
    IkeV1(IkeV1Parameters),
    /// IKEv2 (SP 800-135 §4.2)
    IkeV2(IkeV2Parameters),
    /// TLS 1.2 PRF (SP 800-135 §4.2.2)
    Tls12(Tls12Parameters),
}

/// The construction of a [`KdfParameter`] without its sub-parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KdfKind {
    /// One-step KDF with a counter
    OneStep,
    /// One-step KDF without a counter
    OneStepNoCounter,
    /// Two-step KDF
    TwoStep,
    /// HKDF
    Hkdf,
    /// IKEv1
    IkeV1,
    /// IKEv2
    IkeV2,
    /// TLS 1.2 PRF
    Tls12,
}

impl KdfKind {
    /// Every construction
    pub const ALL: [KdfKind; 7] = [
        KdfKind::OneStep,
        KdfKind::OneStepNoCounter,
        KdfKind::TwoStep,
        KdfKind::Hkdf,
        KdfKind::IkeV1,
        KdfKind::IkeV2,
        KdfKind::Tls12,
    ];
}

impl KdfParameter {
    /// The construction this parameter set configures
    #[must_use]
    pub fn kind(&self) -> KdfKind {
        match self {
            KdfParameter::OneStep(_) => KdfKind::OneStep,
            KdfParameter::OneStepNoCounter(_) => KdfKind::OneStepNoCounter,
            KdfParameter::TwoStep(_) => KdfKind::TwoStep,
            KdfParameter::Hkdf(_) => KdfKind::Hkdf,
            KdfParameter::IkeV1(_) => KdfKind::IkeV1,
            KdfParameter::IkeV2(_) => KdfKind::IkeV2,
            KdfParameter::Tls12(_) => KdfKind::Tls12,
        }
    }

    /// Short name for logs and error messages
    #[must_use]
    pub fn name(&self) -> &'static str {
        crate::names::kdf_name(self.kind())
    }

    /// Whether the construction consumes FixedInfo. The protocol KDFs bind
    /// their own nonces instead.
    #[must_use]
    pub fn uses_fixed_info(&self) -> bool {
        matches!(
            self,
            KdfParameter::OneStep(_)
                | KdfParameter::OneStepNoCounter(_)
                | KdfParameter::TwoStep(_)
                | KdfParameter::Hkdf(_)
        )
    }

    /// Check the parameters and the requested length `l` (bits).
    ///
    /// # Errors
    /// Returns a configuration error for `l = 0`, an unsupported parameter
    /// combination, or an `l` beyond the construction's maximum output.
    pub fn validate(&self, l: usize) -> Result<()> {
        if l == 0 {
            return Err(KasError::config("requested DKM length L must be positive"));
        }
        match self {
            KdfParameter::OneStep(p) => p.validate(l, true),
            KdfParameter::OneStepNoCounter(p) => p.validate(l, false),
            KdfParameter::TwoStep(p) => p.validate(l),
            KdfParameter::Hkdf(p) => p.validate(l),
            KdfParameter::IkeV1(p) => p.validate(l),
            KdfParameter::IkeV2(p) => p.validate(l),
            KdfParameter::Tls12(p) => p.validate(l),
        }
    }

    /// Derive `l` bits of keying material from `z` and `fixed_info`.
    ///
    /// # Errors
    /// Returns a configuration error from [`KdfParameter::validate`], or when
    /// FixedInfo is not a whole number of bytes.
    #[instrument(level = "debug", skip(self, z, fixed_info), fields(kdf = self.name(), z_len = z.len(), fixed_info_bits = fixed_info.len(), l))]
    pub fn derive(&self, z: &[u8], fixed_info: &BitString, l: usize) -> Result<SecureBytes> {
        self.validate(l)?;
        if self.uses_fixed_info() && !fixed_info.is_byte_aligned() {
            return Err(KasError::config(format!(
                "FixedInfo of {} bits is not byte aligned",
                fixed_info.len()
            )));
        }
        let fixed = fixed_info.as_bytes();
        let raw = match self {
            KdfParameter::OneStep(p) => p.derive(z, fixed, l, true)?,
            KdfParameter::OneStepNoCounter(p) => p.derive(z, fixed, l, false)?,
            KdfParameter::TwoStep(p) => p.derive(z, fixed_info, l)?,
            KdfParameter::Hkdf(p) => p.derive(z, fixed, l)?,
            KdfParameter::IkeV1(p) => p.derive(z, l)?,
            KdfParameter::IkeV2(p) => p.derive(z, l)?,
            KdfParameter::Tls12(p) => p.derive(z, l)?,
        };
        Ok(SecureBytes::new(truncate_bits(raw, l)?))
    }
}

/// Number of `block_bits`-bit blocks needed for `l` bits, bounded by `max`.
pub(crate) fn block_count(l: usize, block_bits: usize, max: u64, what: &str) -> Result<u32> {
    let blocks = l.div_ceil(block_bits) as u64;
    if blocks > max {
        return Err(KasError::config(format!(
            "{} cannot produce {} bits ({} blocks, max {})",
            what, l, blocks, max
        )));
    }
    u32::try_from(blocks).map_err(|_| KasError::config(format!("{} block count overflow", what)))
}
