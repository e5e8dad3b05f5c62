//! # KasArc Core
//!
//! NIST SP 800-56A/C key-agreement computation engine. Given domain
//! parameters, a scheme, a KDF and both parties' key material, it validates
//! public keys, computes the shared secret Z, encodes FixedInfo, derives
//! keying material and optionally computes key-confirmation tags.
//!
//! ## Key Features
//!
//! - **Schemes**: the seven SP 800-56A schemes over FFC groups and the NIST
//!   prime curves, including MQV1/MQV2
//! - **Key Derivation**: one-step (hash, HMAC, KMAC), two-step (counter,
//!   feedback, double-pipeline), HKDF, IKEv1, IKEv2, TLS 1.2
//! - **Key Confirmation**: unilateral and bilateral, HMAC/CMAC/KMAC/AES-CCM
//! - **Validation**: standalone strict or lenient public-key validation
//! - **Name Tables**: standard names mapped to configuration tags
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kas_core::{
//!     FixedInfoParameters, Kas, KasDomain, KdfParameter, KeyPair, OneStepAuxFunction,
//!     OneStepParameters, PartyKeyMaterial, SchemeVariant,
//! };
//! use kas_primitives::{EccKeyPair, HashFunction, NamedCurve};
//!
//! let curve = NamedCurve::P256.curve()?;
//! let kas = Kas::builder(KasDomain::Ecc(curve.clone()), SchemeVariant::DhEphem)
//!     .with_kdf(KdfParameter::OneStep(OneStepParameters::new(
//!         OneStepAuxFunction::Hash(HashFunction::Sha2_256),
//!     )))
//!     .with_l(256)
//!     .build()?;
//!
//! let u = PartyKeyMaterial::new(b"alice".to_vec())
//!     .with_ephemeral_key(KeyPair::from(&EccKeyPair::generate(&curve, &mut rng)?));
//! let v = PartyKeyMaterial::new(b"bob".to_vec())
//!     .with_ephemeral_key(KeyPair::from(&EccKeyPair::generate(&curve, &mut rng)?).to_public());
//!
//! let output = kas.compute(&u, &v, &FixedInfoParameters::new()).into_result()?;
//! ```
//!
//! ## Failures
//!
//! [`Kas::compute`] returns a [`KasResult`]; a failure names the
//! [`KasStage`] it came from and carries a [`KasError`] whose
//! [`ErrorKind`] separates configuration, validation and computation
//! errors. Validation failures are ordinary data: test scenarios probing
//! invalid keys expect them.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// FixedInfo patterns and encoding.
pub mod fixed_info;
/// Orchestrator, builder and results.
pub mod kas;
/// Key-derivation constructions.
pub mod kdf;
/// Key-confirmation tags.
pub mod key_confirmation;
/// Tracing setup and log sanitization.
pub mod logging;
/// Standard-name tables.
pub mod names;
/// Scheme engine.
pub mod scheme;
/// Domains, keys and party material.
pub mod types;
/// Public-key validation.
pub mod validation;

pub use fixed_info::{
    FixedInfoEncoding, FixedInfoField, FixedInfoParameters, FixedInfoPattern,
};
pub use kas::{Kas, KasBuilder, KasConfig, KasFailure, KasOutput, KasResult, KasStage};
pub use kas_prelude::error::{ErrorKind, KasError, Result};
pub use kdf::{
    CounterLocation, HkdfParameters, IkeV1Parameters, IkeV2Parameters, KdfKind, KdfMode,
    KdfParameter, OneStepAuxFunction, OneStepParameters, Tls12Parameters, TwoStepMac,
    TwoStepParameters,
};
pub use key_confirmation::{
    KeyConfirmationDirection, KeyConfirmationParameters, KeyConfirmationRole, KeyConfirmationTags,
};
pub use names::check_name_tables;
pub use scheme::{compute_shared_secret, SchemeVariant};
pub use types::{DomainFamily, KasDomain, KeyAgreementRole, KeyPair, PartyKeyMaterial, PublicKey};
pub use validation::{
    validate_ecc_public_key, validate_ffc_public_key, validate_public_key, ValidationMode,
};

/// Library version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One-step KDF known answer: SHA-1, Z = BEEFBEEFBEEFBEEF, FixedInfo = BEEF
const KAT_ONE_STEP_SHA1: [u8; 20] = [
    0x58, 0x7D, 0x84, 0xE6, 0xCB, 0xB5, 0x25, 0xD2, 0x2C, 0x5A, 0xA6, 0xD8, 0x3B, 0xB7, 0x6C,
    0xB1, 0x4C, 0x7D, 0x48, 0xC2,
];

/// Startup checks: the name tables are complete and the one-step KDF
/// reproduces its known answer.
///
/// # Errors
///
/// Returns a configuration error naming a name-table gap, or a computation
/// error if the known-answer test fails.
pub fn init() -> Result<()> {
    check_name_tables()?;

    let kdf = KdfParameter::OneStep(OneStepParameters::new(OneStepAuxFunction::Hash(
        kas_primitives::HashFunction::Sha1,
    )));
    let z = [0xBE, 0xEF, 0xBE, 0xEF, 0xBE, 0xEF, 0xBE, 0xEF];
    let dkm = kdf.derive(&z, &kas_primitives::BitString::from_bytes(&[0xBE, 0xEF]), 160)?;
    if !kas_primitives::security::secure_compare(&dkm, &KAT_ONE_STEP_SHA1) {
        return Err(KasError::computation("one-step KDF known-answer test failed"));
    }
    tracing::debug!(version = VERSION, "kas-core initialized");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_init_passes() {
        init().unwrap();
    }

    #[test]
    fn test_version_set() {
        assert!(!VERSION.is_empty());
    }
}
