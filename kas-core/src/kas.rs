//! KAS orchestrator
//!
//! [`KasBuilder`] assembles and validates an immutable [`KasConfig`];
//! [`Kas::compute`] then runs the stages in order:
//!
//! 1. key availability and strict validation of the counterpart's keys
//! 2. shared secret Z
//! 3. FixedInfo
//! 4. DKM
//! 5. key confirmation, when configured
//!
//! The first failing stage ends the computation. Every failure is
//! reproducible from the same inputs, so nothing is retried.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use crate::fixed_info::{FixedInfoEncoding, FixedInfoParameters, FixedInfoPattern};
use crate::kdf::KdfParameter;
use crate::logging::{sanitize_bytes, sanitize_data};
use crate::key_confirmation::{
    KeyConfirmationDirection, KeyConfirmationParameters, KeyConfirmationRole, KeyConfirmationTags,
};
use crate::scheme::{check_key_availability, derive_z, validate_counterpart_keys, SchemeVariant};
use crate::types::{KasDomain, KeyAgreementRole, PartyKeyMaterial};
use kas_prelude::error::{ErrorKind, KasError, Result};
use kas_primitives::{BitString, SecureBytes};
use std::fmt;
use tracing::{debug, instrument};

/// Processing stage, reported with a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum KasStage {
    /// Key availability and public-key validation
    Validation,
    /// Z computation
    SharedSecret,
    /// FixedInfo encoding
    FixedInfo,
    /// Key derivation
    Derivation,
    /// Key confirmation
    Confirmation,
}

impl fmt::Display for KasStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KasStage::Validation => "validation",
            KasStage::SharedSecret => "shared secret",
            KasStage::FixedInfo => "fixed info",
            KasStage::Derivation => "derivation",
            KasStage::Confirmation => "key confirmation",
        };
        f.write_str(name)
    }
}

/// Validated, immutable KAS configuration.
#[derive(Debug, Clone)]
pub struct KasConfig {
    domain: KasDomain,
    scheme: SchemeVariant,
    role: KeyAgreementRole,
    kdf: KdfParameter,
    l: usize,
    fixed_info_pattern: FixedInfoPattern,
    fixed_info_encoding: FixedInfoEncoding,
    key_confirmation: Option<KeyConfirmationParameters>,
}

impl KasConfig {
    /// Domain parameters
    #[must_use]
    pub fn domain(&self) -> &KasDomain {
        &self.domain
    }

    /// Scheme
    #[must_use]
    pub fn scheme(&self) -> SchemeVariant {
        self.scheme
    }

    /// Role of the party computing
    #[must_use]
    pub fn role(&self) -> KeyAgreementRole {
        self.role
    }

    /// Key derivation
    #[must_use]
    pub fn kdf(&self) -> &KdfParameter {
        &self.kdf
    }

    /// DKM length in bits
    #[must_use]
    pub fn l(&self) -> usize {
        self.l
    }

    /// FixedInfo pattern
    #[must_use]
    pub fn fixed_info_pattern(&self) -> &FixedInfoPattern {
        &self.fixed_info_pattern
    }

    /// FixedInfo encoding
    #[must_use]
    pub fn fixed_info_encoding(&self) -> FixedInfoEncoding {
        self.fixed_info_encoding
    }

    /// Key confirmation, if any
    #[must_use]
    pub fn key_confirmation(&self) -> Option<&KeyConfirmationParameters> {
        self.key_confirmation.as_ref()
    }
}

/// Builder for [`Kas`].
///
/// `with_kdf` and `with_l` are required; everything else has a default
/// (initiator role, `uPartyInfo||vPartyInfo` concatenated, no confirmation).
#[derive(Debug, Clone)]
pub struct KasBuilder {
    domain: KasDomain,
    scheme: SchemeVariant,
    role: KeyAgreementRole,
    kdf: Option<KdfParameter>,
    l: Option<usize>,
    fixed_info_pattern: FixedInfoPattern,
    fixed_info_encoding: FixedInfoEncoding,
    key_confirmation: Option<KeyConfirmationParameters>,
}

impl KasBuilder {
    /// Start a configuration for `scheme` over `domain`.
    #[must_use]
    pub fn new(domain: KasDomain, scheme: SchemeVariant) -> Self {
        Self {
            domain,
            scheme,
            role: KeyAgreementRole::Initiator,
            kdf: None,
            l: None,
            fixed_info_pattern: FixedInfoPattern::default(),
            fixed_info_encoding: FixedInfoEncoding::default(),
            key_confirmation: None,
        }
    }

    /// Role of the party that will call [`Kas::compute`].
    #[must_use]
    pub fn with_role(mut self, role: KeyAgreementRole) -> Self {
        self.role = role;
        self
    }

    /// Key-derivation construction.
    #[must_use]
    pub fn with_kdf(mut self, kdf: KdfParameter) -> Self {
        self.kdf = Some(kdf);
        self
    }

    /// DKM length in bits.
    #[must_use]
    pub fn with_l(mut self, l: usize) -> Self {
        self.l = Some(l);
        self
    }

    /// Enable key confirmation.
    #[must_use]
    pub fn with_key_confirmation(mut self, params: KeyConfirmationParameters) -> Self {
        self.key_confirmation = Some(params);
        self
    }

    /// FixedInfo field order.
    #[must_use]
    pub fn with_fixed_info_pattern(mut self, pattern: FixedInfoPattern) -> Self {
        self.fixed_info_pattern = pattern;
        self
    }

    /// FixedInfo encoding.
    #[must_use]
    pub fn with_fixed_info_encoding(mut self, encoding: FixedInfoEncoding) -> Self {
        self.fixed_info_encoding = encoding;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - the KDF or L is missing
    /// - the KDF rejects L or its own parameters
    /// - key confirmation is inconsistent with L, the MAC, or the scheme
    pub fn build(self) -> Result<Kas> {
        let kdf = self.kdf.ok_or_else(|| KasError::config("no KDF configured"))?;
        let l = self.l.ok_or_else(|| KasError::config("no DKM length L configured"))?;
        kdf.validate(l)?;
        if let Some(kc) = &self.key_confirmation {
            kc.validate(l)?;
            check_confirmation_allowed(self.scheme, self.role, kc)?;
        }
        Ok(Kas {
            config: KasConfig {
                domain: self.domain,
                scheme: self.scheme,
                role: self.role,
                kdf,
                l,
                fixed_info_pattern: self.fixed_info_pattern,
                fixed_info_encoding: self.fixed_info_encoding,
                key_confirmation: self.key_confirmation,
            },
        })
    }
}

/// Schemes without static keys on one side restrict who may confirm.
fn check_confirmation_allowed(
    scheme: SchemeVariant,
    role: KeyAgreementRole,
    kc: &KeyConfirmationParameters,
) -> Result<()> {
    match scheme {
        SchemeVariant::DhEphem => {
            Err(KasError::config("key confirmation is not available for dhEphem"))
        }
        SchemeVariant::DhOneFlow => {
            let v_provides = match (kc.direction, role, kc.role) {
                (KeyConfirmationDirection::Bilateral, _, _) => false,
                (_, KeyAgreementRole::Responder, KeyConfirmationRole::Provider)
                | (_, KeyAgreementRole::Initiator, KeyConfirmationRole::Recipient) => true,
                _ => false,
            };
            if v_provides {
                Ok(())
            } else {
                Err(KasError::config("dhOneFlow only supports unilateral confirmation from V"))
            }
        }
        _ => Ok(()),
    }
}

/// Successful computation.
#[derive(Debug, Clone)]
pub struct KasOutput {
    /// Shared secret
    pub z: SecureBytes,
    /// Derived keying material, `dkm_bits` long
    pub dkm: SecureBytes,
    /// DKM length in bits
    pub dkm_bits: usize,
    /// Encoded FixedInfo; empty for KDFs that do not use it
    pub fixed_info: BitString,
    /// Confirmation tags, when configured
    pub key_confirmation: Option<KeyConfirmationTags>,
}

/// Failed computation: the stage and its error.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KasFailure {
    /// Stage that failed
    pub stage: KasStage,
    /// The error
    pub error: KasError,
}

impl KasFailure {
    /// Human-readable reason
    #[must_use]
    pub fn reason(&self) -> String {
        format!("{} failed: {}", self.stage, self.error)
    }

    /// Whether a public key failed validation, which test scenarios may expect.
    #[must_use]
    pub fn is_validation_failure(&self) -> bool {
        self.error.kind() == ErrorKind::Validation
    }
}

impl fmt::Display for KasFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

/// Outcome of [`Kas::compute`].
#[derive(Debug, Clone)]
pub enum KasResult {
    /// All stages succeeded
    Success(KasOutput),
    /// A stage failed
    Failure(KasFailure),
}

impl KasResult {
    /// Whether every stage succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, KasResult::Success(_))
    }

    /// The output on success
    #[must_use]
    pub fn output(&self) -> Option<&KasOutput> {
        match self {
            KasResult::Success(output) => Some(output),
            KasResult::Failure(_) => None,
        }
    }

    /// The failure, if any
    #[must_use]
    pub fn failure(&self) -> Option<&KasFailure> {
        match self {
            KasResult::Success(_) => None,
            KasResult::Failure(failure) => Some(failure),
        }
    }

    /// Convert into a `Result`, dropping the stage.
    ///
    /// # Errors
    /// Returns the failing stage's error.
    pub fn into_result(self) -> Result<KasOutput> {
        match self {
            KasResult::Success(output) => Ok(output),
            KasResult::Failure(failure) => Err(failure.error),
        }
    }
}

/// A configured key-agreement computation.
///
/// Holds no state between calls; [`Kas::compute`] may run concurrently from
/// many threads.
#[derive(Debug, Clone)]
pub struct Kas {
    config: KasConfig,
}

impl Kas {
    /// Start a [`KasBuilder`].
    #[must_use]
    pub fn builder(domain: KasDomain, scheme: SchemeVariant) -> KasBuilder {
        KasBuilder::new(domain, scheme)
    }

    /// The configuration
    #[must_use]
    pub fn config(&self) -> &KasConfig {
        &self.config
    }

    /// Run the key agreement for the configured role. The acting party's
    /// material must include its private keys; the counterpart's public
    /// values suffice. `fixed_info` supplies the caller-owned FixedInfo
    /// fields; PartyInfo and L are filled in here.
    #[instrument(level = "debug", skip_all, fields(scheme = ?self.config.scheme, role = ?self.config.role, kdf = self.config.kdf.name(), l = self.config.l))]
    pub fn compute(
        &self,
        party_u: &PartyKeyMaterial,
        party_v: &PartyKeyMaterial,
        fixed_info: &FixedInfoParameters,
    ) -> KasResult {
        match self.run(party_u, party_v, fixed_info) {
            Ok(output) => KasResult::Success(output),
            Err(failure) => {
                debug!(
                    stage = %failure.stage,
                    kind = ?failure.error.kind(),
                    "KAS computation failed"
                );
                KasResult::Failure(failure)
            }
        }
    }

    fn run(
        &self,
        party_u: &PartyKeyMaterial,
        party_v: &PartyKeyMaterial,
        fixed_info: &FixedInfoParameters,
    ) -> std::result::Result<KasOutput, KasFailure> {
        let cfg = &self.config;
        let (own, other) = match cfg.role {
            KeyAgreementRole::Initiator => (party_u, party_v),
            KeyAgreementRole::Responder => (party_v, party_u),
        };
        let at = |stage: KasStage| move |error: KasError| KasFailure { stage, error };

        check_key_availability(cfg.scheme, cfg.role, own, other)
            .and_then(|()| validate_counterpart_keys(&cfg.domain, cfg.scheme, cfg.role, other))
            .map_err(at(KasStage::Validation))?;

        let z = derive_z(&cfg.domain, cfg.scheme, cfg.role, own, other)
            .map_err(at(KasStage::SharedSecret))?;
        debug!(z = %sanitize_data(&z), "shared secret computed");

        let encoded =
            self.fixed_info(party_u, party_v, fixed_info).map_err(at(KasStage::FixedInfo))?;
        debug!(
            fixed_info = %sanitize_bytes(encoded.as_bytes()),
            bits = encoded.len(),
            "FixedInfo assembled"
        );

        let dkm = cfg.kdf.derive(&z, &encoded, cfg.l).map_err(at(KasStage::Derivation))?;
        debug!(dkm = %sanitize_data(&dkm), "keying material derived");

        let key_confirmation = match &cfg.key_confirmation {
            Some(kc) => {
                let dkm_bits =
                    BitString::from_bits(&dkm, cfg.l).map_err(at(KasStage::Confirmation))?;
                Some(
                    kc.compute(&cfg.domain, cfg.role, &dkm_bits, own, other)
                        .map_err(at(KasStage::Confirmation))?,
                )
            }
            None => None,
        };

        Ok(KasOutput { z, dkm, dkm_bits: cfg.l, fixed_info: encoded, key_confirmation })
    }

    fn fixed_info(
        &self,
        party_u: &PartyKeyMaterial,
        party_v: &PartyKeyMaterial,
        params: &FixedInfoParameters,
    ) -> Result<BitString> {
        let cfg = &self.config;
        if !cfg.kdf.uses_fixed_info() {
            return Ok(BitString::new());
        }
        let mut params = params.clone();
        params.u_party_info = Some(BitString::from_bytes(&party_u.party_info(&cfg.domain)?));
        params.v_party_info = Some(BitString::from_bytes(&party_v.party_info(&cfg.domain)?));
        params.l = Some(cfg.l);
        cfg.fixed_info_pattern.build(cfg.fixed_info_encoding, &params)
    }
}
