//! Scheme engine (SP 800-56A §6)
//!
//! Computes the shared secret Z for one party of a key agreement. Each
//! [`SchemeVariant`] is a pure function of the acting party's private keys
//! and the counterpart's public keys:
//!
//! | Scheme | Party U supplies | Party V supplies | Z |
//! |--------|------------------|------------------|---|
//! | `DhEphem` | ephemeral | ephemeral | DH(e, e) |
//! | `DhStatic` | static | static | DH(s, s) |
//! | `DhOneFlow` | ephemeral | static | DH(e_U, s_V) |
//! | `DhHybrid1` | static + ephemeral | static + ephemeral | Ze \|\| Zs |
//! | `DhHybridOneFlow` | static + ephemeral | static | DH(e_U, s_V) \|\| Zs |
//! | `Mqv1` | static + ephemeral | static | MQV, V's static doubles as its ephemeral |
//! | `Mqv2` | static + ephemeral | static + ephemeral | MQV |
//!
//! Hybrid secrets place the ephemeral-derived value first, as SP 800-56A
//! §6.1.1.1 and §6.2.1.1 define `Z = Ze || Zs`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

mod ecc;
mod ffc;

use crate::types::{KasDomain, KeyAgreementRole, KeyPair, PartyKeyMaterial, PublicKey};
use crate::validation::{validate_public_key, ValidationMode};
use kas_prelude::error::{KasError, Result};
use kas_primitives::{SecretUint, SecureBytes};
use tracing::instrument;

/// Key-agreement scheme, shared by both domain families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SchemeVariant {
    /// C(2e, 0s): ephemeral-only Diffie-Hellman
    DhEphem,
    /// C(0e, 2s): static-only Diffie-Hellman
    DhStatic,
    /// C(1e, 1s): one-pass Diffie-Hellman
    DhOneFlow,
    /// C(2e, 2s): full unified model
    DhHybrid1,
    /// C(1e, 2s): one-pass unified model
    DhHybridOneFlow,
    /// C(1e, 2s): one-pass MQV
    Mqv1,
    /// C(2e, 2s): full MQV
    Mqv2,
}

/// Which key pairs one party must contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRequirements {
    /// A static key pair is required
    pub static_key: bool,
    /// An ephemeral key pair is required
    pub ephemeral_key: bool,
}

impl SchemeVariant {
    /// Every scheme variant.
    pub const ALL: [SchemeVariant; 7] = [
        SchemeVariant::DhEphem,
        SchemeVariant::DhStatic,
        SchemeVariant::DhOneFlow,
        SchemeVariant::DhHybrid1,
        SchemeVariant::DhHybridOneFlow,
        SchemeVariant::Mqv1,
        SchemeVariant::Mqv2,
    ];

    /// Key pairs the party in `role` must supply.
    #[must_use]
    pub const fn key_requirements(self, role: KeyAgreementRole) -> KeyRequirements {
        let initiator = matches!(role, KeyAgreementRole::Initiator);
        let (static_key, ephemeral_key) = match self {
            SchemeVariant::DhEphem => (false, true),
            SchemeVariant::DhStatic => (true, false),
            SchemeVariant::DhOneFlow => (!initiator, initiator),
            SchemeVariant::DhHybrid1 | SchemeVariant::Mqv2 => (true, true),
            SchemeVariant::DhHybridOneFlow | SchemeVariant::Mqv1 => (true, initiator),
        };
        KeyRequirements { static_key, ephemeral_key }
    }
}

fn require_pair<'a>(key: Option<&'a KeyPair>, what: &str) -> Result<&'a KeyPair> {
    let pair =
        key.ok_or_else(|| KasError::computation(format!("{} key pair not supplied", what)))?;
    if !pair.has_private() {
        return Err(KasError::computation(format!("{} private key not supplied", what)));
    }
    Ok(pair)
}

fn require_public<'a>(key: Option<&'a KeyPair>, what: &str) -> Result<&'a PublicKey> {
    key.map(KeyPair::public)
        .ok_or_else(|| KasError::computation(format!("{} public key not supplied", what)))
}

/// Check that the acting party holds every private key and the counterpart
/// every public key that `scheme` needs. Runs before any arithmetic.
///
/// # Errors
/// Returns a `Computation` error naming the first missing key.
pub fn check_key_availability(
    scheme: SchemeVariant,
    role: KeyAgreementRole,
    own: &PartyKeyMaterial,
    other: &PartyKeyMaterial,
) -> Result<()> {
    let own_req = scheme.key_requirements(role);
    let other_req = scheme.key_requirements(role.other());
    if own_req.static_key {
        require_pair(own.static_key.as_ref(), "own static")?;
    }
    if own_req.ephemeral_key {
        require_pair(own.ephemeral_key.as_ref(), "own ephemeral")?;
    }
    if other_req.static_key {
        require_public(other.static_key.as_ref(), "counterpart static")?;
    }
    if other_req.ephemeral_key {
        require_public(other.ephemeral_key.as_ref(), "counterpart ephemeral")?;
    }
    Ok(())
}

/// Strictly validate every counterpart public key that `scheme` consumes.
///
/// # Errors
/// Returns `PublicKeyValidation` for the first invalid key, or a
/// `Computation` error if a required key is missing.
pub fn validate_counterpart_keys(
    domain: &KasDomain,
    scheme: SchemeVariant,
    role: KeyAgreementRole,
    other: &PartyKeyMaterial,
) -> Result<()> {
    let req = scheme.key_requirements(role.other());
    if req.static_key {
        let key = require_public(other.static_key.as_ref(), "counterpart static")?;
        validate_public_key(domain, key, ValidationMode::Strict)?;
    }
    if req.ephemeral_key {
        let key = require_public(other.ephemeral_key.as_ref(), "counterpart ephemeral")?;
        validate_public_key(domain, key, ValidationMode::Strict)?;
    }
    Ok(())
}

/// Compute Z for the party in `role`: availability check, strict validation
/// of the counterpart's keys, then the scheme arithmetic.
///
/// # Errors
/// `Computation` for missing keys or a degenerate result,
/// `PublicKeyValidation` for an invalid counterpart key.
#[instrument(level = "debug", skip(domain, own, other), fields(family = ?domain.family()))]
pub fn compute_shared_secret(
    domain: &KasDomain,
    scheme: SchemeVariant,
    role: KeyAgreementRole,
    own: &PartyKeyMaterial,
    other: &PartyKeyMaterial,
) -> Result<SecureBytes> {
    check_key_availability(scheme, role, own, other)?;
    validate_counterpart_keys(domain, scheme, role, other)?;
    derive_z(domain, scheme, role, own, other)
}

/// Scheme arithmetic only; callers have already checked and validated keys.
pub(crate) fn derive_z(
    domain: &KasDomain,
    scheme: SchemeVariant,
    role: KeyAgreementRole,
    own: &PartyKeyMaterial,
    other: &PartyKeyMaterial,
) -> Result<SecureBytes> {
    let own_static = move || require_pair(own.static_key.as_ref(), "own static");
    let own_eph = move || require_pair(own.ephemeral_key.as_ref(), "own ephemeral");
    let other_static = move || require_public(other.static_key.as_ref(), "counterpart static");
    let other_eph = move || require_public(other.ephemeral_key.as_ref(), "counterpart ephemeral");
    let initiator = role == KeyAgreementRole::Initiator;

    match scheme {
        SchemeVariant::DhEphem => dh(domain, own_eph()?, other_eph()?),
        SchemeVariant::DhStatic => dh(domain, own_static()?, other_static()?),
        SchemeVariant::DhOneFlow => {
            if initiator {
                dh(domain, own_eph()?, other_static()?)
            } else {
                dh(domain, own_static()?, other_eph()?)
            }
        }
        SchemeVariant::DhHybrid1 => {
            let ze = dh(domain, own_eph()?, other_eph()?)?;
            let zs = dh(domain, own_static()?, other_static()?)?;
            Ok(concat_secrets(&ze, &zs))
        }
        SchemeVariant::DhHybridOneFlow => {
            let ze = if initiator {
                dh(domain, own_eph()?, other_static()?)?
            } else {
                dh(domain, own_static()?, other_eph()?)?
            };
            let zs = dh(domain, own_static()?, other_static()?)?;
            Ok(concat_secrets(&ze, &zs))
        }
        SchemeVariant::Mqv1 => {
            if initiator {
                mqv(domain, own_static()?, own_eph()?, other_static()?, other_static()?)
            } else {
                mqv(domain, own_static()?, own_static()?, other_static()?, other_eph()?)
            }
        }
        SchemeVariant::Mqv2 => {
            mqv(domain, own_static()?, own_eph()?, other_static()?, other_eph()?)
        }
    }
}

fn concat_secrets(first: &SecureBytes, second: &SecureBytes) -> SecureBytes {
    let mut z = SecureBytes::new(Vec::with_capacity(first.len() + second.len()));
    z.extend_from_slice(first);
    z.extend_from_slice(second);
    z
}

fn private_of(pair: &KeyPair) -> Result<&SecureBytes> {
    pair.private_bytes().ok_or_else(|| KasError::computation("private key not supplied"))
}

fn family_mismatch() -> KasError {
    KasError::config("key family does not match the domain")
}

fn dh(domain: &KasDomain, own: &KeyPair, other: &PublicKey) -> Result<SecureBytes> {
    let private = private_of(own)?;
    match (domain, other) {
        (KasDomain::Ffc(params), PublicKey::Ffc(y)) => {
            ffc::dh(params, &SecretUint::from_bytes_be(private), y)
        }
        (KasDomain::Ecc(curve), PublicKey::Ecc(q)) => curve.diffie_hellman(private, q),
        _ => Err(family_mismatch()),
    }
}

fn mqv(
    domain: &KasDomain,
    own_static: &KeyPair,
    own_eph: &KeyPair,
    other_static: &PublicKey,
    other_eph: &PublicKey,
) -> Result<SecureBytes> {
    let static_private = private_of(own_static)?;
    let ephemeral_private = private_of(own_eph)?;
    match (domain, own_eph.public(), other_static, other_eph) {
        (
            KasDomain::Ffc(params),
            PublicKey::Ffc(t_a),
            PublicKey::Ffc(y_b),
            PublicKey::Ffc(t_b),
        ) => ffc::mqv(
            params,
            &ffc::MqvInputs {
                static_private: &SecretUint::from_bytes_be(static_private),
                ephemeral_private: &SecretUint::from_bytes_be(ephemeral_private),
                ephemeral_public: t_a,
                other_static_public: y_b,
                other_ephemeral_public: t_b,
            },
        ),
        (
            KasDomain::Ecc(curve),
            PublicKey::Ecc(qe_a),
            PublicKey::Ecc(qs_b),
            PublicKey::Ecc(qe_b),
        ) => ecc::mqv(
            curve,
            &ecc::MqvInputs {
                static_private,
                ephemeral_private,
                ephemeral_public: qe_a,
                other_static_public: qs_b,
                other_ephemeral_public: qe_b,
            },
        ),
        _ => Err(family_mismatch()),
    }
}
