//! Specification-name tables
//!
//! Static name-to-tag tables for translating standard terminology into
//! configuration. The FFC and ECC scheme names both resolve to the shared
//! [`SchemeVariant`] tags. [`check_name_tables`] verifies that every tag has
//! a name and that no name is ambiguous; run it once at startup.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use crate::kdf::{CounterLocation, KdfKind, KdfMode, OneStepAuxFunction, TwoStepMac};
use crate::scheme::SchemeVariant;
use crate::types::DomainFamily;
use kas_prelude::error::{KasError, Result};
use kas_primitives::{AesKeySize, HashFunction, MacAlgorithm, NamedCurve};
use std::collections::HashSet;
use std::hash::Hash;

/// SP 800-56A FFC scheme names
pub const FFC_SCHEME_NAMES: &[(&str, SchemeVariant)] = &[
    ("dhEphem", SchemeVariant::DhEphem),
    ("dhStatic", SchemeVariant::DhStatic),
    ("dhOneFlow", SchemeVariant::DhOneFlow),
    ("dhHybrid1", SchemeVariant::DhHybrid1),
    ("dhHybridOneFlow", SchemeVariant::DhHybridOneFlow),
    ("MQV1", SchemeVariant::Mqv1),
    ("MQV2", SchemeVariant::Mqv2),
];

/// SP 800-56A ECC scheme names
pub const ECC_SCHEME_NAMES: &[(&str, SchemeVariant)] = &[
    ("ephemeralUnified", SchemeVariant::DhEphem),
    ("staticUnified", SchemeVariant::DhStatic),
    ("onePassDh", SchemeVariant::DhOneFlow),
    ("fullUnified", SchemeVariant::DhHybrid1),
    ("onePassUnified", SchemeVariant::DhHybridOneFlow),
    ("onePassMqv", SchemeVariant::Mqv1),
    ("fullMqv", SchemeVariant::Mqv2),
];

/// Hash function names
pub const HASH_NAMES: &[(&str, HashFunction)] = &[
    ("SHA-1", HashFunction::Sha1),
    ("SHA2-224", HashFunction::Sha2_224),
    ("SHA2-256", HashFunction::Sha2_256),
    ("SHA2-384", HashFunction::Sha2_384),
    ("SHA2-512", HashFunction::Sha2_512),
    ("SHA2-512/224", HashFunction::Sha2_512_224),
    ("SHA2-512/256", HashFunction::Sha2_512_256),
    ("SHA3-224", HashFunction::Sha3_224),
    ("SHA3-256", HashFunction::Sha3_256),
    ("SHA3-384", HashFunction::Sha3_384),
    ("SHA3-512", HashFunction::Sha3_512),
];

/// MAC names for key confirmation
pub const MAC_NAMES: &[(&str, MacAlgorithm)] = &[
    ("HMAC-SHA-1", MacAlgorithm::Hmac(HashFunction::Sha1)),
    ("HMAC-SHA2-224", MacAlgorithm::Hmac(HashFunction::Sha2_224)),
    ("HMAC-SHA2-256", MacAlgorithm::Hmac(HashFunction::Sha2_256)),
    ("HMAC-SHA2-384", MacAlgorithm::Hmac(HashFunction::Sha2_384)),
    ("HMAC-SHA2-512", MacAlgorithm::Hmac(HashFunction::Sha2_512)),
    ("HMAC-SHA2-512/224", MacAlgorithm::Hmac(HashFunction::Sha2_512_224)),
    ("HMAC-SHA2-512/256", MacAlgorithm::Hmac(HashFunction::Sha2_512_256)),
    ("HMAC-SHA3-224", MacAlgorithm::Hmac(HashFunction::Sha3_224)),
    ("HMAC-SHA3-256", MacAlgorithm::Hmac(HashFunction::Sha3_256)),
    ("HMAC-SHA3-384", MacAlgorithm::Hmac(HashFunction::Sha3_384)),
    ("HMAC-SHA3-512", MacAlgorithm::Hmac(HashFunction::Sha3_512)),
    ("CMAC-AES128", MacAlgorithm::Cmac(AesKeySize::Aes128)),
    ("CMAC-AES192", MacAlgorithm::Cmac(AesKeySize::Aes192)),
    ("CMAC-AES256", MacAlgorithm::Cmac(AesKeySize::Aes256)),
    ("KMAC-128", MacAlgorithm::Kmac128),
    ("KMAC-256", MacAlgorithm::Kmac256),
    ("AES-CCM-128", MacAlgorithm::AesCcm(AesKeySize::Aes128)),
    ("AES-CCM-192", MacAlgorithm::AesCcm(AesKeySize::Aes192)),
    ("AES-CCM-256", MacAlgorithm::AesCcm(AesKeySize::Aes256)),
];

/// NIST prime curve names
pub const CURVE_NAMES: &[(&str, NamedCurve)] = &[
    ("P-224", NamedCurve::P224),
    ("P-256", NamedCurve::P256),
    ("P-384", NamedCurve::P384),
    ("P-521", NamedCurve::P521),
];

/// One-step KDF auxiliary function names
pub const ONE_STEP_AUX_NAMES: &[(&str, OneStepAuxFunction)] = &[
    ("SHA-1", OneStepAuxFunction::Hash(HashFunction::Sha1)),
    ("SHA2-224", OneStepAuxFunction::Hash(HashFunction::Sha2_224)),
    ("SHA2-256", OneStepAuxFunction::Hash(HashFunction::Sha2_256)),
    ("SHA2-384", OneStepAuxFunction::Hash(HashFunction::Sha2_384)),
    ("SHA2-512", OneStepAuxFunction::Hash(HashFunction::Sha2_512)),
    ("SHA2-512/224", OneStepAuxFunction::Hash(HashFunction::Sha2_512_224)),
    ("SHA2-512/256", OneStepAuxFunction::Hash(HashFunction::Sha2_512_256)),
    ("SHA3-224", OneStepAuxFunction::Hash(HashFunction::Sha3_224)),
    ("SHA3-256", OneStepAuxFunction::Hash(HashFunction::Sha3_256)),
    ("SHA3-384", OneStepAuxFunction::Hash(HashFunction::Sha3_384)),
    ("SHA3-512", OneStepAuxFunction::Hash(HashFunction::Sha3_512)),
    ("HMAC-SHA-1", OneStepAuxFunction::Hmac(HashFunction::Sha1)),
    ("HMAC-SHA2-224", OneStepAuxFunction::Hmac(HashFunction::Sha2_224)),
    ("HMAC-SHA2-256", OneStepAuxFunction::Hmac(HashFunction::Sha2_256)),
    ("HMAC-SHA2-384", OneStepAuxFunction::Hmac(HashFunction::Sha2_384)),
    ("HMAC-SHA2-512", OneStepAuxFunction::Hmac(HashFunction::Sha2_512)),
    ("HMAC-SHA2-512/224", OneStepAuxFunction::Hmac(HashFunction::Sha2_512_224)),
    ("HMAC-SHA2-512/256", OneStepAuxFunction::Hmac(HashFunction::Sha2_512_256)),
    ("HMAC-SHA3-224", OneStepAuxFunction::Hmac(HashFunction::Sha3_224)),
    ("HMAC-SHA3-256", OneStepAuxFunction::Hmac(HashFunction::Sha3_256)),
    ("HMAC-SHA3-384", OneStepAuxFunction::Hmac(HashFunction::Sha3_384)),
    ("HMAC-SHA3-512", OneStepAuxFunction::Hmac(HashFunction::Sha3_512)),
    ("KMAC-128", OneStepAuxFunction::Kmac128),
    ("KMAC-256", OneStepAuxFunction::Kmac256),
];

/// Key-derivation construction names
pub const KDF_NAMES: &[(&str, KdfKind)] = &[
    ("oneStep", KdfKind::OneStep),
    ("oneStepNoCounter", KdfKind::OneStepNoCounter),
    ("twoStep", KdfKind::TwoStep),
    ("HKDF", KdfKind::Hkdf),
    ("IKEv1", KdfKind::IkeV1),
    ("IKEv2", KdfKind::IkeV2),
    ("TLS-v1.2", KdfKind::Tls12),
];

/// Two-step KDF PRF names
pub const TWO_STEP_MAC_NAMES: &[(&str, TwoStepMac)] = &[
    ("HMAC-SHA-1", TwoStepMac::Hmac(HashFunction::Sha1)),
    ("HMAC-SHA2-224", TwoStepMac::Hmac(HashFunction::Sha2_224)),
    ("HMAC-SHA2-256", TwoStepMac::Hmac(HashFunction::Sha2_256)),
    ("HMAC-SHA2-384", TwoStepMac::Hmac(HashFunction::Sha2_384)),
    ("HMAC-SHA2-512", TwoStepMac::Hmac(HashFunction::Sha2_512)),
    ("HMAC-SHA2-512/224", TwoStepMac::Hmac(HashFunction::Sha2_512_224)),
    ("HMAC-SHA2-512/256", TwoStepMac::Hmac(HashFunction::Sha2_512_256)),
    ("HMAC-SHA3-224", TwoStepMac::Hmac(HashFunction::Sha3_224)),
    ("HMAC-SHA3-256", TwoStepMac::Hmac(HashFunction::Sha3_256)),
    ("HMAC-SHA3-384", TwoStepMac::Hmac(HashFunction::Sha3_384)),
    ("HMAC-SHA3-512", TwoStepMac::Hmac(HashFunction::Sha3_512)),
    ("CMAC-AES128", TwoStepMac::Cmac(AesKeySize::Aes128)),
    ("CMAC-AES192", TwoStepMac::Cmac(AesKeySize::Aes192)),
    ("CMAC-AES256", TwoStepMac::Cmac(AesKeySize::Aes256)),
];

/// SP 800-108 expansion mode names
pub const KDF_MODE_NAMES: &[(&str, KdfMode)] = &[
    ("counter", KdfMode::Counter),
    ("feedback", KdfMode::Feedback),
    ("double pipeline iteration", KdfMode::DoublePipeline),
];

/// Counter location names. The middle location is keyed with offset 0; the
/// actual offset is supplied separately.
pub const COUNTER_LOCATION_NAMES: &[(&str, CounterLocation)] = &[
    ("none", CounterLocation::None),
    ("before fixed data", CounterLocation::BeforeFixedData),
    ("after fixed data", CounterLocation::AfterFixedData),
    ("middle fixed data", CounterLocation::MiddleFixedData(0)),
    ("before iterator", CounterLocation::BeforeIterator),
];

const COUNTER_LOCATIONS: [CounterLocation; 5] = [
    CounterLocation::None,
    CounterLocation::BeforeFixedData,
    CounterLocation::AfterFixedData,
    CounterLocation::MiddleFixedData(0),
    CounterLocation::BeforeIterator,
];

fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Option<T> {
    table.iter().find(|(n, _)| *n == name).map(|(_, tag)| *tag)
}

fn reverse<T: PartialEq>(table: &[(&'static str, T)], tag: &T) -> Option<&'static str> {
    table.iter().find(|(_, t)| t == tag).map(|(n, _)| *n)
}

/// Resolve an FFC or ECC scheme name.
#[must_use]
pub fn scheme_from_name(name: &str) -> Option<(DomainFamily, SchemeVariant)> {
    lookup(FFC_SCHEME_NAMES, name)
        .map(|s| (DomainFamily::Ffc, s))
        .or_else(|| lookup(ECC_SCHEME_NAMES, name).map(|s| (DomainFamily::Ecc, s)))
}

/// The standard name of `scheme` in `family`.
#[must_use]
pub fn scheme_name(family: DomainFamily, scheme: SchemeVariant) -> Option<&'static str> {
    match family {
        DomainFamily::Ffc => reverse(FFC_SCHEME_NAMES, &scheme),
        DomainFamily::Ecc => reverse(ECC_SCHEME_NAMES, &scheme),
    }
}

/// Resolve a hash name.
#[must_use]
pub fn hash_from_name(name: &str) -> Option<HashFunction> {
    lookup(HASH_NAMES, name)
}

/// Resolve a MAC name.
#[must_use]
pub fn mac_from_name(name: &str) -> Option<MacAlgorithm> {
    lookup(MAC_NAMES, name)
}

/// Resolve a curve name.
#[must_use]
pub fn curve_from_name(name: &str) -> Option<NamedCurve> {
    lookup(CURVE_NAMES, name)
}

/// Resolve a one-step auxiliary function name.
#[must_use]
pub fn one_step_aux_from_name(name: &str) -> Option<OneStepAuxFunction> {
    lookup(ONE_STEP_AUX_NAMES, name)
}

/// Resolve a KDF construction name.
#[must_use]
pub fn kdf_from_name(name: &str) -> Option<KdfKind> {
    lookup(KDF_NAMES, name)
}

/// The standard name of a KDF construction.
#[must_use]
pub fn kdf_name(kind: KdfKind) -> &'static str {
    reverse(KDF_NAMES, &kind).unwrap_or("unnamed")
}

/// Resolve a two-step PRF name.
#[must_use]
pub fn two_step_mac_from_name(name: &str) -> Option<TwoStepMac> {
    lookup(TWO_STEP_MAC_NAMES, name)
}

/// Resolve an SP 800-108 expansion mode name.
#[must_use]
pub fn kdf_mode_from_name(name: &str) -> Option<KdfMode> {
    lookup(KDF_MODE_NAMES, name)
}

/// Resolve a counter location name. `middle_offset` is the bit offset used
/// when the name is `middle fixed data`.
#[must_use]
pub fn counter_location_from_name(name: &str, middle_offset: usize) -> Option<CounterLocation> {
    lookup(COUNTER_LOCATION_NAMES, name).map(|location| match location {
        CounterLocation::MiddleFixedData(_) => CounterLocation::MiddleFixedData(middle_offset),
        other => other,
    })
}

/// The standard name of a counter location, ignoring any middle offset.
#[must_use]
pub fn counter_location_name(location: CounterLocation) -> Option<&'static str> {
    let key = match location {
        CounterLocation::MiddleFixedData(_) => CounterLocation::MiddleFixedData(0),
        other => other,
    };
    reverse(COUNTER_LOCATION_NAMES, &key)
}

fn all_macs() -> Vec<MacAlgorithm> {
    let sizes = [AesKeySize::Aes128, AesKeySize::Aes192, AesKeySize::Aes256];
    let mut macs: Vec<MacAlgorithm> =
        HashFunction::ALL.iter().map(|h| MacAlgorithm::Hmac(*h)).collect();
    macs.extend(sizes.iter().map(|s| MacAlgorithm::Cmac(*s)));
    macs.extend([MacAlgorithm::Kmac128, MacAlgorithm::Kmac256]);
    macs.extend(sizes.iter().map(|s| MacAlgorithm::AesCcm(*s)));
    macs
}

fn all_one_step_aux() -> Vec<OneStepAuxFunction> {
    let mut aux: Vec<OneStepAuxFunction> =
        HashFunction::ALL.iter().map(|h| OneStepAuxFunction::Hash(*h)).collect();
    aux.extend(HashFunction::ALL.iter().map(|h| OneStepAuxFunction::Hmac(*h)));
    aux.extend([OneStepAuxFunction::Kmac128, OneStepAuxFunction::Kmac256]);
    aux
}

fn all_two_step_macs() -> Vec<TwoStepMac> {
    let mut macs: Vec<TwoStepMac> =
        HashFunction::ALL.iter().map(|h| TwoStepMac::Hmac(*h)).collect();
    macs.extend(
        [AesKeySize::Aes128, AesKeySize::Aes192, AesKeySize::Aes256].map(TwoStepMac::Cmac),
    );
    macs
}

fn check_table<T: Copy + Eq + Hash + std::fmt::Debug>(
    label: &str,
    table: &[(&str, T)],
    tags: &[T],
) -> Result<()> {
    let mut names = HashSet::new();
    let mut seen = HashSet::new();
    for (name, tag) in table {
        if !names.insert(*name) {
            return Err(KasError::config(format!("{} table names `{}` twice", label, name)));
        }
        if !seen.insert(*tag) {
            return Err(KasError::config(format!("{} table maps {:?} twice", label, tag)));
        }
    }
    if let Some(missing) = tags.iter().find(|t| !seen.contains(*t)) {
        return Err(KasError::config(format!("{} table has no name for {:?}", label, missing)));
    }
    Ok(())
}

/// Verify every table covers its full tag set with unique names.
///
/// # Errors
/// Returns a configuration error naming the first gap or duplicate.
pub fn check_name_tables() -> Result<()> {
    check_table("FFC scheme", FFC_SCHEME_NAMES, &SchemeVariant::ALL)?;
    check_table("ECC scheme", ECC_SCHEME_NAMES, &SchemeVariant::ALL)?;
    check_table("hash", HASH_NAMES, &HashFunction::ALL)?;
    check_table("MAC", MAC_NAMES, &all_macs())?;
    check_table("curve", CURVE_NAMES, &NamedCurve::ALL)?;
    check_table("one-step auxiliary function", ONE_STEP_AUX_NAMES, &all_one_step_aux())?;
    check_table("KDF", KDF_NAMES, &KdfKind::ALL)?;
    check_table("two-step MAC", TWO_STEP_MAC_NAMES, &all_two_step_macs())?;
    check_table("KDF mode", KDF_MODE_NAMES, &KdfMode::ALL)?;
    check_table("counter location", COUNTER_LOCATION_NAMES, &COUNTER_LOCATIONS)
}
