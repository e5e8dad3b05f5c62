//! Public-key validation (SP 800-56A §5.6.2.3)
//!
//! Full validation of FFC and ECC public keys. Usable standalone, so a
//! test-generation layer can probe deliberately invalid keys with
//! [`ValidationMode::Lenient`], and by the scheme engine, which always runs
//! [`ValidationMode::Strict`] on every counterpart key before it touches a
//! private scalar.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use crate::types::{KasDomain, PublicKey};
use kas_prelude::error::{KasError, Result};
use kas_primitives::{EccCurve, EccPoint};
use num_bigint::BigUint;
use num_traits::One;
use tracing::instrument;

/// How a failed check is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationMode {
    /// Fail with [`KasError::PublicKeyValidation`]
    #[default]
    Strict,
    /// Return `Ok(false)`
    Lenient,
}

fn reject(mode: ValidationMode, reason: &str) -> Result<bool> {
    match mode {
        ValidationMode::Strict => Err(KasError::PublicKeyValidation(reason.to_string())),
        ValidationMode::Lenient => Ok(false),
    }
}

/// FFC full public-key validation: `2 <= y <= p-2` and `y^q mod p = 1`.
///
/// # Errors
/// In strict mode, returns `PublicKeyValidation` naming the failed check.
#[instrument(level = "debug", skip_all, fields(p_bits = p.bits(), mode = ?mode))]
pub fn validate_ffc_public_key(
    p: &BigUint,
    q: &BigUint,
    y: &BigUint,
    mode: ValidationMode,
) -> Result<bool> {
    let two = BigUint::from(2u32);
    if p <= &two {
        return Err(KasError::config("FFC modulus too small for validation"));
    }
    let upper = p - 2u32;
    if y < &two || y > &upper {
        return reject(mode, "FFC public key outside [2, p-2]");
    }
    if !y.modpow(q, p).is_one() {
        return reject(mode, "FFC public key not in the order-q subgroup");
    }
    Ok(true)
}

/// ECC full public-key validation: coordinates in range and on the curve,
/// then `n * Q = O`.
///
/// The curve-equation check runs first, so an off-curve point never reaches
/// the scalar multiplication.
///
/// # Errors
/// In strict mode, returns `PublicKeyValidation` naming the failed check.
#[instrument(level = "debug", skip_all, fields(curve = ?curve.name(), mode = ?mode))]
pub fn validate_ecc_public_key(
    curve: &EccCurve,
    point: &EccPoint,
    mode: ValidationMode,
) -> Result<bool> {
    if !curve.contains(point) {
        return reject(mode, "ECC public key is not on the curve");
    }
    if !curve.has_order_n(point) {
        return reject(mode, "ECC public key does not have order n");
    }
    Ok(true)
}

/// Validate `key` against `domain`. A key of the other family is rejected
/// as a validation failure.
///
/// # Errors
/// In strict mode, returns `PublicKeyValidation` for any failed check.
pub fn validate_public_key(
    domain: &KasDomain,
    key: &PublicKey,
    mode: ValidationMode,
) -> Result<bool> {
    match (domain, key) {
        (KasDomain::Ffc(params), PublicKey::Ffc(y)) => {
            validate_ffc_public_key(params.p(), params.q(), y, mode)
        }
        (KasDomain::Ecc(curve), PublicKey::Ecc(point)) => {
            validate_ecc_public_key(curve, point, mode)
        }
        _ => reject(mode, "public key belongs to a different domain family"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kas_primitives::NamedCurve;

    fn p() -> BigUint {
        23u32.into()
    }

    fn q() -> BigUint {
        11u32.into()
    }

    #[test]
    fn test_ffc_subgroup_member_accepted() {
        // 18 = 4^3 mod 23 lies in the order-11 subgroup
        assert!(validate_ffc_public_key(&p(), &q(), &18u32.into(), ValidationMode::Strict).unwrap());
    }

    #[test]
    fn test_ffc_boundaries_rejected() {
        for y in [0u32, 1, 22, 23, 100] {
            let result =
                validate_ffc_public_key(&p(), &q(), &y.into(), ValidationMode::Lenient).unwrap();
            assert!(!result, "y = {}", y);
        }
    }

    #[test]
    fn test_ffc_wrong_subgroup_strict_error() {
        // 5 generates the full group of order 22
        let err =
            validate_ffc_public_key(&p(), &q(), &5u32.into(), ValidationMode::Strict).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_ecc_generator_accepted() {
        let curve = NamedCurve::P256.curve().unwrap();
        assert!(validate_ecc_public_key(&curve, curve.generator(), ValidationMode::Strict).unwrap());
    }

    #[test]
    fn test_ecc_off_curve_rejected() {
        let curve = NamedCurve::P256.curve().unwrap();
        let g = curve.generator();
        let bad = EccPoint::new(g.x.clone(), &g.y + 1u32);
        assert!(!validate_ecc_public_key(&curve, &bad, ValidationMode::Lenient).unwrap());
        let err = validate_ecc_public_key(&curve, &bad, ValidationMode::Strict).unwrap_err();
        assert!(matches!(err, KasError::PublicKeyValidation(ref m) if m.contains("not on the curve")));
    }

    #[test]
    fn test_family_mismatch_is_validation_failure() {
        let domain = KasDomain::named_curve(NamedCurve::P224).unwrap();
        let key = PublicKey::Ffc(18u32.into());
        assert!(validate_public_key(&domain, &key, ValidationMode::Strict).unwrap_err().is_validation());
    }
}
