#![deny(unsafe_code)]
#![no_main]

//! Fuzz ECC public-key validation
//!
//! Arbitrary coordinates must never panic, and strict and lenient modes
//! must agree on the verdict.

use kas_core::{validate_ecc_public_key, ValidationMode};
use kas_primitives::{EccPoint, NamedCurve};
use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, coords)) = data.split_first() else {
        return;
    };
    let name = NamedCurve::ALL[usize::from(selector) % NamedCurve::ALL.len()];
    let Ok(curve) = name.curve() else {
        return;
    };
    let (x, y) = coords.split_at(coords.len() / 2);
    let point = EccPoint::new(BigUint::from_bytes_be(x), BigUint::from_bytes_be(y));

    let lenient = validate_ecc_public_key(&curve, &point, ValidationMode::Lenient);
    let strict = validate_ecc_public_key(&curve, &point, ValidationMode::Strict);
    match lenient {
        Ok(valid) => assert_eq!(valid, strict.is_ok(), "modes must agree"),
        Err(_) => assert!(strict.is_err()),
    }
});
