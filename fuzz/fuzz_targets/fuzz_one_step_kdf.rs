#![deny(unsafe_code)]
#![no_main]

//! Fuzz the one-step KDF
//!
//! The first byte selects the auxiliary function and L; the rest is split
//! into Z and FixedInfo. Output must be exactly L bits and deterministic.

use kas_core::{KdfParameter, OneStepAuxFunction, OneStepParameters};
use kas_primitives::{BitString, HashFunction};
use libfuzzer_sys::fuzz_target;

const AUX: [OneStepAuxFunction; 6] = [
    OneStepAuxFunction::Hash(HashFunction::Sha1),
    OneStepAuxFunction::Hash(HashFunction::Sha2_512_256),
    OneStepAuxFunction::Hash(HashFunction::Sha3_384),
    OneStepAuxFunction::Hmac(HashFunction::Sha2_256),
    OneStepAuxFunction::Kmac128,
    OneStepAuxFunction::Kmac256,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let aux = AUX[usize::from(selector) % AUX.len()];
    let l = 1 + usize::from(selector) * 7;
    let split = rest.len() / 2;
    let (z, fixed) = rest.split_at(split);
    let fixed = BitString::from_bytes(fixed);

    for kdf in [
        KdfParameter::OneStep(OneStepParameters::new(aux)),
        KdfParameter::OneStepNoCounter(OneStepParameters::new(aux)),
    ] {
        match kdf.derive(z, &fixed, l) {
            Ok(dkm) => {
                assert_eq!(dkm.len(), l.div_ceil(8), "output must be L bits");
                if l % 8 != 0 {
                    let trailing = 0xFFu8 >> (l % 8);
                    assert_eq!(dkm[dkm.len() - 1] & trailing, 0, "trailing bits must be clear");
                }
                let again = kdf.derive(z, &fixed, l).ok();
                assert_eq!(again.as_deref(), Some(&dkm[..]), "KDF must be deterministic");
            }
            Err(_) => {
                // Only the no-counter variant may refuse, when L exceeds one block
                assert!(matches!(kdf, KdfParameter::OneStepNoCounter(_)));
            }
        }
    }
});
