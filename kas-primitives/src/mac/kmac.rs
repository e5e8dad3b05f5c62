#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![allow(clippy::arithmetic_side_effects)]

//! KMAC (SP 800-185)
//!
//! KMAC128/256 built on the cSHAKE cores of the `sha3` crate:
//!
//! `KMAC(K, X, L, S) = cSHAKE(bytepad(encode_string(K), rate) || X || right_encode(L), L, "KMAC", S)`
//!
//! The requested length `L` is bound into the input, so KMAC output is never a
//! truncation of a longer KMAC output.

use kas_prelude::error::{KasError, Result};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{CShake128, CShake128Core, CShake256, CShake256Core};
use tracing::instrument;

/// cSHAKE128 rate in bytes
pub const KMAC128_RATE: usize = 168;
/// cSHAKE256 rate in bytes
pub const KMAC256_RATE: usize = 136;

/// KMAC security level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KmacVariant {
    /// KMAC128
    Kmac128,
    /// KMAC256
    Kmac256,
}

impl KmacVariant {
    /// Rate of the underlying sponge, used by `bytepad`.
    #[must_use]
    pub const fn rate(self) -> usize {
        match self {
            KmacVariant::Kmac128 => KMAC128_RATE,
            KmacVariant::Kmac256 => KMAC256_RATE,
        }
    }
}

fn integer_bytes(x: u64) -> Vec<u8> {
    let bytes = x.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count().min(bytes.len() - 1);
    bytes.get(skip..).map(<[u8]>::to_vec).unwrap_or_default()
}

/// `left_encode(x)`: byte count followed by the big-endian value.
#[must_use]
pub fn left_encode(x: u64) -> Vec<u8> {
    let body = integer_bytes(x);
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(body.len() as u8);
    out.extend_from_slice(&body);
    out
}

/// `right_encode(x)`: big-endian value followed by its byte count.
#[must_use]
pub fn right_encode(x: u64) -> Vec<u8> {
    let mut out = integer_bytes(x);
    out.push(out.len() as u8);
    out
}

/// `encode_string(S) = left_encode(bitlen(S)) || S`
#[must_use]
pub fn encode_string(s: &[u8]) -> Vec<u8> {
    let mut out = left_encode((s.len() as u64) * 8);
    out.extend_from_slice(s);
    out
}

/// `bytepad(X, w)`: prefix `left_encode(w)` and zero-fill to a multiple of `w`.
#[must_use]
pub fn bytepad(x: &[u8], w: usize) -> Vec<u8> {
    let mut out = left_encode(w as u64);
    out.extend_from_slice(x);
    while out.len() % w != 0 {
        out.push(0);
    }
    out
}

/// KMAC of `data` under `key`, producing exactly `output_bits` bits.
///
/// A non-byte-multiple `output_bits` is rounded up to whole bytes and the
/// trailing bits are cleared.
///
/// # Errors
/// Returns a configuration error for a zero output length.
#[instrument(level = "debug", skip(key, data, customization), fields(variant = ?variant, key_len = key.len(), output_bits))]
pub fn kmac(
    variant: KmacVariant,
    key: &[u8],
    data: &[u8],
    output_bits: usize,
    customization: &[u8],
) -> Result<Vec<u8>> {
    if output_bits == 0 {
        return Err(KasError::config("KMAC output length must be positive"));
    }
    let mut out = vec![0u8; output_bits.div_ceil(8)];
    let padded_key = bytepad(&encode_string(key), variant.rate());
    let length_suffix = right_encode(output_bits as u64);

    match variant {
        KmacVariant::Kmac128 => {
            let core = CShake128Core::new_with_function_name(b"KMAC", customization);
            let mut xof = CShake128::from_core(core);
            xof.update(&padded_key);
            xof.update(data);
            xof.update(&length_suffix);
            xof.finalize_xof().read(&mut out);
        }
        KmacVariant::Kmac256 => {
            let core = CShake256Core::new_with_function_name(b"KMAC", customization);
            let mut xof = CShake256::from_core(core);
            xof.update(&padded_key);
            xof.update(data);
            xof.update(&length_suffix);
            xof.finalize_xof().read(&mut out);
        }
    }

    let rem = output_bits % 8;
    if rem != 0 {
        if let Some(last) = out.last_mut() {
            *last &= 0xFFu8 << (8 - rem);
        }
    }
    Ok(out)
}
