#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! HMAC (Hash-based Message Authentication Code)
//!
//! FIPS 198-1 HMAC over any [`HashFunction`], delegated to the RustCrypto
//! `hmac` crate. The formula is H((K ⊕ opad) || H((K ⊕ ipad) || text)).
//!
//! Unlike a general-purpose MAC API, an empty key is accepted: the KDF salts
//! and IKE nonces fed in as keys are caller-controlled and may be empty.

use crate::hash::{with_digest, HashFunction};
use kas_prelude::error::{KasError, Result};
use tracing::instrument;

/// HMAC over the concatenation of `parts`.
///
/// # Errors
/// Returns an error only if the underlying crate rejects the key.
#[instrument(level = "debug", skip(key, parts), fields(hash = %hash, key_len = key.len()))]
pub fn hmac(hash: HashFunction, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>> {
    use ::hmac::{Hmac, Mac};

    with_digest!(hash, D => {
        let mut mac = <Hmac<D> as Mac>::new_from_slice(key)
            .map_err(|_e| KasError::config(format!("Invalid HMAC-{} key", hash)))?;
        for part in parts {
            mac.update(part);
        }
        Ok(mac.finalize().into_bytes().to_vec())
    })
}

/// Verify an HMAC tag (possibly truncated) in constant time.
#[must_use]
pub fn verify_hmac(hash: HashFunction, key: &[u8], data: &[u8], tag: &[u8]) -> bool {
    match hmac(hash, key, &[data]) {
        Ok(full) => match full.get(..tag.len()) {
            Some(prefix) if !tag.is_empty() => crate::security::secure_compare(prefix, tag),
            _ => false,
        },
        Err(_) => false,
    }
}
