//! TLS 1.2 key derivation (RFC 5246 §5, §8.1; RFC 7627)

use kas_prelude::error::{KasError, Result};
use kas_primitives::mac::hmac;
use kas_primitives::{HashFunction, SecureBytes};
use zeroize::Zeroizing;

/// Master secret length in bytes
pub const MASTER_SECRET_LEN: usize = 48;

/// TLS 1.2 parameters. DKM is the key block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tls12Parameters {
    /// PRF hash: SHA2-256, SHA2-384 or SHA2-512
    pub hash: HashFunction,
    /// `ClientHello.random`
    pub client_random: Vec<u8>,
    /// `ServerHello.random`
    pub server_random: Vec<u8>,
    /// Session hash; selects the extended master secret when present
    pub session_hash: Option<Vec<u8>>,
}

impl Tls12Parameters {
    /// New parameters using the classic master secret.
    #[must_use]
    pub fn new(hash: HashFunction, client_random: &[u8], server_random: &[u8]) -> Self {
        Self {
            hash,
            client_random: client_random.to_vec(),
            server_random: server_random.to_vec(),
            session_hash: None,
        }
    }

    /// Derive the extended master secret over `session_hash`.
    #[must_use]
    pub fn with_session_hash(mut self, session_hash: &[u8]) -> Self {
        self.session_hash = Some(session_hash.to_vec());
        self
    }

    pub(crate) fn validate(&self, _l: usize) -> Result<()> {
        if !matches!(
            self.hash,
            HashFunction::Sha2_256 | HashFunction::Sha2_384 | HashFunction::Sha2_512
        ) {
            return Err(KasError::config(format!("TLS 1.2 PRF does not use {}", self.hash)));
        }
        if self.client_random.is_empty() || self.server_random.is_empty() {
            return Err(KasError::config("TLS randoms must not be empty"));
        }
        Ok(())
    }

    /// `P_hash(secret, label || seed)` truncated to `len` bytes.
    fn prf(&self, secret: &[u8], label: &[u8], seed: &[&[u8]], len: usize) -> Result<Vec<u8>> {
        let label_seed = [&[label][..], seed].concat().concat();
        let mut out = Vec::with_capacity(len + self.hash.output_len());
        let mut a = Zeroizing::new(label_seed.clone());
        while out.len() < len {
            *a = hmac(self.hash, secret, &[&a])?;
            out.extend(hmac(self.hash, secret, &[&a, &label_seed])?);
        }
        out.truncate(len);
        Ok(out)
    }

    /// The 48-byte master secret from the pre-master secret `z`.
    ///
    /// # Errors
    /// Propagates HMAC failures.
    pub fn master_secret(&self, z: &[u8]) -> Result<SecureBytes> {
        let secret = match &self.session_hash {
            Some(hash) => self.prf(z, b"extended master secret", &[hash], MASTER_SECRET_LEN)?,
            None => self.prf(
                z,
                b"master secret",
                &[&self.client_random, &self.server_random],
                MASTER_SECRET_LEN,
            )?,
        };
        Ok(SecureBytes::new(secret))
    }

    pub(crate) fn derive(&self, z: &[u8], l: usize) -> Result<Vec<u8>> {
        let master = self.master_secret(z)?;
        self.prf(
            &master,
            b"key expansion",
            &[&self.server_random, &self.client_random],
            l.div_ceil(8),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prf_expansion_layout() {
        let params = Tls12Parameters::new(HashFunction::Sha2_256, b"cr", b"sr");
        let out = params.prf(b"secret", b"lbl", &[b"seed"], 40).unwrap();
        let a1 = hmac(HashFunction::Sha2_256, b"secret", &[b"lblseed"]).unwrap();
        let a2 = hmac(HashFunction::Sha2_256, b"secret", &[&a1]).unwrap();
        let p1 = hmac(HashFunction::Sha2_256, b"secret", &[&a1, b"lblseed"]).unwrap();
        let p2 = hmac(HashFunction::Sha2_256, b"secret", &[&a2, b"lblseed"]).unwrap();
        assert_eq!(out, [p1, p2].concat()[..40].to_vec());
    }

    #[test]
    fn test_master_secret_length_and_extended_variant() {
        let params = Tls12Parameters::new(HashFunction::Sha2_384, &[1; 32], &[2; 32]);
        let classic = params.master_secret(b"premaster").unwrap();
        let extended =
            params.clone().with_session_hash(&[3; 48]).master_secret(b"premaster").unwrap();
        assert_eq!(classic.len(), MASTER_SECRET_LEN);
        assert_ne!(classic, extended);
    }

    #[test]
    fn test_rejects_non_sha2_prf() {
        let params = Tls12Parameters::new(HashFunction::Sha3_256, &[1; 32], &[2; 32]);
        assert!(params.validate(256).is_err());
        let params = Tls12Parameters::new(HashFunction::Sha1, &[1; 32], &[2; 32]);
        assert!(params.validate(256).is_err());
    }
}
