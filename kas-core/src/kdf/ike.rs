//! IKE key derivation (SP 800-135 §4.1)
//!
//! Both versions key an HMAC "prf" with the concatenated nonces to turn the
//! shared secret into a seed key, then derive from it with the exchange's
//! cookies or SPIs. FixedInfo is not used.

use super::block_count;
use kas_prelude::error::{KasError, Result};
use kas_primitives::mac::hmac;
use kas_primitives::{HashFunction, SecureBytes};
use zeroize::Zeroizing;

/// IKEv1 with digital-signature authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IkeV1Parameters {
    /// prf hash
    pub hash: HashFunction,
    /// `Ni_b`
    pub initiator_nonce: Vec<u8>,
    /// `Nr_b`
    pub responder_nonce: Vec<u8>,
    /// `CKY-I`
    pub initiator_cookie: Vec<u8>,
    /// `CKY-R`
    pub responder_cookie: Vec<u8>,
}

/// The four IKEv1 keys.
#[derive(Debug, Clone)]
pub struct IkeV1Keys {
    /// `SKEYID = prf(Ni_b | Nr_b, g^xy)`
    pub skeyid: SecureBytes,
    /// `SKEYID_d = prf(SKEYID, g^xy | CKY-I | CKY-R | 0)`
    pub skeyid_d: SecureBytes,
    /// `SKEYID_a = prf(SKEYID, SKEYID_d | g^xy | CKY-I | CKY-R | 1)`
    pub skeyid_a: SecureBytes,
    /// `SKEYID_e = prf(SKEYID, SKEYID_a | g^xy | CKY-I | CKY-R | 2)`
    pub skeyid_e: SecureBytes,
}

impl IkeV1Parameters {
    /// New IKEv1 parameters.
    #[must_use]
    pub fn new(
        hash: HashFunction,
        initiator_nonce: &[u8],
        responder_nonce: &[u8],
        initiator_cookie: &[u8],
        responder_cookie: &[u8],
    ) -> Self {
        Self {
            hash,
            initiator_nonce: initiator_nonce.to_vec(),
            responder_nonce: responder_nonce.to_vec(),
            initiator_cookie: initiator_cookie.to_vec(),
            responder_cookie: responder_cookie.to_vec(),
        }
    }

    pub(crate) fn validate(&self, l: usize) -> Result<()> {
        if self.initiator_nonce.is_empty() || self.responder_nonce.is_empty() {
            return Err(KasError::config("IKEv1 nonces must not be empty"));
        }
        if l > self.hash.output_bits() {
            return Err(KasError::config(format!(
                "IKEv1 DKM is SKEYID_d, at most {} bits",
                self.hash.output_bits()
            )));
        }
        Ok(())
    }

    /// Compute all four keys from `g^xy`.
    ///
    /// # Errors
    /// Propagates HMAC failures.
    pub fn derive_keys(&self, z: &[u8]) -> Result<IkeV1Keys> {
        let nonces = Zeroizing::new([&self.initiator_nonce[..], &self.responder_nonce[..]].concat());
        let skeyid = SecureBytes::new(hmac(self.hash, &nonces, &[z])?);
        let (cky_i, cky_r) = (&self.initiator_cookie[..], &self.responder_cookie[..]);
        let skeyid_d = SecureBytes::new(hmac(self.hash, &skeyid, &[z, cky_i, cky_r, &[0]])?);
        let skeyid_a =
            SecureBytes::new(hmac(self.hash, &skeyid, &[&skeyid_d, z, cky_i, cky_r, &[1]])?);
        let skeyid_e =
            SecureBytes::new(hmac(self.hash, &skeyid, &[&skeyid_a, z, cky_i, cky_r, &[2]])?);
        Ok(IkeV1Keys { skeyid, skeyid_d, skeyid_a, skeyid_e })
    }

    pub(crate) fn derive(&self, z: &[u8], _l: usize) -> Result<Vec<u8>> {
        Ok(self.derive_keys(z)?.skeyid_d.to_vec())
    }
}

/// IKEv2 (RFC 7296 §2.14).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IkeV2Parameters {
    /// prf hash
    pub hash: HashFunction,
    /// `Ni`
    pub initiator_nonce: Vec<u8>,
    /// `Nr`
    pub responder_nonce: Vec<u8>,
    /// `SPIi`
    pub initiator_spi: Vec<u8>,
    /// `SPIr`
    pub responder_spi: Vec<u8>,
}

impl IkeV2Parameters {
    /// New IKEv2 parameters.
    #[must_use]
    pub fn new(
        hash: HashFunction,
        initiator_nonce: &[u8],
        responder_nonce: &[u8],
        initiator_spi: &[u8],
        responder_spi: &[u8],
    ) -> Self {
        Self {
            hash,
            initiator_nonce: initiator_nonce.to_vec(),
            responder_nonce: responder_nonce.to_vec(),
            initiator_spi: initiator_spi.to_vec(),
            responder_spi: responder_spi.to_vec(),
        }
    }

    pub(crate) fn validate(&self, l: usize) -> Result<()> {
        if self.initiator_nonce.is_empty() || self.responder_nonce.is_empty() {
            return Err(KasError::config("IKEv2 nonces must not be empty"));
        }
        block_count(l, self.hash.output_bits(), 255, "IKEv2 prf+").map(|_| ())
    }

    /// `SKEYSEED = prf(Ni | Nr, g^ir)`
    ///
    /// # Errors
    /// Propagates HMAC failures.
    pub fn skeyseed(&self, z: &[u8]) -> Result<SecureBytes> {
        let nonces = Zeroizing::new([&self.initiator_nonce[..], &self.responder_nonce[..]].concat());
        Ok(SecureBytes::new(hmac(self.hash, &nonces, &[z])?))
    }

    /// `prf+(K, S)`: `T1 = prf(K, S | 0x01)`, `Tn = prf(K, Tn-1 | S | n)`.
    fn prf_plus(&self, key: &[u8], seed: &[u8], l: usize) -> Result<Vec<u8>> {
        let n = block_count(l, self.hash.output_bits(), 255, "IKEv2 prf+")?;
        let mut out = Vec::new();
        let mut previous: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::new());
        for i in 1..=n {
            let counter = u8::try_from(i).map_err(|_| KasError::config("prf+ counter overflow"))?;
            *previous = hmac(self.hash, key, &[&previous, seed, &[counter]])?;
            out.extend_from_slice(&previous);
        }
        Ok(out)
    }

    pub(crate) fn derive(&self, z: &[u8], l: usize) -> Result<Vec<u8>> {
        let skeyseed = self.skeyseed(z)?;
        let seed = [
            &self.initiator_nonce[..],
            &self.responder_nonce[..],
            &self.initiator_spi[..],
            &self.responder_spi[..],
        ]
        .concat();
        self.prf_plus(&skeyseed, &seed, l)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn v1() -> IkeV1Parameters {
        IkeV1Parameters::new(HashFunction::Sha2_256, b"ni", b"nr", &[1; 8], &[2; 8])
    }

    #[test]
    fn test_ikev1_chain() {
        let keys = v1().derive_keys(b"gxy").unwrap();
        let skeyid = hmac(HashFunction::Sha2_256, b"ninr", &[b"gxy"]).unwrap();
        assert_eq!(keys.skeyid.as_slice(), skeyid.as_slice());
        let d = hmac(HashFunction::Sha2_256, &skeyid, &[b"gxy", &[1; 8], &[2; 8], &[0]]).unwrap();
        assert_eq!(keys.skeyid_d.as_slice(), d.as_slice());
        assert_ne!(keys.skeyid_a, keys.skeyid_e);
        assert_eq!(v1().derive(b"gxy", 256).unwrap(), d);
    }

    #[test]
    fn test_ikev1_length_limited_to_one_block() {
        assert!(v1().validate(256).is_ok());
        assert!(v1().validate(257).is_err());
    }

    #[test]
    fn test_ikev2_prf_plus_layout() {
        let params = IkeV2Parameters::new(HashFunction::Sha1, b"ni", b"nr", b"si", b"sr");
        let out = params.derive(b"gir", 320).unwrap();
        let seed = hmac(HashFunction::Sha1, b"ninr", &[b"gir"]).unwrap();
        let t1 = hmac(HashFunction::Sha1, &seed, &[b"ninrsisr", &[1]]).unwrap();
        let t2 = hmac(HashFunction::Sha1, &seed, &[&t1, b"ninrsisr", &[2]]).unwrap();
        assert_eq!(out, [t1, t2].concat());
    }

    #[test]
    fn test_ikev2_rejects_empty_nonce() {
        let params = IkeV2Parameters::new(HashFunction::Sha1, b"", b"nr", b"si", b"sr");
        assert!(params.validate(160).is_err());
    }
}
