//! Key material and domain types shared by every KAS stage.
//!
//! A [`PartyKeyMaterial`] is supplied per party per invocation. The party
//! whose role the configuration names must carry private keys; its
//! counterpart only needs public values.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use kas_prelude::error::{KasError, Result};
use kas_primitives::{
    EccCurve, EccKeyPair, EccPoint, FfcDomainParameters, FfcKeyPair, NamedCurve, SecureBytes,
};
use num_bigint::BigUint;

/// The two domain families of SP 800-56A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainFamily {
    /// Finite-field cryptography
    Ffc,
    /// Elliptic-curve cryptography
    Ecc,
}

/// Group the key agreement runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KasDomain {
    /// Finite-field domain parameters `(p, q, g)`
    Ffc(FfcDomainParameters),
    /// Prime-field elliptic curve
    Ecc(EccCurve),
}

impl KasDomain {
    /// Domain for a named curve.
    ///
    /// # Errors
    /// Only fails if a built-in curve constant is malformed.
    pub fn named_curve(curve: NamedCurve) -> Result<Self> {
        Ok(KasDomain::Ecc(curve.curve()?))
    }

    /// Which family this domain belongs to
    #[must_use]
    pub fn family(&self) -> DomainFamily {
        match self {
            KasDomain::Ffc(_) => DomainFamily::Ffc,
            KasDomain::Ecc(_) => DomainFamily::Ecc,
        }
    }

    /// Byte length of one encoded field element (and of each half of Z).
    #[must_use]
    pub fn element_len(&self) -> usize {
        match self {
            KasDomain::Ffc(domain) => domain.field_len(),
            KasDomain::Ecc(curve) => curve.field_len(),
        }
    }

    /// Encode a public key: `y` left-padded for FFC, `x || y` for ECC.
    ///
    /// # Errors
    /// Returns a configuration error when the key family differs from the
    /// domain family.
    pub fn encode_public_key(&self, key: &PublicKey) -> Result<Vec<u8>> {
        match (self, key) {
            (KasDomain::Ffc(domain), PublicKey::Ffc(y)) => Ok(domain.encode_element(y)),
            (KasDomain::Ecc(curve), PublicKey::Ecc(point)) => Ok(curve.encode_point(point)),
            _ => Err(KasError::config(format!(
                "{:?} public key used with a {:?} domain",
                key.family(),
                self.family()
            ))),
        }
    }
}

/// A public key of either family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// FFC public value `y`
    Ffc(BigUint),
    /// ECC public point `Q`
    Ecc(EccPoint),
}

impl PublicKey {
    /// Family of this key
    #[must_use]
    pub fn family(&self) -> DomainFamily {
        match self {
            PublicKey::Ffc(_) => DomainFamily::Ffc,
            PublicKey::Ecc(_) => DomainFamily::Ecc,
        }
    }
}

/// A key pair whose private half may be absent (counterpart keys).
///
/// Immutable once built; the private scalar is zeroized on drop.
#[derive(Debug, Clone)]
pub struct KeyPair {
    private: Option<SecureBytes>,
    public: PublicKey,
}

impl KeyPair {
    /// A key pair with both halves. No consistency check is made between
    /// them; use the `From` conversions for derived pairs.
    #[must_use]
    pub fn new(private: &BigUint, public: PublicKey) -> Self {
        Self { private: Some(SecureBytes::new(private.to_bytes_be())), public }
    }

    /// Public half only
    #[must_use]
    pub fn public_only(public: PublicKey) -> Self {
        Self { private: None, public }
    }

    /// Private scalar as big-endian bytes, if held
    #[must_use]
    pub fn private_bytes(&self) -> Option<&SecureBytes> {
        self.private.as_ref()
    }

    /// Whether the private half is present
    #[must_use]
    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }

    /// Public half
    #[must_use]
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// This pair with the private half dropped.
    #[must_use]
    pub fn to_public(&self) -> Self {
        Self::public_only(self.public.clone())
    }
}

impl From<&FfcKeyPair> for KeyPair {
    fn from(pair: &FfcKeyPair) -> Self {
        Self {
            private: Some(pair.private_bytes().clone()),
            public: PublicKey::Ffc(pair.public().clone()),
        }
    }
}

impl From<&EccKeyPair> for KeyPair {
    fn from(pair: &EccKeyPair) -> Self {
        Self {
            private: Some(pair.private_bytes().clone()),
            public: PublicKey::Ecc(pair.public().clone()),
        }
    }
}

/// Key-agreement role; the initiator is party U, the responder party V.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum KeyAgreementRole {
    /// Party U
    Initiator,
    /// Party V
    Responder,
}

impl KeyAgreementRole {
    /// The counterpart's role
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            KeyAgreementRole::Initiator => KeyAgreementRole::Responder,
            KeyAgreementRole::Responder => KeyAgreementRole::Initiator,
        }
    }

    /// `"U"` or `"V"`, as used in key-confirmation message strings
    #[must_use]
    pub fn party_letter(self) -> &'static str {
        match self {
            KeyAgreementRole::Initiator => "U",
            KeyAgreementRole::Responder => "V",
        }
    }
}

/// Everything one party contributes to a key agreement.
#[derive(Debug, Clone, Default)]
pub struct PartyKeyMaterial {
    /// Party identifier `ID_U` / `ID_V`
    pub party_id: Vec<u8>,
    /// Static key pair, if the scheme uses one for this party
    pub static_key: Option<KeyPair>,
    /// Ephemeral key pair, if the scheme uses one for this party
    pub ephemeral_key: Option<KeyPair>,
    /// Ephemeral nonce, standing in as ephemeral data when there is no
    /// ephemeral key
    pub ephemeral_nonce: Option<Vec<u8>>,
    /// Nonce contributed to the derivation through PartyInfo
    pub dkm_nonce: Option<Vec<u8>>,
}

impl PartyKeyMaterial {
    /// Key material for `party_id` with no keys yet.
    #[must_use]
    pub fn new(party_id: impl Into<Vec<u8>>) -> Self {
        Self { party_id: party_id.into(), ..Self::default() }
    }

    /// Set the static key pair.
    #[must_use]
    pub fn with_static_key(mut self, key: KeyPair) -> Self {
        self.static_key = Some(key);
        self
    }

    /// Set the ephemeral key pair.
    #[must_use]
    pub fn with_ephemeral_key(mut self, key: KeyPair) -> Self {
        self.ephemeral_key = Some(key);
        self
    }

    /// Set the ephemeral nonce.
    #[must_use]
    pub fn with_ephemeral_nonce(mut self, nonce: impl Into<Vec<u8>>) -> Self {
        self.ephemeral_nonce = Some(nonce.into());
        self
    }

    /// Set the DKM nonce.
    #[must_use]
    pub fn with_dkm_nonce(mut self, nonce: impl Into<Vec<u8>>) -> Self {
        self.dkm_nonce = Some(nonce.into());
        self
    }

    /// The same material with every private half removed.
    #[must_use]
    pub fn public_view(&self) -> Self {
        Self {
            party_id: self.party_id.clone(),
            static_key: self.static_key.as_ref().map(KeyPair::to_public),
            ephemeral_key: self.ephemeral_key.as_ref().map(KeyPair::to_public),
            ephemeral_nonce: self.ephemeral_nonce.clone(),
            dkm_nonce: self.dkm_nonce.clone(),
        }
    }

    /// `EphemData`: the encoded ephemeral public key, else the ephemeral
    /// nonce, else empty.
    ///
    /// # Errors
    /// Returns a configuration error for a key of the wrong family.
    pub fn ephemeral_data(&self, domain: &KasDomain) -> Result<Vec<u8>> {
        match (&self.ephemeral_key, &self.ephemeral_nonce) {
            (Some(key), _) => domain.encode_public_key(key.public()),
            (None, Some(nonce)) => Ok(nonce.clone()),
            (None, None) => Ok(Vec::new()),
        }
    }

    /// `PartyInfo = ID || EphemData || DKM nonce`
    ///
    /// # Errors
    /// See [`PartyKeyMaterial::ephemeral_data`].
    pub fn party_info(&self, domain: &KasDomain) -> Result<Vec<u8>> {
        let mut info = self.party_id.clone();
        info.extend_from_slice(&self.ephemeral_data(domain)?);
        if let Some(nonce) = &self.dkm_nonce {
            info.extend_from_slice(nonce);
        }
        Ok(info)
    }
}
