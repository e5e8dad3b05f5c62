//! Key confirmation (SP 800-56A §5.9)
//!
//! The MAC key is the leftmost `mac_key_bits` of DKM. The provider P tags
//!
//! ```text
//! MacData = message || ID_P || ID_R || EphemData_P || EphemData_R
//! ```
//!
//! where `message` is `KC_1_U` / `KC_1_V` for unilateral and `KC_2_U` /
//! `KC_2_V` for bilateral confirmation, the letter naming the provider. A
//! recipient computes the tag it expects to receive over the provider's
//! MacData.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use crate::types::{KasDomain, KeyAgreementRole, PartyKeyMaterial};
use kas_prelude::error::{KasError, Result};
use kas_primitives::security::secure_compare;
use kas_primitives::{BitString, MacAlgorithm, MacOptions, SecureBytes};
use tracing::instrument;

/// Shortest tag SP 800-56A permits
pub const MIN_TAG_BITS: usize = 64;

/// KMAC customization string for confirmation
const KC_CUSTOMIZATION: &[u8] = b"KC";

/// One or both parties confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum KeyConfirmationDirection {
    /// Only the provider sends a tag
    Unilateral,
    /// Both parties send a tag
    Bilateral,
}

/// Whether this party sends or checks the unilateral tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum KeyConfirmationRole {
    /// Sends the tag
    Provider,
    /// Receives and checks the tag
    Recipient,
}

/// Key-confirmation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConfirmationParameters {
    /// MAC algorithm, independent of the KDF
    pub mac: MacAlgorithm,
    /// MAC key length taken from DKM
    pub mac_key_bits: usize,
    /// Tag length
    pub tag_bits: usize,
    /// Unilateral or bilateral
    pub direction: KeyConfirmationDirection,
    /// This party's role; ignored for bilateral confirmation
    pub role: KeyConfirmationRole,
    /// Nonce for AES-CCM
    pub ccm_nonce: Option<Vec<u8>>,
}

impl KeyConfirmationParameters {
    /// Bilateral confirmation with the given MAC and sizes.
    #[must_use]
    pub fn new(mac: MacAlgorithm, mac_key_bits: usize, tag_bits: usize) -> Self {
        Self {
            mac,
            mac_key_bits,
            tag_bits,
            direction: KeyConfirmationDirection::Bilateral,
            role: KeyConfirmationRole::Provider,
            ccm_nonce: None,
        }
    }

    /// Unilateral confirmation in the given role.
    #[must_use]
    pub fn unilateral(mut self, role: KeyConfirmationRole) -> Self {
        self.direction = KeyConfirmationDirection::Unilateral;
        self.role = role;
        self
    }

    /// Set the AES-CCM nonce.
    #[must_use]
    pub fn with_ccm_nonce(mut self, nonce: &[u8]) -> Self {
        self.ccm_nonce = Some(nonce.to_vec());
        self
    }

    /// Check the MAC key and tag sizes against the MAC's table entry and
    /// the DKM length `dkm_bits`.
    ///
    /// # Errors
    /// `InvalidKeyLength` for a MAC key the algorithm does not accept;
    /// `Configuration` for any other inconsistency.
    pub fn validate(&self, dkm_bits: usize) -> Result<()> {
        if self.mac_key_bits % 8 != 0 {
            return Err(KasError::config("MAC key length must be a whole number of bytes"));
        }
        self.mac.validate_key_bits(self.mac_key_bits)?;
        if self.mac_key_bits > dkm_bits {
            return Err(KasError::config(format!(
                "MAC key of {} bits exceeds the {}-bit DKM",
                self.mac_key_bits, dkm_bits
            )));
        }
        let max_tag = self.mac.spec().output_bits;
        if self.tag_bits < MIN_TAG_BITS || self.tag_bits > max_tag {
            return Err(KasError::config(format!(
                "tag length {} outside {}..={} for {:?}",
                self.tag_bits, MIN_TAG_BITS, max_tag, self.mac
            )));
        }
        if matches!(self.mac, MacAlgorithm::AesCcm(_)) {
            let nonce = self
                .ccm_nonce
                .as_ref()
                .ok_or_else(|| KasError::config("AES-CCM key confirmation requires a nonce"))?;
            if !(7..=13).contains(&nonce.len()) {
                return Err(KasError::config(format!(
                    "AES-CCM nonce must be 7 to 13 bytes, got {}",
                    nonce.len()
                )));
            }
            if !(32..=128).contains(&self.tag_bits) || self.tag_bits % 16 != 0 {
                return Err(KasError::config(format!(
                    "AES-CCM tag must be an even number of bytes from 4 to 16, got {} bits",
                    self.tag_bits
                )));
            }
        }
        Ok(())
    }

    fn tag(
        &self,
        mac_key: &[u8],
        domain: &KasDomain,
        message: &str,
        provider: &PartyKeyMaterial,
        recipient: &PartyKeyMaterial,
    ) -> Result<Vec<u8>> {
        let mac_data = [
            message.as_bytes(),
            &provider.party_id,
            &recipient.party_id,
            &provider.ephemeral_data(domain)?,
            &recipient.ephemeral_data(domain)?,
        ]
        .concat();
        let options = MacOptions {
            customization: KC_CUSTOMIZATION,
            nonce: self.ccm_nonce.as_deref(),
        };
        self.mac.compute_with(mac_key, &mac_data, self.tag_bits, options)
    }

    /// Compute the tags for the party acting as `own_role`.
    ///
    /// # Errors
    /// Propagates validation and MAC failures.
    #[instrument(level = "debug", skip_all, fields(mac = ?self.mac, direction = ?self.direction, role = ?own_role))]
    pub fn compute(
        &self,
        domain: &KasDomain,
        own_role: KeyAgreementRole,
        dkm: &BitString,
        own: &PartyKeyMaterial,
        other: &PartyKeyMaterial,
    ) -> Result<KeyConfirmationTags> {
        self.validate(dkm.len())?;
        let mac_key = SecureBytes::new(dkm.msb(self.mac_key_bits)?.into_bytes());
        let (own_letter, other_letter) = (own_role.party_letter(), own_role.other().party_letter());

        let (sends, receives, pass) = match (self.direction, self.role) {
            (KeyConfirmationDirection::Bilateral, _) => (true, true, 2),
            (KeyConfirmationDirection::Unilateral, KeyConfirmationRole::Provider) => {
                (true, false, 1)
            }
            (KeyConfirmationDirection::Unilateral, KeyConfirmationRole::Recipient) => {
                (false, true, 1)
            }
        };
        let sent = if sends {
            let message = format!("KC_{}_{}", pass, own_letter);
            Some(self.tag(&mac_key, domain, &message, own, other)?)
        } else {
            None
        };
        let expected = if receives {
            let message = format!("KC_{}_{}", pass, other_letter);
            Some(self.tag(&mac_key, domain, &message, other, own)?)
        } else {
            None
        };
        Ok(KeyConfirmationTags { sent, expected })
    }
}

/// Tags produced by one party.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyConfirmationTags {
    /// Tag this party sends
    pub sent: Option<Vec<u8>>,
    /// Tag this party expects from the counterpart
    pub expected: Option<Vec<u8>>,
}

impl KeyConfirmationTags {
    /// Constant-time check of a received tag against [`Self::expected`].
    #[must_use]
    pub fn verify(&self, received: &[u8]) -> bool {
        self.expected.as_deref().is_some_and(|expected| secure_compare(expected, received))
    }
}
