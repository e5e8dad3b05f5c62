#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # Elliptic Curve Cryptography
//!
//! Prime-field curves for the ECC key-agreement schemes of SP 800-56A.
//!
//! ## Supported Curves
//!
//! - **P-224**, **P-256**, **P-384**, **P-521** (FIPS 186-4 D.1.2)
//!
//! Group arithmetic runs on the RustCrypto `p224`, `p256`, `p384` and `p521`
//! crates. Points cross the API as affine [`EccPoint`]s so range checks and
//! the MQV associate value function can read their coordinates.

mod arith;

/// Curve parameters and named curves
pub mod curve;

pub use curve::{EccCurve, NamedCurve};

use crate::security::SecureBytes;
use kas_prelude::error::{KasError, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

/// A finite affine point. No curve membership is implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EccPoint {
    /// Affine x-coordinate
    pub x: BigUint,
    /// Affine y-coordinate
    pub y: BigUint,
}

impl EccPoint {
    /// A point from its affine coordinates.
    #[must_use]
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self { x, y }
    }
}

/// Inputs to the ECC MQV primitive for the acting party.
///
/// `own_avf` is `avf(Q_e)` of the acting party's ephemeral public key and
/// `other_avf` is `avf(Q_e')` of the counterpart's.
#[derive(Debug, Clone, Copy)]
pub struct EccMqvInputs<'a> {
    /// Static private scalar `d_s`, big-endian
    pub static_private: &'a [u8],
    /// Ephemeral private scalar `k`, big-endian
    pub ephemeral_private: &'a [u8],
    /// Associate value of the own ephemeral public key
    pub own_avf: &'a BigUint,
    /// Counterpart static public key `Q_s'`
    pub other_static_public: &'a EccPoint,
    /// Counterpart ephemeral public key `Q_e'`
    pub other_ephemeral_public: &'a EccPoint,
    /// Associate value of the counterpart ephemeral public key
    pub other_avf: &'a BigUint,
}

/// An ECC key pair `(d, Q = dG)`; the private scalar is zeroized on drop.
#[derive(Clone)]
pub struct EccKeyPair {
    private: SecureBytes,
    public: EccPoint,
}

impl EccKeyPair {
    /// Derive the key pair for private scalar `d`, `1 <= d <= n-1`.
    ///
    /// # Errors
    /// Returns a configuration error when `d` is out of range.
    pub fn from_private(curve: &EccCurve, d: &BigUint) -> Result<Self> {
        if d.is_zero() || d >= curve.order() {
            return Err(KasError::config("ECC private key must be in [1, n-1]"));
        }
        Self::from_private_bytes(curve, SecureBytes::new(d.to_bytes_be()))
    }

    fn from_private_bytes(curve: &EccCurve, private: SecureBytes) -> Result<Self> {
        let public = arith::public_from_private(curve.name(), &private)?;
        Ok(Self { private, public })
    }

    /// Generate a key pair with a uniformly random scalar in `[1, n-1]`.
    ///
    /// # Errors
    /// Only fails if the curve implementation rejects its own scalar.
    pub fn generate<R: RngCore + CryptoRng>(curve: &EccCurve, rng: &mut R) -> Result<Self> {
        let private = arith::random_private(curve.name(), rng);
        Self::from_private_bytes(curve, private)
    }

    /// Private scalar as big-endian bytes
    #[must_use]
    pub fn private_bytes(&self) -> &SecureBytes {
        &self.private
    }

    /// Public point `Q`
    #[must_use]
    pub fn public(&self) -> &EccPoint {
        &self.public
    }
}

impl std::fmt::Debug for EccKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EccKeyPair")
            .field("private", &self.private)
            .field("public", &self.public)
            .finish()
    }
}
