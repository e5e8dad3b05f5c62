#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Hash Functions
//!
//! SHA-1 and SHA-2 per FIPS 180-4, SHA-3 per FIPS 202. Every hash-based KDF
//! and HMAC in the engine dispatches through [`HashFunction`], so supporting a
//! new digest is one variant plus one arm in `with_digest!`.

use tracing::instrument;

/// Approved hash functions for key derivation and key confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFunction {
    /// SHA-1 (160-bit output)
    Sha1,
    /// SHA2-224
    Sha2_224,
    /// SHA2-256
    Sha2_256,
    /// SHA2-384
    Sha2_384,
    /// SHA2-512
    Sha2_512,
    /// SHA2-512/224
    Sha2_512_224,
    /// SHA2-512/256
    Sha2_512_256,
    /// SHA3-224
    Sha3_224,
    /// SHA3-256
    Sha3_256,
    /// SHA3-384
    Sha3_384,
    /// SHA3-512
    Sha3_512,
}

/// Run `$body` with `$d` bound to the concrete RustCrypto digest type.
macro_rules! with_digest {
    ($hash:expr, $d:ident => $body:expr) => {
        match $hash {
            $crate::hash::HashFunction::Sha1 => {
                type $d = ::sha1::Sha1;
                $body
            }
            $crate::hash::HashFunction::Sha2_224 => {
                type $d = ::sha2::Sha224;
                $body
            }
            $crate::hash::HashFunction::Sha2_256 => {
                type $d = ::sha2::Sha256;
                $body
            }
            $crate::hash::HashFunction::Sha2_384 => {
                type $d = ::sha2::Sha384;
                $body
            }
            $crate::hash::HashFunction::Sha2_512 => {
                type $d = ::sha2::Sha512;
                $body
            }
            $crate::hash::HashFunction::Sha2_512_224 => {
                type $d = ::sha2::Sha512_224;
                $body
            }
            $crate::hash::HashFunction::Sha2_512_256 => {
                type $d = ::sha2::Sha512_256;
                $body
            }
            $crate::hash::HashFunction::Sha3_224 => {
                type $d = ::sha3::Sha3_224;
                $body
            }
            $crate::hash::HashFunction::Sha3_256 => {
                type $d = ::sha3::Sha3_256;
                $body
            }
            $crate::hash::HashFunction::Sha3_384 => {
                type $d = ::sha3::Sha3_384;
                $body
            }
            $crate::hash::HashFunction::Sha3_512 => {
                type $d = ::sha3::Sha3_512;
                $body
            }
        }
    };
}

pub(crate) use with_digest;

impl HashFunction {
    /// Every supported hash function.
    pub const ALL: [HashFunction; 11] = [
        HashFunction::Sha1,
        HashFunction::Sha2_224,
        HashFunction::Sha2_256,
        HashFunction::Sha2_384,
        HashFunction::Sha2_512,
        HashFunction::Sha2_512_224,
        HashFunction::Sha2_512_256,
        HashFunction::Sha3_224,
        HashFunction::Sha3_256,
        HashFunction::Sha3_384,
        HashFunction::Sha3_512,
    ];

    /// Digest length in bytes
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            HashFunction::Sha1 => 20,
            HashFunction::Sha2_224 | HashFunction::Sha2_512_224 | HashFunction::Sha3_224 => 28,
            HashFunction::Sha2_256 | HashFunction::Sha2_512_256 | HashFunction::Sha3_256 => 32,
            HashFunction::Sha2_384 | HashFunction::Sha3_384 => 48,
            HashFunction::Sha2_512 | HashFunction::Sha3_512 => 64,
        }
    }

    /// Digest length in bits
    #[must_use]
    pub const fn output_bits(self) -> usize {
        self.output_len() * 8
    }

    /// Input block length in bytes (the HMAC block size, or the SHA-3 rate).
    #[must_use]
    pub const fn block_len(self) -> usize {
        match self {
            HashFunction::Sha1 | HashFunction::Sha2_224 | HashFunction::Sha2_256 => 64,
            HashFunction::Sha2_384
            | HashFunction::Sha2_512
            | HashFunction::Sha2_512_224
            | HashFunction::Sha2_512_256 => 128,
            HashFunction::Sha3_224 => 144,
            HashFunction::Sha3_256 => 136,
            HashFunction::Sha3_384 => 104,
            HashFunction::Sha3_512 => 72,
        }
    }

    /// Hash a single buffer.
    #[must_use]
    #[instrument(level = "debug", skip(data), fields(hash = ?self, data_len = data.len()))]
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        self.digest_parts(&[data])
    }

    /// Hash the concatenation of `parts` without materializing it.
    #[must_use]
    pub fn digest_parts(self, parts: &[&[u8]]) -> Vec<u8> {
        use sha2::Digest;

        with_digest!(self, D => {
            let mut hasher = D::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().to_vec()
        })
    }
}

impl std::fmt::Display for HashFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HashFunction::Sha1 => "SHA-1",
            HashFunction::Sha2_224 => "SHA2-224",
            HashFunction::Sha2_256 => "SHA2-256",
            HashFunction::Sha2_384 => "SHA2-384",
            HashFunction::Sha2_512 => "SHA2-512",
            HashFunction::Sha2_512_224 => "SHA2-512/224",
            HashFunction::Sha2_512_256 => "SHA2-512/256",
            HashFunction::Sha3_224 => "SHA3-224",
            HashFunction::Sha3_256 => "SHA3-256",
            HashFunction::Sha3_384 => "SHA3-384",
            HashFunction::Sha3_512 => "SHA3-512",
        };
        f.write_str(name)
    }
}
