#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # KasArc Primitives
//!
//! Building blocks for the KasArc key-agreement engine: exact bit strings,
//! zeroizing secret buffers, hash functions, MACs and the finite-field and
//! elliptic-curve group arithmetic that SP 800-56A schemes run on.
//!
//! ## Algorithms
//!
//! ### Hashing
//!
//! - **hash**: SHA-1 and SHA-2 (FIPS 180-4), SHA-3 (FIPS 202)
//!
//! ### Message Authentication
//!
//! - **mac::hmac**: HMAC (FIPS 198-1) over every supported hash
//! - **mac::cmac**: AES-CMAC (NIST SP 800-38B)
//! - **mac::kmac**: KMAC128/256 (NIST SP 800-185)
//! - **mac::ccm**: AES-CCM tag generation (NIST SP 800-38C)
//!
//! ### Group Arithmetic
//!
//! - **ffc**: Finite-field domain parameters and key pairs
//! - **ec**: NIST prime curves P-224/256/384/521 and key pairs, on the
//!   RustCrypto `p224`/`p256`/`p384`/`p521` implementations
//!
//! ### Supporting Modules
//!
//! - **bits**: Bit-exact strings for FixedInfo and derived keying material
//! - **security**: Secure memory containers with zeroization

pub mod bits;
pub mod ec;
pub mod ffc;
pub mod hash;
pub mod mac;
pub mod security;

pub use bits::BitString;
pub use ec::{EccCurve, EccKeyPair, EccMqvInputs, EccPoint, NamedCurve};
pub use ffc::{FfcDomainParameters, FfcKeyPair};
pub use hash::HashFunction;
pub use mac::{AesKeySize, MacAlgorithm, MacOptions};
pub use security::{SecretUint, SecureBytes};
