//! KasArc Prelude Crate
//!
//! This crate provides the error taxonomy shared by every KasArc component.
//!
//! # Overview
//!
//! Key-agreement computation fails in three distinguishable ways:
//!
//! - **Configuration**: an unsupported or contradictory parameter combination,
//!   detected before any arithmetic or hashing runs
//! - **Validation**: a public key failed its domain or order checks; this is often
//!   an *expected* outcome when probing an implementation with invalid keys
//! - **Computation**: an arithmetic precondition was violated (missing key pair,
//!   degenerate shared secret)
//!
//! # Example
//!
//! ```rust
//! use kas_prelude::prelude::{ErrorKind, KasError, Result};
//!
//! fn derive(l: usize) -> Result<usize> {
//!     if l == 0 {
//!         return Err(KasError::Configuration("L must be positive".to_string()));
//!     }
//!     Ok(l)
//! }
//!
//! let err = derive(0).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Configuration);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// Prelude module containing all commonly used types.
pub mod prelude;

pub use prelude::*;
