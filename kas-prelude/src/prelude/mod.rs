//! KasArc Prelude Module
//!
//! Common types used throughout KasArc.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// Error taxonomy and result alias.
pub mod error;

pub use error::{ErrorKind, KasError, Result};
