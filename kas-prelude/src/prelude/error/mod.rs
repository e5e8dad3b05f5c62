//! Error Handling Module
//!
//! This module provides the error types for the KasArc library.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

/// Core error types and result handling.
pub mod types;

pub use types::{ErrorKind, KasError, Result};
