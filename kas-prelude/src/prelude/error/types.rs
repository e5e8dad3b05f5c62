//! Core Error Types for KasArc
//!
//! This module defines the error types used throughout the KasArc library
//! for key-agreement computation.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use thiserror::Error;

/// Error type conversion implementations.
pub mod conversions;

/// Result type alias for KasArc operations
pub type Result<T> = std::result::Result<T, KasError>;

/// Error type for all KasArc operations
///
/// Every variant belongs to exactly one [`ErrorKind`]. Callers that generate
/// deliberately-invalid test cases match on [`KasError::kind`] to tell an
/// expected validation failure apart from a defect.
#[derive(Debug, Error, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum KasError {
    /// Unsupported or contradictory parameter combination
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Public key failed domain or order checks
    #[error("Public key validation error: {0}")]
    PublicKeyValidation(String),
    /// Arithmetic precondition violated
    #[error("Computation error: {0}")]
    Computation(String),
    /// Key length does not match what the algorithm requires
    #[error("Invalid key length: expected {expected}, actual {actual}")]
    InvalidKeyLength {
        /// Expected length in bits
        expected: usize,
        /// Actual length in bits
        actual: usize,
    },
    /// Malformed textual or binary encoding of an input
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}

/// The three-way failure taxonomy of key-agreement computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Fatal, detected before computation, never retried
    Configuration,
    /// Public key rejected; may be an intended test outcome
    Validation,
    /// Fatal arithmetic or key-availability failure
    Computation,
}

impl KasError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            KasError::Configuration(_)
            | KasError::InvalidKeyLength { .. }
            | KasError::InvalidEncoding(_) => ErrorKind::Configuration,
            KasError::PublicKeyValidation(_) => ErrorKind::Validation,
            KasError::Computation(_) => ErrorKind::Computation,
        }
    }

    /// Whether this error is a public-key validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Shorthand for [`KasError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        KasError::Configuration(msg.into())
    }

    /// Shorthand for [`KasError::Computation`].
    pub fn computation(msg: impl Into<String>) -> Self {
        KasError::Computation(msg.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(KasError::config("x").kind(), ErrorKind::Configuration);
        assert_eq!(
            KasError::InvalidKeyLength { expected: 128, actual: 64 }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(KasError::InvalidEncoding("x".into()).kind(), ErrorKind::Configuration);
        assert_eq!(KasError::PublicKeyValidation("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(KasError::computation("x").kind(), ErrorKind::Computation);
    }

    #[test]
    fn test_is_validation() {
        assert!(KasError::PublicKeyValidation("y out of range".into()).is_validation());
        assert!(!KasError::computation("z == 1").is_validation());
    }

    #[test]
    fn test_display_carries_reason() {
        let err = KasError::InvalidKeyLength { expected: 128, actual: 64 };
        assert_eq!(err.to_string(), "Invalid key length: expected 128, actual 64");
    }

    #[test]
    fn test_error_serializes_as_data() {
        let err = KasError::PublicKeyValidation("point not on curve".into());
        let json = serde_json::to_string(&err).unwrap();
        let back: KasError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
