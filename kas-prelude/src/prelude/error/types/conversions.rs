//! Error Type Conversions
//!
//! `From` implementations for converting external error types to `KasError`,
//! enabling error propagation with the `?` operator.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use super::KasError;

impl From<hex::FromHexError> for KasError {
    fn from(err: hex::FromHexError) -> Self {
        KasError::InvalidEncoding(format!("Hex decoding error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ErrorKind;

    #[test]
    fn test_hex_error_is_configuration_kind() {
        let err: KasError = hex::decode("zz").map_err(KasError::from).err().unwrap_or_else(|| {
            KasError::config("decode unexpectedly succeeded")
        });
        assert!(matches!(err, KasError::InvalidEncoding(_)));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
