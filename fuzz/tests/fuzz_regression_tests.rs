//! Fuzz Regression Tests
//!
//! Edge cases found while fuzzing the parsers and KDFs, kept so they stay
//! fixed.
//!
//! # Organization
//!
//! - FixedInfo patterns - parser edge cases
//! - One-step KDF - empty inputs and single-bit outputs
//! - Two-step KDF - counter layouts at the edge of validity
//! - Public-key validation - out-of-range coordinates
//!
//! # Running Regression Tests
//!
//! ```bash
//! cargo test --package kas-fuzz --test fuzz_regression_tests
//! ```

#![allow(clippy::unwrap_used)]

use kas_core::{
    validate_ecc_public_key, CounterLocation, FixedInfoPattern, KdfMode, KdfParameter,
    OneStepAuxFunction, OneStepParameters, TwoStepMac, TwoStepParameters, ValidationMode,
};
use kas_primitives::{BitString, EccPoint, HashFunction, NamedCurve};
use num_bigint::BigUint;

// ============================================================================
// FixedInfo Pattern Regression Tests
// ============================================================================

mod fixed_info_regression {
    use super::*;

    #[test]
    fn test_separator_only_pattern_rejected() {
        assert!(FixedInfoPattern::parse("||").is_err());
        assert!(FixedInfoPattern::parse("uPartyInfo||").is_err());
    }

    #[test]
    fn test_unterminated_literal_rejected() {
        assert!(FixedInfoPattern::parse("literal[ab").is_err());
        assert!(FixedInfoPattern::parse("literal[abc]").is_err(), "odd hex length");
    }

    #[test]
    fn test_unterminated_length_annotation_rejected() {
        assert!(FixedInfoPattern::parse("salt[12").is_err());
        assert!(FixedInfoPattern::parse("salt[]").is_err());
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let pattern = FixedInfoPattern::parse(" uPartyInfo || vPartyInfo ").unwrap();
        assert_eq!(pattern.to_string(), "uPartyInfo||vPartyInfo");
    }
}

// ============================================================================
// One-Step KDF Regression Tests
// ============================================================================

mod one_step_regression {
    use super::*;

    #[test]
    fn test_empty_z_and_fixed_info() {
        let kdf = KdfParameter::OneStep(OneStepParameters::new(OneStepAuxFunction::Kmac256));
        let dkm = kdf.derive(&[], &BitString::new(), 1).unwrap();
        assert_eq!(dkm.len(), 1);
        assert_eq!(dkm[0] & 0x7F, 0);
    }

    #[test]
    fn test_no_counter_exact_block() {
        let aux = OneStepAuxFunction::Hash(HashFunction::Sha2_384);
        let kdf = KdfParameter::OneStepNoCounter(OneStepParameters::new(aux));
        assert!(kdf.derive(&[1], &BitString::new(), 384).is_ok());
        assert!(kdf.derive(&[1], &BitString::new(), 385).is_err());
    }
}

// ============================================================================
// Two-Step KDF Regression Tests
// ============================================================================

mod two_step_regression {
    use super::*;

    #[test]
    fn test_middle_counter_at_end_of_fixed_data() {
        let mac = TwoStepMac::Hmac(HashFunction::Sha2_256);
        let fixed = BitString::from_bytes(&[0xAB; 4]);
        let at_end = TwoStepParameters::new(mac, 32)
            .with_counter(CounterLocation::MiddleFixedData(32), 32);
        assert!(KdfParameter::TwoStep(at_end).derive(&[7; 32], &fixed, 256).is_ok());
        let past_end = TwoStepParameters::new(mac, 32)
            .with_counter(CounterLocation::MiddleFixedData(40), 32);
        assert!(KdfParameter::TwoStep(past_end).derive(&[7; 32], &fixed, 256).is_err());
    }

    #[test]
    fn test_eight_bit_counter_block_limit() {
        let mac = TwoStepMac::Hmac(HashFunction::Sha2_256);
        let params = TwoStepParameters::new(mac, 8).with_mode(KdfMode::Counter);
        let kdf = KdfParameter::TwoStep(params);
        assert!(kdf.derive(&[1; 16], &BitString::new(), 255 * 256).is_ok());
        assert!(kdf.derive(&[1; 16], &BitString::new(), 255 * 256 + 1).is_err());
    }
}

// ============================================================================
// Public-Key Validation Regression Tests
// ============================================================================

mod validation_regression {
    use super::*;

    #[test]
    fn test_coordinate_equal_to_p_rejected() {
        let curve = NamedCurve::P256.curve().unwrap();
        let point = EccPoint::new(curve.p().clone(), BigUint::from(0u32));
        assert!(!validate_ecc_public_key(&curve, &point, ValidationMode::Lenient).unwrap());
    }

    #[test]
    fn test_zero_point_rejected() {
        let curve = NamedCurve::P384.curve().unwrap();
        let point = EccPoint::new(BigUint::from(0u32), BigUint::from(0u32));
        assert!(validate_ecc_public_key(&curve, &point, ValidationMode::Strict).is_err());
    }
}
