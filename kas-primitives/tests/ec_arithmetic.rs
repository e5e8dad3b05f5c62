#![deny(unsafe_code)]
// Test files use unwrap() for simplicity - test failures will show clear panics
#![allow(clippy::unwrap_used)]

//! Elliptic-curve arithmetic tests
//!
//! - Base points on every named curve have the published order
//! - Scalar multiples compose and off-curve points are refused
//! - P-256 ECC CDH known-answer value (SP 800-56A primitive)

use kas_primitives::ec::{EccCurve, EccKeyPair, EccPoint, NamedCurve};
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn big(hex_str: &str) -> BigUint {
    BigUint::parse_bytes(hex_str.as_bytes(), 16).unwrap()
}

mod order_tests {
    use super::*;

    #[test]
    fn test_generator_has_order_n_on_all_curves() {
        for name in NamedCurve::ALL {
            let curve = name.curve().unwrap();
            assert!(curve.has_order_n(curve.generator()), "{}", name);
            assert!(curve.public_from_private(&curve.order().to_bytes_be()).is_err(), "{}", name);
        }
    }

    #[test]
    fn test_n_minus_one_times_g_is_negation() {
        for name in NamedCurve::ALL {
            let curve = name.curve().unwrap();
            let k = curve.order() - 1u32;
            let neg = curve.public_from_private(&k.to_bytes_be()).unwrap();
            let g = curve.generator();
            assert_eq!(neg.x, g.x, "{}", name);
            assert_eq!(&neg.y + &g.y, curve.p().clone(), "{}", name);
        }
    }

    #[test]
    fn test_zero_scalar_rejected() {
        let curve = NamedCurve::P224.curve().unwrap();
        assert!(curve.public_from_private(&[0]).is_err());
        assert!(curve.diffie_hellman(&[0], curve.generator()).is_err());
    }
}

mod group_law_tests {
    use super::*;

    #[test]
    fn test_shared_x_matches_product_scalar() {
        let curve = NamedCurve::P256.curve().unwrap();
        let q = curve.public_from_private(&[11]).unwrap();
        let z = curve.diffie_hellman(&[7], &q).unwrap();
        let expected = curve.public_from_private(&[77]).unwrap();
        assert_eq!(z.as_slice(), curve.encode_coordinate(&expected.x).as_slice());
    }

    #[test]
    fn test_off_curve_point_rejected_by_cdh() {
        let curve = NamedCurve::P384.curve().unwrap();
        let g = curve.generator();
        let bad = EccPoint::new(g.x.clone(), &g.y + 1u32);
        assert!(!curve.contains(&bad));
        assert!(curve.diffie_hellman(&[3], &bad).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_scalar_multiplication_composes(a in 1u64..u64::MAX, b in 1u64..u64::MAX) {
            let curve = NamedCurve::P256.curve().unwrap();
            let (a, b) = (a.to_be_bytes(), b.to_be_bytes());
            let ab = curve.diffie_hellman(&b, &curve.public_from_private(&a).unwrap()).unwrap();
            let ba = curve.diffie_hellman(&a, &curve.public_from_private(&b).unwrap()).unwrap();
            prop_assert_eq!(ab, ba);
        }
    }
}

mod cdh_tests {
    use super::*;

    /// SP 800-56A ECC CDH primitive, P-256 known-answer value
    #[test]
    fn test_p256_cdh_known_answer() {
        let curve = NamedCurve::P256.curve().unwrap();
        let d_iut = big("7d7dc5f71eb29ddaf80d6214632eeae03d9058af1fb6d22ed80badb62bc1a534");
        let q_cavs = EccPoint::new(
            big("700c48f77f56584c5cc632ca65640db91b6bacce3a4df6b42ce7cc838833d287"),
            big("db71e509e3fd9b060ddb20ba5c51dcc5948d46fbf640dfe0441782cab85fa4ac"),
        );

        let pair = EccKeyPair::from_private(&curve, &d_iut).unwrap();
        assert_eq!(
            pair.public(),
            &EccPoint::new(
                big("ead218590119e8876b29146ff89ca61770c4edbbf97d38ce385ed281d8a6b230"),
                big("28af61281fd35e2fa7002523acc85a429cb06ee6648325389f59edfce1405141"),
            )
        );

        let shared = curve.diffie_hellman(pair.private_bytes(), &q_cavs).unwrap();
        assert_eq!(
            shared.to_hex(),
            "46fc62106420ff012e54a434fbdd2d25ccc5852060561e68040dd7778997bd7b"
        );
    }

    #[test]
    fn test_generated_pairs_agree() {
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        for name in [NamedCurve::P224, NamedCurve::P521] {
            let curve: EccCurve = name.curve().unwrap();
            let u = EccKeyPair::generate(&curve, &mut rng).unwrap();
            let v = EccKeyPair::generate(&curve, &mut rng).unwrap();
            let z_u = curve.diffie_hellman(u.private_bytes(), v.public()).unwrap();
            let z_v = curve.diffie_hellman(v.private_bytes(), u.public()).unwrap();
            assert_eq!(z_u, z_v, "{}", name);
            assert_eq!(z_u.len(), curve.field_len(), "{}", name);
        }
    }
}
