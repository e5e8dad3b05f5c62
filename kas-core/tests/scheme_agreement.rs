#![deny(unsafe_code)]
// Test files use unwrap() for simplicity - test failures will show clear panics
#![allow(clippy::unwrap_used)]

//! End-to-end key agreement through [`Kas::compute`]
//!
//! - Both parties derive the same Z and DKM for every scheme
//! - Hybrid secrets are laid out as Ze || Zs
//! - MQV and hybrid Z values match independently computed known answers
//! - Repeated computation with the same inputs is deterministic
//! - Key confirmation tags computed by one side verify on the other

use kas_core::{
    FixedInfoParameters, FixedInfoPattern, Kas, KasDomain, KasOutput, KdfParameter,
    KeyAgreementRole, KeyConfirmationParameters, KeyConfirmationRole, KeyPair,
    OneStepAuxFunction, OneStepParameters, PartyKeyMaterial, PublicKey, SchemeVariant,
};
use kas_primitives::{
    AesKeySize, EccKeyPair, FfcDomainParameters, FfcKeyPair, HashFunction, MacAlgorithm,
    NamedCurve,
};
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn toy_ffc() -> FfcDomainParameters {
    FfcDomainParameters::new(23u32.into(), 11u32.into(), 4u32.into()).unwrap()
}

fn one_step_sha256() -> KdfParameter {
    KdfParameter::OneStep(OneStepParameters::new(OneStepAuxFunction::Hash(HashFunction::Sha2_256)))
}

fn generate(domain: &KasDomain, rng: &mut ChaCha20Rng) -> KeyPair {
    match domain {
        KasDomain::Ffc(params) => KeyPair::from(&FfcKeyPair::generate(params, rng).unwrap()),
        KasDomain::Ecc(curve) => KeyPair::from(&EccKeyPair::generate(curve, rng).unwrap()),
    }
}

/// Full key material for the party in `role`, carrying exactly the keys the
/// scheme asks of it.
fn party(
    domain: &KasDomain,
    scheme: SchemeVariant,
    role: KeyAgreementRole,
    id: &[u8],
    rng: &mut ChaCha20Rng,
) -> PartyKeyMaterial {
    let req = scheme.key_requirements(role);
    let mut material = PartyKeyMaterial::new(id.to_vec());
    if req.static_key {
        material = material.with_static_key(generate(domain, rng));
    }
    if req.ephemeral_key {
        material = material.with_ephemeral_key(generate(domain, rng));
    } else {
        material = material.with_ephemeral_nonce(id.iter().rev().copied().collect::<Vec<_>>());
    }
    material
}

fn kas(domain: &KasDomain, scheme: SchemeVariant, role: KeyAgreementRole) -> Kas {
    Kas::builder(domain.clone(), scheme)
        .with_role(role)
        .with_kdf(one_step_sha256())
        .with_l(256)
        .build()
        .unwrap()
}

/// Run the agreement from both sides and return (U's output, V's output).
fn both_sides(
    domain: &KasDomain,
    scheme: SchemeVariant,
    u: &PartyKeyMaterial,
    v: &PartyKeyMaterial,
) -> (KasOutput, KasOutput) {
    let fixed = FixedInfoParameters::new();
    let at_u = kas(domain, scheme, KeyAgreementRole::Initiator)
        .compute(u, &v.public_view(), &fixed)
        .into_result()
        .unwrap();
    let at_v = kas(domain, scheme, KeyAgreementRole::Responder)
        .compute(&u.public_view(), v, &fixed)
        .into_result()
        .unwrap();
    (at_u, at_v)
}

mod symmetry_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_ecc_schemes_agree(seed in any::<u64>()) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let domain = KasDomain::named_curve(NamedCurve::P256).unwrap();
            for scheme in SchemeVariant::ALL {
                let u = party(&domain, scheme, KeyAgreementRole::Initiator, b"party-u", &mut rng);
                let v = party(&domain, scheme, KeyAgreementRole::Responder, b"party-v", &mut rng);
                let (at_u, at_v) = both_sides(&domain, scheme, &u, &v);
                prop_assert_eq!(&at_u.z[..], &at_v.z[..], "{:?}", scheme);
                prop_assert_eq!(&at_u.dkm[..], &at_v.dkm[..], "{:?}", scheme);
                prop_assert_eq!(&at_u.fixed_info, &at_v.fixed_info);
            }
        }

        #[test]
        fn prop_ffc_dh_schemes_agree(seed in any::<u64>()) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let domain = KasDomain::Ffc(toy_ffc());
            for scheme in [
                SchemeVariant::DhEphem,
                SchemeVariant::DhStatic,
                SchemeVariant::DhOneFlow,
                SchemeVariant::DhHybrid1,
                SchemeVariant::DhHybridOneFlow,
            ] {
                let u = party(&domain, scheme, KeyAgreementRole::Initiator, b"u", &mut rng);
                let v = party(&domain, scheme, KeyAgreementRole::Responder, b"v", &mut rng);
                let (at_u, at_v) = both_sides(&domain, scheme, &u, &v);
                prop_assert_eq!(&at_u.z[..], &at_v.z[..], "{:?}", scheme);
                prop_assert_eq!(&at_u.dkm[..], &at_v.dkm[..], "{:?}", scheme);
            }
        }
    }

    #[test]
    fn test_ffc_mqv_agrees_for_fixed_keys() {
        let params = toy_ffc();
        let domain = KasDomain::Ffc(params.clone());
        let pair = |x: u32| KeyPair::from(&FfcKeyPair::from_private(&params, &x.into()).unwrap());
        let u = PartyKeyMaterial::new(b"u".to_vec())
            .with_static_key(pair(3))
            .with_ephemeral_key(pair(5));
        let v = PartyKeyMaterial::new(b"v".to_vec())
            .with_static_key(pair(7))
            .with_ephemeral_key(pair(2));
        for scheme in [SchemeVariant::Mqv1, SchemeVariant::Mqv2] {
            let (at_u, at_v) = both_sides(&domain, scheme, &u, &v);
            assert_eq!(&at_u.z[..], &at_v.z[..], "{:?}", scheme);
            assert_eq!(at_u.z.len(), 1);
        }
    }
}

mod layout_tests {
    use super::*;

    #[test]
    fn test_hybrid_secret_is_ephemeral_then_static() {
        let params = toy_ffc();
        let domain = KasDomain::Ffc(params.clone());
        let pair = |x: u32| KeyPair::from(&FfcKeyPair::from_private(&params, &x.into()).unwrap());
        let u = PartyKeyMaterial::new(b"u".to_vec())
            .with_static_key(pair(3))
            .with_ephemeral_key(pair(4));
        let v = PartyKeyMaterial::new(b"v".to_vec())
            .with_static_key(pair(6))
            .with_ephemeral_key(pair(9));

        let p = BigUint::from(23u32);
        let g = BigUint::from(4u32);
        let byte = |e: u32| g.modpow(&BigUint::from(e), &p).to_bytes_be();
        let (ze, zs) = (byte(4 * 9), byte(3 * 6));

        let (at_u, _) = both_sides(&domain, SchemeVariant::DhHybrid1, &u, &v);
        assert_eq!(&at_u.z[..], [ze, zs].concat().as_slice());
    }

    #[test]
    fn test_ecc_secret_is_field_length() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for name in [NamedCurve::P224, NamedCurve::P384] {
            let domain = KasDomain::named_curve(name).unwrap();
            let scheme = SchemeVariant::DhHybrid1;
            let u = party(&domain, scheme, KeyAgreementRole::Initiator, b"u", &mut rng);
            let v = party(&domain, scheme, KeyAgreementRole::Responder, b"v", &mut rng);
            let (at_u, _) = both_sides(&domain, scheme, &u, &v);
            assert_eq!(at_u.z.len(), 2 * domain.element_len(), "{}", name);
        }
    }

    #[test]
    fn test_default_fixed_info_is_party_info() {
        let params = toy_ffc();
        let domain = KasDomain::Ffc(params.clone());
        let pair = |x: u32| KeyPair::from(&FfcKeyPair::from_private(&params, &x.into()).unwrap());
        let u = PartyKeyMaterial::new(vec![0xA1]).with_ephemeral_key(pair(2));
        let v = PartyKeyMaterial::new(vec![0xB2]).with_ephemeral_key(pair(8));
        let (at_u, _) = both_sides(&domain, SchemeVariant::DhEphem, &u, &v);

        let y = |x: u32| BigUint::from(4u32).modpow(&x.into(), &23u32.into()).to_bytes_be();
        let expected = [vec![0xA1], y(2), vec![0xB2], y(8)].concat();
        assert_eq!(at_u.fixed_info.as_bytes(), expected.as_slice());
    }
}

/// Fixed-key known answers. The values were computed outside this crate from
/// the SP 800-56A §5.7 and §6 formulas (affine P-256 arithmetic cross-checked
/// against an ECDH implementation; FFC with plain modular exponentiation).
mod known_answer_tests {
    use super::*;

    fn big(hex: &str) -> BigUint {
        BigUint::parse_bytes(hex.as_bytes(), 16).unwrap()
    }

    /// 512-bit p with a 160-bit q
    fn ffc_domain() -> FfcDomainParameters {
        FfcDomainParameters::from_hex(
            "8159425c53e8e2e70af5389906b4707a7d2c02f6fb4fc46ab6b2a99ee12d8d10\
             eacb14b1aed35df4a20e05b3f76b993b22e7924d5b2c0ed28145b4c6ddadd979",
            "8c24983c976c0daef32a50bf7f14bf9aabde6c27",
            "597c27bce2761e07d2f74084e350d96fcfc86532e3c9610d8f5bedda71a0f591\
             ebf14c244547e39dff8d8b9a4b92f299986763641634f223bfa31a211da6f99f",
        )
        .unwrap()
    }

    fn ffc_parties() -> (KasDomain, PartyKeyMaterial, PartyKeyMaterial) {
        let params = ffc_domain();
        let pair = |x: &str| KeyPair::from(&FfcKeyPair::from_private(&params, &big(x)).unwrap());
        let u = PartyKeyMaterial::new(b"u".to_vec())
            .with_static_key(pair("3e4eb2127f09b2bc3311450ef617ad0bd3ac2b24"))
            .with_ephemeral_key(pair("729cad1d8970429ef5f3ca92f9a6faa64e86e7f7"));
        let v = PartyKeyMaterial::new(b"v".to_vec())
            .with_static_key(pair("522f8e51836d856481ec49b906fb85957d170f05"))
            .with_ephemeral_key(pair("76b0f827deeffaf7914a67ee29f4e9173cb4c768"));
        (KasDomain::Ffc(params), u, v)
    }

    fn ecc_parties() -> (KasDomain, PartyKeyMaterial, PartyKeyMaterial) {
        let curve = NamedCurve::P256.curve().unwrap();
        let pair = |d: &str| KeyPair::from(&EccKeyPair::from_private(&curve, &big(d)).unwrap());
        let u = PartyKeyMaterial::new(b"u".to_vec())
            .with_static_key(pair(
                "4d17951e85f5a4d1a731bb3679428f9802f16d3d8f4c29e7d92b0703f7467aca",
            ))
            .with_ephemeral_key(pair(
                "1831b3953b1ea24db513f6156baa2f31ee53ebb7fd1548d38af01f82c4855eb6",
            ));
        let v = PartyKeyMaterial::new(b"v".to_vec())
            .with_static_key(pair(
                "92e46caafe1ad57b41648338a4aa0f71565d0d6b11549f109e4369dd5feb85b9",
            ))
            .with_ephemeral_key(pair(
                "94fe0638edfe1b1c0def197b35fe3633929e2e50c250dfaa05bbc887350c2975",
            ));
        (KasDomain::Ecc(curve), u, v)
    }

    fn check(
        parties: (KasDomain, PartyKeyMaterial, PartyKeyMaterial),
        scheme: SchemeVariant,
        expected: &str,
    ) {
        let (domain, u, v) = parties;
        let (at_u, at_v) = both_sides(&domain, scheme, &u, &v);
        assert_eq!(hex::encode(&at_u.z[..]), expected, "{:?}", scheme);
        assert_eq!(&at_u.z[..], &at_v.z[..], "{:?}", scheme);
    }

    #[test]
    fn test_p256_static_public_key() {
        let (_, u, _) = ecc_parties();
        let expected = kas_primitives::EccPoint::new(
            big("aa01f7e846275fb65c0949836e558ce393516c11c7dff2cb29b41a1df8203da9"),
            big("341b8dd975c656b39066a8027b2b57a7cf9b4f56b8b049438363f32993c0ba4d"),
        );
        assert_eq!(u.static_key.unwrap().public(), &PublicKey::Ecc(expected));
    }

    #[test]
    fn test_ecc_mqv2() {
        check(
            ecc_parties(),
            SchemeVariant::Mqv2,
            "6c7c23b3f40d5a21d035063b4b60e5140796594ac79f1e826175efc8dcb53ecb",
        );
    }

    #[test]
    fn test_ecc_mqv1() {
        check(
            ecc_parties(),
            SchemeVariant::Mqv1,
            "47cd63ffa2b800e7f115aa4c3b8af4b86ec1d284fd0f3b2c119b26eb159c4d90",
        );
    }

    #[test]
    fn test_ecc_full_unified() {
        check(
            ecc_parties(),
            SchemeVariant::DhHybrid1,
            concat!(
                "dccc36e9e634d3012d27512f027063354f377fafeb14da50a0c059b2aa74f9dc",
                "e627b84ea4073131927ae2d8bcd48c9f5eba641a0eddf4b9309017119ac4d1f3",
            ),
        );
    }

    #[test]
    fn test_ecc_one_pass_unified() {
        check(
            ecc_parties(),
            SchemeVariant::DhHybridOneFlow,
            concat!(
                "1bcddd26d88ed646a54eae8a50a41bfdfcff92a591b174af2598c4ef3e12c9bb",
                "e627b84ea4073131927ae2d8bcd48c9f5eba641a0eddf4b9309017119ac4d1f3",
            ),
        );
    }

    #[test]
    fn test_ffc_mqv2() {
        check(
            ffc_parties(),
            SchemeVariant::Mqv2,
            concat!(
                "24f7755a4b1ef21e2834a885de9bae9e430220bf21571d30de5dca919a6672a7",
                "1f2dba9ec315162afd343e73d1704351d958b77d7df5113ec7d71075c4c193b8",
            ),
        );
    }

    #[test]
    fn test_ffc_mqv1() {
        check(
            ffc_parties(),
            SchemeVariant::Mqv1,
            concat!(
                "5187039d3415a2a5e559d51aea64f5849c81be40392e93affa8bc5b218a8be39",
                "b779683867c7530a2d18b5275bd1f55b36e21b32f05397c8c4a13899b8953340",
            ),
        );
    }

    #[test]
    fn test_ffc_hybrid1() {
        check(
            ffc_parties(),
            SchemeVariant::DhHybrid1,
            concat!(
                "1ccda3e63990c8712d86b40c94a2a660c958022963e76071f678426b2e344ad7",
                "68d37f3fbc92240f7c09e41172e0eed4e8a5d4bc972b194b2a882a23e3da501f",
                "0b07256cfb7d436800306e0be5b28148419fe751357e9de835dd32b1798009cc",
                "84df28ca5edce2e296ea1d1bbb9f00f0ab3ec1119e760ee8537b610b23e7c645",
            ),
        );
    }

    #[test]
    fn test_ffc_hybrid_one_flow() {
        check(
            ffc_parties(),
            SchemeVariant::DhHybridOneFlow,
            concat!(
                "5201894e685fd4ae530089ad838c140e305e0a8eda41078831ff32732b50cdaa",
                "c6b000b3a940365b538b8633e6c72fe53565680f1c653d868e7764c574ae6ff7",
                "0b07256cfb7d436800306e0be5b28148419fe751357e9de835dd32b1798009cc",
                "84df28ca5edce2e296ea1d1bbb9f00f0ab3ec1119e760ee8537b610b23e7c645",
            ),
        );
    }
}

mod determinism_tests {
    use super::*;

    #[test]
    fn test_repeated_compute_is_identical() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let domain = KasDomain::named_curve(NamedCurve::P256).unwrap();
        let scheme = SchemeVariant::Mqv2;
        let u = party(&domain, scheme, KeyAgreementRole::Initiator, b"u", &mut rng);
        let v = party(&domain, scheme, KeyAgreementRole::Responder, b"v", &mut rng);
        let engine = Kas::builder(domain, scheme)
            .with_kdf(one_step_sha256())
            .with_l(512)
            .with_fixed_info_pattern(
                FixedInfoPattern::parse("algorithmId||uPartyInfo||vPartyInfo||l").unwrap(),
            )
            .build()
            .unwrap();
        let fixed = FixedInfoParameters::new().with_algorithm_id(&[0x01, 0x02]);

        let first = engine.compute(&u, &v.public_view(), &fixed).into_result().unwrap();
        let second = engine.compute(&u, &v.public_view(), &fixed).into_result().unwrap();
        assert_eq!(&first.z[..], &second.z[..]);
        assert_eq!(&first.dkm[..], &second.dkm[..]);
        assert_eq!(first.fixed_info, second.fixed_info);
        assert_eq!(first.dkm.len(), 64);
    }
}

mod confirmation_tests {
    use super::*;

    fn confirming_kas(
        domain: &KasDomain,
        scheme: SchemeVariant,
        role: KeyAgreementRole,
        kc: KeyConfirmationParameters,
    ) -> Kas {
        Kas::builder(domain.clone(), scheme)
            .with_role(role)
            .with_kdf(one_step_sha256())
            .with_l(384)
            .with_key_confirmation(kc)
            .build()
            .unwrap()
    }

    #[test]
    fn test_bilateral_tags_verify_across_parties() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let domain = KasDomain::named_curve(NamedCurve::P256).unwrap();
        let scheme = SchemeVariant::DhHybrid1;
        let u = party(&domain, scheme, KeyAgreementRole::Initiator, b"u", &mut rng);
        let v = party(&domain, scheme, KeyAgreementRole::Responder, b"v", &mut rng);
        let fixed = FixedInfoParameters::new();

        for kc in [
            KeyConfirmationParameters::new(MacAlgorithm::Hmac(HashFunction::Sha2_512), 256, 128),
            KeyConfirmationParameters::new(MacAlgorithm::Cmac(AesKeySize::Aes192), 192, 128),
            KeyConfirmationParameters::new(MacAlgorithm::Kmac256, 256, 256),
        ] {
            let at_u = confirming_kas(&domain, scheme, KeyAgreementRole::Initiator, kc.clone())
                .compute(&u, &v.public_view(), &fixed)
                .into_result()
                .unwrap();
            let at_v = confirming_kas(&domain, scheme, KeyAgreementRole::Responder, kc.clone())
                .compute(&u.public_view(), &v, &fixed)
                .into_result()
                .unwrap();
            let u_tags = at_u.key_confirmation.unwrap();
            let v_tags = at_v.key_confirmation.unwrap();
            assert!(v_tags.verify(u_tags.sent.as_deref().unwrap()), "{:?}", kc.mac);
            assert!(u_tags.verify(v_tags.sent.as_deref().unwrap()), "{:?}", kc.mac);
            assert_eq!(u_tags.sent.unwrap().len() * 8, kc.tag_bits);
        }
    }

    #[test]
    fn test_one_flow_unilateral_from_responder() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let domain = KasDomain::named_curve(NamedCurve::P256).unwrap();
        let scheme = SchemeVariant::DhOneFlow;
        let u = party(&domain, scheme, KeyAgreementRole::Initiator, b"u", &mut rng);
        let v = party(&domain, scheme, KeyAgreementRole::Responder, b"v", &mut rng);
        let fixed = FixedInfoParameters::new();
        let kc = KeyConfirmationParameters::new(MacAlgorithm::Hmac(HashFunction::Sha2_256), 128, 64);

        let provider = kc.clone().unilateral(KeyConfirmationRole::Provider);
        let recipient = kc.unilateral(KeyConfirmationRole::Recipient);
        let at_v = confirming_kas(&domain, scheme, KeyAgreementRole::Responder, provider)
            .compute(&u.public_view(), &v, &fixed)
            .into_result()
            .unwrap();
        let at_u = confirming_kas(&domain, scheme, KeyAgreementRole::Initiator, recipient)
            .compute(&u, &v.public_view(), &fixed)
            .into_result()
            .unwrap();
        let sent = at_v.key_confirmation.unwrap().sent.unwrap();
        let checker = at_u.key_confirmation.unwrap();
        assert!(checker.sent.is_none());
        assert!(checker.verify(&sent));
    }

    #[test]
    fn test_tampered_tag_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let domain = KasDomain::Ffc(toy_ffc());
        let scheme = SchemeVariant::DhStatic;
        let u = party(&domain, scheme, KeyAgreementRole::Initiator, b"u", &mut rng);
        let v = party(&domain, scheme, KeyAgreementRole::Responder, b"v", &mut rng);
        let kc = KeyConfirmationParameters::new(MacAlgorithm::Kmac128, 128, 128);
        let at_u = confirming_kas(&domain, scheme, KeyAgreementRole::Initiator, kc.clone())
            .compute(&u, &v.public_view(), &FixedInfoParameters::new())
            .into_result()
            .unwrap();
        let at_v = confirming_kas(&domain, scheme, KeyAgreementRole::Responder, kc)
            .compute(&u.public_view(), &v, &FixedInfoParameters::new())
            .into_result()
            .unwrap();
        let mut tag = at_u.key_confirmation.unwrap().sent.unwrap();
        tag[0] ^= 0x01;
        assert!(!at_v.key_confirmation.unwrap().verify(&tag));
    }
}

#[test]
fn test_counterpart_off_curve_point_fails_validation() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let domain = KasDomain::named_curve(NamedCurve::P256).unwrap();
    let scheme = SchemeVariant::DhEphem;
    let u = party(&domain, scheme, KeyAgreementRole::Initiator, b"u", &mut rng);
    let off_curve = kas_primitives::EccPoint::new(BigUint::from(1u32), BigUint::from(1u32));
    let v = PartyKeyMaterial::new(b"v".to_vec())
        .with_ephemeral_key(KeyPair::public_only(PublicKey::Ecc(off_curve)));
    let result = kas(&domain, scheme, KeyAgreementRole::Initiator).compute(
        &u,
        &v,
        &FixedInfoParameters::new(),
    );
    let failure = result.failure().unwrap();
    assert!(failure.is_validation_failure());
    assert_eq!(failure.stage, kas_core::KasStage::Validation);
}
