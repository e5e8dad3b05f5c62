//! FFC primitives: dhPrimitive (SP 800-56A §5.7.1.1) and MQV2 (§5.7.2.1)

use kas_prelude::error::{KasError, Result};
use kas_primitives::{FfcDomainParameters, SecretUint, SecureBytes};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// `z = y^x mod p`, rejecting `z ∈ {0, 1, p-1}`.
pub(crate) fn dh(
    domain: &FfcDomainParameters,
    private: &SecretUint,
    public: &BigUint,
) -> Result<SecureBytes> {
    let z = SecretUint::new(public.modpow(private.expose(), domain.p()));
    let p_minus_1 = domain.p() - 1u32;
    if z.expose().is_zero() || z.expose().is_one() || *z.expose() == p_minus_1 {
        return Err(KasError::computation("FFC DH shared value is degenerate"));
    }
    Ok(z.to_secure_bytes(domain.field_len()))
}

/// MQV truncation width `w = ceil(ceil(log2 q) / 2)`.
pub(crate) fn mqv_width(q: &BigUint) -> u64 {
    let log2_q = (q - 1u32).bits();
    log2_q.div_ceil(2)
}

/// `(t mod 2^w) + 2^w`
fn truncate_public(t: &BigUint, w: u64) -> BigUint {
    let two_w = BigUint::one() << w;
    (t % &two_w) + two_w
}

/// Own keys `(x_A, r_A, t_A)`, counterpart public values `(y_B, t_B)`.
pub(crate) struct MqvInputs<'a> {
    pub(crate) static_private: &'a SecretUint,
    pub(crate) ephemeral_private: &'a SecretUint,
    pub(crate) ephemeral_public: &'a BigUint,
    pub(crate) other_static_public: &'a BigUint,
    pub(crate) other_ephemeral_public: &'a BigUint,
}

/// `S_A = (r_A + T_A x_A) mod q`, `z = (t_B · y_B^{T_B})^{S_A} mod p`.
pub(crate) fn mqv(domain: &FfcDomainParameters, inputs: &MqvInputs<'_>) -> Result<SecureBytes> {
    let (p, q) = (domain.p(), domain.q());
    let w = mqv_width(q);

    let t_a = truncate_public(inputs.ephemeral_public, w);
    let weighted = SecretUint::new(&t_a * inputs.static_private.expose());
    let sum = SecretUint::new(inputs.ephemeral_private.expose() + weighted.expose());
    let s_a = SecretUint::new(sum.expose() % q);
    let t_b = truncate_public(inputs.other_ephemeral_public, w);

    let base = (inputs.other_ephemeral_public * inputs.other_static_public.modpow(&t_b, p)) % p;
    let z = SecretUint::new(base.modpow(s_a.expose(), p));
    if z.expose().is_one() {
        return Err(KasError::computation("FFC MQV shared value is 1"));
    }
    Ok(z.to_secure_bytes(domain.field_len()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mqv_width() {
        // ceil(log2 11) = 4
        assert_eq!(mqv_width(&11u32.into()), 2);
        // q = 2^160 - 47 has 160 bits
        let q = (BigUint::one() << 160u32) - 47u32;
        assert_eq!(mqv_width(&q), 80);
        // exact power of two: log2 = 8
        assert_eq!(mqv_width(&256u32.into()), 4);
    }

    #[test]
    fn test_dh_rejects_degenerate_value() {
        let domain = FfcDomainParameters::new(23u32.into(), 11u32.into(), 4u32.into()).unwrap();
        // 1^x = 1
        let x = SecretUint::new(3u32.into());
        assert!(dh(&domain, &x, &1u32.into()).is_err());
        assert_eq!(dh(&domain, &x, &18u32.into()).unwrap().len(), 1);
    }
}
