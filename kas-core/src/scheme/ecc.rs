//! ECC MQV inputs (SP 800-56A §5.7.2.3)
//!
//! The associate value function is computed here from public coordinates;
//! the scalar and point arithmetic runs in [`EccCurve::mqv`].

use kas_prelude::error::Result;
use kas_primitives::{EccCurve, EccMqvInputs, EccPoint, SecureBytes};
use num_bigint::BigUint;
use num_traits::One;

/// `f = ceil(ceil(log2 n) / 2)`
pub(crate) fn mqv_width(n: &BigUint) -> u64 {
    (n - 1u32).bits().div_ceil(2)
}

/// Associate value function `avf(Q) = (x_Q mod 2^f) + 2^f`.
pub(crate) fn avf(point: &EccPoint, f: u64) -> BigUint {
    let two_f = BigUint::one() << f;
    (&point.x % &two_f) + two_f
}

/// Own keys `(d_s, k, Q_e)`, counterpart public points `(Q_s', Q_e')`.
pub(crate) struct MqvInputs<'a> {
    pub(crate) static_private: &'a [u8],
    pub(crate) ephemeral_private: &'a [u8],
    pub(crate) ephemeral_public: &'a EccPoint,
    pub(crate) other_static_public: &'a EccPoint,
    pub(crate) other_ephemeral_public: &'a EccPoint,
}

/// `implicitsig = (k + avf(Q_e)·d_s) mod n`,
/// `P = h·implicitsig·(Q_e' + avf(Q_e')·Q_s')`, `Z = x_P`.
pub(crate) fn mqv(curve: &EccCurve, inputs: &MqvInputs<'_>) -> Result<SecureBytes> {
    let f = mqv_width(curve.order());
    let own_avf = avf(inputs.ephemeral_public, f);
    let other_avf = avf(inputs.other_ephemeral_public, f);
    curve.mqv(&EccMqvInputs {
        static_private: inputs.static_private,
        ephemeral_private: inputs.ephemeral_private,
        own_avf: &own_avf,
        other_static_public: inputs.other_static_public,
        other_ephemeral_public: inputs.other_ephemeral_public,
        other_avf: &other_avf,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kas_primitives::NamedCurve;

    #[test]
    fn test_width_per_curve() {
        let widths: Vec<u64> = NamedCurve::ALL
            .iter()
            .map(|c| mqv_width(c.curve().unwrap().order()))
            .collect();
        assert_eq!(widths, vec![112, 128, 192, 261]);
    }

    #[test]
    fn test_avf_sets_bit_f() {
        let point = EccPoint::new(0xFFu32.into(), 0u32.into());
        // (0xFF mod 16) + 16 = 31
        assert_eq!(avf(&point, 4), BigUint::from(31u32));
    }
}
