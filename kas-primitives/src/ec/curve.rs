#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! NIST prime curves (FIPS 186-4 Appendix D.1.2)

use super::{arith, EccMqvInputs, EccPoint};
use crate::ffc::{encode_fixed, parse_hex};
use crate::security::SecureBytes;
use kas_prelude::error::Result;
use num_bigint::BigUint;

/// Approved prime curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    /// P-224
    P224,
    /// P-256
    P256,
    /// P-384
    P384,
    /// P-521
    P521,
}

impl NamedCurve {
    /// Every supported curve.
    pub const ALL: [NamedCurve; 4] =
        [NamedCurve::P224, NamedCurve::P256, NamedCurve::P384, NamedCurve::P521];

    fn constants(self) -> [&'static str; 4] {
        // p, Gx, Gy, n
        match self {
            NamedCurve::P224 => [
                "ffffffffffffffffffffffffffffffff000000000000000000000001",
                "b70e0cbd6bb4bf7f321390b94a03c1d356c21122343280d6115c1d21",
                "bd376388b5f723fb4c22dfe6cd4375a05a07476444d5819985007e34",
                "ffffffffffffffffffffffffffff16a2e0b8f03e13dd29455c5c2a3d",
            ],
            NamedCurve::P256 => [
                "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
                "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
                "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5",
                "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551",
            ],
            NamedCurve::P384 => [
                "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe\
                 ffffffff0000000000000000ffffffff",
                "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a38\
                 5502f25dbf55296c3a545e3872760ab7",
                "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c0\
                 0a60b1ce1d7e819d7a431d7c90ea0e5f",
                "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf\
                 581a0db248b0a77aecec196accc52973",
            ],
            NamedCurve::P521 => [
                "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
                 ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
                "00c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d\
                 3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5bd66",
                "011839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e\
                 662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd16650",
                "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
                 fa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e91386409",
            ],
        }
    }

    /// Domain parameters for this curve.
    ///
    /// # Errors
    /// Only fails if a built-in constant is malformed.
    pub fn curve(self) -> Result<EccCurve> {
        let [p, gx, gy, n] = self.constants();
        Ok(EccCurve {
            name: self,
            p: parse_hex(p)?,
            g: EccPoint::new(parse_hex(gx)?, parse_hex(gy)?),
            n: parse_hex(n)?,
            h: BigUint::from(1u32),
        })
    }
}

impl std::fmt::Display for NamedCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NamedCurve::P224 => "P-224",
            NamedCurve::P256 => "P-256",
            NamedCurve::P384 => "P-384",
            NamedCurve::P521 => "P-521",
        })
    }
}

/// A named curve with the domain constants needed outside the group
/// arithmetic: field prime `p`, base point `G` of order `n`, cofactor `h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EccCurve {
    name: NamedCurve,
    p: BigUint,
    g: EccPoint,
    n: BigUint,
    h: BigUint,
}

impl EccCurve {
    /// The named curve
    #[must_use]
    pub fn name(&self) -> NamedCurve {
        self.name
    }

    /// Field prime
    #[must_use]
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Base point
    #[must_use]
    pub fn generator(&self) -> &EccPoint {
        &self.g
    }

    /// Base point order
    #[must_use]
    pub fn order(&self) -> &BigUint {
        &self.n
    }

    /// Cofactor
    #[must_use]
    pub fn cofactor(&self) -> &BigUint {
        &self.h
    }

    /// Field element length in bytes, `ceil(bitlen(p) / 8)`
    #[must_use]
    pub fn field_len(&self) -> usize {
        (self.p.bits() as usize).div_ceil(8)
    }

    /// Whether `point` has coordinates in `[0, p-1]` and satisfies the curve
    /// equation.
    #[must_use]
    pub fn contains(&self, point: &EccPoint) -> bool {
        point.x < self.p && point.y < self.p && arith::is_on_curve(self.name, point)
    }

    /// Whether `n·point` is the point at infinity.
    #[must_use]
    pub fn has_order_n(&self, point: &EccPoint) -> bool {
        arith::has_order_n(self.name, point)
    }

    /// `d·G` for a big-endian private scalar.
    ///
    /// # Errors
    /// Returns a configuration error for a scalar not below `n`, or a
    /// computation error when `d = 0`.
    pub fn public_from_private(&self, private: &[u8]) -> Result<EccPoint> {
        arith::public_from_private(self.name, private)
    }

    /// ECC CDH primitive (SP 800-56A §5.7.1.2): the x-coordinate of
    /// `h·d·Q`, encoded to the field length.
    ///
    /// # Errors
    /// Returns a computation error when `Q` is not on the curve or the
    /// result is the point at infinity.
    pub fn diffie_hellman(&self, private: &[u8], public: &EccPoint) -> Result<SecureBytes> {
        arith::diffie_hellman(self.name, private, public)
    }

    /// ECC MQV primitive (SP 800-56A §5.7.2.3): with
    /// `implicitsig = (k + own_avf·d_s) mod n`, the x-coordinate of
    /// `h·implicitsig·(Q_e' + other_avf·Q_s')`.
    ///
    /// # Errors
    /// Returns a computation error for an off-curve input or an identity
    /// intermediate or result.
    pub fn mqv(&self, inputs: &EccMqvInputs<'_>) -> Result<SecureBytes> {
        arith::mqv(self.name, inputs)
    }

    /// Encode a field element, left-padded to [`Self::field_len`].
    #[must_use]
    pub fn encode_coordinate(&self, value: &BigUint) -> Vec<u8> {
        encode_fixed(value, self.field_len())
    }

    /// `x || y`, each coordinate left-padded to the field length.
    #[must_use]
    pub fn encode_point(&self, point: &EccPoint) -> Vec<u8> {
        let mut out = self.encode_coordinate(&point.x);
        out.extend_from_slice(&self.encode_coordinate(&point.y));
        out
    }
}
