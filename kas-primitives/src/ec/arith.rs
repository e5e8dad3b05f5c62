#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Group operations on the RustCrypto NIST curve implementations
//!
//! Each operation is generic over [`CurveArithmetic`] and dispatched on
//! [`NamedCurve`]. Private scalars exist only as [`Zeroizing`] curve
//! scalars, and shared points are wiped once their x-coordinate has been
//! copied into a [`SecureBytes`]. Every supported curve has cofactor 1, so
//! `h·d·Q` is computed as `d·Q`.

use super::{EccMqvInputs, EccPoint, NamedCurve};
use crate::security::SecureBytes;
use elliptic_curve::{
    group::{Curve as _, Group},
    point::AffineCoordinates,
    sec1::{EncodedPoint, FromEncodedPoint, ModulusSize, ToEncodedPoint},
    AffinePoint, CurveArithmetic, Field, FieldBytes, FieldBytesSize, PrimeField, ProjectivePoint,
    Scalar,
};
use kas_prelude::error::{KasError, Result};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

macro_rules! on_curve {
    ($name:expr, $op:ident($($arg:expr),*)) => {
        match $name {
            NamedCurve::P224 => $op::<p224::NistP224>($($arg),*),
            NamedCurve::P256 => $op::<p256::NistP256>($($arg),*),
            NamedCurve::P384 => $op::<p384::NistP384>($($arg),*),
            NamedCurve::P521 => $op::<p521::NistP521>($($arg),*),
        }
    };
}

pub(crate) fn is_on_curve(name: NamedCurve, point: &EccPoint) -> bool {
    on_curve!(name, contains(point))
}

pub(crate) fn has_order_n(name: NamedCurve, point: &EccPoint) -> bool {
    on_curve!(name, order_check(point))
}

pub(crate) fn public_from_private(name: NamedCurve, private: &[u8]) -> Result<EccPoint> {
    on_curve!(name, mul_generator(private))
}

pub(crate) fn random_private(
    name: NamedCurve,
    rng: &mut (impl RngCore + CryptoRng),
) -> SecureBytes {
    on_curve!(name, random_scalar(rng))
}

pub(crate) fn diffie_hellman(
    name: NamedCurve,
    private: &[u8],
    public: &EccPoint,
) -> Result<SecureBytes> {
    on_curve!(name, cdh(private, public))
}

pub(crate) fn mqv(name: NamedCurve, inputs: &EccMqvInputs<'_>) -> Result<SecureBytes> {
    on_curve!(name, mqv_primitive(inputs))
}

/// Left-pad `bytes` into a field-width array; `None` if it does not fit.
fn field_bytes<C: CurveArithmetic>(bytes: &[u8]) -> Option<FieldBytes<C>> {
    let mut out = FieldBytes::<C>::default();
    let offset = out.len().checked_sub(bytes.len())?;
    out[offset..].copy_from_slice(bytes);
    Some(out)
}

fn scalar<C: CurveArithmetic>(bytes: &[u8]) -> Result<Zeroizing<Scalar<C>>> {
    let repr = Zeroizing::new(
        field_bytes::<C>(bytes)
            .ok_or_else(|| KasError::config("ECC scalar is wider than the group order"))?,
    );
    let value: Option<Scalar<C>> = <Scalar<C> as PrimeField>::from_repr((*repr).clone()).into();
    value
        .map(Zeroizing::new)
        .ok_or_else(|| KasError::config("ECC scalar is not below the group order"))
}

fn decode<C>(point: &EccPoint) -> Option<AffinePoint<C>>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let x = field_bytes::<C>(&point.x.to_bytes_be())?;
    let y = field_bytes::<C>(&point.y.to_bytes_be())?;
    let encoded = EncodedPoint::<C>::from_affine_coordinates(&x, &y, false);
    Option::from(<AffinePoint<C> as FromEncodedPoint<C>>::from_encoded_point(&encoded))
}

fn encode<C>(point: &AffinePoint<C>) -> Option<EccPoint>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let encoded = point.to_encoded_point(false);
    Some(EccPoint::new(
        BigUint::from_bytes_be(encoded.x()?),
        BigUint::from_bytes_be(encoded.y()?),
    ))
}

fn contains<C>(point: &EccPoint) -> bool
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    decode::<C>(point).is_some()
}

/// `n·Q = O`, evaluated as `(n-1)·Q + Q` since `n` itself is not a scalar.
fn order_check<C>(point: &EccPoint) -> bool
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let Some(affine) = decode::<C>(point) else {
        return false;
    };
    let q = ProjectivePoint::<C>::from(affine);
    let n_minus_one = -<Scalar<C> as Field>::ONE;
    bool::from((q * n_minus_one + q).is_identity())
}

fn mul_generator<C>(private: &[u8]) -> Result<EccPoint>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let d = scalar::<C>(private)?;
    let q = (ProjectivePoint::<C>::generator() * *d).to_affine();
    encode::<C>(&q).ok_or_else(|| KasError::computation("d * G is the point at infinity"))
}

fn random_scalar<C: CurveArithmetic>(rng: &mut (impl RngCore + CryptoRng)) -> SecureBytes {
    loop {
        let d = Zeroizing::new(<Scalar<C> as Field>::random(&mut *rng));
        if !bool::from(d.is_zero()) {
            let repr = Zeroizing::new(d.to_repr());
            return SecureBytes::from_slice(&repr);
        }
    }
}

fn shared_x<C: CurveArithmetic>(shared: &ProjectivePoint<C>, what: &str) -> Result<SecureBytes> {
    if bool::from(shared.is_identity()) {
        return Err(KasError::computation(format!("{} result is the point at infinity", what)));
    }
    let affine = Zeroizing::new(shared.to_affine());
    let x = Zeroizing::new(affine.x());
    Ok(SecureBytes::from_slice(&x))
}

fn cdh<C>(private: &[u8], public: &EccPoint) -> Result<SecureBytes>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let d = scalar::<C>(private)?;
    let q = decode::<C>(public)
        .ok_or_else(|| KasError::computation("ECC public key is not a point on the curve"))?;
    let shared = Zeroizing::new(ProjectivePoint::<C>::from(q) * *d);
    shared_x::<C>(&shared, "ECC CDH")
}

fn mqv_primitive<C>(inputs: &EccMqvInputs<'_>) -> Result<SecureBytes>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let d = scalar::<C>(inputs.static_private)?;
    let k = scalar::<C>(inputs.ephemeral_private)?;
    let own_avf = scalar::<C>(&inputs.own_avf.to_bytes_be())?;
    let other_avf = scalar::<C>(&inputs.other_avf.to_bytes_be())?;
    let implicit_sig = Zeroizing::new(*k + *own_avf * *d);

    let missing = || KasError::computation("ECC MQV public key is not a point on the curve");
    let qs = decode::<C>(inputs.other_static_public).ok_or_else(missing)?;
    let qe = decode::<C>(inputs.other_ephemeral_public).ok_or_else(missing)?;
    let combined = ProjectivePoint::<C>::from(qe) + ProjectivePoint::<C>::from(qs) * *other_avf;
    if bool::from(combined.is_identity()) {
        return Err(KasError::computation("ECC MQV intermediate point is the identity"));
    }
    let shared = Zeroizing::new(combined * *implicit_sig);
    shared_x::<C>(&shared, "ECC MQV")
}
