//! ECDSA over secp256k1 and NIST P-256 with a deterministic nonce (spec §4.6).
//!
//! Point/scalar arithmetic is delegated to the RustCrypto `k256`/`p256`
//! crates' constant-time primitives; only the nonce `k` is homegrown, fed in
//! from our own [`HmacDrbg`](crate::crypto::hmac_drbg::HmacDrbg) rather than
//! those crates' built-in RFC 6979 implementation, so that the nonce
//! generator specified in spec §4.5 is the one actually exercised.
//!
//! `Secp256k1Engine` and `P256Engine` implement the same [`EcdsaEngine`]
//! trait; the trait methods share one nonce-retry loop, each engine supplies
//! only the curve-specific point/scalar operations.

use elliptic_curve::ops::Reduce;
use elliptic_curve::point::AffineCoordinates;
use elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use elliptic_curve::{Field, PrimeField};

use crate::crypto::error::CryptoError;
use crate::crypto::hmac_drbg::HmacDrbg;

pub const PUBLIC_KEY_SIZE: usize = 33;
pub const SIGNATURE_SIZE: usize = 64;

/// Capability set shared by the two ECDSA curves this crate supports.
///
/// Mirrors spec §9's "tagged variant... one trait-like capability set" note:
/// a single generic nonce-retry loop drives each curve's concrete
/// scalar/point arithmetic.
pub trait EcdsaEngine {
    /// Half the group order, big-endian, for low-S normalization.
    const HALF_ORDER: [u8; 32];

    type Scalar: Copy + PartialEq;
    type AffinePoint: Copy;

    fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Self::Scalar>;
    fn scalar_to_bytes(s: &Self::Scalar) -> [u8; 32];
    fn scalar_is_zero(s: &Self::Scalar) -> bool;
    fn scalar_negate(s: &Self::Scalar) -> Self::Scalar;
    fn scalar_invert(s: &Self::Scalar) -> Option<Self::Scalar>;
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn scalar_mul(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    fn point_from_sec1(bytes: &[u8]) -> Option<Self::AffinePoint>;
    fn point_mul_generator(k: &Self::Scalar) -> Self::AffinePoint;
    /// `u1*G + u2*point`, reduced to affine.
    fn point_double_mul(u1: &Self::Scalar, u2: &Self::Scalar, point: &Self::AffinePoint) -> Self::AffinePoint;
    fn point_x_reduced(p: &Self::AffinePoint) -> Self::Scalar;
    /// Reduces an arbitrary 32-byte digest mod the curve order (it may exceed
    /// `n`; unlike key/signature material it is never rejected).
    fn scalar_reduce(bytes: &[u8; 32]) -> Self::Scalar;

    /// Deterministic sign over a 32-byte message digest, per RFC 6979 §3.2 /
    /// spec §4.6. Returns `r || s`, low-S normalized.
    fn sign(secret_key: &[u8], hash: &[u8; 32]) -> Result<[u8; SIGNATURE_SIZE], CryptoError> {
        let sk_bytes: [u8; 32] = secret_key
            .try_into()
            .map_err(|_| CryptoError::BadLength { expected: 32, actual: secret_key.len() })?;
        let sk = Self::scalar_from_bytes(&sk_bytes).ok_or(CryptoError::MalformedKey)?;

        let mut drbg = HmacDrbg::new(&sk_bytes, hash, b"");
        for _ in 0..1000 {
            let candidate = drbg.generate(32);
            let candidate: [u8; 32] = candidate.try_into().expect("generate(32) yields 32 bytes");
            let Some(k) = Self::scalar_from_bytes(&candidate) else { continue };
            if Self::scalar_is_zero(&k) {
                continue;
            }

            let r_point = Self::point_mul_generator(&k);
            let r = Self::point_x_reduced(&r_point);
            if Self::scalar_is_zero(&r) {
                continue;
            }

            let Some(k_inv) = Self::scalar_invert(&k) else { continue };
            let h = Self::scalar_reduce(hash);
            let rs = Self::scalar_mul(&r, &sk);
            let h_plus_rs = Self::scalar_add(&h, &rs);
            let mut s = Self::scalar_mul(&k_inv, &h_plus_rs);
            if Self::scalar_is_zero(&s) {
                continue;
            }

            if !Self::s_is_low(&s) {
                s = Self::scalar_negate(&s);
            }

            let mut out = [0u8; SIGNATURE_SIZE];
            out[..32].copy_from_slice(&Self::scalar_to_bytes(&r));
            out[32..].copy_from_slice(&Self::scalar_to_bytes(&s));
            return Ok(out);
        }
        Err(CryptoError::NonceGenerationFailed)
    }

    fn verify(public_key: &[u8], hash: &[u8; 32], signature: &[u8]) -> Result<(), CryptoError> {
        if signature.len() != SIGNATURE_SIZE {
            return Err(CryptoError::BadLength { expected: SIGNATURE_SIZE, actual: signature.len() });
        }
        let r_bytes: [u8; 32] = signature[..32].try_into().unwrap();
        let s_bytes: [u8; 32] = signature[32..].try_into().unwrap();
        let r = Self::scalar_from_bytes(&r_bytes).ok_or(CryptoError::SignatureVerifyFailed)?;
        let s = Self::scalar_from_bytes(&s_bytes).ok_or(CryptoError::SignatureVerifyFailed)?;
        if Self::scalar_is_zero(&r) || Self::scalar_is_zero(&s) {
            return Err(CryptoError::SignatureVerifyFailed);
        }

        let point = Self::point_from_sec1(public_key).ok_or(CryptoError::MalformedKey)?;
        let w = Self::scalar_invert(&s).ok_or(CryptoError::SignatureVerifyFailed)?;
        let h = Self::scalar_reduce(hash);
        let u1 = Self::scalar_mul(&h, &w);
        let u2 = Self::scalar_mul(&r, &w);

        let candidate = Self::point_double_mul(&u1, &u2, &point);
        let candidate_r = Self::point_x_reduced(&candidate);
        if candidate_r == r {
            Ok(())
        } else {
            Err(CryptoError::SignatureVerifyFailed)
        }
    }

    fn s_is_low(s: &Self::Scalar) -> bool {
        let s_bytes = Self::scalar_to_bytes(s);
        s_bytes <= Self::HALF_ORDER
    }
}

pub struct Secp256k1Engine;

impl EcdsaEngine for Secp256k1Engine {
    const HALF_ORDER: [u8; 32] = [
        0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b,
        0x20, 0xa0,
    ];

    type Scalar = k256::Scalar;
    type AffinePoint = k256::AffinePoint;

    fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Self::Scalar> {
        Option::from(k256::Scalar::from_repr((*bytes).into()))
    }

    fn scalar_to_bytes(s: &Self::Scalar) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&s.to_repr());
        out
    }

    fn scalar_is_zero(s: &Self::Scalar) -> bool {
        bool::from(Field::is_zero(s))
    }

    fn scalar_negate(s: &Self::Scalar) -> Self::Scalar {
        -*s
    }

    fn scalar_invert(s: &Self::Scalar) -> Option<Self::Scalar> {
        Option::from(Field::invert(s))
    }

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        *a + *b
    }

    fn scalar_mul(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        *a * *b
    }

    fn point_from_sec1(bytes: &[u8]) -> Option<Self::AffinePoint> {
        let encoded = k256::EncodedPoint::from_bytes(bytes).ok()?;
        Option::from(k256::AffinePoint::from_encoded_point(&encoded))
    }

    fn point_mul_generator(k: &Self::Scalar) -> Self::AffinePoint {
        use elliptic_curve::group::Curve as _;
        (k256::ProjectivePoint::from(k256::AffinePoint::GENERATOR) * k).to_affine()
    }

    fn point_double_mul(u1: &Self::Scalar, u2: &Self::Scalar, point: &Self::AffinePoint) -> Self::AffinePoint {
        use elliptic_curve::group::Curve as _;
        let lhs = k256::ProjectivePoint::from(k256::AffinePoint::GENERATOR) * u1;
        let rhs = k256::ProjectivePoint::from(*point) * u2;
        (lhs + rhs).to_affine()
    }

    fn point_x_reduced(p: &Self::AffinePoint) -> Self::Scalar {
        let x = AffineCoordinates::x(p);
        k256::Scalar::reduce_bytes(&x)
    }

    fn scalar_reduce(bytes: &[u8; 32]) -> Self::Scalar {
        k256::Scalar::reduce_bytes(bytes.into())
    }
}

pub struct P256Engine;

impl EcdsaEngine for P256Engine {
    const HALF_ORDER: [u8; 32] = [
        0x7f, 0xff, 0xff, 0xff, 0x80, 0x00, 0x00, 0x00, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xde, 0x73, 0x7d, 0x56, 0xd3, 0x8b, 0xcf, 0x42, 0x79, 0xdc, 0xe5, 0x61, 0x7e, 0x31,
        0x92, 0xa8,
    ];

    type Scalar = p256::Scalar;
    type AffinePoint = p256::AffinePoint;

    fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Self::Scalar> {
        Option::from(p256::Scalar::from_repr((*bytes).into()))
    }

    fn scalar_to_bytes(s: &Self::Scalar) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&s.to_repr());
        out
    }

    fn scalar_is_zero(s: &Self::Scalar) -> bool {
        bool::from(Field::is_zero(s))
    }

    fn scalar_negate(s: &Self::Scalar) -> Self::Scalar {
        -*s
    }

    fn scalar_invert(s: &Self::Scalar) -> Option<Self::Scalar> {
        Option::from(Field::invert(s))
    }

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        *a + *b
    }

    fn scalar_mul(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        *a * *b
    }

    fn point_from_sec1(bytes: &[u8]) -> Option<Self::AffinePoint> {
        let encoded = p256::EncodedPoint::from_bytes(bytes).ok()?;
        Option::from(p256::AffinePoint::from_encoded_point(&encoded))
    }

    fn point_mul_generator(k: &Self::Scalar) -> Self::AffinePoint {
        use elliptic_curve::group::Curve as _;
        (p256::ProjectivePoint::from(p256::AffinePoint::GENERATOR) * k).to_affine()
    }

    fn point_double_mul(u1: &Self::Scalar, u2: &Self::Scalar, point: &Self::AffinePoint) -> Self::AffinePoint {
        use elliptic_curve::group::Curve as _;
        let lhs = p256::ProjectivePoint::from(p256::AffinePoint::GENERATOR) * u1;
        let rhs = p256::ProjectivePoint::from(*point) * u2;
        (lhs + rhs).to_affine()
    }

    fn point_x_reduced(p: &Self::AffinePoint) -> Self::Scalar {
        let x = AffineCoordinates::x(p);
        p256::Scalar::reduce_bytes(&x)
    }

    fn scalar_reduce(bytes: &[u8; 32]) -> Self::Scalar {
        p256::Scalar::reduce_bytes(bytes.into())
    }
}
