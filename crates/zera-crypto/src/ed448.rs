//! Ed448 (RFC 8032, empty context).
//!
//! Signing goes through `ed448-rust`. That crate can only build a public key
//! from a secret scalar, so verification decodes the encoded point itself and
//! checks the group equation over `num-bigint`. Nothing secret flows through
//! the verifier.

use crate::sign::Algorithm;
use crate::CryptoError;
use ed448_rust::{PrivateKey, PublicKey};
use num_bigint::BigUint;
use std::sync::LazyLock;
use tiny_keccak::{Hasher, Shake};
use zera_types::constants::{ED448_PRIVATE_KEY_SIZE, ED448_PUBLIC_KEY_SIZE};
use zeroize::Zeroizing;

const SIGNATURE_SIZE: usize = 2 * ED448_PUBLIC_KEY_SIZE;

/// `dom4(0, "")`: no prehash, empty context.
const DOM4: &[u8] = b"SigEd448\x00\x00";

const BASE_X: [u8; 56] = [
    0x4F, 0x19, 0x70, 0xC6, 0x6B, 0xED, 0x0D, 0xED, 0x22, 0x1D, 0x15, 0xA6, 0x22, 0xBF, 0x36, 0xDA,
    0x9E, 0x14, 0x65, 0x70, 0x47, 0x0F, 0x17, 0x67, 0xEA, 0x6D, 0xE3, 0x24, 0xA3, 0xD3, 0xA4, 0x64,
    0x12, 0xAE, 0x1A, 0xF7, 0x2A, 0xB6, 0x65, 0x11, 0x43, 0x3B, 0x80, 0xE1, 0x8B, 0x00, 0x93, 0x8E,
    0x26, 0x26, 0xA8, 0x2B, 0xC7, 0x0C, 0xC0, 0x5E,
];

const BASE_Y: [u8; 56] = [
    0x69, 0x3F, 0x46, 0x71, 0x6E, 0xB6, 0xBC, 0x24, 0x88, 0x76, 0x20, 0x37, 0x56, 0xC9, 0xC7, 0x62,
    0x4B, 0xEA, 0x73, 0x73, 0x6C, 0xA3, 0x98, 0x40, 0x87, 0x78, 0x9C, 0x1E, 0x05, 0xA0, 0xC2, 0xD7,
    0x3A, 0xD3, 0xFF, 0x1C, 0xE6, 0x7C, 0x39, 0xC4, 0xFD, 0xBD, 0x13, 0x2C, 0x4E, 0xD7, 0xC8, 0xAD,
    0x98, 0x08, 0x79, 0x5B, 0xF2, 0x30, 0xFA, 0x14,
];

const ORDER: [u8; 56] = [
    0x3f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7c, 0xca, 0x23, 0xe9,
    0xc4, 0x4e, 0xdb, 0x49, 0xae, 0xd6, 0x36, 0x90, 0x21, 0x6c, 0xc2, 0x72, 0x8d, 0xc5, 0x8f, 0x55,
    0x23, 0x78, 0xc2, 0x92, 0xab, 0x58, 0x44, 0xf3,
];

struct Curve {
    /// 2^448 - 2^224 - 1
    p: BigUint,
    /// -39081 mod p
    d: BigUint,
    /// Prime order of the base point.
    l: BigUint,
    /// (p + 1) / 4, the square-root exponent (p = 3 mod 4).
    sqrt_exp: BigUint,
    /// p - 2, the inversion exponent.
    inv_exp: BigUint,
    base: Point,
}

static CURVE: LazyLock<Curve> = LazyLock::new(|| {
    let one = BigUint::from(1u32);
    let p = (&one << 448usize) - (&one << 224usize) - &one;
    let d = &p - BigUint::from(39081u32);
    let sqrt_exp = (&p + &one) >> 2usize;
    let inv_exp = &p - BigUint::from(2u32);
    Curve {
        d,
        l: BigUint::from_bytes_be(&ORDER),
        sqrt_exp,
        inv_exp,
        base: Point {
            x: BigUint::from_bytes_be(&BASE_X),
            y: BigUint::from_bytes_be(&BASE_Y),
            z: one,
        },
        p,
    }
});

/// Projective point on the untwisted Edwards curve `x^2 + y^2 = 1 + d x^2 y^2`.
#[derive(Clone)]
struct Point {
    x: BigUint,
    y: BigUint,
    z: BigUint,
}

impl Curve {
    fn add_mod(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.p
    }

    fn sub_mod(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + &self.p - b) % &self.p
    }

    fn mul_mod(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    fn identity(&self) -> Point {
        Point {
            x: BigUint::default(),
            y: BigUint::from(1u32),
            z: BigUint::from(1u32),
        }
    }

    /// Complete addition; Ed448's `d` is a non-square, so this also doubles.
    fn add(&self, a: &Point, b: &Point) -> Point {
        let za = self.mul_mod(&a.z, &b.z);
        let zb = self.mul_mod(&za, &za);
        let xc = self.mul_mod(&a.x, &b.x);
        let yc = self.mul_mod(&a.y, &b.y);
        let e = self.mul_mod(&self.mul_mod(&self.d, &xc), &yc);
        let f = self.sub_mod(&zb, &e);
        let g = self.add_mod(&zb, &e);
        let h = self.mul_mod(&self.add_mod(&a.x, &a.y), &self.add_mod(&b.x, &b.y));
        let cross = self.sub_mod(&self.sub_mod(&h, &xc), &yc);
        Point {
            x: self.mul_mod(&self.mul_mod(&za, &f), &cross),
            y: self.mul_mod(&self.mul_mod(&za, &g), &self.sub_mod(&yc, &xc)),
            z: self.mul_mod(&f, &g),
        }
    }

    fn mul(&self, point: &Point, scalar: &BigUint) -> Point {
        let mut acc = self.identity();
        for bit in (0..scalar.bits()).rev() {
            acc = self.add(&acc, &acc);
            if scalar.bit(bit) {
                acc = self.add(&acc, point);
            }
        }
        acc
    }

    fn times_four(&self, point: &Point) -> Point {
        let twice = self.add(point, point);
        self.add(&twice, &twice)
    }

    fn same(&self, a: &Point, b: &Point) -> bool {
        self.mul_mod(&a.x, &b.z) == self.mul_mod(&b.x, &a.z)
            && self.mul_mod(&a.y, &b.z) == self.mul_mod(&b.y, &a.z)
    }

    /// Decode a 57-byte point: little-endian `y` with the sign of `x` in the
    /// top bit of the last byte.
    fn decode(&self, bytes: &[u8]) -> Option<Point> {
        if bytes.len() != ED448_PUBLIC_KEY_SIZE {
            return None;
        }
        let x_sign = bytes[ED448_PUBLIC_KEY_SIZE - 1] >> 7 == 1;
        let mut y_bytes = bytes.to_vec();
        y_bytes[ED448_PUBLIC_KEY_SIZE - 1] &= 0x7f;
        let y = BigUint::from_bytes_le(&y_bytes);
        if y >= self.p {
            return None;
        }

        let one = BigUint::from(1u32);
        let yy = self.mul_mod(&y, &y);
        let u = self.sub_mod(&yy, &one);
        let v = self.sub_mod(&self.mul_mod(&self.d, &yy), &one);
        let xx = self.mul_mod(&u, &v.modpow(&self.inv_exp, &self.p));
        let mut x = xx.modpow(&self.sqrt_exp, &self.p);
        if self.mul_mod(&x, &x) != xx {
            return None;
        }
        let zero = BigUint::default();
        if x == zero && x_sign {
            return None;
        }
        if x.bit(0) != x_sign {
            x = &self.p - x;
        }
        Some(Point { x, y, z: one })
    }
}

fn private_key(seed: &[u8]) -> Result<PrivateKey, CryptoError> {
    if seed.len() != ED448_PRIVATE_KEY_SIZE {
        return Err(CryptoError::InvalidPrivateKeyLength {
            algorithm: Algorithm::Ed448,
            expected: ED448_PRIVATE_KEY_SIZE,
            actual: seed.len(),
        });
    }
    let mut bytes = Zeroizing::new([0u8; ED448_PRIVATE_KEY_SIZE]);
    bytes.copy_from_slice(seed);
    Ok(PrivateKey::from(*bytes))
}

/// Derive the raw public key of a 57-byte seed.
pub(crate) fn public_from_seed(seed: &[u8]) -> Result<[u8; ED448_PUBLIC_KEY_SIZE], CryptoError> {
    let private = private_key(seed)?;
    Ok(PublicKey::from(&private).as_byte())
}

pub(crate) fn sign(seed: &[u8], payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let private = private_key(seed)?;
    private
        .sign(payload, None)
        .map(|sig| sig.to_vec())
        .map_err(|_| CryptoError::InvalidKey(Algorithm::Ed448))
}

pub(crate) fn verify(public: &[u8], payload: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    if public.len() != ED448_PUBLIC_KEY_SIZE {
        return Err(CryptoError::InvalidPublicKeyLength {
            algorithm: Algorithm::Ed448,
            expected: ED448_PUBLIC_KEY_SIZE,
            actual: public.len(),
        });
    }
    let curve = &*CURVE;
    let key = curve
        .decode(public)
        .ok_or(CryptoError::InvalidKey(Algorithm::Ed448))?;
    let failed = CryptoError::VerificationFailed(Algorithm::Ed448);
    if signature.len() != SIGNATURE_SIZE {
        return Err(failed);
    }

    let (r_bytes, s_bytes) = signature.split_at(ED448_PUBLIC_KEY_SIZE);
    let r = curve.decode(r_bytes).ok_or_else(|| failed.clone())?;
    let s = BigUint::from_bytes_le(s_bytes);
    if s >= curve.l {
        return Err(failed);
    }

    let mut digest = [0u8; SIGNATURE_SIZE];
    let mut shake = Shake::v256();
    shake.update(DOM4);
    shake.update(r_bytes);
    shake.update(public);
    shake.update(payload);
    shake.finalize(&mut digest);
    let h = BigUint::from_bytes_le(&digest) % &curve.l;

    // [4][S]B == [4]R + [4][h]A
    let lhs = curve.times_four(&curve.mul(&curve.base, &s));
    let rhs = curve.times_four(&curve.add(&r, &curve.mul(&key, &h)));
    if curve.same(&lhs, &rhs) {
        Ok(())
    } else {
        Err(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032 section 7.4, "1 octet".
    const SECRET: &str = "c4eab05d357007c632f3dbb48489924d552b08fe0c353a0d4a1f00acda2c463afbea67c5e8d2877c5e3bc397a659949ef8021e954e0a12274e";
    const PUBLIC: &str = "43ba28f430cdff456ae531545f7ecd0ac834a55d9358c0372bfa0c6c6798c0866aea01eb00742802b8438ea4cb82169c235160627b4c3a9480";
    const SIGNATURE: &str = "26b8f91727bd62897af15e41eb43c377efb9c610d48f2335cb0bd0087810f4352541b143c4b981b7e18f62de8ccdf633fc1bf037ab7cd779805e0dbcc0aae1cbcee1afb2e027df36bc04dcecbf154336c19f0af7e0a6472905e799f1953d2a0ff3348ab21aa4adafd1d234441cf807c03a00";

    #[test]
    fn test_rfc8032_vector_verifies() {
        let public = hex::decode(PUBLIC).unwrap();
        let signature = hex::decode(SIGNATURE).unwrap();
        verify(&public, &[0x03], &signature).unwrap();
        assert_eq!(
            verify(&public, &[0x04], &signature),
            Err(CryptoError::VerificationFailed(Algorithm::Ed448))
        );
    }

    #[test]
    fn test_rfc8032_vector_signs() {
        let secret = hex::decode(SECRET).unwrap();
        assert_eq!(hex::encode(public_from_seed(&secret).unwrap()), PUBLIC);
        assert_eq!(hex::encode(sign(&secret, &[0x03]).unwrap()), SIGNATURE);
    }

    #[test]
    fn test_decode_roundtrips_encoded_base() {
        let curve = &*CURVE;
        let public = hex::decode(PUBLIC).unwrap();
        let point = curve.decode(&public).unwrap();
        let doubled = curve.add(&point, &point);
        assert!(curve.same(&curve.mul(&point, &BigUint::from(2u32)), &doubled));
        assert!(curve.same(&curve.mul(&curve.base, &curve.l), &curve.identity()));
    }

    #[test]
    fn test_rejects_off_curve_and_malformed() {
        let public = hex::decode(PUBLIC).unwrap();
        let signature = hex::decode(SIGNATURE).unwrap();

        // y >= p cannot be a point.
        let mut bogus = vec![0xffu8; ED448_PUBLIC_KEY_SIZE];
        bogus[ED448_PUBLIC_KEY_SIZE - 1] = 0;
        assert_eq!(
            verify(&bogus, &[0x03], &signature),
            Err(CryptoError::InvalidKey(Algorithm::Ed448))
        );
        assert_eq!(
            verify(&public, &[0x03], &signature[..SIGNATURE_SIZE - 1]),
            Err(CryptoError::VerificationFailed(Algorithm::Ed448))
        );

        // S at or above the group order.
        let mut high_s = signature.clone();
        high_s[ED448_PUBLIC_KEY_SIZE..].copy_from_slice(&[0xff; ED448_PUBLIC_KEY_SIZE]);
        assert_eq!(
            verify(&public, &[0x03], &high_s),
            Err(CryptoError::VerificationFailed(Algorithm::Ed448))
        );
    }

    #[test]
    fn test_random_seed_sign_verify() {
        let seed = [7u8; ED448_PRIVATE_KEY_SIZE];
        let public = public_from_seed(&seed).unwrap();
        let sig = sign(&seed, b"zera payload").unwrap();
        verify(&public, b"zera payload", &sig).unwrap();
        assert!(verify(&public, b"zera payloae", &sig).is_err());
    }
}
