//! Base field helpers used by hashing to the curve.
//!
//! Addition, subtraction, negation and multiplication are the operators of [`BnFq`]; this module adds
//! the handful of operations hash-to-curve needs on top of them, written with explicit exponents so the
//! results match the Solidity and Go implementations we interoperate with.
use ark_ff::{BigInteger, Field, MontFp, One, PrimeField, Zero};

use crate::errors::BLSError;
use crate::types::BnFq;

/// `b` in `y^2 = x^3 + b` (BN254 G1 has `a = 0`).
pub const CURVE_B: BnFq = MontFp!("3");

/// `(p + 1) / 4` as little-endian limbs. Valid as a square root exponent because `p = 3 mod 4`.
pub const SQRT_EXPONENT: [u64; 4] = [
    0x4f082305b61f3f52,
    0x65e05aa45a1c72a3,
    0x6e14116da0605617,
    0x0c19139cb84c680a,
];

/// `(p - 1) / 2` as little-endian limbs (Euler's criterion).
pub const LEGENDRE_EXPONENT: [u64; 4] = [
    0x9e10460b6c3e7ea3,
    0xcbc0b548b438e546,
    0xdc2822db40c0ac2e,
    0x183227397098d014,
];

/// `p - 2` as little-endian limbs (Fermat inversion).
pub const INVERSE_EXPONENT: [u64; 4] = [
    0x3c208c16d87cfd45,
    0x97816a916871ca8d,
    0xb85045b68181585d,
    0x30644e72e131a029,
];

/// Square-and-multiply exponentiation.
pub fn exp(base: BnFq, exponent: &[u64]) -> BnFq {
    base.pow(exponent)
}

/// `a^(p-2)`, i.e. the inverse of `a`, except that `inv0(0) = 0`.
pub fn inv0(a: BnFq) -> BnFq {
    if a.is_zero() {
        return BnFq::zero();
    }
    exp(a, &INVERSE_EXPONENT)
}

/// `a^((p+1)/4)`. Only meaningful when `legendre(a)` is 0 or 1: for a non-residue this returns
/// a value whose square is `-a`, not an error.
pub fn sqrt(a: BnFq) -> BnFq {
    exp(a, &SQRT_EXPONENT)
}

/// Legendre symbol of `a`: 1 for non-zero squares, -1 for non-squares, 0 for zero.
pub fn legendre(a: BnFq) -> Result<i8, BLSError> {
    let x = exp(a, &LEGENDRE_EXPONENT);
    if x == -BnFq::one() {
        return Ok(-1);
    }
    if x.is_one() {
        return Ok(1);
    }
    if x.is_zero() {
        return Ok(0);
    }
    Err(BLSError::LegendreComputation)
}

/// Parity of the canonical representative of `a`. Used to pick between `y` and `-y`.
pub fn sgn0(a: BnFq) -> bool {
    a.into_bigint().is_odd()
}

/// Right-hand side of the curve equation: `x^3 + 3`.
pub fn g(x: BnFq) -> BnFq {
    x * x * x + CURVE_B
}

/// Interprets `bytes` as a big-endian integer and reduces it mod `p`.
pub fn fq_from_be_bytes_mod_order(bytes: &[u8]) -> BnFq {
    BnFq::from_be_bytes_mod_order(bytes)
}
