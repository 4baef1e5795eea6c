//! Hashing byte strings onto BN254's G1.
//!
//! Two strategies live here:
//!  * [`hash_to_g1`]: the "try-and-increment" map used by EigenLayer's `BN254.hashToG1` and by
//!    eigensdk-go's `MapToCurve`. Signatures over messages must use it to interoperate with them.
//!  * [`hash_to_point`]: `expand_message_xmd` (with keccak256 instead of SHA-256, so that a contract can
//!    recompute it) followed by the Shallue-van de Woestijne map from
//!    <https://datatracker.ietf.org/doc/html/rfc9380#section-6.6.1>. Never loops, so prefer it for new protocols.
use alloc::vec::Vec;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{MontFp, One};
use sha3::{Digest, Keccak256};

use crate::errors::BLSError;
use crate::field::{fq_from_be_bytes_mod_order, g, inv0, legendre, sgn0, sqrt};
use crate::i2osp;
use crate::types::*;

/// Upper bound on the number of candidates [`hash_to_g1`] tries. Half of all field elements are
/// residues, so reaching this is a bug in the field constants, not bad luck.
pub const MAX_TRIAL_ITERATIONS: usize = 256;

/// keccak256 absorbs 136 bytes per block; `Z_pad` is one full block of zeroes.
const KECCAK_BLOCK_SIZE: usize = 136;
/// keccak256 output size
const KECCAK_OUTPUT_SIZE: usize = 32;
/// Bytes drawn per field element: `ceil((ceil(log2(p)) + 128) / 8)` for 128 bits of security
const FIELD_ELEMENT_EXPANSION_SIZE: usize = 48;

/// `Z` of the Shallue-van de Woestijne map
const SVDW_Z: BnFq = MontFp!("1");
/// `-Z / 2`
const SVDW_C2: BnFq =
    MontFp!("10944121435919637611123202872628637544348155578648911831344518947322613104291");
/// `sqrt(-g(Z) * (3 * Z^2))`, the root with `sgn0 = 0`
const SVDW_C3: BnFq = MontFp!("8815841940592487685674414971303048083897117035520822607866");
/// `-4 * g(Z) / (3 * Z^2)`
const SVDW_C4: BnFq =
    MontFp!("7296080957279758407415468581752425029565437052432607887563012631548408736189");

/// ([spec link](https://datatracker.ietf.org/doc/html/rfc9380#section-5.3.1))
/// `expand_message_xmd`, instantiated with keccak256.
///
/// Implementation:
/// ```plain
///    1.  ell = ceil(len_in_bytes / b_in_bytes)
///    2.  ABORT if ell > 255 or len_in_bytes > 65535 or len(DST) > 255
///    3.  DST_prime = DST || I2OSP(len(DST), 1)
///    4.  Z_pad = I2OSP(0, s_in_bytes)
///    5.  l_i_b_str = I2OSP(len_in_bytes, 2)
///    6.  msg_prime = Z_pad || msg || l_i_b_str || I2OSP(0, 1) || DST_prime
///    7.  b_0 = H(msg_prime)
///    8.  b_1 = H(b_0 || I2OSP(1, 1) || DST_prime)
///    9.  for i in (2, ..., ell):
///    10.    b_i = H(strxor(b_0, b_(i - 1)) || I2OSP(i, 1) || DST_prime)
///    11. uniform_bytes = b_1 || ... || b_ell
///    12. return substr(uniform_bytes, 0, len_in_bytes)
/// ```
pub fn expand_message_keccak(dst: &[u8], msg: &[u8], out_len: usize) -> Result<Octets, BLSError> {
    // 2: the DST check comes first so an oversized tag never reaches the hasher
    if dst.len() > 255 {
        return Err(BLSError::InvalidDomain(dst.len()));
    }
    // 1
    let ell = (out_len + KECCAK_OUTPUT_SIZE - 1) / KECCAK_OUTPUT_SIZE;
    // 2: both checks are carried by I2OSP's range check
    let l_i_b_str = i2osp(out_len as u64, 2)?;
    i2osp(ell as u64, 1)?;

    // 3
    let mut dst_prime = dst.to_vec();
    dst_prime.extend_from_slice(&i2osp(dst.len() as u64, 1)?);

    // 4, 5, 6, 7
    let b_0 = Keccak256::new()
        .chain_update([0u8; KECCAK_BLOCK_SIZE])
        .chain_update(msg)
        .chain_update(&l_i_b_str)
        .chain_update(i2osp(0, 1)?)
        .chain_update(&dst_prime)
        .finalize();

    let mut uniform_bytes = Vec::with_capacity(ell * KECCAK_OUTPUT_SIZE);
    let mut b_i = [0u8; KECCAK_OUTPUT_SIZE];
    for i in 1..=ell {
        // 8 uses b_0 as is; 10 xors it with the previous block. Xoring with the zeroed b_i does both.
        let mut chained = [0u8; KECCAK_OUTPUT_SIZE];
        for (c, (a, b)) in chained.iter_mut().zip(b_0.iter().zip(b_i.iter())) {
            *c = a ^ b;
        }
        b_i = Keccak256::new()
            .chain_update(chained)
            .chain_update(i2osp(i as u64, 1)?)
            .chain_update(&dst_prime)
            .finalize()
            .into();
        // 11
        uniform_bytes.extend_from_slice(&b_i);
    }

    // 12
    uniform_bytes.truncate(out_len);
    Ok(uniform_bytes)
}

/// ([spec link](https://datatracker.ietf.org/doc/html/rfc9380#section-5.2))
/// Hashes `msg` to `count` elements of the base field: each element is a 48-byte, big-endian chunk
/// of [`expand_message_keccak`]'s output, reduced mod `p`.
pub fn hash_to_field(dst: &[u8], msg: &[u8], count: usize) -> Result<Vec<BnFq>, BLSError> {
    let uniform_bytes = expand_message_keccak(dst, msg, count * FIELD_ELEMENT_EXPANSION_SIZE)?;
    Ok(uniform_bytes
        .chunks_exact(FIELD_ELEMENT_EXPANSION_SIZE)
        .map(fq_from_be_bytes_mod_order)
        .collect())
}

/// Hashes a message to G1 the way EigenLayer's `BN254.hashToG1` does: the message is read as a
/// big-endian integer reduced mod `p`, and `x, x+1, x+2, ...` are tried until `x^3 + 3` is a square.
///
/// This is the hash the on-chain verifier and Go peers recompute, so [`crate::sign_message`] uses it.
/// It is not constant time.
pub fn hash_to_g1(msg: &[u8]) -> Result<G1AffinePoint, BLSError> {
    hash_to_g1_capped(msg, MAX_TRIAL_ITERATIONS)
}

/// [`hash_to_g1`], giving up after `max_iterations` candidates.
fn hash_to_g1_capped(msg: &[u8], max_iterations: usize) -> Result<G1AffinePoint, BLSError> {
    let mut x = fq_from_be_bytes_mod_order(msg);

    for attempt in 0..max_iterations {
        let beta = g(x);
        if legendre(beta)? != -1 {
            let y = sqrt(beta);
            // legendre(beta) = 0 would be fine too, but make sure sqrt agrees before building a point
            if y * y == beta {
                tracing::trace!(attempt, "found G1 point by trial increment");
                return Ok(G1AffinePoint::new_unchecked(x, y));
            }
        }
        x += BnFq::one();
    }

    tracing::error!(
        max = max_iterations,
        "trial-increment hashing did not terminate, field constants are likely wrong"
    );
    Err(BLSError::HashToCurveExhausted(max_iterations))
}

/// ([spec link](https://datatracker.ietf.org/doc/html/rfc9380#section-6.6.1))
/// Shallue-van de Woestijne map from a field element to G1.
///
/// Implementation (straight-line, for `A = 0`):
/// ```plain
///    1.  tv1 = u^2 * g(Z)
///    2.  tv2 = 1 + tv1
///    3.  tv1 = 1 - tv1
///    4.  tv3 = inv0(tv1 * tv2)
///    5.  tv5 = u * tv1 * tv3 * c3
///    6.  x1 = c2 - tv5
///    7.  x2 = c2 + tv5
///    8.  x3 = Z + c4 * (tv2^2 * tv3)^2
///    9.  x = x1 if is_square(g(x1)), else x2 if is_square(g(x2)), else x3
///    10. y = sqrt(g(x))
///    11. if sgn0(u) != sgn0(y): y = -y
///    12. return (x, y)
/// ```
pub fn map_to_point(u: BnFq) -> Result<G1AffinePoint, BLSError> {
    // 1, 2, 3
    let tv1 = u * u * g(SVDW_Z);
    let tv2 = BnFq::one() + tv1;
    let tv1 = BnFq::one() - tv1;
    // 4
    let tv3 = inv0(tv1 * tv2);
    // 5
    let tv5 = u * tv1 * tv3 * SVDW_C3;
    // 6, 7
    let x1 = SVDW_C2 - tv5;
    let x2 = SVDW_C2 + tv5;
    // 8
    let tv8 = tv2 * tv2 * tv3;
    let x3 = SVDW_Z + SVDW_C4 * tv8 * tv8;

    // 9
    let x = if legendre(g(x1))? == 1 {
        x1
    } else if legendre(g(x2))? == 1 {
        x2
    } else {
        x3
    };

    // 10
    let mut y = sqrt(g(x));
    // 11
    if sgn0(u) != sgn0(y) {
        y = -y;
    }

    // 12
    Ok(G1AffinePoint::new_unchecked(x, y))
}

/// ([spec link](https://datatracker.ietf.org/doc/html/rfc9380#section-3))
/// `hash_to_curve`: two field elements are mapped independently and the resulting points added.
///
/// SvdW maps into the whole curve, and BN254's G1 has cofactor 1, so no cofactor clearing is needed.
pub fn hash_to_point(dst: &[u8], msg: &[u8]) -> Result<G1AffinePoint, BLSError> {
    let u = hash_to_field(dst, msg, 2)?;
    let q0 = map_to_point(u[0])?;
    let q1 = map_to_point(u[1])?;
    Ok((q0.into_group() + q1).into_affine())
}
