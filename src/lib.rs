//! This crate implements the BLS operations of an EigenLayer-style AVS operator over BN254 (alt_bn128),
//! on top of the [`arkworks`](https://github.com/arkworks-rs) crates ecosystem.
//!
//! Signatures live in G1 and public keys in G2 (with a G1 copy for registries), which is the layout
//! EigenLayer's `BLSSignatureChecker` and `BN254.sol` expect:
//!  * EC: BN254, `y^2 = x^3 + 3` over a 254-bit prime field, G1 generator `(1, 2)`.
//!  * hash_to_point: EigenLayer's try-and-increment `hashToG1` for message signatures, so the contract and
//!    eigensdk-go peers can recompute it. A keccak-based `expand_message_xmd` + Shallue-van de Woestijne
//!    hash ([`hash_to_point`]) is available for protocols free to pick their own.
//!  * proof of possession: the operator signs a challenge point computed by the registry contract
//!    ([`pubkey_registration_params`]).
//!
//! Pairing verification is left to the contract or the peer. Points are handed out in two wire formats,
//! see [`serialization`].
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::ToString;
use alloc::vec::Vec;

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_std::Zero;
use num_bigint::BigUint;
use rand_core::{OsRng, RngCore};

pub mod errors;
pub mod field;
pub mod hashing;
pub mod serialization;
pub mod types;

use errors::*;
use types::*;

pub use hashing::{expand_message_keccak, hash_to_field, hash_to_g1, hash_to_point, map_to_point};
pub use serialization::{
    evm_to_point_g1, evm_to_point_g2, peer_g1_to_evm, peer_g2_to_evm, peer_to_point_g1,
    peer_to_point_g2, point_to_evm_g1, point_to_evm_g2, point_to_peer_g1, point_to_peer_g2,
};

/// Domain separation tag for [`hash_to_point`]
pub const DST_BN254_G1: &str = "BLS_SIG_BN254G1_XMD:KECCAK-256_SVDW_RO_";

/// Number of random bytes drawn for a fresh secret key. 31 bytes always fit below `r`, so no reduction
/// (and no bias) is involved.
pub const SECRET_KEY_RANDOM_BYTES: usize = 31;

/// ([spec link](https://datatracker.ietf.org/doc/html/rfc8017#section-4.1))
/// I2OSP converts a nonnegative integer to an octet string of a specified length.
///
/// Implementation:
/// ```plain
///    1.  If x >= 256^xLen, output "integer too large" and stop.
///    2.  Write the integer x in its unique xLen-digit representation in base 256:
///        x = x_(xLen-1) 256^(xLen-1) + x_(xLen-2) 256^(xLen-2) + ... + x_1 256 + x_0,
///        where 0 <= x_i < 256 (note that one or more leading digits will be zero if x is less than 256^(xLen-1)).
///    3.  Let the octet X_i have the integer value x_(xLen-i) for 1 <= i <= xLen.
///        Output the octet string X = X_1 X_2 ... X_xLen.
/// ```
pub(crate) fn i2osp(x: u64, x_len: usize) -> Result<Vec<u8>, BLSError> {
    // 1
    if x_len < 8 && x >= 1 << (8 * x_len) {
        return Err(BLSError::IntegerTooLarge(x, x_len));
    }

    // 2
    // In other words: encode `x` as a big-endian byte vector.
    let bytes = x.to_be_bytes();

    // 3
    let mut octets = Vec::with_capacity(x_len);
    octets.resize(x_len.saturating_sub(bytes.len()), 0);
    octets.extend_from_slice(&bytes[bytes.len().saturating_sub(x_len)..]);
    Ok(octets)
}

/// ([spec link](https://datatracker.ietf.org/doc/html/rfc8017#section-4.2))
/// OS2IP converts an octet string to a nonnegative integer.
///
/// Implementation:
/// ```plain
///    1.  Let X_1 X_2 ... X_xLen be the octets of X from first to last,
///        and let x_(xLen-i) be the integer value of the octet X_i for 1 <= i <= xLen.
///    2.  Let x = x_(xLen-1) 256^(xLen-1) + x_(xLen-2) 256^(xLen-2) + ...  + x_1 256 + x_0.
///    3.  Output x.
/// ```
pub(crate) fn os2ip(os: &[u8]) -> BigUint {
    // 1 & 2 & 3
    // Step 1 and 2 can be rephrased as "parse bytes as a big-endian integer"
    BigUint::from_bytes_be(os)
}

/// Parses a hex-encoded secret scalar (with or without `0x`).
///
/// The value must be non-zero and smaller than the scalar field order `r`: values that would need
/// reducing are rejected rather than silently mapped to another key.
pub fn parse_secret_key(secret_hex: &str) -> Result<SecretKey, BLSError> {
    let digits = secret_hex
        .strip_prefix("0x")
        .or_else(|| secret_hex.strip_prefix("0X"))
        .unwrap_or(secret_hex);

    // `parse_bytes` alone would let a leading `+` and `_` separators through
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(BLSError::InvalidScalar("not a hexadecimal string".to_string()));
    }
    let sk = BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| BLSError::InvalidScalar("not a hexadecimal string".to_string()))?;

    let r: BigUint = BnFr::MODULUS.into();
    if sk >= r {
        return Err(BLSError::InvalidScalar(
            "not smaller than the scalar field order".to_string(),
        ));
    }
    if sk.is_zero() {
        return Err(BLSError::InvalidScalar("zero".to_string()));
    }

    Ok(SecretKey(BnFr::from(sk)))
}

/// Draws a fresh secret key from the operating system's RNG.
pub fn random_secret_key() -> SecretKey {
    let mut ikm = [0u8; SECRET_KEY_RANDOM_BYTES];
    loop {
        OsRng.fill_bytes(&mut ikm);
        let sk = BnFr::from(os2ip(&ikm));
        // 2^-248 odds, but a zero key would sign everything to the identity
        if !sk.is_zero() {
            return SecretKey(sk);
        }
    }
}

/// Takes a secret key and outputs the corresponding public key in G1: `sk * G1`.
pub fn sk_to_pk_g1(sk: &SecretKey) -> G1AffinePoint {
    (G1AffinePoint::generator() * sk.0).into_affine()
}

/// Takes a secret key and outputs the corresponding public key in G2: `sk * G2`.
pub fn sk_to_pk_g2(sk: &SecretKey) -> G2AffinePoint {
    (G2AffinePoint::generator() * sk.0).into_affine()
}

/// Builds the key pair belonging to `sk`.
pub fn key_pair_from_secret(sk: SecretKey) -> KeyPair {
    KeyPair {
        public_key_g1: sk_to_pk_g1(&sk),
        public_key_g2: sk_to_pk_g2(&sk),
        secret: sk,
    }
}

/// Creates an operator key pair. With no secret (or an empty one) a random key is generated,
/// otherwise `secret_hex` is parsed with [`parse_secret_key`].
pub fn create_key_pair(secret_hex: Option<&str>) -> Result<KeyPair, BLSError> {
    let sk = match secret_hex {
        Some(secret_hex) if !secret_hex.is_empty() => {
            tracing::debug!("deriving BLS key pair from the supplied secret");
            parse_secret_key(secret_hex)?
        }
        _ => {
            tracing::debug!("generating a random BLS key pair");
            random_secret_key()
        }
    };
    Ok(key_pair_from_secret(sk))
}

/// Signs a point that is already on the curve: `sk * M`.
pub fn sign(hashed_message: G1AffinePoint, sk: &SecretKey) -> Signature {
    let point = (hashed_message * sk.0).into_affine();
    Signature {
        point,
        hashed_message,
    }
}

/// Computes a signature over `message`, the way eigensdk-go's `SignMessage` does.
///
/// Implementation:
/// ```plain
///    1. M = hash_to_g1(message)
///    2. signature = SK * M
/// ```
pub fn sign_message(message: &[u8], sk: &SecretKey) -> Result<Signature, BLSError> {
    // 1
    let hashed_message = hash_to_g1(message)?;
    // 2
    Ok(sign(hashed_message, sk))
}

/// Signs a message that was hashed to the curve by someone else, typically a contract handing back
/// `(x, y)` of a registration digest. eigensdk-go calls this `SignHashedToCurveMessage`.
///
/// `(x, y)` is NOT checked against the curve equation. Callers must make sure it is a curve point:
/// anything else yields a signature no verifier will accept, without any error being raised here.
pub fn sign_hashed_point(x: BnFq, y: BnFq, sk: &SecretKey) -> Signature {
    sign(G1AffinePoint::new_unchecked(x, y), sk)
}

/// Packs a signature and the signer's G2 public key into the arguments of a pairing-check call.
pub fn to_contract_args(public_key_g2: &G2AffinePoint, signature: &Signature) -> ContractArgs {
    ContractArgs {
        signature: point_to_evm_g1(&signature.point),
        public_key_g2: point_to_evm_g2(public_key_g2),
        hashed_message: point_to_evm_g1(&signature.hashed_message),
    }
}

/// Builds the parameters for registering `key_pair` with a BLS APK registry: `challenge` is what the
/// registry's `pubkeyRegistrationMessageHash(operator)` returned, already hashed to G1.
pub fn pubkey_registration_params(
    key_pair: &KeyPair,
    challenge: &EvmG1,
) -> Result<PubkeyRegistrationParams, BLSError> {
    let x = serialization::evm_word_to_fq(&challenge[0])?;
    let y = serialization::evm_word_to_fq(&challenge[1])?;
    let signature = sign_hashed_point(x, y, &key_pair.secret);

    Ok(PubkeyRegistrationParams {
        registration_signature: point_to_evm_g1(&signature.point),
        public_key_g1: point_to_evm_g1(&key_pair.public_key_g1),
        public_key_g2: point_to_evm_g2(&key_pair.public_key_g2),
    })
}
