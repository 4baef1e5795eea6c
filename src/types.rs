//! Types and type aliases for BLS operations over BN254.
use alloc::vec::Vec;
use ark_bn254::g1::Config as G1Config;
use ark_bn254::g2::Config as G2Config;
use ark_bn254::{Fq, Fq2, Fr};
use ark_ec::short_weierstrass::Affine;
use core::fmt;
use num_bigint::BigUint;

/// Type alias for BN254's scalar field (order `r`)
pub type BnFr = Fr;
/// Type alias for BN254's base field (order `p`)
pub type BnFq = Fq;
/// Type alias for `Fq2 = Fq[u] / (u^2 + 1)`, the field G2 coordinates live in
pub type BnFq2 = Fq2;

/// Represents a point in G1 (affine coordinates)
pub type G1AffinePoint = Affine<G1Config>;
/// Represents a point in G2 (affine coordinates)
pub type G2AffinePoint = Affine<G2Config>;

/// Byte strings, named after the "octet strings" of the hash-to-curve drafts.
pub type Octets = Vec<u8>;

/// A G1 point as the two `uint256` words a Solidity `G1Point { X, Y }` expects.
pub type EvmG1 = [BigUint; 2];

/// A G2 point as the four `uint256` words a Solidity `G2Point { X[2], Y[2] }` expects,
/// imaginary part first: `[x.c1, x.c0, y.c1, y.c0]`.
pub type EvmG2 = [BigUint; 4];

/// A secret scalar. Its `Debug` output is redacted and there is no way to serialize it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SecretKey(pub(crate) BnFr);

impl SecretKey {
    /// Wraps a scalar field element.
    pub fn from_scalar(scalar: BnFr) -> Self {
        SecretKey(scalar)
    }

    /// The underlying scalar, for callers that need to hand it to arkworks directly.
    pub fn scalar(&self) -> &BnFr {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// An operator identity: the secret scalar and both public key representations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    pub secret: SecretKey,
    /// `secret * G1`
    pub public_key_g1: G1AffinePoint,
    /// `secret * G2`
    pub public_key_g2: G2AffinePoint,
}

/// A signature along with the hashed message point it was computed over.
/// Verifiers on chain want both, so we keep both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// `secret * hashed_message`
    pub point: G1AffinePoint,
    pub hashed_message: G1AffinePoint,
}

/// Which consumer a serialized point is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireFormat {
    /// Big-endian 32-byte words, G2 components ordered `[imaginary, real]`.
    Evm,
    /// Little-endian 32-byte words, G2 components ordered `[real, imaginary]`.
    Peer,
}

/// Which group a serialized point belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    G1,
    G2,
}

/// Bytes of an encoded point, tagged with their layout so they can't be confused with one another.
/// The byte length always matches the group (64 bytes for G1, 128 for G2).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SerializedPoint {
    pub(crate) format: WireFormat,
    pub(crate) group: Group,
    pub(crate) bytes: Octets,
}

/// Everything a registry/pairing-check call needs, in EVM format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractArgs {
    pub signature: EvmG1,
    pub public_key_g2: EvmG2,
    pub hashed_message: EvmG1,
}

/// Arguments of a registry coordinator's `pubkeyRegistrationParams`: a proof of possession of the
/// secret key (the registry's challenge point signed with it) plus both public keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PubkeyRegistrationParams {
    pub registration_signature: EvmG1,
    pub public_key_g1: EvmG1,
    pub public_key_g2: EvmG2,
}
