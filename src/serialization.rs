//! Conversions between curve points and the two wire formats they travel in.
//!
//! * EVM format: every coordinate is a big-endian `uint256`. G2 coordinates are written imaginary part
//!   first (`[x.c1, x.c0, y.c1, y.c0]`), which is what the `ecPairing` precompile and EigenLayer's
//!   `BN254.G2Point` expect.
//! * Peer format: every coordinate is 32 little-endian bytes, concatenated. G2 coordinates are written
//!   real part first (`x.c0 || x.c1 || y.c0 || y.c1`), which is also arkworks' canonical encoding of `Fq2`.
//!
//! The point at infinity is `(0, 0)` in both formats.
use alloc::vec::Vec;
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use num_bigint::BigUint;

use crate::errors::*;
use crate::types::*;

/// Size of one encoded base field element
pub const FIELD_ELEMENT_SIZE: usize = 32;
/// Size of an encoded G1 point, in either format
pub const G1_POINT_SIZE: usize = 2 * FIELD_ELEMENT_SIZE;
/// Size of an encoded G2 point, in either format
pub const G2_POINT_SIZE: usize = 4 * FIELD_ELEMENT_SIZE;

impl Group {
    /// Number of bytes a point of this group takes, in either format.
    pub fn encoded_size(&self) -> usize {
        match self {
            Group::G1 => G1_POINT_SIZE,
            Group::G2 => G2_POINT_SIZE,
        }
    }
}

/// Converts a base field element to an EVM word.
pub fn fq_to_evm_word(f: &BnFq) -> BigUint {
    (*f).into()
}

/// Converts an EVM word to a base field element. Words that aren't smaller than `p` are rejected rather
/// than reduced: the contract would treat them as a different point.
pub fn evm_word_to_fq(word: &BigUint) -> Result<BnFq, BLSError> {
    let modulus: BigUint = BnFq::MODULUS.into();
    if *word >= modulus {
        return Err(BLSError::CoordinateOutOfRange);
    }
    Ok(BnFq::from(word.clone()))
}

/// Writes `f` as 32 little-endian bytes.
fn fq_to_le_bytes(f: &BnFq, bytes: &mut Vec<u8>) {
    // Fine to unwrap here: writing a field element into a Vec can't fail.
    f.serialize_compressed(bytes).unwrap();
}

/// Writes `f` as 32 little-endian bytes, real part then imaginary part.
fn fq2_to_le_bytes(f: &BnFq2, bytes: &mut Vec<u8>) {
    // Fine to unwrap here: writing a field element into a Vec can't fail.
    f.serialize_compressed(bytes).unwrap();
}

/// Converts a G1 point to `[x, y]`.
pub fn point_to_evm_g1(p: &G1AffinePoint) -> EvmG1 {
    // The identity is stored as x = y = 0, which is also its EVM encoding.
    [fq_to_evm_word(&p.x), fq_to_evm_word(&p.y)]
}

/// Converts a G2 point to `[x.c1, x.c0, y.c1, y.c0]`.
pub fn point_to_evm_g2(p: &G2AffinePoint) -> EvmG2 {
    [
        fq_to_evm_word(&p.x.c1),
        fq_to_evm_word(&p.x.c0),
        fq_to_evm_word(&p.y.c1),
        fq_to_evm_word(&p.y.c0),
    ]
}

/// Rebuilds a G1 point from EVM words. `(0, 0)` is the identity.
///
/// No on-curve check is performed: coordinates coming back from a contract are trusted.
pub fn evm_to_point_g1(x: &BigUint, y: &BigUint) -> Result<G1AffinePoint, BLSError> {
    let x = evm_word_to_fq(x)?;
    let y = evm_word_to_fq(y)?;
    if x.is_zero() && y.is_zero() {
        return Ok(G1AffinePoint::identity());
    }
    Ok(G1AffinePoint::new_unchecked(x, y))
}

/// Rebuilds a G2 point from `[x.c1, x.c0, y.c1, y.c0]`. All zeroes is the identity.
///
/// No on-curve check is performed.
pub fn evm_to_point_g2(words: &EvmG2) -> Result<G2AffinePoint, BLSError> {
    let x = BnFq2::new(evm_word_to_fq(&words[1])?, evm_word_to_fq(&words[0])?);
    let y = BnFq2::new(evm_word_to_fq(&words[3])?, evm_word_to_fq(&words[2])?);
    if x.is_zero() && y.is_zero() {
        return Ok(G2AffinePoint::identity());
    }
    Ok(G2AffinePoint::new_unchecked(x, y))
}

/// Converts a G1 point to `LE(x) || LE(y)` (64 bytes).
pub fn point_to_peer_g1(p: &G1AffinePoint) -> Octets {
    let mut bytes = Vec::with_capacity(G1_POINT_SIZE);
    fq_to_le_bytes(&p.x, &mut bytes);
    fq_to_le_bytes(&p.y, &mut bytes);
    bytes
}

/// Converts a G2 point to `LE(x.c0) || LE(x.c1) || LE(y.c0) || LE(y.c1)` (128 bytes).
pub fn point_to_peer_g2(p: &G2AffinePoint) -> Octets {
    let mut bytes = Vec::with_capacity(G2_POINT_SIZE);
    fq2_to_le_bytes(&p.x, &mut bytes);
    fq2_to_le_bytes(&p.y, &mut bytes);
    bytes
}

/// Inverse of [`point_to_peer_g1`]. Coordinates must be canonical (smaller than `p`); the point isn't
/// checked to be on the curve.
pub fn peer_to_point_g1(bytes: &[u8]) -> Result<G1AffinePoint, BLSError> {
    check_size(bytes, G1_POINT_SIZE)?;
    let x = BnFq::deserialize_compressed(&bytes[..FIELD_ELEMENT_SIZE])?;
    let y = BnFq::deserialize_compressed(&bytes[FIELD_ELEMENT_SIZE..])?;
    if x.is_zero() && y.is_zero() {
        return Ok(G1AffinePoint::identity());
    }
    Ok(G1AffinePoint::new_unchecked(x, y))
}

/// Inverse of [`point_to_peer_g2`]. Same caveats as [`peer_to_point_g1`].
pub fn peer_to_point_g2(bytes: &[u8]) -> Result<G2AffinePoint, BLSError> {
    check_size(bytes, G2_POINT_SIZE)?;
    let x = BnFq2::deserialize_compressed(&bytes[..2 * FIELD_ELEMENT_SIZE])?;
    let y = BnFq2::deserialize_compressed(&bytes[2 * FIELD_ELEMENT_SIZE..])?;
    if x.is_zero() && y.is_zero() {
        return Ok(G2AffinePoint::identity());
    }
    Ok(G2AffinePoint::new_unchecked(x, y))
}

/// Decodes peer-format G1 bytes straight into EVM words, without going through a curve point.
pub fn peer_g1_to_evm(bytes: &[u8]) -> Result<EvmG1, BLSError> {
    let words = SerializedPoint::new(WireFormat::Peer, Group::G1, bytes.to_vec())?.to_evm_words();
    words.try_into().map_err(|_| BLSError::GroupMismatch)
}

/// Decodes peer-format G2 bytes straight into EVM words (`[x.c1, x.c0, y.c1, y.c0]`).
pub fn peer_g2_to_evm(bytes: &[u8]) -> Result<EvmG2, BLSError> {
    let words = SerializedPoint::new(WireFormat::Peer, Group::G2, bytes.to_vec())?.to_evm_words();
    words.try_into().map_err(|_| BLSError::GroupMismatch)
}

fn check_size(bytes: &[u8], expected: usize) -> Result<(), BLSError> {
    if bytes.len() != expected {
        return Err(BLSError::WrongSizeForPoint(expected, bytes.len()));
    }
    Ok(())
}

impl SerializedPoint {
    /// Tags `bytes` with their format and group. Fails if the length doesn't match the group.
    pub fn new(format: WireFormat, group: Group, bytes: Octets) -> Result<Self, BLSError> {
        check_size(&bytes, group.encoded_size())?;
        Ok(SerializedPoint { format, group, bytes })
    }

    /// Serializes a G1 point in the given format.
    pub fn from_g1(p: &G1AffinePoint, format: WireFormat) -> Self {
        SerializedPoint {
            format: WireFormat::Peer,
            group: Group::G1,
            bytes: point_to_peer_g1(p),
        }
        .convert(format)
    }

    /// Serializes a G2 point in the given format.
    pub fn from_g2(p: &G2AffinePoint, format: WireFormat) -> Self {
        SerializedPoint {
            format: WireFormat::Peer,
            group: Group::G2,
            bytes: point_to_peer_g2(p),
        }
        .convert(format)
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Re-encodes the point in `format`. This only moves bytes around: each 32-byte word is reversed
    /// and, for G2, the real and imaginary words of each coordinate trade places. Applying it twice
    /// gives back the original bytes.
    pub fn convert(&self, format: WireFormat) -> SerializedPoint {
        if self.format == format {
            return self.clone();
        }

        let mut words: Vec<&[u8]> = self.bytes.chunks_exact(FIELD_ELEMENT_SIZE).collect();
        if self.group == Group::G2 {
            words.swap(0, 1);
            words.swap(2, 3);
        }

        let mut bytes = Vec::with_capacity(self.bytes.len());
        for word in words {
            bytes.extend(word.iter().rev());
        }

        SerializedPoint {
            format,
            group: self.group,
            bytes,
        }
    }

    /// The point as a list of `uint256` words, in EVM order.
    pub fn to_evm_words(&self) -> Vec<BigUint> {
        self.convert(WireFormat::Evm)
            .bytes
            .chunks_exact(FIELD_ELEMENT_SIZE)
            .map(BigUint::from_bytes_be)
            .collect()
    }

    /// Decodes the point, which must be in G1.
    pub fn to_g1_point(&self) -> Result<G1AffinePoint, BLSError> {
        if self.group != Group::G1 {
            return Err(BLSError::GroupMismatch);
        }
        peer_to_point_g1(&self.convert(WireFormat::Peer).bytes)
    }

    /// Decodes the point, which must be in G2.
    pub fn to_g2_point(&self) -> Result<G2AffinePoint, BLSError> {
        if self.group != Group::G2 {
            return Err(BLSError::GroupMismatch);
        }
        peer_to_point_g2(&self.convert(WireFormat::Peer).bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_ec::{AffineRepr, CurveGroup};
    use hex_literal::hex;
    use proptest::prelude::*;

    fn word(hex: &str) -> BigUint {
        BigUint::parse_bytes(hex.as_bytes(), 16).unwrap()
    }

    fn g2_generator_evm() -> EvmG2 {
        // BN254.sol's G2 generator, imaginary part first
        [
            word("198e9393920d483a7260bfb731fb5d25f1aa493335a9e71297e485b7aef312c2"),
            word("1800deef121f1e76426a00665e5c4479674322d4f75edadd46debd5cd992f6ed"),
            word("090689d0585ff075ec9e99ad690c3395bc4b313370b38ef355acdadcd122975b"),
            word("12c85ea5db8c6deb4aab71808dcb408fe3d1e7690c43d37b4ce6cc0166fa7daa"),
        ]
    }

    prop_compose! {
        fn g1_point()(scalar in any::<u64>()) -> G1AffinePoint {
            (G1AffinePoint::generator() * BnFr::from(scalar)).into_affine()
        }
    }

    prop_compose! {
        fn g2_point()(scalar in any::<u64>()) -> G2AffinePoint {
            (G2AffinePoint::generator() * BnFr::from(scalar)).into_affine()
        }
    }

    #[test]
    fn test_point_to_evm_g1() {
        assert_eq!(
            point_to_evm_g1(&G1AffinePoint::generator()),
            [BigUint::from(1u8), BigUint::from(2u8)]
        );
        assert_eq!(
            point_to_evm_g1(&G1AffinePoint::identity()),
            [BigUint::from(0u8), BigUint::from(0u8)]
        );
    }

    #[test]
    fn test_point_to_evm_g2() {
        assert_eq!(point_to_evm_g2(&G2AffinePoint::generator()), g2_generator_evm());
    }

    #[test]
    fn test_evm_to_point() {
        assert_eq!(
            evm_to_point_g1(&BigUint::from(1u8), &BigUint::from(2u8)).unwrap(),
            G1AffinePoint::generator()
        );
        assert_eq!(
            evm_to_point_g1(&BigUint::from(0u8), &BigUint::from(0u8)).unwrap(),
            G1AffinePoint::identity()
        );
        assert_eq!(evm_to_point_g2(&g2_generator_evm()).unwrap(), G2AffinePoint::generator());
    }

    #[test]
    fn test_evm_to_point_does_not_check_curve_equation() {
        let p = evm_to_point_g1(&BigUint::from(1u8), &BigUint::from(3u8)).unwrap();
        assert!(!p.is_on_curve());
        assert_eq!(point_to_evm_g1(&p), [BigUint::from(1u8), BigUint::from(3u8)]);
    }

    #[test]
    fn test_evm_to_point_rejects_out_of_range_words() {
        let p: BigUint = BnFq::MODULUS.into();
        assert_eq!(
            evm_to_point_g1(&p, &BigUint::from(2u8)).unwrap_err().to_string(),
            "Coordinate is not smaller than the base field modulus"
        );
    }

    #[test]
    fn test_point_to_peer_g1() {
        assert_eq!(
            point_to_peer_g1(&G1AffinePoint::generator()),
            hex!("
                0100000000000000000000000000000000000000000000000000000000000000
                0200000000000000000000000000000000000000000000000000000000000000
            ").to_vec()
        );
        assert_eq!(point_to_peer_g1(&G1AffinePoint::identity()), vec![0u8; 64]);
    }

    #[test]
    fn test_point_to_peer_g2() {
        assert_eq!(
            point_to_peer_g2(&G2AffinePoint::generator()),
            hex!("
                edf692d95cbdde46ddda5ef7d422436779445c5e66006a42761e1f12efde0018
                c212f3aeb785e49712e7a9353349aaf1255dfb31b7bf60723a480d9293938e19
                aa7dfa6601cce64c7bd3430c69e7d1e38f40cb8d8071ab4aeb6d8cdba55ec812
                5b9722d1dcdaac55f38eb37033314bbc95330c69ad999eec75f05f58d0890609
            ").to_vec()
        );
    }

    #[test]
    fn test_peer_to_point_rejects_wrong_size() {
        assert_eq!(
            peer_to_point_g1(&[0u8; 63]).unwrap_err().to_string(),
            "Point bytes must have length 64. Got 63"
        );
        assert_eq!(
            peer_to_point_g2(&[0u8; 64]).unwrap_err().to_string(),
            "Point bytes must have length 128. Got 64"
        );
    }

    #[test]
    fn test_peer_to_point_rejects_non_canonical_coordinate() {
        let mut bytes = [0xffu8; 64];
        bytes[32..].copy_from_slice(&[0u8; 32]);
        assert!(peer_to_point_g1(&bytes).is_err());
    }

    #[test]
    fn test_peer_to_evm_g2_swaps_components() {
        let peer = point_to_peer_g2(&G2AffinePoint::generator());
        assert_eq!(peer_g2_to_evm(&peer).unwrap(), g2_generator_evm());
    }

    #[test]
    fn test_serialized_point_convert() {
        let evm = SerializedPoint::from_g1(&G1AffinePoint::generator(), WireFormat::Evm);
        assert_eq!(evm.format(), WireFormat::Evm);
        assert_eq!(evm.group(), Group::G1);
        assert_eq!(
            evm.bytes().to_vec(),
            hex!("
                0000000000000000000000000000000000000000000000000000000000000001
                0000000000000000000000000000000000000000000000000000000000000002
            ").to_vec()
        );
        assert_eq!(evm.convert(WireFormat::Evm), evm);
        assert_eq!(
            evm.convert(WireFormat::Peer).bytes().to_vec(),
            point_to_peer_g1(&G1AffinePoint::generator())
        );
    }

    #[test]
    fn test_serialized_point_group_mismatch() {
        let g2 = SerializedPoint::from_g2(&G2AffinePoint::generator(), WireFormat::Peer);
        assert_eq!(
            g2.to_g1_point().unwrap_err().to_string(),
            "Serialized point belongs to a different group"
        );
        assert_eq!(g2.to_g2_point().unwrap(), G2AffinePoint::generator());
        assert!(SerializedPoint::new(WireFormat::Evm, Group::G2, vec![0u8; 64]).is_err());
    }

    proptest! {
        #[test]
        fn evm_round_trip_g1(p in g1_point()) {
            let [x, y] = point_to_evm_g1(&p);
            prop_assert_eq!(evm_to_point_g1(&x, &y).unwrap(), p);
        }

        #[test]
        fn evm_round_trip_g2(p in g2_point()) {
            prop_assert_eq!(evm_to_point_g2(&point_to_evm_g2(&p)).unwrap(), p);
        }

        #[test]
        fn peer_round_trip_preserves_evm_encoding(p in g1_point(), q in g2_point()) {
            prop_assert_eq!(
                point_to_evm_g1(&peer_to_point_g1(&point_to_peer_g1(&p)).unwrap()),
                point_to_evm_g1(&p)
            );
            prop_assert_eq!(
                point_to_evm_g2(&peer_to_point_g2(&point_to_peer_g2(&q)).unwrap()),
                point_to_evm_g2(&q)
            );
            prop_assert_eq!(peer_g1_to_evm(&point_to_peer_g1(&p)).unwrap(), point_to_evm_g1(&p));
        }

        #[test]
        fn convert_is_self_inverse(p in g2_point()) {
            let peer = SerializedPoint::from_g2(&p, WireFormat::Peer);
            let evm = peer.convert(WireFormat::Evm);
            prop_assert_eq!(evm.to_evm_words(), point_to_evm_g2(&p).to_vec());
            prop_assert_eq!(evm.convert(WireFormat::Peer), peer);
        }
    }
}
