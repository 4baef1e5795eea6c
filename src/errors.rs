//! Error enum to wrap underlying failures
#[cfg(feature = "std")]
use std::error::Error;
#[cfg(feature = "std")]
use std::fmt;

use alloc::string::String;
use ark_serialize::SerializationError;

/// Error enum to wrap underlying failures in BLS operations, or wrap errors from dependencies.
///
/// `LegendreComputation` and `HashToCurveExhausted` are internal-consistency failures: they mean the
/// field constants or the arithmetic are wrong, and retrying with the same input yields the same error.
#[derive(Debug)]
pub enum BLSError {
    /// A domain separation tag longer than 255 bytes was passed to message expansion
    InvalidDomain(usize),
    /// The supplied secret doesn't parse into a non-zero element of the scalar field
    InvalidScalar(String),
    /// `a^((p-1)/2)` produced something other than 0, 1 or p-1
    LegendreComputation,
    /// Trial-increment hashing didn't find a curve point within the given number of attempts
    HashToCurveExhausted(usize),
    /// Error coming from `I2OSP` (see RFC 8017, section 4.1)
    /// <https://datatracker.ietf.org/doc/html/rfc8017#section-4.1>
    IntegerTooLarge(u64, usize),
    /// A coordinate handed to us as an EVM word isn't a canonical base field element
    CoordinateOutOfRange,
    /// Wrong number of bytes for an encoded point: (expected, got)
    WrongSizeForPoint(usize, usize),
    /// Serialized point belongs to the other group
    GroupMismatch,
    /// Error coming from `ark_serialize`
    DeserializationError(SerializationError),
}

#[cfg(feature = "std")]
impl Error for BLSError {}

#[cfg(feature = "std")]
impl fmt::Display for BLSError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BLSError::InvalidDomain(l) => write!(f, "Domain separation tag must be at most 255 bytes. Got {l}"),
            BLSError::InvalidScalar(ref reason) => write!(f, "Invalid secret key: {reason}"),
            BLSError::LegendreComputation => write!(f, "Legendre symbol computation failed: result is not 0, 1 or p-1"),
            BLSError::HashToCurveExhausted(n) => write!(f, "Could not hash to curve after {n} attempts"),
            BLSError::IntegerTooLarge(ref n, l) => write!(f, "Integer too large: cannot fit {n} into a byte string of length {l}"),
            BLSError::CoordinateOutOfRange => write!(f, "Coordinate is not smaller than the base field modulus"),
            BLSError::WrongSizeForPoint(expected, got) => write!(f, "Point bytes must have length {expected}. Got {got}"),
            BLSError::GroupMismatch => write!(f, "Serialized point belongs to a different group"),
            BLSError::DeserializationError(ref err) => err.fmt(f),
        }
    }
}

impl From<SerializationError> for BLSError {
    fn from(err: SerializationError) -> BLSError {
        BLSError::DeserializationError(err)
    }
}
