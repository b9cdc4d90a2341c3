//! Serde field helper for XDR fixed-length opaque data (RFC 4506 §4.9).
//!
//! Serde sees `[u8; N]` as a tuple of N `u8`s, which XDR would widen to N
//! four-byte integers. Annotating the field with
//! `#[serde(with = "xdr_codec::fixed_opaque")]` sends it through
//! [`Encoder::put_opaque`](crate::Encoder::put_opaque) /
//! [`Decoder::get_opaque`](crate::Decoder::get_opaque) instead: the N raw
//! bytes, zero-padded to a 4-byte boundary, with no length prefix.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use xdr_codec::{from_bytes, to_bytes};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! pub struct Verifier {
//!     pub flavor: u32,
//!     #[serde(with = "xdr_codec::fixed_opaque")]
//!     pub cookie: [u8; 7],
//! }
//!
//! let v = Verifier { flavor: 1, cookie: [0, 1, 2, 3, 0, 1, 2] };
//! let bytes = to_bytes(&v).unwrap();
//! assert_eq!(bytes, [0, 0, 0, 1, 0, 1, 2, 3, 0, 1, 2, 0]);
//! assert_eq!(v, from_bytes(&bytes).unwrap());
//! ```
//!
//! The wire image is only produced by this crate's serializer; other serde
//! formats see a plain byte string.

use std::fmt;
use std::marker::PhantomData;

mod private {
    pub trait Sealed {}
}

/// Types that serialize as fixed-length opaque. Sealed; implemented for
/// `[u8; N]`.
pub trait XdrFixedOpaque: private::Sealed + Sized {
    /// The byte length on the wire (before padding).
    fn fixed_len() -> usize;
    fn as_bytes(&self) -> &[u8];
    /// Construct from a slice of exactly `fixed_len()` bytes.
    fn from_exact_bytes(bytes: &[u8]) -> Option<Self>;
}

impl<const N: usize> private::Sealed for [u8; N] {}

impl<const N: usize> XdrFixedOpaque for [u8; N] {
    fn fixed_len() -> usize {
        N
    }
    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }
    fn from_exact_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok()
    }
}

/// Serialize `value` as fixed-length opaque: raw bytes + 0–3 padding.
pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: XdrFixedOpaque,
    S: serde::Serializer,
{
    serializer.serialize_newtype_struct(crate::FIXED_OPAQUE_TOKEN, &RawBytes(value.as_bytes()))
}

/// Deserialize fixed-length opaque: exactly N bytes + padding, no prefix.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: XdrFixedOpaque + serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_newtype_struct(crate::FIXED_OPAQUE_TOKEN, FixedOpaqueVisitor(PhantomData))
}

/// Makes the inner value a single `serialize_bytes` call.
struct RawBytes<'a>(&'a [u8]);

impl serde::Serialize for RawBytes<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

struct FixedOpaqueVisitor<T>(PhantomData<T>);

impl<'de, T: XdrFixedOpaque + serde::Deserialize<'de>> serde::de::Visitor<'de>
    for FixedOpaqueVisitor<T>
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fixed-length opaque ({} bytes)", T::fixed_len())
    }

    /// The XDR deserializer hands over a decoder that answers `[u8; N]`'s
    /// `deserialize_tuple(N)` with N raw bytes.
    fn visit_newtype_struct<D: serde::Deserializer<'de>>(self, de: D) -> Result<T, D::Error> {
        T::deserialize(de)
    }

    fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<T, E> {
        T::from_exact_bytes(v).ok_or_else(|| E::invalid_length(v.len(), &self))
    }

    fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<T, E> {
        self.visit_bytes(&v)
    }
}
