//! The direction-agnostic XDR stream.
//!
//! Classic XDR libraries expose one routine per type (`xdr_int`,
//! `xdr_string`, ...) that either encodes or decodes depending on the
//! stream it is handed. [`XdrStream`] is that interface: an
//! [`Encoder`](crate::Encoder) reads from the `&mut` value it is given, a
//! [`Decoder`](crate::Decoder) writes into it. A routine written once
//! against `S: XdrStream` therefore runs in both directions through the
//! same code path.
//!
//! ```rust
//! use xdr_codec::{Decoder, Encoder, Result, XdrStream};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Entry {
//!     fileid: u64,
//!     name: String,
//! }
//!
//! fn xdr_entry<S: XdrStream>(xdr: &mut S, entry: &mut Entry) -> Result<()> {
//!     xdr.uint64(&mut entry.fileid)?;
//!     xdr.string(&mut entry.name, 255)
//! }
//!
//! let mut entry = Entry { fileid: 7, name: "passwd".into() };
//! let mut enc = Encoder::new(Vec::new());
//! xdr_entry(&mut enc, &mut entry).unwrap();
//! let wire = enc.into_inner();
//! assert_eq!(wire.len(), 8 + 4 + 8);
//!
//! let mut decoded = Entry::default();
//! let mut dec = Decoder::new(wire.as_slice());
//! xdr_entry(&mut dec, &mut decoded).unwrap();
//! assert_eq!(entry, decoded);
//! ```

use crate::error::{Error, Result};

/// Which way a codec context moves data. Fixed for the context's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

/// Number of zero bytes that follow `len` payload bytes on the wire.
#[inline]
pub const fn pad_len(len: usize) -> usize {
    (4 - (len % 4)) % 4
}

/// Upper bound on what a decoder reserves ahead of the bytes that back it.
/// Larger items grow as their payload arrives.
pub(crate) const PREALLOC_BYTES: usize = 64 * 1024;

/// Reject `len` if it is over `max`, returning it as a wire length.
pub(crate) fn check_len(len: usize, max: u32) -> Result<u32> {
    match u32::try_from(len) {
        Ok(n) if n <= max => Ok(n),
        _ => Err(Error::LengthExceeded {
            max,
            got: len as u64,
        }),
    }
}

/// A codec context that either encodes or decodes every value it is handed.
pub trait XdrStream {
    fn direction(&self) -> Direction;

    /// Mark the context as faulted and hand `err` back for propagation.
    ///
    /// Every operation calls this on failure; after it, every operation
    /// returns [`Error::Poisoned`].
    fn fault(&mut self, op: &'static str, err: Error) -> Error;

    /// `true` once an operation has faulted.
    fn is_poisoned(&self) -> bool;

    fn int32(&mut self, v: &mut i32) -> Result<()>;
    fn uint32(&mut self, v: &mut u32) -> Result<()>;
    /// Hyper integer: high word first.
    fn int64(&mut self, v: &mut i64) -> Result<()>;
    fn uint64(&mut self, v: &mut u64) -> Result<()>;
    fn float(&mut self, v: &mut f32) -> Result<()>;
    fn double(&mut self, v: &mut f64) -> Result<()>;
    fn bool(&mut self, v: &mut bool) -> Result<()>;

    /// Fixed-length opaque. The slice length is the item length; it is not
    /// carried on the wire.
    fn opaque(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Variable-length opaque. On decode `buf` is resized to the decoded
    /// length.
    fn bytes(&mut self, buf: &mut Vec<u8>, max_length: u32) -> Result<()>;

    /// Length-prefixed string. Encoding stops at the first NUL, if any.
    fn string(&mut self, s: &mut String, max_length: u32) -> Result<()>;

    /// Enumerations travel as signed ints.
    fn enumeration(&mut self, v: &mut i32) -> Result<()> {
        self.int32(v)
    }

    /// An enumeration restricted to `allowed`. A value outside the set
    /// faults with [`Error::InvalidEnum`]; on encode nothing is written.
    fn enumeration_in(&mut self, v: &mut i32, allowed: &[i32]) -> Result<()> {
        ensure_usable(self)?;
        if self.direction() == Direction::Encode && !allowed.contains(v) {
            return Err(self.fault("enum", Error::InvalidEnum(*v)));
        }
        self.int32(v)?;
        if !allowed.contains(v) {
            return Err(self.fault("enum", Error::InvalidEnum(*v)));
        }
        Ok(())
    }

    fn void(&mut self) -> Result<()> {
        Ok(())
    }

    /// XDR quadruple-precision floats have no Rust counterpart. Nothing is
    /// consumed and, unlike every other failure, the context stays usable.
    /// A context that is already poisoned answers [`Error::Poisoned`].
    fn quadruple(&mut self) -> Result<()> {
        ensure_usable(self)?;
        Err(Error::Unsupported("quadruple"))
    }

    /// Run `v` through this stream.
    fn filter<T: XdrFilter + ?Sized>(&mut self, v: &mut T) -> Result<()>
    where
        Self: Sized,
    {
        v.filter(self)
    }

    /// Fixed-length array: elements back to back, no count.
    fn fixed_array<T, F>(&mut self, items: &mut [T], mut f: F) -> Result<()>
    where
        Self: Sized,
        F: FnMut(&mut Self, &mut T) -> Result<()>,
    {
        for item in items.iter_mut() {
            f(self, item)?;
        }
        Ok(())
    }

    /// Variable-length array: a `uint32` count of at most `max_length`,
    /// then the elements. On decode `items` is replaced.
    fn var_array<T, F>(&mut self, items: &mut Vec<T>, max_length: u32, mut f: F) -> Result<()>
    where
        Self: Sized,
        T: Default,
        F: FnMut(&mut Self, &mut T) -> Result<()>,
    {
        ensure_usable(self)?;
        match self.direction() {
            Direction::Encode => {
                let mut count = check_len(items.len(), max_length)
                    .map_err(|err| self.fault("var_array", err))?;
                self.uint32(&mut count)?;
                for item in items.iter_mut() {
                    f(self, item)?;
                }
            }
            Direction::Decode => {
                let mut count = 0;
                self.uint32(&mut count)?;
                if count > max_length {
                    let err = Error::LengthExceeded {
                        max: max_length,
                        got: count.into(),
                    };
                    return Err(self.fault("var_array", err));
                }
                let count = count as usize;
                let hint = count.min(PREALLOC_BYTES / size_of::<T>().max(1));
                items.clear();
                if items.try_reserve(hint).is_err() {
                    return Err(self.fault("var_array", Error::AllocationFailure(count)));
                }
                // Appended as decoded; a forged count is bounded by the input.
                for _ in 0..count {
                    let mut item = T::default();
                    f(self, &mut item)?;
                    items.push(item);
                }
            }
        }
        Ok(())
    }

    /// Optional data (`T *` in XDR language): a boolean discriminant, then
    /// the value when present.
    fn optional<T, F>(&mut self, v: &mut Option<Box<T>>, mut f: F) -> Result<()>
    where
        Self: Sized,
        T: Default,
        F: FnMut(&mut Self, &mut T) -> Result<()>,
    {
        ensure_usable(self)?;
        let mut present = u32::from(v.is_some());
        self.uint32(&mut present)?;
        match (self.direction(), present) {
            (Direction::Encode, _) => match v {
                Some(inner) => f(self, &mut **inner),
                None => Ok(()),
            },
            (Direction::Decode, 0) => {
                *v = None;
                Ok(())
            }
            (Direction::Decode, 1) => {
                let mut inner = Box::<T>::default();
                f(self, &mut *inner)?;
                *v = Some(inner);
                Ok(())
            }
            (Direction::Decode, other) => Err(self.fault("optional", Error::InvalidOption(other))),
        }
    }

    /// Discriminated union: an `int32` discriminant, then the arm it
    /// selects. `bool`, `unsigned int` and enum discriminants share the
    /// same wire shape.
    ///
    /// `arm` is called with the discriminant after it has been encoded or
    /// decoded and runs the selected arm through the stream. It returns
    /// `Ok(false)` when no case (and no default) accepts the discriminant,
    /// which faults with [`Error::InvalidDiscriminant`].
    ///
    /// ```rust
    /// use xdr_codec::{Encoder, Result, XdrStream};
    ///
    /// // union switch (int kind) { case 0: int num; default: void; }
    /// fn xdr_maybe<S: XdrStream>(xdr: &mut S, kind: &mut i32, num: &mut i32) -> Result<()> {
    ///     xdr.union(kind, |xdr, kind| match kind {
    ///         0 => xdr.int32(num).map(|()| true),
    ///         _ => xdr.void().map(|()| true),
    ///     })
    /// }
    ///
    /// let (mut kind, mut num) = (0, 42);
    /// let mut enc = Encoder::new(Vec::new());
    /// xdr_maybe(&mut enc, &mut kind, &mut num).unwrap();
    /// assert_eq!(enc.into_inner(), [0, 0, 0, 0, 0, 0, 0, 42]);
    /// ```
    fn union<F>(&mut self, disc: &mut i32, arm: F) -> Result<()>
    where
        Self: Sized,
        F: FnOnce(&mut Self, i32) -> Result<bool>,
    {
        ensure_usable(self)?;
        self.int32(disc)?;
        let disc = *disc;
        if arm(self, disc)? {
            Ok(())
        } else {
            Err(self.fault("union", Error::InvalidDiscriminant(disc.into())))
        }
    }
}

/// Poison check for composites that can fault before touching the stream.
fn ensure_usable<S: XdrStream + ?Sized>(xdr: &S) -> Result<()> {
    if xdr.is_poisoned() {
        return Err(Error::Poisoned);
    }
    Ok(())
}

/// A type that can run itself through an [`XdrStream`] in either direction.
pub trait XdrFilter {
    fn filter<S: XdrStream>(&mut self, xdr: &mut S) -> Result<()>;
}

macro_rules! impl_filter {
    ($($t:ty => $op:ident),* $(,)?) => {
        $(
            impl XdrFilter for $t {
                #[inline]
                fn filter<S: XdrStream>(&mut self, xdr: &mut S) -> Result<()> {
                    xdr.$op(self)
                }
            }
        )*
    };
}

impl_filter! {
    i32 => int32,
    u32 => uint32,
    i64 => int64,
    u64 => uint64,
    f32 => float,
    f64 => double,
    bool => bool,
}

impl XdrFilter for () {
    fn filter<S: XdrStream>(&mut self, xdr: &mut S) -> Result<()> {
        xdr.void()
    }
}

/// `[u8; N]` is fixed-length opaque, not N separate integers.
impl<const N: usize> XdrFilter for [u8; N] {
    fn filter<S: XdrStream>(&mut self, xdr: &mut S) -> Result<()> {
        xdr.opaque(self)
    }
}

impl<T: XdrFilter + Default> XdrFilter for Option<Box<T>> {
    fn filter<S: XdrStream>(&mut self, xdr: &mut S) -> Result<()> {
        xdr.optional(self, |xdr, inner| inner.filter(xdr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_table() {
        let pads: Vec<usize> = (0..9).map(pad_len).collect();
        assert_eq!(pads, [0, 3, 2, 1, 0, 3, 2, 1, 0]);
    }

    #[test]
    fn check_len_bounds() {
        assert_eq!(check_len(5, 5).unwrap(), 5);
        assert!(matches!(
            check_len(6, 5),
            Err(Error::LengthExceeded { max: 5, got: 6 })
        ));
    }
}
