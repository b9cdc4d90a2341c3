//! XDR Serializer (RFC 4506)
//!
//! The [`Serializer`] maps the serde data model onto an [`Encoder`], so it
//! shares the encoder's byte order, padding and fault handling. It is generic
//! over any `W: std::io::Write`, enabling both in-memory serialization
//! (`to_bytes`) and streaming serialization (`to_writer`).
//!
//! ## Wire format summary
//! - Integers up to 32 bits: 4 bytes; `i64`/`u64`: hyper, high word first
//! - Strings/Bytes: 4-byte length prefix + data + 0–3 zero-padding bytes,
//!   bounded by [`Config::max_length`]
//! - Sequences/maps: 4-byte count prefix + elements
//! - Structs/Tuples: fields encoded consecutively, no length prefix
//! - Options: 4-byte bool discriminant (0=None, 1=Some) + optional value
//! - Enums: 4-byte discriminant (variant index) + encoded arm

use crate::config::Config;
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::stream::{XdrStream, check_len};
use serde::ser::{self, Impossible, Serialize};
use std::io::Write;

// ── Public entry points ────────────────────────────────────────────────────

/// Serialize `value` into a freshly allocated `Vec<u8>` of XDR bytes.
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    to_bytes_with_config(value, Config::default())
}

pub fn to_bytes_with_config<T: Serialize + ?Sized>(value: &T, config: Config) -> Result<Vec<u8>> {
    let mut ser = Serializer::with_config(Vec::new(), config);
    value.serialize(&mut ser)?;
    Ok(ser.into_writer())
}

/// Serialize `value` as XDR bytes, writing directly into `writer`.
///
/// Useful when writing to a `TcpStream`, `File`, or any other `Write` sink.
/// Each XDR item reaches the sink in a single `write_all`.
pub fn to_writer<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let mut ser = Serializer::new(writer);
    value.serialize(&mut ser)
}

// ── Serializer ─────────────────────────────────────────────────────────────

/// The XDR serializer. Generic over any `W: Write`.
///
/// ```rust
/// use xdr_codec::ser::Serializer;
/// use serde::Serialize;
///
/// let mut buf = Vec::new();
/// let mut ser = Serializer::new(&mut buf);
/// 42u32.serialize(&mut ser).unwrap();
/// assert_eq!(buf, [0, 0, 0, 42]);
/// ```
pub struct Serializer<W: Write> {
    enc: Encoder<W>,
}

impl<W: Write> Serializer<W> {
    /// Create a new serializer that writes into `writer`.
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, Config::default())
    }

    pub fn with_config(writer: W, config: Config) -> Self {
        Serializer {
            enc: Encoder::with_config(writer, config),
        }
    }

    /// The encoder underneath, for mixing hand-written XDR with serde.
    pub fn encoder(&mut self) -> &mut Encoder<W> {
        &mut self.enc
    }

    /// Consume the serializer and return the inner writer.
    pub fn into_writer(self) -> W {
        self.enc.into_inner()
    }

    fn max_length(&self) -> u32 {
        self.enc.config().max_length
    }

    /// Count prefix for a sequence or map.
    fn write_count(&mut self, len: Option<usize>) -> Result<()> {
        let len = len.ok_or(Error::LengthRequired)?;
        let count = check_len(len, self.max_length()).map_err(|err| self.enc.fault("count", err))?;
        self.enc.put_u32(count)
    }
}

// ── serde::Serializer impl ─────────────────────────────────────────────────

impl<'a, W: Write> ser::Serializer for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    // ── Primitives ─────────────────────────────────────────────────────────

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.enc.put_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.enc.put_i32(v.into())
    }
    fn serialize_i16(self, v: i16) -> Result<()> {
        self.enc.put_i32(v.into())
    }
    fn serialize_i32(self, v: i32) -> Result<()> {
        self.enc.put_i32(v)
    }
    fn serialize_i64(self, v: i64) -> Result<()> {
        self.enc.put_i64(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.enc.put_u32(v.into())
    }
    fn serialize_u16(self, v: u16) -> Result<()> {
        self.enc.put_u32(v.into())
    }
    fn serialize_u32(self, v: u32) -> Result<()> {
        self.enc.put_u32(v)
    }
    fn serialize_u64(self, v: u64) -> Result<()> {
        self.enc.put_u64(v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.enc.put_f32(v)
    }
    fn serialize_f64(self, v: f64) -> Result<()> {
        self.enc.put_f64(v)
    }

    /// char → XDR unsigned int (Unicode scalar value, 4 bytes)
    fn serialize_char(self, v: char) -> Result<()> {
        self.enc.put_u32(v.into())
    }

    /// Rust strings carry their length, so every byte (NULs included) is
    /// written; use [`Encoder::put_string`] for C-string semantics.
    fn serialize_str(self, v: &str) -> Result<()> {
        let max = self.max_length();
        self.enc.put_bytes(v.as_bytes(), max)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        let max = self.max_length();
        self.enc.put_bytes(v, max)
    }

    /// XDR optional-data void arm — 4-byte FALSE (0)
    fn serialize_none(self) -> Result<()> {
        self.enc.put_u32(0)
    }

    /// XDR optional-data value arm — 4-byte TRUE (1) + encoded value
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<()> {
        self.enc.put_u32(1)?;
        value.serialize(self)
    }

    /// XDR void — 0 bytes
    fn serialize_unit(self) -> Result<()> {
        self.enc.void()
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.enc.void()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        self.enc.put_u32(variant_index)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<()> {
        if name == crate::FIXED_OPAQUE_TOKEN {
            value.serialize(FixedOpaqueSerializer(&mut self.enc))
        } else {
            value.serialize(self)
        }
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.enc.put_u32(variant_index)?;
        value.serialize(self)
    }

    /// XDR variable-length array → 4-byte element count + elements
    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.write_count(len)?;
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(self)
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.enc.put_u32(variant_index)?;
        Ok(self)
    }

    /// Map → 4-byte pair count + alternating key/value pairs
    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        self.write_count(len)?;
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.enc.put_u32(variant_index)?;
        Ok(self)
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

// ── Compound serializer impls ──────────────────────────────────────────────

macro_rules! forward_compound {
    ($($t:ident :: $method:ident),* $(,)?) => {
        $(
            impl<W: Write> ser::$t for &mut Serializer<W> {
                type Ok = ();
                type Error = Error;
                fn $method<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
                    value.serialize(&mut **self)
                }
                fn end(self) -> Result<()> {
                    Ok(())
                }
            }
        )*
    };
}

forward_compound! {
    SerializeSeq::serialize_element,
    SerializeTuple::serialize_element,
    SerializeTupleStruct::serialize_field,
    SerializeTupleVariant::serialize_field,
}

macro_rules! forward_named_fields {
    ($($t:ident),* $(,)?) => {
        $(
            impl<W: Write> ser::$t for &mut Serializer<W> {
                type Ok = ();
                type Error = Error;
                fn serialize_field<T: Serialize + ?Sized>(
                    &mut self,
                    _key: &'static str,
                    value: &T,
                ) -> Result<()> {
                    value.serialize(&mut **self)
                }
                fn end(self) -> Result<()> {
                    Ok(())
                }
            }
        )*
    };
}

forward_named_fields!(SerializeStruct, SerializeStructVariant);

impl<W: Write> ser::SerializeMap for &mut Serializer<W> {
    type Ok = ();
    type Error = Error;
    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }
    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }
    fn end(self) -> Result<()> {
        Ok(())
    }
}

// ── FixedOpaqueSerializer ──────────────────────────────────────────────────
//
// Receives the single `serialize_bytes` call made by the `fixed_opaque`
// helper and writes the bytes as fixed-length opaque: padded, no prefix.
// Anything else reaching it is a misuse of the helper.

struct FixedOpaqueSerializer<'a, W: Write>(&'a mut Encoder<W>);

const NOT_OPAQUE: Error = Error::Unsupported("fixed_opaque requires a byte array");

impl<W: Write> ser::Serializer for FixedOpaqueSerializer<'_, W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.0.put_opaque(v)
    }

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_i8(self, _v: i8) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_i16(self, _v: i16) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_i32(self, _v: i32) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_u8(self, _v: u8) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_u16(self, _v: u16) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_u32(self, _v: u32) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_char(self, _v: char) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_none(self) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_unit(self) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_unit_variant(self, _n: &'static str, _idx: u32, _v: &'static str) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _idx: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(NOT_OPAQUE)
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(NOT_OPAQUE)
    }
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(NOT_OPAQUE)
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(NOT_OPAQUE)
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _idx: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(NOT_OPAQUE)
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(NOT_OPAQUE)
    }
    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(NOT_OPAQUE)
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _idx: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(NOT_OPAQUE)
    }
}
