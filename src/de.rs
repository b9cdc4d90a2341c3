//! XDR Deserializer (RFC 4506)

use crate::config::Config;
use crate::decode::Decoder;
use crate::error::{Error, Result};
use crate::stream::XdrStream;
use serde::de::{
    self, DeserializeOwned, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use std::io::Read;

/// Deserialize a value from XDR bytes.
pub fn from_bytes<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_bytes_with_config(input, Config::default())
}

pub fn from_bytes_with_config<T: DeserializeOwned>(input: &[u8], config: Config) -> Result<T> {
    let mut de = Deserializer::with_config(input, config);
    T::deserialize(&mut de)
}

/// Deserialize a value from XDR bytes, also returning remaining unconsumed bytes.
pub fn from_bytes_partial<T: DeserializeOwned>(input: &[u8]) -> Result<(T, &[u8])> {
    let mut de = Deserializer::new(input);
    let value = T::deserialize(&mut de)?;
    Ok((value, de.into_reader()))
}

/// Deserialize a value from any `Read` source, consuming exactly its wire size.
pub fn from_reader<R: Read, T: DeserializeOwned>(reader: R) -> Result<T> {
    let mut de = Deserializer::new(reader);
    T::deserialize(&mut de)
}

/// The XDR deserializer. Drives a [`Decoder`] from serde's data model.
///
/// XDR is not self-describing, so only typed deserialization works:
/// `deserialize_any` and `deserialize_ignored_any` are unsupported, and
/// strings and byte arrays are always handed to visitors as owned buffers.
pub struct Deserializer<R: Read> {
    dec: Decoder<R>,
}

impl<R: Read> Deserializer<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, Config::default())
    }

    pub fn with_config(reader: R, config: Config) -> Self {
        Deserializer {
            dec: Decoder::with_config(reader, config),
        }
    }

    /// The decoder underneath, for mixing hand-written XDR with serde.
    pub fn decoder(&mut self) -> &mut Decoder<R> {
        &mut self.dec
    }

    /// Consume the deserializer and return the source. For a `&[u8]` this
    /// is the unconsumed tail.
    pub fn into_reader(self) -> R {
        self.dec.into_inner()
    }

    fn max_length(&self) -> u32 {
        self.dec.config().max_length
    }

    /// Narrow a decoded word to a smaller integer type, faulting if it does
    /// not fit.
    fn narrow<T: TryFrom<i64>>(&mut self, ty: &'static str, value: i64) -> Result<T> {
        T::try_from(value).map_err(|_| self.dec.fault(ty, Error::OutOfRange { ty, value }))
    }

    fn read_count(&mut self) -> Result<usize> {
        let max = self.max_length();
        Ok(self.dec.get_length(max)? as usize)
    }
}

// ── Main Deserializer impl ─────────────────────────────────────────────────

impl<'de, R: Read> de::Deserializer<'de> for &mut Deserializer<R> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported(
            "deserialize_any (XDR is not self-describing)",
        ))
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.dec.get_bool()?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.dec.get_i32()?;
        visitor.visit_i8(self.narrow("i8", v.into())?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.dec.get_i32()?;
        visitor.visit_i16(self.narrow("i16", v.into())?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.dec.get_i32()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.dec.get_i64()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.dec.get_u32()?;
        visitor.visit_u8(self.narrow("u8", v.into())?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.dec.get_u32()?;
        visitor.visit_u16(self.narrow("u16", v.into())?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.dec.get_u32()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.dec.get_u64()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.dec.get_f32()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.dec.get_f64()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.dec.get_u32()?;
        match char::from_u32(v) {
            Some(c) => visitor.visit_char(c),
            None => Err(self.dec.fault("char", Error::InvalidString)),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let max = self.max_length();
        visitor.visit_string(self.dec.get_string(max)?)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let max = self.max_length();
        visitor.visit_byte_buf(self.dec.get_bytes(max)?)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.dec.get_u32()? {
            0 => visitor.visit_none(),
            1 => visitor.visit_some(self),
            v => Err(self.dec.fault("optional", Error::InvalidOption(v))),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == crate::FIXED_OPAQUE_TOKEN {
            visitor.visit_newtype_struct(FixedOpaqueDeserializer(&mut self.dec))
        } else {
            visitor.visit_newtype_struct(self)
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let count = self.read_count()?;
        visitor.visit_seq(SeqDeserializer::new(self, count))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        // Fixed-length: no count prefix
        visitor.visit_seq(SeqDeserializer::new(self, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self, len))
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let count = self.read_count()?;
        visitor.visit_map(MapDeserializer::new(self, count))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        // XDR structure: fields in order, no count prefix
        visitor.visit_seq(SeqDeserializer::new(self, fields.len()))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(EnumDeserializer {
            de: self,
            variants: variants.len(),
        })
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        // Identifiers are discriminants in XDR context — read as u32
        visitor.visit_u32(self.dec.get_u32()?)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported(
            "deserialize_ignored_any (XDR is not self-describing)",
        ))
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

// ── SeqDeserializer: fixed count ───────────────────────────────────────────

struct SeqDeserializer<'a, R: Read> {
    de: &'a mut Deserializer<R>,
    remaining: usize,
}

impl<'a, R: Read> SeqDeserializer<'a, R> {
    fn new(de: &'a mut Deserializer<R>, count: usize) -> Self {
        SeqDeserializer {
            de,
            remaining: count,
        }
    }
}

impl<'de, R: Read> SeqAccess<'de> for SeqDeserializer<'_, R> {
    type Error = Error;

    fn next_element_seed<T: de::DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

// ── MapDeserializer ────────────────────────────────────────────────────────

struct MapDeserializer<'a, R: Read> {
    de: &'a mut Deserializer<R>,
    remaining: usize,
}

impl<'a, R: Read> MapDeserializer<'a, R> {
    fn new(de: &'a mut Deserializer<R>, count: usize) -> Self {
        MapDeserializer {
            de,
            remaining: count,
        }
    }
}

impl<'de, R: Read> MapAccess<'de> for MapDeserializer<'_, R> {
    type Error = Error;

    fn next_key_seed<K: de::DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: de::DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

// ── EnumDeserializer ───────────────────────────────────────────────────────

struct EnumDeserializer<'a, R: Read> {
    de: &'a mut Deserializer<R>,
    variants: usize,
}

impl<'de, 'a, R: Read> EnumAccess<'de> for EnumDeserializer<'a, R> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: de::DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant)> {
        let index = self.de.dec.get_u32()?;
        if index as usize >= self.variants {
            return Err(self
                .de
                .dec
                .fault("enum", Error::InvalidDiscriminant(index.into())));
        }
        let val = seed.deserialize(de::value::U32Deserializer::<Error>::new(index))?;
        Ok((val, self))
    }
}

impl<'de, R: Read> VariantAccess<'de> for EnumDeserializer<'_, R> {
    type Error = Error;

    /// Unit variant — no data follows the discriminant
    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: de::DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.de, len))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.de, fields.len()))
    }
}

// ── FixedOpaqueDeserializer ────────────────────────────────────────────────
//
// Handed to the `fixed_opaque` visitor. `[u8; N]` asks for a tuple of N
// elements; we read N raw bytes plus padding and replay them as a sequence.

struct FixedOpaqueDeserializer<'a, R: Read>(&'a mut Decoder<R>);

impl<'de, R: Read> de::Deserializer<'de> for FixedOpaqueDeserializer<'_, R> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported("fixed_opaque requires a byte array"))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        let mut buf = vec![0u8; len];
        self.0.get_opaque(&mut buf)?;
        visitor.visit_seq(de::value::SeqDeserializer::<_, Error>::new(buf.into_iter()))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq
        tuple_struct map struct enum identifier ignored_any
    }
}
