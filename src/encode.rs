//! XDR encoder (RFC 4506)
//!
//! [`Encoder`] is the ENCODE-direction codec context. It is generic over any
//! `W: std::io::Write` sink. Each operation stages its complete wire image in
//! a scratch buffer and hands it to the sink with one `write_all`, so an item
//! is either written whole or, when a length check fails, not at all.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::stream::{Direction, XdrStream, check_len, pad_len};
use bytes::{BufMut, BytesMut};
use std::io::Write;

/// The XDR encoder. Generic over any `W: Write`.
///
/// ```rust
/// use xdr_codec::Encoder;
///
/// let mut enc = Encoder::new(Vec::new());
/// enc.put_i64(1 << 32).unwrap();
/// enc.put_string("1234123", 256).unwrap();
/// assert_eq!(
///     enc.into_inner(),
///     [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 7, b'1', b'2', b'3', b'4', b'1', b'2', b'3', 0]
/// );
/// ```
pub struct Encoder<W: Write> {
    writer: W,
    scratch: BytesMut,
    config: Config,
    poisoned: bool,
}

impl<W: Write> Encoder<W> {
    /// Create a new encoder that writes into `writer`.
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, Config::default())
    }

    pub fn with_config(writer: W, config: Config) -> Self {
        Encoder {
            writer,
            scratch: BytesMut::with_capacity(64),
            config,
            poisoned: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the encoder and return the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    // ── Internal helpers ───────────────────────────────────────────────────

    /// Stage one item with `stage`, then flush it to the sink in one write.
    fn emit<F>(&mut self, op: &'static str, stage: F) -> Result<()>
    where
        F: FnOnce(&mut BytesMut) -> Result<()>,
    {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        self.scratch.clear();
        let result = match stage(&mut self.scratch) {
            Ok(()) => self
                .writer
                .write_all(&self.scratch)
                .map_err(Error::from_write),
            Err(err) => Err(err),
        };
        result.map_err(|err| self.fault(op, err))
    }

    /// `data` followed by zero bytes up to the next 4-byte boundary.
    fn stage_padded(buf: &mut BytesMut, data: &[u8]) {
        buf.put_slice(data);
        buf.put_bytes(0, pad_len(data.len()));
    }

    /// A hyper value as two big-endian words, high word first.
    fn stage_hyper(buf: &mut BytesMut, v: u64) {
        buf.put_u32((v >> 32) as u32);
        buf.put_u32(v as u32);
    }

    // ── Primitives ─────────────────────────────────────────────────────────

    /// XDR signed integer — 4 bytes, big-endian, two's complement
    pub fn put_i32(&mut self, v: i32) -> Result<()> {
        self.emit("int32", |buf| {
            buf.put_i32(v);
            Ok(())
        })
    }

    /// XDR unsigned integer — 4 bytes, big-endian
    pub fn put_u32(&mut self, v: u32) -> Result<()> {
        self.emit("uint32", |buf| {
            buf.put_u32(v);
            Ok(())
        })
    }

    /// XDR hyper integer — two's complement at 64 bits, split into two words
    pub fn put_i64(&mut self, v: i64) -> Result<()> {
        self.emit("int64", |buf| {
            Self::stage_hyper(buf, v as u64);
            Ok(())
        })
    }

    /// XDR unsigned hyper integer — high word, then low word
    pub fn put_u64(&mut self, v: u64) -> Result<()> {
        self.emit("uint64", |buf| {
            Self::stage_hyper(buf, v);
            Ok(())
        })
    }

    /// XDR single-precision float — IEEE 754 bit pattern, 4 bytes
    pub fn put_f32(&mut self, v: f32) -> Result<()> {
        self.emit("float", |buf| {
            buf.put_u32(v.to_bits());
            Ok(())
        })
    }

    /// XDR double-precision float — IEEE 754 bit pattern as two words
    pub fn put_f64(&mut self, v: f64) -> Result<()> {
        self.emit("double", |buf| {
            Self::stage_hyper(buf, v.to_bits());
            Ok(())
        })
    }

    /// XDR bool — 4-byte unsigned int: 0 (false) or 1 (true)
    pub fn put_bool(&mut self, v: bool) -> Result<()> {
        self.put_u32(u32::from(v))
    }

    // ── Opaque data and strings ────────────────────────────────────────────

    /// XDR fixed-length opaque — raw bytes + 0–3 zero-padding bytes, no
    /// length prefix
    pub fn put_opaque(&mut self, data: &[u8]) -> Result<()> {
        self.emit("opaque", |buf| {
            Self::stage_padded(buf, data);
            Ok(())
        })
    }

    /// XDR variable-length opaque — 4-byte length + data + 0–3 padding bytes
    pub fn put_bytes(&mut self, data: &[u8], max_length: u32) -> Result<()> {
        self.emit("bytes", |buf| {
            let len = check_len(data.len(), max_length)?;
            tracing::trace!(len, pad = pad_len(data.len()), "encode bytes");
            buf.put_u32(len);
            Self::stage_padded(buf, data);
            Ok(())
        })
    }

    /// XDR string — 4-byte length + bytes + 0–3 padding bytes.
    ///
    /// Like C's `strlen`, the encoded length ends at the first NUL; the NUL
    /// itself never reaches the wire.
    pub fn put_string(&mut self, s: &str, max_length: u32) -> Result<()> {
        let bytes = s.as_bytes();
        let text = match bytes.iter().position(|&b| b == 0) {
            Some(nul) => &bytes[..nul],
            None => bytes,
        };
        self.emit("string", |buf| {
            let len = check_len(text.len(), max_length)?;
            tracing::trace!(len, pad = pad_len(text.len()), "encode string");
            buf.put_u32(len);
            Self::stage_padded(buf, text);
            Ok(())
        })
    }
}

impl<W: Write> XdrStream for Encoder<W> {
    fn direction(&self) -> Direction {
        Direction::Encode
    }

    fn fault(&mut self, op: &'static str, err: Error) -> Error {
        tracing::debug!(op, error = %err, "xdr encode failed; encoder poisoned");
        self.poisoned = true;
        err
    }

    fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    fn int32(&mut self, v: &mut i32) -> Result<()> {
        self.put_i32(*v)
    }

    fn uint32(&mut self, v: &mut u32) -> Result<()> {
        self.put_u32(*v)
    }

    fn int64(&mut self, v: &mut i64) -> Result<()> {
        self.put_i64(*v)
    }

    fn uint64(&mut self, v: &mut u64) -> Result<()> {
        self.put_u64(*v)
    }

    fn float(&mut self, v: &mut f32) -> Result<()> {
        self.put_f32(*v)
    }

    fn double(&mut self, v: &mut f64) -> Result<()> {
        self.put_f64(*v)
    }

    fn bool(&mut self, v: &mut bool) -> Result<()> {
        self.put_bool(*v)
    }

    fn opaque(&mut self, buf: &mut [u8]) -> Result<()> {
        self.put_opaque(buf)
    }

    fn bytes(&mut self, buf: &mut Vec<u8>, max_length: u32) -> Result<()> {
        self.put_bytes(buf, max_length)
    }

    fn string(&mut self, s: &mut String, max_length: u32) -> Result<()> {
        self.put_string(s, max_length)
    }
}
