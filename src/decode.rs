//! XDR decoder (RFC 4506)
//!
//! [`Decoder`] is the DECODE-direction codec context, generic over any
//! `R: std::io::Read`. A `&[u8]` source advances as it is read, so
//! [`Decoder::get_ref`] on a slice-backed decoder yields the unconsumed
//! tail.

use crate::config::{Config, PaddingPolicy};
use crate::error::{Error, Result};
use crate::stream::{Direction, PREALLOC_BYTES, XdrStream, pad_len};
use bytes::BytesMut;
use std::io::Read;

/// The XDR decoder. Generic over any `R: Read`.
///
/// ```rust
/// use xdr_codec::Decoder;
///
/// let wire = [0xFFu8, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 2, b'h', b'i', 0, 0];
/// let mut dec = Decoder::new(&wire[..]);
/// assert_eq!(dec.get_i64().unwrap(), -(1 << 32));
/// assert_eq!(dec.get_string(16).unwrap(), "hi");
/// assert!(dec.get_ref().is_empty());
/// ```
pub struct Decoder<R: Read> {
    reader: R,
    scratch: BytesMut,
    config: Config,
    poisoned: bool,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, Config::default())
    }

    pub fn with_config(reader: R, config: Config) -> Self {
        Decoder {
            reader,
            scratch: BytesMut::new(),
            config,
            poisoned: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    // ── Internal helpers ───────────────────────────────────────────────────

    /// Run one operation; a failure poisons the decoder.
    fn guarded<T, F>(&mut self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        match f(self) {
            Ok(v) => Ok(v),
            Err(err) => Err(self.fault(op, err)),
        }
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact(buf).map_err(Error::from_read)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    fn read_word(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take::<4>()?))
    }

    /// High word, then low word: one 8-byte big-endian read.
    fn read_hyper(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.take::<8>()?))
    }

    fn check_padding(&self, pad: &[u8]) -> Result<()> {
        match self.config.padding {
            PaddingPolicy::Strict if pad.iter().any(|&b| b != 0) => Err(Error::InvalidPadding),
            _ => Ok(()),
        }
    }

    fn read_length(&mut self, max_length: u32) -> Result<usize> {
        let len = self.read_word()?;
        if len > max_length {
            return Err(Error::LengthExceeded {
                max: max_length,
                got: len.into(),
            });
        }
        Ok(len as usize)
    }

    /// Length prefix into `buf`, leaving it empty if anything fails.
    fn read_variable_into(&mut self, buf: &mut Vec<u8>, max_length: u32) -> Result<()> {
        buf.clear();
        let result = self.read_variable(buf, max_length);
        if result.is_err() {
            buf.clear();
        }
        result
    }

    /// Length prefix, then payload and padding. Items up to
    /// `PREALLOC_BYTES` take a single read; longer ones grow `buf` one
    /// chunk at a time as the source delivers.
    fn read_variable(&mut self, buf: &mut Vec<u8>, max_length: u32) -> Result<()> {
        let len = self.read_length(max_length)?;
        let pad = pad_len(len);
        tracing::trace!(len, pad, "decode variable-length item");
        let wire_len = len.checked_add(pad).ok_or(Error::AllocationFailure(len))?;
        while buf.len() < wire_len {
            let start = buf.len();
            let step = (wire_len - start).min(PREALLOC_BYTES);
            buf.try_reserve(step)
                .map_err(|_| Error::AllocationFailure(wire_len))?;
            buf.resize(start + step, 0);
            self.fill(&mut buf[start..])?;
        }
        self.check_padding(&buf[len..])?;
        buf.truncate(len);
        Ok(())
    }

    // ── Primitives ─────────────────────────────────────────────────────────

    pub fn get_i32(&mut self) -> Result<i32> {
        self.guarded("int32", |d| Ok(i32::from_be_bytes(d.take::<4>()?)))
    }

    pub fn get_u32(&mut self) -> Result<u32> {
        self.guarded("uint32", |d| d.read_word())
    }

    pub fn get_i64(&mut self) -> Result<i64> {
        self.guarded("int64", |d| Ok(d.read_hyper()? as i64))
    }

    pub fn get_u64(&mut self) -> Result<u64> {
        self.guarded("uint64", |d| d.read_hyper())
    }

    pub fn get_f32(&mut self) -> Result<f32> {
        self.guarded("float", |d| Ok(f32::from_bits(d.read_word()?)))
    }

    pub fn get_f64(&mut self) -> Result<f64> {
        self.guarded("double", |d| Ok(f64::from_bits(d.read_hyper()?)))
    }

    pub fn get_bool(&mut self) -> Result<bool> {
        self.guarded("bool", |d| match d.read_word()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(Error::InvalidBool(v)),
        })
    }

    /// A `uint32` length or count prefix of at most `max_length`.
    pub fn get_length(&mut self, max_length: u32) -> Result<u32> {
        self.guarded("length", |d| Ok(d.read_length(max_length)? as u32))
    }

    // ── Opaque data and strings ────────────────────────────────────────────

    /// Fill `buf` with fixed-length opaque data and consume its padding,
    /// both in one read.
    pub fn get_opaque(&mut self, buf: &mut [u8]) -> Result<()> {
        self.guarded("opaque", |d| {
            let len = buf.len();
            if pad_len(len) == 0 {
                return d.fill(buf);
            }
            d.scratch.clear();
            d.scratch.resize(len + pad_len(len), 0);
            d.reader
                .read_exact(&mut d.scratch)
                .map_err(Error::from_read)?;
            d.check_padding(&d.scratch[len..])?;
            buf.copy_from_slice(&d.scratch[..len]);
            Ok(())
        })
    }

    /// Variable-length opaque, returned as an owned buffer.
    pub fn get_bytes(&mut self, max_length: u32) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.get_bytes_into(&mut buf, max_length)?;
        Ok(buf)
    }

    /// Variable-length opaque into a caller-owned buffer, replacing its
    /// contents. The buffer's length afterwards is the decoded length.
    pub fn get_bytes_into(&mut self, buf: &mut Vec<u8>, max_length: u32) -> Result<()> {
        self.guarded("bytes", |d| d.read_variable_into(buf, max_length))
    }

    /// A string of at most `max_length` bytes. Must be valid UTF-8.
    pub fn get_string(&mut self, max_length: u32) -> Result<String> {
        self.guarded("string", |d| {
            let mut buf = Vec::new();
            d.read_variable_into(&mut buf, max_length)?;
            String::from_utf8(buf).map_err(|_| Error::InvalidString)
        })
    }
}

impl<R: Read> XdrStream for Decoder<R> {
    fn direction(&self) -> Direction {
        Direction::Decode
    }

    fn fault(&mut self, op: &'static str, err: Error) -> Error {
        tracing::debug!(op, error = %err, "xdr decode failed; decoder poisoned");
        self.poisoned = true;
        err
    }

    fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    fn int32(&mut self, v: &mut i32) -> Result<()> {
        *v = self.get_i32()?;
        Ok(())
    }

    fn uint32(&mut self, v: &mut u32) -> Result<()> {
        *v = self.get_u32()?;
        Ok(())
    }

    fn int64(&mut self, v: &mut i64) -> Result<()> {
        *v = self.get_i64()?;
        Ok(())
    }

    fn uint64(&mut self, v: &mut u64) -> Result<()> {
        *v = self.get_u64()?;
        Ok(())
    }

    fn float(&mut self, v: &mut f32) -> Result<()> {
        *v = self.get_f32()?;
        Ok(())
    }

    fn double(&mut self, v: &mut f64) -> Result<()> {
        *v = self.get_f64()?;
        Ok(())
    }

    fn bool(&mut self, v: &mut bool) -> Result<()> {
        *v = self.get_bool()?;
        Ok(())
    }

    fn opaque(&mut self, buf: &mut [u8]) -> Result<()> {
        self.get_opaque(buf)
    }

    fn bytes(&mut self, buf: &mut Vec<u8>, max_length: u32) -> Result<()> {
        self.get_bytes_into(buf, max_length)
    }

    fn string(&mut self, s: &mut String, max_length: u32) -> Result<()> {
        *s = self.get_string(max_length)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyper_reassembles_high_word_first() {
        let wire = [0x01u8, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut dec = Decoder::new(&wire[..]);
        assert_eq!(dec.get_u64().unwrap(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn short_read_poisons() {
        let wire = [0u8, 0, 0, 1, 0, 0];
        let mut dec = Decoder::new(&wire[..]);
        assert_eq!(dec.get_u32().unwrap(), 1);
        assert!(matches!(dec.get_u32(), Err(Error::ShortRead)));
        assert!(dec.is_poisoned());
        assert!(matches!(dec.get_u32(), Err(Error::Poisoned)));
    }

    #[test]
    fn bytes_into_replaces_contents() {
        let wire = [0u8, 0, 0, 3, 7, 8, 9, 0];
        let mut buf = vec![1, 2, 3, 4, 5, 6];
        let mut dec = Decoder::new(&wire[..]);
        dec.get_bytes_into(&mut buf, 8).unwrap();
        assert_eq!(buf, [7, 8, 9]);
        assert!(dec.get_ref().is_empty());
    }

    #[test]
    fn length_over_max_is_rejected_before_payload() {
        let wire = [0u8, 0, 0, 9, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0, 0];
        let mut dec = Decoder::new(&wire[..]);
        assert!(matches!(
            dec.get_bytes(8),
            Err(Error::LengthExceeded { max: 8, got: 9 })
        ));
        assert_eq!(dec.get_ref().len(), 12);
    }
}
