//! # xdr-codec
//!
//! A pure-Rust implementation of XDR (eXternal Data Representation,
//! RFC 4506): a canonical, host-independent binary encoding.
//!
//! ## Overview
//!
//! All values are big-endian (network byte order), and every item occupies a
//! multiple of 4 bytes (padded with zeroes as needed). The crate has two
//! layers:
//!
//! - **Codec contexts.** [`Encoder`] and [`Decoder`] wrap a byte sink
//!   (`std::io::Write`) or source (`std::io::Read`) and offer one operation
//!   per XDR primitive. Both implement [`XdrStream`], so an XDR routine
//!   written once runs in either direction. A context that faults is
//!   poisoned and refuses further use.
//! - **serde.** [`to_bytes`] / [`from_bytes`] and friends map the serde data
//!   model onto the codec.
//!
//! ## Wire format
//!
//! | XDR type | Encoding |
//! |----------|----------|
//! | int / unsigned int | 4 bytes |
//! | hyper / unsigned hyper | high word, then low word |
//! | float | 4-byte IEEE 754 bit pattern |
//! | double | IEEE 754 bit pattern as high word, then low word |
//! | opaque\[n\] | n bytes + zero padding to a multiple of 4 |
//! | opaque<max> | 4-byte length L, L bytes + padding |
//! | string<max> | 4-byte length L, L bytes + padding (no NUL on the wire) |
//! | bool | 4-byte 0 or 1 |
//! | enum | 4-byte signed int |
//! | T\[n\] | n elements back to back |
//! | T<max> | 4-byte count, then elements |
//! | T * (optional) | 4-byte bool, then T if TRUE |
//! | void | nothing |
//! | union | 4-byte discriminant, then the selected arm |
//!
//! ## Serde type mapping
//!
//! | Rust / serde type | XDR encoding |
//! |-------------------|--------------|
//! | `bool`            | bool |
//! | `i8`, `i16`, `i32` | int (sign-extended) |
//! | `i64`             | hyper |
//! | `u8`, `u16`, `u32` | unsigned int (zero-extended) |
//! | `u64`             | unsigned hyper |
//! | `f32` / `f64`     | float / double |
//! | `char`            | unsigned int (Unicode scalar) |
//! | `&str`, `String`  | string |
//! | `&[u8]`, `Vec<u8>` via `serde_bytes` | variable-length opaque |
//! | `[u8; N]` via [`fixed_opaque`] | fixed-length opaque |
//! | `Option<T>`       | optional data |
//! | `()` / unit struct | void |
//! | Unit enum variant | unsigned discriminant (variant index) |
//! | Newtype / tuple / struct variant | discriminant + fields |
//! | `Vec<T>` / seq    | count + elements |
//! | Tuple / tuple struct / struct | fields back to back |
//! | Map               | count + alternating keys and values |
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use xdr_codec::{from_bytes, to_bytes};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct FileHandle {
//!     inode: u64,
//!     generation: u32,
//!     flags: u32,
//! }
//!
//! let fh = FileHandle {
//!     inode: 0x0102030405060708,
//!     generation: 42,
//!     flags: 0,
//! };
//!
//! let bytes = to_bytes(&fh).unwrap();
//! assert_eq!(bytes.len(), 16); // 8 + 4 + 4
//!
//! let decoded: FileHandle = from_bytes(&bytes).unwrap();
//! assert_eq!(fh, decoded);
//! ```

pub mod config;
pub mod de;
pub mod decode;
pub mod encode;
pub mod error;
pub mod fixed_opaque;
pub mod ser;
pub mod stream;

pub use config::{Config, PaddingPolicy};
pub use de::{Deserializer, from_bytes, from_bytes_partial, from_bytes_with_config, from_reader};
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{Error, Result};
pub use ser::{Serializer, to_bytes, to_bytes_with_config, to_writer};
pub use stream::{Direction, XdrFilter, XdrStream, pad_len};

pub use serde::{Deserialize, Serialize};

/// Newtype-struct name the [`fixed_opaque`] helper uses to reach the XDR
/// serializer and deserializer.
pub(crate) const FIXED_OPAQUE_TOKEN: &str = "$xdr_codec::FixedOpaque";
