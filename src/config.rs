//! Codec configuration.
//!
//! RFC 4506 says padding bytes are zero but leaves it to the reader whether
//! to verify that. [`PaddingPolicy`] makes the choice explicit.

use serde::{Deserialize, Serialize};

/// How a decoder treats the 0–3 padding bytes that follow opaque data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingPolicy {
    /// Reject any non-zero padding byte with [`Error::InvalidPadding`](crate::Error::InvalidPadding).
    #[default]
    Strict,
    /// Consume padding without looking at it.
    Lenient,
}

/// Settings shared by encoders, decoders and the serde layer.
///
/// ```rust
/// use xdr_codec::{Config, PaddingPolicy};
///
/// let config = Config::default().with_padding(PaddingPolicy::Lenient);
/// assert_eq!(config.max_length, u32::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub padding: PaddingPolicy,
    /// Ceiling for strings, byte arrays, sequences and maps that carry no
    /// per-field maximum (the serde layer). Explicit codec calls take their
    /// own maximum.
    pub max_length: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            padding: PaddingPolicy::Strict,
            max_length: u32::MAX,
        }
    }
}

impl Config {
    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }
}
