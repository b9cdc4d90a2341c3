use serde::{de, ser};
use std::{fmt, io};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding or decoding XDR.
///
/// Every variant is fatal to the operation that produced it. A codec
/// context that returned one of these is poisoned and refuses further work.
#[derive(Debug, Error)]
pub enum Error {
    /// The source ran out before the requested number of bytes was read.
    #[error("short read: source ended before the item was complete")]
    ShortRead,

    /// The sink refused to take the full write.
    #[error("short write: sink did not accept the full item")]
    ShortWrite,

    /// A requested or decoded length exceeded the declared maximum.
    #[error("length {got} exceeds maximum {max}")]
    LengthExceeded { max: u32, got: u64 },

    /// Growing a decode buffer to the decoded length failed.
    #[error("failed to allocate {0} bytes for decoded item")]
    AllocationFailure(usize),

    /// Padding bytes were non-zero under the strict padding policy.
    #[error("non-zero padding bytes")]
    InvalidPadding,

    /// A string was not valid UTF-8, or a char was not a Unicode scalar.
    #[error("string contains invalid bytes")]
    InvalidString,

    /// The boolean encoding was neither 0 nor 1.
    #[error("invalid boolean encoding: {0} (must be 0 or 1)")]
    InvalidBool(u32),

    /// An optional value had a discriminant other than 0 or 1.
    #[error("invalid optional discriminant: {0} (must be 0 or 1)")]
    InvalidOption(u32),

    /// A union/enum discriminant did not name a known arm.
    #[error("invalid discriminant value: {0}")]
    InvalidDiscriminant(i64),

    /// An enumeration value outside its declared set.
    #[error("{0} is not a permitted value for the enumeration")]
    InvalidEnum(i32),

    /// A decoded integer does not fit the narrower Rust type it targets.
    #[error("value {value} out of range for {ty}")]
    OutOfRange { ty: &'static str, value: i64 },

    /// A sequence or map length was not known ahead of time.
    #[error(
        "sequence length must be known before serialization (XDR requires a length prefix)"
    )]
    LengthRequired,

    /// XDR has no encoding for the requested type.
    #[error("XDR does not support type: {0}")]
    Unsupported(&'static str),

    /// The context faulted earlier and must be rebuilt before reuse.
    #[error("codec context is poisoned by an earlier fault")]
    Poisoned,

    /// Any other transport failure.
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// A custom error message from serde.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Classify a transport error from a read.
    pub(crate) fn from_read(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::ShortRead,
            _ => Error::Io(err),
        }
    }

    /// Classify a transport error from a write.
    pub(crate) fn from_write(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WriteZero => Error::ShortWrite,
            _ => Error::Io(err),
        }
    }
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_transport_errors() {
        let eof = io::Error::from(io::ErrorKind::UnexpectedEof);
        assert!(matches!(Error::from_read(eof), Error::ShortRead));

        let zero = io::Error::from(io::ErrorKind::WriteZero);
        assert!(matches!(Error::from_write(zero), Error::ShortWrite));

        let other = io::Error::from(io::ErrorKind::BrokenPipe);
        assert!(matches!(Error::from_write(other), Error::Io(_)));
    }

    #[test]
    fn length_message() {
        let err = Error::LengthExceeded { max: 4, got: 9 };
        assert_eq!(err.to_string(), "length 9 exceeds maximum 4");
    }
}
