//! Library error types.
//!
use std::fmt;
use std::io;

/// A packio `Result`, normally returning a packio [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A packio error. Encompasses every way a single encode or decode call can
/// fail.
#[derive(Debug)]
pub enum Error {
    /// A decode operation found no bytes available at the source.
    EndOfInput,
    /// The sink reported a write failure. Wraps the underlying I/O error.
    StreamWrite(io::Error),
    /// The peeked tag is not a member of the family group selected by the
    /// destination type.
    TypeMismatch,
    /// The family is compatible but the destination's representable range
    /// cannot hold every value of the family.
    NarrowingConversion,
    /// A fixed-size destination buffer is smaller than the decoded length
    /// (plus any mandatory NUL byte).
    CapacityTooSmall,
    /// An input string or array exceeds `2^32 - 1` elements/bytes during
    /// encode.
    LengthOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EndOfInput => write!(f, "no bytes available at the source"),
            Error::StreamWrite(err) => write!(f, "stream write failed: {}", err),
            Error::TypeMismatch => write!(f, "decoded tag is not in the requested family"),
            Error::NarrowingConversion => {
                write!(f, "destination is too narrow to hold every value of the decoded family")
            }
            Error::CapacityTooSmall => {
                write!(f, "fixed-size destination is smaller than the decoded length")
            }
            Error::LengthOverflow => write!(f, "length exceeds 2^32 - 1 during encode"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::StreamWrite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        // Short reads are turned into `EndOfInput` by the stream traits
        // before they ever reach here, so any I/O error surfacing through
        // this conversion happened on the write side.
        Error::StreamWrite(err)
    }
}
