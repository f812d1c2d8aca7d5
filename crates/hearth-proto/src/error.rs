//! Error types for the hearth wire protocol.
//!
//! Every failure to decode a frame or packet surfaces as a [`ProtocolError`];
//! the session layer treats any of them as fatal for the connection.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error in a string field.
    #[error("decode error: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// The payload ended before a field could be read.
    #[error("unexpected end of packet: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the field required.
        needed: usize,
        /// Bytes left in the payload.
        remaining: usize,
    },

    /// A variable-length integer used more bytes than its width allows.
    #[error("varint exceeds {bits} bits")]
    VarIntOverflow {
        /// Width of the integer being decoded.
        bits: u32,
    },

    /// A frame exceeded the maximum allowed length.
    #[error("frame too long: {actual} bytes (limit: {limit})")]
    FrameTooLong {
        /// Declared frame length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// An index into one of the AvailableCommands lookup tables was out of range.
    #[error("{table} index {index} out of range (table size {len})")]
    InvalidIndex {
        /// Name of the table being indexed.
        table: &'static str,
        /// The offending index.
        index: usize,
        /// Size of the table.
        len: usize,
    },

    /// A length prefix was larger than the remaining payload could possibly hold.
    #[error("{what} length {len} exceeds remaining payload")]
    LengthOutOfBounds {
        /// What the length describes.
        what: &'static str,
        /// The declared length.
        len: usize,
    },
}
