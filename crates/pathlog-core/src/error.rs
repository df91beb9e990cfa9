//! Error types for recording, decoding and replaying path journals.

use crate::action::ActionKind;
use crate::geometry::PrimitiveError;
use thiserror::Error;

/// Why an encoded journal could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("not a path journal (invalid magic header)")]
    InvalidMagic,
    #[error("unsupported journal format version {0}")]
    UnsupportedVersion(u8),
    #[error("unexpected end of journal data")]
    UnexpectedEnd,
    #[error("unknown action kind tag: 0x{0:02X}")]
    UnknownKind(u8),
    #[error("{kind}: expected {expected} values, found {found}")]
    ArrayLength {
        kind: ActionKind,
        expected: usize,
        found: usize,
    },
    #[error("invalid boolean byte: 0x{0:02X}")]
    InvalidBool(u8),
    #[error("invalid direction byte: 0x{0:02X}")]
    InvalidDirection(u8),
    #[error("unknown fill type: {0}")]
    UnknownFillType(String),
    #[error("fill type name is not valid UTF-8")]
    InvalidString,
    #[error("{0} trailing bytes after fill type")]
    TrailingBytes(usize),
    #[error("malformed text encoding: {0}")]
    Text(String),
}

/// Errors surfaced by the recorder, codecs and replayer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JournalError {
    /// The operation needs foreign live geometry and cannot be recorded.
    #[error("operation not supported by a recorded path: {0}")]
    NotSupported(&'static str),
    #[error("corrupt path journal: {0}")]
    CorruptLog(#[from] DecodeError),
    #[error("native primitive failure: {0}")]
    NativePrimitiveFailure(#[from] PrimitiveError),
    #[error("replay failed at action {index}: {source}")]
    Replay {
        index: usize,
        #[source]
        source: PrimitiveError,
    },
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The text form cannot carry non-finite floats.
    #[error("action {index} holds a non-finite value and cannot be written as JSON")]
    NonFinite { index: usize },
}

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;
