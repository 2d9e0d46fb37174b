//! Error types for archive reading, writing and restore.

use thiserror::Error;

/// Result type for backup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Backup error types
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream carries no end-of-central-directory record
    #[error("not a zip archive: no end-of-central-directory record")]
    MissingEndOfCentralDirectory,

    /// A record signature did not match its expected value
    #[error("invalid signature: expected {expected:#010x}, got {actual:#010x}")]
    InvalidSignature { expected: u32, actual: u32 },

    /// Entry uses a compression method this reader does not handle
    #[error("unsupported compression method: {0}")]
    UnsupportedMethod(u16),

    /// Entry bytes did not match the recorded CRC-32
    #[error("CRC mismatch in entry `{name}`: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    #[error("entry index {0} is out of range, must be less than {1}")]
    EntryIndexOutOfRange(usize, usize),

    /// Entry or archive exceeds the plain 32-bit zip limits
    #[error("entry `{0}` is too large for a plain zip record")]
    EntryTooLarge(String),

    /// Payload entry names must be unique within one archive
    #[error("archive already contains an entry named `{0}`")]
    DuplicateEntry(String),

    /// No metadata entry anywhere in the archive
    #[error("archive has no metadata entry")]
    MetaEntryAbsent,

    /// Metadata entry is not syntactically valid JSON
    #[error("malformed metadata: {0}")]
    MetaSyntax(#[from] serde_json::Error),

    /// Metadata entry is valid JSON but not a positional array
    #[error("metadata is not a positional array")]
    MetaNotArray,

    /// Metadata entry bytes are not UTF-8 text
    #[error("metadata entry is not UTF-8 text")]
    MetaNotUtf8,

    /// A positional metadata field is missing or has the wrong type
    #[error("metadata field {index} is missing or has the wrong type")]
    MetaField { index: usize },

    /// Metadata was written by a newer encoding than this reader knows
    #[error("unsupported metadata version: {0}")]
    UnsupportedMetaVersion(u64),
}
