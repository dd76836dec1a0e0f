//! Custom error types for the stardict-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum StardictError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The file is structurally invalid or does not conform to the StarDict format.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A required `key=value` line is absent from an `.ifo` description file.
    #[error("Missing required key '{0}' in ifo file")]
    MissingKey(&'static str),

    /// The dictionary uses a format extension this reader does not handle.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A fixed-size read or a decompressed buffer has an unexpected size.
    ///
    /// This means a file is inconsistent with its own declared sizes; the
    /// operation is aborted instead of returning partial data.
    #[error("Size mismatch for {context}: expected {expected} bytes, but found {found} bytes")]
    SizeMismatch {
        context: String,
        expected: u64,
        found: u64,
    },

    /// A record or index entry points outside the bytes it was read from.
    #[error("Corrupt data: {0}")]
    Corrupt(String),

    /// An error occurred during decompression, often due to corrupted data.
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    /// An entry position outside `0..len` was requested.
    #[error("Entry index {index} is out of range (dictionary has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A convenience `Result` type alias using the crate's `StardictError` type.
pub type Result<T> = std::result::Result<T, StardictError>;
