//! Codec layer for decompression and string metrics.
//!
//! # Submodules
//!
//! - [`compression`][]: gzip and raw deflate decompression
//! - [`dictzip`][]: random access into `.dict.dz` article files
//! - [`distance`][]: Levenshtein edit distance for fuzzy search

pub mod compression;
pub mod dictzip;
pub mod distance;
