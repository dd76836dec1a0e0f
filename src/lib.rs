//! # stardict-reader
//!
//! A reader and lookup engine for StarDict dictionaries (`.ifo`, `.idx`,
//! `.idx.gz`, `.syn`, `.dict`, `.dict.dz`).
//!
//! Load any number of dictionaries into a [`LibrarySet`] and query them with
//! exact, inflection-tolerant, fuzzy (`/word`), pattern (`wo*d`) or full-text
//! (`|some words`) searches, or walk the merged headword lists in order.
//!
//! ```no_run
//! use stardict_reader::{LibraryConfig, LibrarySet};
//! use std::path::PathBuf;
//!
//! let mut library = LibrarySet::new(LibraryConfig::default());
//! library.load(&[PathBuf::from("/usr/share/stardict/dic")], &[], &[]);
//! for hit in library.lookup("apple").unwrap() {
//!     println!("{} / {}: {}", hit.bookname, hit.word, hit.article.plain_text());
//! }
//! ```
pub mod stardict;

// Re-export the main types for convenience
pub use stardict::{
    Dictionary,
    LibraryConfig,
    LibrarySet,
    Result,
    StardictError,
    models::{
        Article,
        DictInfo,
        IndexEntry,
        SearchResult,
        Segment,
        INVALID_INDEX,
    },
    query::{analyze_query, Query},
    utils::stardict_strcmp,
};
