//! File format parsing layer for StarDict dictionaries.
//!
//! # Module Organization
//!
//! - [`ifo`]: Parses the `.ifo` description file
//! - [`index`]: Reads the sorted headword index (`.idx` / `.idx.gz`)
//! - [`synonyms`]: Loads the optional `.syn` synonym table
//! - [`article`]: Decodes article records into typed segments
//!
//! # Architecture
//!
//! ```text
//! Dictionary files:
//! ┌─────────────────┐
//! │  words.ifo      │ ← ifo::load()
//! ├─────────────────┤
//! │  words.idx(.gz) │ ← index::open()
//! ├─────────────────┤
//! │  words.syn      │ ← synonyms::SynonymTable::load()
//! ├─────────────────┤
//! │  words.dict(.dz)│ ← article::decode()
//! └─────────────────┘
//! ```

pub mod article;
pub mod ifo;
pub mod index;
pub mod synonyms;
