//! # Headword Index Readers
//!
//! A dictionary's index is a sorted table of `headword\0 offset size`
//! records. Two on-disk variants exist and each has its own reader:
//!
//! - [`paged::PagedIndex`] for a plain `.idx` file, read lazily one page of
//!   [`ENTRIES_PER_PAGE`](crate::stardict::types::models::ENTRIES_PER_PAGE)
//!   entries at a time, with page offsets persisted by [`offset_cache`].
//! - [`buffered::BufferedIndex`] for a gzip-compressed `.idx.gz` file,
//!   decompressed into memory once.
//!
//! Both answer lookups with the same boundary semantics: `(false, 0)` for a
//! query sorting before the first headword, `(false, INVALID_INDEX)` for one
//! sorting after the last, otherwise an exact hit or the insertion position.

use std::path::Path;

use log::debug;

use crate::stardict::types::error::Result;
use crate::stardict::types::models::IndexEntry;
use crate::stardict::utils::KeyCmp;

pub mod buffered;
pub mod common;
pub mod offset_cache;
pub mod paged;

/// Read access to a dictionary's sorted headword table.
///
/// Reads take `&mut self` because the paged reader swaps its resident page.
pub trait IndexFile: Send {
    /// Number of headwords in the index.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Headword and article location of entry `idx`.
    fn entry(&mut self, idx: usize) -> Result<&IndexEntry>;

    /// Headword of entry `idx`.
    fn key(&mut self, idx: usize) -> Result<&str> {
        Ok(&self.entry(idx)?.key)
    }

    /// Binary search for `query` under `cmp`.
    ///
    /// Returns `(true, idx)` on an exact hit, otherwise `(false, pos)` where
    /// `pos` is `0`, the insertion position, or `INVALID_INDEX`.
    fn lookup(&mut self, query: &str, cmp: KeyCmp) -> Result<(bool, i64)>;
}

/// Opens the index belonging to `base` (the ifo path without its `ifo` extension).
///
/// A `.idx.gz` file takes precedence over a plain `.idx` file.
pub fn open(
    base: &str,
    word_count: u32,
    index_file_size: u32,
    cache_dir: Option<&Path>,
) -> Result<Box<dyn IndexFile>> {
    let gz_path = format!("{}idx.gz", base);
    if Path::new(&gz_path).is_file() {
        debug!("Using buffered index {}", gz_path);
        let index =
            buffered::BufferedIndex::load(Path::new(&gz_path), word_count, index_file_size)?;
        return Ok(Box::new(index));
    }

    let idx_path = format!("{}idx", base);
    debug!("Using paged index {}", idx_path);
    let index =
        paged::PagedIndex::load(Path::new(&idx_path), word_count, index_file_size, cache_dir)?;
    Ok(Box::new(index))
}
