//! In-memory reader for gzip-compressed `.idx.gz` index files.

use std::cmp::Ordering;
use std::path::Path;

use log::info;

use super::common;
use super::IndexFile;
use crate::stardict::codec::compression;
use crate::stardict::types::error::{Result, StardictError};
use crate::stardict::types::models::{IndexEntry, INVALID_INDEX};
use crate::stardict::utils::KeyCmp;

/// Fully decompressed index held as a flat, sorted entry table.
#[derive(Debug)]
pub struct BufferedIndex {
    entries: Vec<IndexEntry>,
}

impl BufferedIndex {
    /// Decompresses `path` and parses its first `word_count` entries.
    ///
    /// The decompressed size must equal the `idxfilesize` declared in the ifo file.
    pub fn load(path: &Path, word_count: u32, index_file_size: u32) -> Result<Self> {
        let data = compression::gunzip_file(path, index_file_size as u64)?;
        let index = Self::from_bytes(&data, word_count)?;
        info!("Loaded compressed index {}: {} entries", path.display(), index.entries.len());
        Ok(index)
    }

    /// Parses `word_count` entries from uncompressed index bytes.
    pub fn from_bytes(data: &[u8], word_count: u32) -> Result<Self> {
        if word_count == 0 {
            return Err(StardictError::InvalidFormat("Index has no entries".to_string()));
        }
        let mut reader = data;
        let entries = (0..word_count)
            .map(|_| common::parse_entry(&mut reader))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }
}

impl IndexFile for BufferedIndex {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry(&mut self, idx: usize) -> Result<&IndexEntry> {
        let len = self.entries.len();
        self.entries
            .get(idx)
            .ok_or(StardictError::IndexOutOfRange { index: idx, len })
    }

    fn lookup(&mut self, query: &str, cmp: KeyCmp) -> Result<(bool, i64)> {
        let last = self.entries.len() - 1;
        if cmp(query, &self.entries[0].key) == Ordering::Less {
            return Ok((false, 0));
        }
        if cmp(query, &self.entries[last].key) == Ordering::Greater {
            return Ok((false, INVALID_INDEX));
        }

        let mut from: i64 = 0;
        let mut to: i64 = last as i64;
        while from <= to {
            let middle = (from + to) / 2;
            match cmp(query, &self.entries[middle as usize].key) {
                Ordering::Greater => from = middle + 1,
                Ordering::Less => to = middle - 1,
                Ordering::Equal => return Ok((true, middle)),
            }
        }
        Ok((false, from))
    }
}
