//! Sequential access to a dictionary's index entries.
//!
//! # Example
//! ```no_run
//! # use stardict_reader::{Dictionary, LibraryConfig};
//! let config = LibraryConfig::default();
//! let mut dict = Dictionary::load("/usr/share/stardict/dic/words.ifo", &config).unwrap();
//! for entry in dict.entries() {
//!     let entry = entry.unwrap();
//!     println!("{} @ {}+{}", entry.key, entry.offset, entry.size);
//! }
//! ```

use super::dictionary::Dictionary;
use super::types::error::Result;
use super::types::models::IndexEntry;

/// Iterator over every `(headword, offset, size)` entry in index order.
///
/// Created by [`Dictionary::entries()`](crate::Dictionary::entries). A plain
/// `.idx` index is paged in as the walk proceeds, so each step may touch
/// the disk.
pub struct Entries<'a> {
    dict: &'a mut Dictionary,
    next: usize,
}

impl<'a> Entries<'a> {
    pub(super) fn new(dict: &'a mut Dictionary) -> Self {
        Self { dict, next: 0 }
    }
}

impl Iterator for Entries<'_> {
    type Item = Result<IndexEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.dict.len() {
            return None;
        }
        let idx = self.next;
        self.next += 1;
        let entry = self.dict.entry(idx).cloned();
        if entry.is_err() {
            // A failed read ends the walk.
            self.next = self.dict.len();
        }
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dict.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}
