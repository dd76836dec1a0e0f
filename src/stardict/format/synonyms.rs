//! `.syn` synonym table: alternate spellings pointing at index entries.
//!
//! Each record is a NUL-terminated alternate headword followed by the
//! big-endian position of its target entry in the `.idx` file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::stardict::types::error::Result;
use crate::stardict::utils;

#[derive(Debug, Default)]
pub struct SynonymTable {
    synonyms: HashMap<String, u32>,
}

impl SynonymTable {
    /// Loads up to `count` records from `path`.
    ///
    /// Records pointing past `word_count` are dropped with a warning.
    pub fn load(path: &Path, count: u32, word_count: u32) -> Result<Self> {
        let data = fs::read(path)?;
        let table = Self::from_bytes(&data, count, word_count)?;
        debug!("Loaded {} synonyms from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_bytes(data: &[u8], count: u32, word_count: u32) -> Result<Self> {
        let mut reader = data;
        let mut synonyms = HashMap::with_capacity(count as usize);
        for _ in 0..count {
            let word = utils::read_cstr(&mut reader)?;
            let target = utils::read_be_u32(&mut reader)?;
            let word = utils::decode_text(word);
            if target >= word_count {
                warn!("Synonym '{}' points at entry {} of {}", word, target, word_count);
                continue;
            }
            synonyms.insert(word.to_ascii_lowercase(), target);
        }
        Ok(Self { synonyms })
    }

    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }

    /// Entry position for `word`, matched case-insensitively.
    pub fn lookup(&self, word: &str) -> Option<u32> {
        self.synonyms.get(&word.to_ascii_lowercase()).copied()
    }
}
