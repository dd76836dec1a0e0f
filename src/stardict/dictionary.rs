use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use super::codec::dictzip::DictZip;
use super::config::LibraryConfig;
use super::format::index::{self, IndexFile};
use super::format::synonyms::SynonymTable;
use super::format::{article, ifo};
use super::iter::Entries;
use super::types::error::{Result, StardictError};
use super::types::models::*;
use super::utils;

/// Where article bytes come from.
#[derive(Debug)]
enum ArticleSource {
    Plain(File),
    DictZip(DictZip),
}

impl ArticleSource {
    fn read(&mut self, offset: u32, size: u32) -> Result<Vec<u8>> {
        match self {
            ArticleSource::Plain(file) => {
                file.seek(SeekFrom::Start(offset as u64))?;
                let mut data = Vec::with_capacity(size as usize);
                file.by_ref().take(size as u64).read_to_end(&mut data)?;
                if data.len() != size as usize {
                    return Err(StardictError::SizeMismatch {
                        context: format!("article at offset {}", offset),
                        expected: size as u64,
                        found: data.len() as u64,
                    });
                }
                Ok(data)
            }
            ArticleSource::DictZip(dz) => dz.read(offset, size),
        }
    }
}

/// One loaded StarDict dictionary.
///
/// Owns the headword index, the optional synonym table, the article data
/// file and a small ring of recently decoded articles. Every read takes
/// `&mut self` since the index page and both caches are updated in place.
pub struct Dictionary {
    info: DictInfo,
    index: Box<dyn IndexFile>,
    synonyms: SynonymTable,
    source: ArticleSource,
    cache: [Option<(u32, Arc<Article>)>; ARTICLE_CACHE_SLOTS],
    cache_cursor: usize,
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("info", &self.info)
            .field("entries", &self.index.len())
            .field("synonyms", &self.synonyms.len())
            .finish()
    }
}

impl Dictionary {
    /// Loads the dictionary described by `ifo_path`.
    ///
    /// Sibling files are located by replacing the `ifo` extension:
    /// `dict.dz` is preferred over `dict`, `idx.gz` over `idx`, and a
    /// `syn` file is loaded when present.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The `.ifo` file is missing, malformed or lacks a required key
    /// - No article data file exists
    /// - The index does not match the sizes declared in the `.ifo` file
    pub fn load(ifo_path: impl AsRef<Path>, config: &LibraryConfig) -> Result<Self> {
        let ifo_path = ifo_path.as_ref();
        info!("Opening StarDict dictionary: {}", ifo_path.display());
        let info = ifo::load(ifo_path)?;

        let path_str = ifo_path.to_string_lossy();
        let base = path_str.strip_suffix("ifo").ok_or_else(|| {
            StardictError::InvalidFormat(format!("Not an .ifo path: {}", ifo_path.display()))
        })?;

        let dz_path = format!("{}dict.dz", base);
        let source = if Path::new(&dz_path).is_file() {
            ArticleSource::DictZip(DictZip::open(Path::new(&dz_path))?)
        } else {
            let dict_path = format!("{}dict", base);
            debug!("Using plain article file {}", dict_path);
            ArticleSource::Plain(File::open(&dict_path)?)
        };

        let cache_dir = config.offset_cache_dir();
        let index = index::open(base, info.word_count, info.index_file_size, cache_dir.as_deref())?;

        let syn_path = format!("{}syn", base);
        let synonyms = if Path::new(&syn_path).is_file() {
            SynonymTable::load(Path::new(&syn_path), info.syn_word_count, info.word_count)
                .unwrap_or_else(|e| {
                    warn!("Ignoring synonym file {}: {}", syn_path, e);
                    SynonymTable::default()
                })
        } else {
            SynonymTable::default()
        };

        info!(
            "Loaded '{}': {} headwords, {} synonyms",
            info.bookname,
            index.len(),
            synonyms.len()
        );
        Ok(Self {
            info,
            index,
            synonyms,
            source,
            cache: Default::default(),
            cache_cursor: 0,
        })
    }

    pub fn info(&self) -> &DictInfo {
        &self.info
    }

    pub fn bookname(&self) -> &str {
        &self.info.bookname
    }

    pub fn ifo_path(&self) -> &Path {
        &self.info.ifo_path
    }

    /// Number of headwords in the index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Headword of entry `idx`.
    pub fn key(&mut self, idx: usize) -> Result<&str> {
        self.index.key(idx)
    }

    /// Headword and article location of entry `idx`.
    pub fn entry(&mut self, idx: usize) -> Result<&IndexEntry> {
        self.index.entry(idx)
    }

    /// Finds `word`, consulting the synonym table before the index.
    ///
    /// Returns `(true, idx)` on a hit. On a miss the position is `0` when the
    /// word sorts before every headword, [`INVALID_INDEX`] when it sorts after
    /// every headword, and the insertion position otherwise.
    pub fn lookup(&mut self, word: &str, ignore_case: bool) -> Result<(bool, i64)> {
        if let Some(target) = self.synonyms.lookup(word) {
            debug!("'{}' resolved through synonym table to entry {}", word, target);
            return Ok((true, target as i64));
        }
        let cmp: utils::KeyCmp = if ignore_case {
            utils::ascii_casecmp
        } else {
            utils::stardict_strcmp
        };
        self.index.lookup(word, cmp)
    }

    /// Raw article bytes at `(offset, size)` in the data file.
    pub fn read_raw(&mut self, offset: u32, size: u32) -> Result<Vec<u8>> {
        self.source.read(offset, size)
    }

    /// Decoded article of entry `idx`, served from the ring cache when possible.
    pub fn get_article(&mut self, idx: usize) -> Result<Arc<Article>> {
        let (offset, size) = {
            let entry = self.index.entry(idx)?;
            (entry.offset, entry.size)
        };

        let cached = self
            .cache
            .iter()
            .flatten()
            .find(|(cached_offset, _)| *cached_offset == offset);
        if let Some((_, article)) = cached {
            return Ok(Arc::clone(article));
        }

        let raw = self.read_raw(offset, size)?;
        let article = Arc::new(article::decode(&raw, self.info.same_type_sequence.as_deref())?);

        // Slots are overwritten in load order.
        self.cache[self.cache_cursor] = Some((offset, Arc::clone(&article)));
        self.cache_cursor = (self.cache_cursor + 1) % ARTICLE_CACHE_SLOTS;
        Ok(article)
    }

    /// Whether data search applies to this dictionary at all.
    ///
    /// True when the segment sequence is not fixed or contains a searchable
    /// text tag.
    pub fn contains_search_data(&self) -> bool {
        match &self.info.same_type_sequence {
            None => true,
            Some(sequence) => sequence.bytes().any(is_searchable_tag),
        }
    }

    /// Whether every needle occurs in a searchable text segment of the
    /// record stored at `(offset, size)`.
    pub fn search_data(&mut self, needles: &[String], offset: u32, size: u32) -> Result<bool> {
        let raw = self.read_raw(offset, size)?;
        let article = article::decode(&raw, self.info.same_type_sequence.as_deref())?;
        Ok(article::contains_all(&article, needles))
    }

    /// Iterates over every index entry in order.
    pub fn entries(&mut self) -> Entries<'_> {
        Entries::new(self)
    }
}
