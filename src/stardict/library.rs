//! # Dictionary Sets
//!
//! [`LibrarySet`] owns every loaded [`Dictionary`] and answers queries across
//! all of them: exact and inflection-tolerant lookup, fuzzy, pattern and
//! full-text search, and ordered navigation over the merged headword lists.
//!
//! ## Navigation cursors
//!
//! A cursor holds one position per dictionary. Walking forward always yields
//! the smallest current headword across dictionaries and advances every
//! dictionary sitting on that same headword, so shared headwords appear once.
//! Positions equal to [`INVALID_INDEX`] mark dictionaries that have been
//! walked past their end.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::config::LibraryConfig;
use super::dictionary::Dictionary;
use super::discovery;
use super::query::{analyze_query, Query};
use super::search::{data, fuzzy::FuzzyCollector, rule, similar};
use super::types::error::{Result, StardictError};
use super::types::models::{SearchResult, INVALID_INDEX};
use super::utils::stardict_strcmp;

/// Converts a cursor position into an entry index if it names a real entry.
fn entry_at(pos: i64, len: usize) -> Option<usize> {
    if pos >= 0 && (pos as usize) < len {
        Some(pos as usize)
    } else {
        None
    }
}

/// All dictionaries of one lookup session, in priority order.
#[derive(Debug, Default)]
pub struct LibrarySet {
    dicts: Vec<Dictionary>,
    config: LibraryConfig,
}

impl LibrarySet {
    pub fn new(config: LibraryConfig) -> Self {
        Self { dicts: Vec::new(), config }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Loads dictionaries from `order_list` and from every `.ifo` file below
    /// `dict_dirs`.
    ///
    /// Ordered dictionaries keep their list order and come first; the rest
    /// are sorted by ifo path. Paths in `disable_list` are never loaded, and
    /// a dictionary that fails to load is logged and skipped.
    pub fn load(
        &mut self,
        dict_dirs: &[PathBuf],
        order_list: &[PathBuf],
        disable_list: &[PathBuf],
    ) {
        let start = self.dicts.len();
        let mut ordered = 0;
        for path in order_list {
            if disable_list.contains(path) {
                debug!("Skipping disabled dictionary {}", path.display());
                continue;
            }
            if self.load_dict(path) {
                ordered += 1;
            }
        }

        for dir in dict_dirs {
            for path in discovery::find_ifo_files(dir) {
                if order_list.contains(&path) || disable_list.contains(&path) {
                    continue;
                }
                self.load_dict(&path);
            }
        }

        self.dicts[start + ordered..]
            .sort_by(|a, b| a.ifo_path().as_os_str().cmp(b.ifo_path().as_os_str()));
        info!("Library holds {} dictionaries ({} ordered)", self.dicts.len(), ordered);
    }

    /// Loads one dictionary and appends it. Returns false if it failed.
    pub fn load_dict(&mut self, ifo_path: &Path) -> bool {
        match Dictionary::load(ifo_path, &self.config) {
            Ok(dict) => {
                self.dicts.push(dict);
                true
            }
            Err(e) => {
                warn!("Skipping dictionary {}: {}", ifo_path.display(), e);
                false
            }
        }
    }

    /// Number of loaded dictionaries.
    pub fn len(&self) -> usize {
        self.dicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dicts.is_empty()
    }

    pub fn dicts(&self) -> &[Dictionary] {
        &self.dicts
    }

    pub fn dict(&self, i: usize) -> Option<&Dictionary> {
        self.dicts.get(i)
    }

    pub fn dict_mut(&mut self, i: usize) -> Option<&mut Dictionary> {
        self.dicts.get_mut(i)
    }

    fn checked_dict(&mut self, i: usize) -> Result<&mut Dictionary> {
        let len = self.dicts.len();
        self.dicts
            .get_mut(i)
            .ok_or(StardictError::IndexOutOfRange { index: i, len })
    }

    /// A fresh navigation cursor positioned at the start of every dictionary.
    pub fn new_cursor(&self) -> Vec<i64> {
        vec![0; self.dicts.len()]
    }

    // --- Navigation ---

    /// Smallest headword under the cursor, across all dictionaries.
    pub fn current_word(&mut self, cursor: &[i64]) -> Result<Option<String>> {
        let mut best: Option<String> = None;
        for (dict, &pos) in self.dicts.iter_mut().zip(cursor) {
            let Some(idx) = entry_at(pos, dict.len()) else {
                continue;
            };
            let key = dict.key(idx)?;
            if best.as_deref().map_or(true, |b| stardict_strcmp(b, key) == Ordering::Greater) {
                best = Some(key.to_string());
            }
        }
        Ok(best)
    }

    /// Advances past the smallest current headword and returns the new
    /// current headword.
    ///
    /// When `word` is given every position is first reset to where `word`
    /// is, or would be, in its dictionary.
    pub fn next_word(&mut self, word: Option<&str>, cursor: &mut [i64]) -> Result<Option<String>> {
        let mut best: Option<(usize, String)> = None;
        for (i, (dict, pos)) in self.dicts.iter_mut().zip(cursor.iter_mut()).enumerate() {
            if let Some(word) = word {
                *pos = dict.lookup(word, false)?.1;
            }
            let Some(idx) = entry_at(*pos, dict.len()) else {
                continue;
            };
            let key = dict.key(idx)?;
            if best.as_ref().map_or(true, |(_, b)| stardict_strcmp(b, key) == Ordering::Greater) {
                best = Some((i, key.to_string()));
            }
        }

        let Some((winner, word)) = best else {
            return Ok(None);
        };
        for (i, (dict, pos)) in self.dicts.iter_mut().zip(cursor.iter_mut()).enumerate() {
            if i == winner {
                *pos += 1;
                continue;
            }
            let Some(idx) = entry_at(*pos, dict.len()) else {
                continue;
            };
            if dict.key(idx)? == word {
                *pos += 1;
            }
        }
        self.current_word(cursor)
    }

    /// Steps back to the largest headword before the cursor and returns it.
    pub fn prev_word(&mut self, cursor: &mut [i64]) -> Result<Option<String>> {
        let mut best: Option<(usize, String)> = None;
        for (i, (dict, pos)) in self.dicts.iter_mut().zip(cursor.iter_mut()).enumerate() {
            let len = dict.len() as i64;
            if *pos == INVALID_INDEX {
                *pos = len;
            }
            if *pos > len || *pos <= 0 {
                continue;
            }
            let key = dict.key((*pos - 1) as usize)?;
            if best.as_ref().map_or(true, |(_, b)| stardict_strcmp(b, key) == Ordering::Less) {
                best = Some((i, key.to_string()));
            }
        }

        let Some((winner, word)) = best else {
            return Ok(None);
        };
        for (i, (dict, pos)) in self.dicts.iter_mut().zip(cursor.iter_mut()).enumerate() {
            if i == winner {
                *pos -= 1;
                continue;
            }
            let len = dict.len() as i64;
            if *pos > len || *pos <= 0 {
                continue;
            }
            if dict.key((*pos - 1) as usize)? == word {
                *pos -= 1;
            } else if *pos == len {
                *pos = INVALID_INDEX;
            }
        }
        Ok(Some(word))
    }

    /// Headwords around `word` for completion lists.
    ///
    /// Positions just after `word`, steps back `2 - offset` times and then
    /// collects up to `length` following headwords.
    pub fn neighbours(&mut self, word: &str, offset: i32, length: usize) -> Result<Vec<String>> {
        let mut out = Vec::new();
        if word.is_empty() {
            return Ok(out);
        }
        let mut cursor = self.new_cursor();
        self.next_word(Some(word), &mut cursor)?;
        let mut offset = offset;
        loop {
            offset += 1;
            if offset > 2 || self.prev_word(&mut cursor)?.is_none() {
                break;
            }
        }
        while out.len() < length {
            match self.next_word(None, &mut cursor)? {
                Some(next) => out.push(next),
                None => break,
            }
        }
        Ok(out)
    }

    // --- Lookup ---

    /// Exact lookup of `word` in dictionary `dict`, retried with inflection
    /// stripping when fuzzy fallback is enabled.
    pub fn simple_lookup_word(&mut self, word: &str, dict: usize) -> Result<Option<usize>> {
        let (found, idx) = self.checked_dict(dict)?.lookup(word, false)?;
        if found {
            return Ok(Some(idx as usize));
        }
        if self.config.fuzzy_fallback {
            return self.similar_word(word, dict);
        }
        Ok(None)
    }

    /// Case-insensitive lookup of `word` and its likely base forms.
    pub fn similar_word(&mut self, word: &str, dict: usize) -> Result<Option<usize>> {
        let dict = self.checked_dict(dict)?;
        let (found, idx) = dict.lookup(word, true)?;
        if found {
            return Ok(Some(idx as usize));
        }
        for candidate in similar::candidates(word) {
            let (found, idx) = dict.lookup(&candidate, true)?;
            if found {
                debug!("'{}' matched as '{}'", word, candidate);
                return Ok(Some(idx as usize));
            }
        }
        Ok(None)
    }

    /// Up to `max_results` headwords within the configured edit distance of
    /// `word`, closest first.
    pub fn fuzzy_lookup(&mut self, word: &str, max_results: usize) -> Result<Vec<String>> {
        if word.is_empty() {
            return Ok(Vec::new());
        }
        let mut collector = FuzzyCollector::new(word, max_results, self.config.max_fuzzy_distance);
        for dict in &mut self.dicts {
            for idx in 0..dict.len() {
                collector.offer(dict.key(idx)?);
            }
        }
        Ok(collector.finish().into_iter().map(|(word, _)| word).collect())
    }

    /// Distinct headwords matching `pattern` in full, in headword order.
    ///
    /// An invalid pattern matches nothing.
    pub fn regex_lookup(&mut self, pattern: &str) -> Result<Vec<String>> {
        let Some(regex) = rule::compile(pattern) else {
            return Ok(Vec::new());
        };
        let per_dict = self.config.max_matches_per_dict;
        let mut matches = Vec::new();
        for dict in &mut self.dicts {
            let mut hits = 0;
            for idx in 0..dict.len() {
                if hits >= per_dict {
                    break;
                }
                let key = dict.key(idx)?;
                if regex.is_match(key) {
                    matches.push(key.to_string());
                    hits += 1;
                }
            }
        }
        matches.sort_by(|a, b| stardict_strcmp(a, b));
        matches.dedup();
        Ok(matches)
    }

    /// Headwords whose articles contain every space-separated term of
    /// `query`, one list per dictionary.
    pub fn data_lookup(&mut self, query: &str) -> Result<Vec<Vec<String>>> {
        let needles = data::split_query(query);
        let mut results = Vec::with_capacity(self.dicts.len());
        for dict in &mut self.dicts {
            let mut hits = Vec::new();
            if !needles.is_empty() && dict.contains_search_data() {
                for idx in 0..dict.len() {
                    let (offset, size) = {
                        let entry = dict.entry(idx)?;
                        (entry.offset, entry.size)
                    };
                    if dict.search_data(&needles, offset, size)? {
                        hits.push(dict.key(idx)?.to_string());
                    }
                }
            }
            results.push(hits);
        }
        Ok(results)
    }

    /// Answers a user query across every dictionary.
    ///
    /// The query dialect is described by [`analyze_query`]. Every matched
    /// headword is resolved in each dictionary in turn, so one headword may
    /// produce several results.
    pub fn lookup(&mut self, input: &str) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        if input.is_empty() {
            return Ok(results);
        }
        let limit = self.config.fuzzy_result_limit;

        match analyze_query(input) {
            Query::Simple(word) => {
                self.resolve(&word, &mut results)?;
                if results.is_empty() && self.config.fuzzy_fallback {
                    debug!("No exact match for '{}', trying fuzzy search", input);
                    for word in self.fuzzy_lookup(input, limit)? {
                        self.resolve(&word, &mut results)?;
                    }
                }
            }
            Query::Fuzzy(word) => {
                for word in self.fuzzy_lookup(&word, limit)? {
                    self.resolve(&word, &mut results)?;
                }
            }
            Query::Regex(pattern) => {
                for word in self.regex_lookup(&pattern)? {
                    self.resolve(&word, &mut results)?;
                }
            }
            Query::Data(query) => {
                for word in self.data_lookup(&query)?.into_iter().flatten() {
                    self.resolve(&word, &mut results)?;
                }
            }
        }
        Ok(results)
    }

    /// Appends one result per dictionary in which `word` resolves.
    fn resolve(&mut self, word: &str, results: &mut Vec<SearchResult>) -> Result<()> {
        for i in 0..self.dicts.len() {
            let Some(idx) = self.simple_lookup_word(word, i)? else {
                continue;
            };
            let dict = &mut self.dicts[i];
            let headword = dict.key(idx)?.to_string();
            let article = dict.get_article(idx)?;
            results.push(SearchResult {
                bookname: dict.bookname().to_string(),
                word: headword,
                article,
            });
        }
        Ok(())
    }
}
