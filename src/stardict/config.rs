//! Tunables for loading and searching a set of dictionaries.

use std::path::PathBuf;

/// Default number of edits a fuzzy match may be away from the query, exclusive.
pub const MAX_FUZZY_DISTANCE: usize = 3;

/// Default number of headwords a fuzzy search returns.
pub const FUZZY_RESULT_LIMIT: usize = 10;

/// Default cap on regex matches collected from a single dictionary.
pub const MAX_MATCH_ITEM_PER_LIB: usize = 100;

/// Configuration shared by every dictionary of a [`LibrarySet`](crate::LibrarySet).
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Retry failed exact lookups with morphological heuristics, and fall
    /// back to fuzzy search when a simple query finds nothing.
    pub fuzzy_fallback: bool,
    /// Exclusive upper bound on the edit distance of a fuzzy match.
    pub max_fuzzy_distance: usize,
    /// Capacity of the fuzzy top-N set used by [`LibrarySet::lookup`](crate::LibrarySet::lookup).
    pub fuzzy_result_limit: usize,
    /// Cap on regex matches per dictionary.
    pub max_matches_per_dict: usize,
    /// Directory used for offset-cache files when the index directory is
    /// not writable. `None` selects the platform user cache directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            fuzzy_fallback: true,
            max_fuzzy_distance: MAX_FUZZY_DISTANCE,
            fuzzy_result_limit: FUZZY_RESULT_LIMIT,
            max_matches_per_dict: MAX_MATCH_ITEM_PER_LIB,
            cache_dir: None,
        }
    }
}

impl LibraryConfig {
    /// Resolved fallback directory for offset-cache files.
    pub fn offset_cache_dir(&self) -> Option<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Some(dir.clone()),
            None => dirs::cache_dir().map(|dir| dir.join("stardict")),
        }
    }
}
