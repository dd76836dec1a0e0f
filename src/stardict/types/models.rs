//! Core data structures shared across the reader.
//!
//! This module defines the fundamental types used throughout the library:
//! - Dictionary metadata parsed from `.ifo` files
//! - Index entries and position sentinels
//! - Decoded article segments

use std::path::PathBuf;

/// Number of consecutive index entries that form one page of the on-disk index.
pub const ENTRIES_PER_PAGE: usize = 32;

/// Position sentinel meaning "past the last entry".
///
/// Returned by lookups for queries that sort after every headword, and used
/// by navigation cursors for dictionaries that have been walked off the end.
pub const INVALID_INDEX: i64 = -100;

/// Number of decoded articles kept per dictionary.
pub const ARTICLE_CACHE_SLOTS: usize = 10;

/// Metadata parsed from a dictionary's `.ifo` description file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictInfo {
    /// Path of the `.ifo` file this metadata was read from.
    pub ifo_path: PathBuf,
    pub bookname: String,
    pub word_count: u32,
    pub syn_word_count: u32,
    /// Byte size of the (uncompressed) index file.
    pub index_file_size: u32,
    /// Uniform segment-type sequence shared by every article, if declared.
    pub same_type_sequence: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// A single headword from the index with the location of its article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    /// Byte offset of the article in the data file.
    pub offset: u32,
    /// Byte size of the article in the data file.
    pub size: u32,
}

/// How a segment's payload is delimited on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// NUL-terminated text.
    Text,
    /// Payload preceded by a 4-byte big-endian length.
    Binary,
}

impl SegmentKind {
    /// Classifies a segment-type tag.
    ///
    /// `m t y l g x k` are text and `W P` are sized binary. Any other
    /// uppercase tag is binary, anything else is text.
    pub fn of(tag: u8) -> Self {
        match tag {
            b'm' | b't' | b'y' | b'l' | b'g' | b'x' | b'k' => SegmentKind::Text,
            b'W' | b'P' => SegmentKind::Binary,
            t if t.is_ascii_uppercase() => SegmentKind::Binary,
            _ => SegmentKind::Text,
        }
    }
}

/// Returns true for tags whose text takes part in full-text data search.
pub fn is_searchable_tag(tag: u8) -> bool {
    matches!(tag, b'm' | b't' | b'y' | b'l' | b'g' | b'x' | b'k')
}

/// One typed piece of an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text { tag: u8, text: String },
    Binary { tag: u8, data: Vec<u8> },
}

impl Segment {
    pub fn tag(&self) -> u8 {
        match self {
            Segment::Text { tag, .. } | Segment::Binary { tag, .. } => *tag,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text { text, .. } => Some(text),
            Segment::Binary { .. } => None,
        }
    }
}

/// A decoded article: the ordered list of its segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub segments: Vec<Segment>,
}

impl Article {
    /// Concatenates every text segment, skipping binary payloads.
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(Segment::as_text)
            .collect()
    }

    /// Re-encodes the article in the self-describing (per-segment tag) layout.
    pub fn to_tagged_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Text { tag, text } => {
                    out.push(*tag);
                    out.extend_from_slice(text.as_bytes());
                    out.push(0);
                }
                Segment::Binary { tag, data } => {
                    out.push(*tag);
                    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
                    out.extend_from_slice(data);
                }
            }
        }
        out
    }
}

/// One hit of a library-wide lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub bookname: String,
    pub word: String,
    pub article: std::sync::Arc<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_kind_follows_tag_case() {
        assert_eq!(SegmentKind::of(b'm'), SegmentKind::Text);
        assert_eq!(SegmentKind::of(b'h'), SegmentKind::Text);
        assert_eq!(SegmentKind::of(b'W'), SegmentKind::Binary);
        assert_eq!(SegmentKind::of(b'X'), SegmentKind::Binary);
    }

    #[test]
    fn plain_text_skips_binary_segments() {
        let article = Article {
            segments: vec![
                Segment::Text { tag: b't', text: "ˈæp(ə)l".into() },
                Segment::Binary { tag: b'W', data: vec![1, 2, 3] },
                Segment::Text { tag: b'm', text: "a fruit".into() },
            ],
        };
        assert_eq!(article.plain_text(), "ˈæp(ə)la fruit");
    }
}
