//! # Article Record Decoding
//!
//! An article record is a run of typed segments stored in one of two layouts:
//!
//! ```text
//! Heterogeneous (no sametypesequence):
//!   [tag][payload][tag][payload]...
//!
//! Homogeneous (sametypesequence = "tm", for example):
//!   [payload of 't'][payload of 'm']     tags are implied by the ifo file
//! ```
//!
//! Text payloads are NUL-terminated; binary payloads carry a 4-byte
//! big-endian length prefix. In the homogeneous layout the final segment has
//! neither: it simply spans the rest of the record.

use log::trace;

use crate::stardict::types::error::{Result, StardictError};
use crate::stardict::types::models::{is_searchable_tag, Article, Segment, SegmentKind};
use crate::stardict::utils;

/// Decodes a raw record, choosing the layout from the dictionary's sequence.
pub fn decode(raw: &[u8], same_type_sequence: Option<&str>) -> Result<Article> {
    match same_type_sequence {
        Some(sequence) if !sequence.is_empty() => decode_homogeneous(raw, sequence.as_bytes()),
        _ => decode_heterogeneous(raw),
    }
}

/// Re-inserts the implied tags of a `sametypesequence` record.
pub fn decode_homogeneous(raw: &[u8], sequence: &[u8]) -> Result<Article> {
    let Some((&last_tag, leading)) = sequence.split_last() else {
        return decode_heterogeneous(raw);
    };
    let mut reader = raw;
    let mut segments = Vec::with_capacity(sequence.len());

    for &tag in leading {
        segments.push(read_segment(&mut reader, tag)?);
    }

    let last = match SegmentKind::of(last_tag) {
        SegmentKind::Text => {
            let end = reader.iter().position(|&b| b == 0).unwrap_or(reader.len());
            Segment::Text { tag: last_tag, text: utils::decode_text(&reader[..end]) }
        }
        SegmentKind::Binary => Segment::Binary { tag: last_tag, data: reader.to_vec() },
    };
    segments.push(last);

    trace!("Decoded homogeneous record: {} bytes, {} segments", raw.len(), segments.len());
    Ok(Article { segments })
}

/// Decodes a record whose segments each start with their own tag byte.
pub fn decode_heterogeneous(raw: &[u8]) -> Result<Article> {
    let mut reader = raw;
    let mut segments = Vec::new();
    while let Some((&tag, rest)) = reader.split_first() {
        reader = rest;
        segments.push(read_segment(&mut reader, tag)?);
    }
    trace!("Decoded tagged record: {} bytes, {} segments", raw.len(), segments.len());
    Ok(Article { segments })
}

/// Reads one self-delimiting segment payload of type `tag`.
fn read_segment(reader: &mut &[u8], tag: u8) -> Result<Segment> {
    match SegmentKind::of(tag) {
        SegmentKind::Text => {
            let text = utils::read_cstr(reader)?;
            Ok(Segment::Text { tag, text: utils::decode_text(text) })
        }
        SegmentKind::Binary => {
            let len = utils::read_be_u32(reader)? as usize;
            if reader.len() < len {
                return Err(StardictError::Corrupt(format!(
                    "Segment '{}' declares {} bytes but only {} remain",
                    tag as char,
                    len,
                    reader.len()
                )));
            }
            let (data, rest) = reader.split_at(len);
            *reader = rest;
            Ok(Segment::Binary { tag, data: data.to_vec() })
        }
    }
}

/// True when every needle occurs in at least one searchable text segment.
pub fn contains_all(article: &Article, needles: &[String]) -> bool {
    needles.iter().all(|needle| {
        article.segments.iter().any(|segment| match segment {
            Segment::Text { tag, text } if is_searchable_tag(*tag) => {
                text.contains(needle.as_str())
            }
            _ => false,
        })
    })
}
