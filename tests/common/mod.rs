#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::{Compress, Compression, Crc, FlushCompress};
use stardict_reader::stardict_strcmp;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a complete StarDict dictionary into a directory.
pub struct DictBuilder {
    name: String,
    bookname: String,
    entries: Vec<(String, Vec<u8>)>,
    synonyms: Vec<(String, String)>,
    same_type_sequence: Option<String>,
    gzip_index: bool,
    dictzip_chunk: Option<usize>,
}

impl DictBuilder {
    pub fn new(name: &str, bookname: &str) -> Self {
        Self {
            name: name.to_string(),
            bookname: bookname.to_string(),
            entries: Vec::new(),
            synonyms: Vec::new(),
            same_type_sequence: None,
            gzip_index: false,
            dictzip_chunk: None,
        }
    }

    /// Adds an entry whose article bytes are stored verbatim.
    pub fn entry(mut self, word: &str, article: &[u8]) -> Self {
        self.entries.push((word.to_string(), article.to_vec()));
        self
    }

    /// Adds several `m`-only articles; pair with `same_type_sequence("m")`.
    pub fn words(mut self, words: &[(&str, &str)]) -> Self {
        for (word, meaning) in words {
            self.entries.push((word.to_string(), meaning.as_bytes().to_vec()));
        }
        self
    }

    pub fn same_type_sequence(mut self, sequence: &str) -> Self {
        self.same_type_sequence = Some(sequence.to_string());
        self
    }

    pub fn synonym(mut self, alternate: &str, target: &str) -> Self {
        self.synonyms.push((alternate.to_string(), target.to_string()));
        self
    }

    pub fn gzip_index(mut self) -> Self {
        self.gzip_index = true;
        self
    }

    pub fn dictzip(mut self, chunk_len: usize) -> Self {
        self.dictzip_chunk = Some(chunk_len);
        self
    }

    /// Writes every file and returns the `.ifo` path.
    pub fn write(mut self, dir: &Path) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        self.entries.sort_by(|a, b| stardict_strcmp(&a.0, &b.0));

        let mut dict = Vec::new();
        let mut idx = Vec::new();
        for (word, article) in &self.entries {
            idx.extend_from_slice(word.as_bytes());
            idx.push(0);
            idx.extend_from_slice(&(dict.len() as u32).to_be_bytes());
            idx.extend_from_slice(&(article.len() as u32).to_be_bytes());
            dict.extend_from_slice(article);
        }

        let base = dir.join(&self.name);
        let path = |ext: &str| PathBuf::from(format!("{}.{}", base.display(), ext));

        if self.gzip_index {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&idx).unwrap();
            fs::write(path("idx.gz"), encoder.finish().unwrap()).unwrap();
        } else {
            fs::write(path("idx"), &idx).unwrap();
        }

        match self.dictzip_chunk {
            Some(chunk_len) => fs::write(path("dict.dz"), dictzip(&dict, chunk_len)).unwrap(),
            None => fs::write(path("dict"), &dict).unwrap(),
        }

        let mut syn_count = 0;
        if !self.synonyms.is_empty() {
            let mut syn = Vec::new();
            for (alternate, target) in &self.synonyms {
                let pos = self
                    .entries
                    .iter()
                    .position(|(word, _)| word == target)
                    .expect("synonym target must be an entry");
                syn.extend_from_slice(alternate.as_bytes());
                syn.push(0);
                syn.extend_from_slice(&(pos as u32).to_be_bytes());
                syn_count += 1;
            }
            fs::write(path("syn"), syn).unwrap();
        }

        let mut ifo = String::from("StarDict's dict ifo file\nversion=2.4.2\n");
        ifo.push_str(&format!("wordcount={}\n", self.entries.len()));
        ifo.push_str(&format!("idxfilesize={}\n", idx.len()));
        ifo.push_str(&format!("bookname={}\n", self.bookname));
        if syn_count > 0 {
            ifo.push_str(&format!("synwordcount={}\n", syn_count));
        }
        if let Some(sequence) = &self.same_type_sequence {
            ifo.push_str(&format!("sametypesequence={}\n", sequence));
        }
        let ifo_path = path("ifo");
        fs::write(&ifo_path, ifo).unwrap();
        ifo_path
    }
}

/// Builds a dictzip file: gzip with an `RA` extra field and independently
/// flushed raw deflate chunks.
pub fn dictzip(data: &[u8], chunk_len: usize) -> Vec<u8> {
    let mut chunks = Vec::new();
    for piece in data.chunks(chunk_len) {
        let mut compress = Compress::new(Compression::default(), false);
        let mut out = Vec::with_capacity(piece.len() + 64);
        loop {
            let consumed = compress.total_in() as usize;
            compress
                .compress_vec(&piece[consumed..], &mut out, FlushCompress::Full)
                .unwrap();
            if compress.total_in() as usize == piece.len() && out.len() < out.capacity() {
                break;
            }
            out.reserve(64);
        }
        chunks.push(out);
    }

    let mut ra = Vec::new();
    ra.extend_from_slice(&1u16.to_le_bytes());
    ra.extend_from_slice(&(chunk_len as u16).to_le_bytes());
    ra.extend_from_slice(&(chunks.len() as u16).to_le_bytes());
    for chunk in &chunks {
        ra.extend_from_slice(&(chunk.len() as u16).to_le_bytes());
    }

    let mut out = vec![0x1f, 0x8b, 8, 0x04 | 0x08, 0, 0, 0, 0, 0, 3];
    out.extend_from_slice(&((ra.len() + 4) as u16).to_le_bytes());
    out.extend_from_slice(b"RA");
    out.extend_from_slice(&(ra.len() as u16).to_le_bytes());
    out.extend_from_slice(&ra);
    out.extend_from_slice(b"words.dict\0");
    for chunk in &chunks {
        out.extend_from_slice(chunk);
    }

    let mut crc = Crc::new();
    crc.update(data);
    out.extend_from_slice(&crc.sum().to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out
}

/// Opens a fresh temp directory.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Library configuration keeping offset caches inside `dir`.
pub fn config_in(dir: &Path) -> stardict_reader::LibraryConfig {
    stardict_reader::LibraryConfig {
        cache_dir: Some(dir.join("cache")),
        ..Default::default()
    }
}
