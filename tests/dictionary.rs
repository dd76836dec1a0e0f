mod common;

use common::{config_in, tempdir, DictBuilder};
use stardict_reader::stardict::format::index::offset_cache;
use stardict_reader::{stardict_strcmp, Dictionary, Segment, StardictError, INVALID_INDEX};
use std::cmp::Ordering;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const FRUIT: &[(&str, &str)] = &[
    ("apple", "a round fruit"),
    ("banana", "a long yellow fruit"),
    ("cherry", "a small red fruit"),
];

fn fruit_dict(dir: &Path) -> PathBuf {
    DictBuilder::new("fruit", "Fruit").same_type_sequence("m").words(FRUIT).write(dir)
}

fn many_words(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| (format!("Word{:03}", i), format!("definition number {}", i)))
        .collect()
}

fn build_many(dir: &Path, name: &str, count: usize, gzip: bool, dictzip: bool) -> Dictionary {
    let words = many_words(count);
    let pairs: Vec<(&str, &str)> = words.iter().map(|(w, m)| (w.as_str(), m.as_str())).collect();
    let mut builder = DictBuilder::new(name, name).same_type_sequence("m").words(&pairs);
    if gzip {
        builder = builder.gzip_index();
    }
    if dictzip {
        builder = builder.dictzip(97);
    }
    let ifo = builder.write(dir);
    Dictionary::load(&ifo, &config_in(dir)).unwrap()
}

#[test]
fn three_entry_lookup_scenario() {
    let dir = tempdir();
    let ifo = fruit_dict(dir.path());
    let mut dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();

    assert_eq!(dict.bookname(), "Fruit");
    assert_eq!(dict.len(), 3);
    assert_eq!(dict.lookup("banana", false).unwrap(), (true, 1));
    assert_eq!(dict.lookup("berry", false).unwrap(), (false, 2));
    assert_eq!(dict.lookup("aardvark", false).unwrap(), (false, 0));
    assert_eq!(dict.lookup("zebra", false).unwrap(), (false, INVALID_INDEX));

    assert!(!dict.lookup("BANANA", false).unwrap().0);
    assert_eq!(dict.lookup("BANANA", true).unwrap(), (true, 1));
}

#[test]
fn index_keys_follow_stardict_order() {
    let dir = tempdir();
    let ifo = DictBuilder::new("mixed", "Mixed")
        .same_type_sequence("m")
        .words(&[
            ("b", "x"),
            ("Apple", "x"),
            ("apple", "x"),
            ("APPLE", "x"),
            ("ab", "x"),
            ("A", "x"),
        ])
        .write(dir.path());
    let mut dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();

    let keys: Vec<String> = dict.entries().map(|e| e.unwrap().key).collect();
    assert_eq!(keys, vec!["A", "ab", "APPLE", "Apple", "apple", "b"]);
    for pair in keys.windows(2) {
        assert_eq!(stardict_strcmp(&pair[0], &pair[1]), Ordering::Less);
    }
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(dict.lookup(key, false).unwrap(), (true, i as i64));
    }
}

#[test]
fn articles_decode_through_sametypesequence() {
    let dir = tempdir();
    let ifo = fruit_dict(dir.path());
    let mut dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();

    let article = dict.get_article(2).unwrap();
    assert_eq!(
        article.segments,
        vec![Segment::Text { tag: b'm', text: "a small red fruit".to_string() }]
    );
    assert_eq!(article.plain_text(), "a small red fruit");
}

#[test]
fn tagged_records_and_binary_segments() {
    let dir = tempdir();
    let mut record = b"t/wet/\0mdamp\0W".to_vec();
    record.extend_from_slice(&3u32.to_be_bytes());
    record.extend_from_slice(&[1, 2, 3]);
    let ifo = DictBuilder::new("mixed", "Mixed").entry("moist", &record).write(dir.path());
    let mut dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();

    let article = dict.get_article(0).unwrap();
    assert_eq!(
        article.segments,
        vec![
            Segment::Text { tag: b't', text: "/wet/".to_string() },
            Segment::Text { tag: b'm', text: "damp".to_string() },
            Segment::Binary { tag: b'W', data: vec![1, 2, 3] },
        ]
    );
}

#[test]
fn corrupt_record_is_an_error() {
    let dir = tempdir();
    let mut record = b"W".to_vec();
    record.extend_from_slice(&1000u32.to_be_bytes());
    let ifo = DictBuilder::new("broken", "Broken").entry("bad", &record).write(dir.path());
    let mut dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();

    assert!(matches!(dict.get_article(0), Err(StardictError::Corrupt(_))));
    assert!(matches!(dict.get_article(1), Err(StardictError::IndexOutOfRange { .. })));
}

#[test]
fn article_cache_returns_shared_articles() {
    let dir = tempdir();
    let mut dict = build_many(dir.path(), "many", 20, false, false);

    let first = dict.get_article(0).unwrap();
    let again = dict.get_article(0).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &again));

    // Ten more loads overwrite every slot, including entry 0's.
    for i in 1..=10 {
        dict.get_article(i).unwrap();
    }
    let reloaded = dict.get_article(0).unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &reloaded));
    assert_eq!(first, reloaded);
}

#[test]
fn compressed_index_matches_plain_index() {
    let dir = tempdir();
    let mut plain = build_many(&dir.path().join("plain"), "plain", 150, false, false);
    let mut gzipped = build_many(&dir.path().join("gz"), "gz", 150, true, false);

    assert_eq!(plain.len(), gzipped.len());
    for query in ["Word000", "word077", "Word149", "Word0775", "Aardvark", "zzz", "WORD100"] {
        for ignore_case in [false, true] {
            assert_eq!(
                plain.lookup(query, ignore_case).unwrap(),
                gzipped.lookup(query, ignore_case).unwrap(),
                "{} ignore_case={}",
                query,
                ignore_case
            );
        }
    }
    for i in [0, 31, 32, 33, 149] {
        assert_eq!(plain.entry(i).unwrap(), gzipped.entry(i).unwrap());
    }
}

#[test]
fn dictzip_articles_match_plain_articles() {
    let dir = tempdir();
    let mut plain = build_many(&dir.path().join("plain"), "plain", 60, false, false);
    let mut zipped = build_many(&dir.path().join("dz"), "dz", 60, false, true);
    assert!(dir.path().join("dz/dz.dict.dz").is_file());

    // Read out of order so chunks are revisited.
    for i in [0, 59, 1, 30, 31, 2, 58] {
        assert_eq!(plain.get_article(i).unwrap(), zipped.get_article(i).unwrap(), "entry {}", i);
    }
    let entry = plain.entry(10).unwrap().clone();
    assert_eq!(
        plain.read_raw(entry.offset, entry.size).unwrap(),
        zipped.read_raw(entry.offset, entry.size).unwrap()
    );
}

#[test]
fn offset_cache_is_written_and_reused() {
    let dir = tempdir();
    let idx = dir.path().join("many.idx");
    let oft = dir.path().join("many.idx.oft");

    let mut first = build_many(dir.path(), "many", 100, false, false);
    assert!(oft.is_file());
    let saved = fs::read(&oft).unwrap();
    assert!(saved.starts_with(offset_cache::CACHE_MAGIC.as_bytes()));
    let offsets = offset_cache::load(&idx, 5, None).unwrap();
    assert_eq!(offsets.len(), 5);
    assert_eq!(offsets[0], 0);

    let ifo = dir.path().join("many.ifo");
    let mut second = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();
    assert_eq!(fs::read(&oft).unwrap(), saved);
    for word in ["Word000", "Word050", "Word099"] {
        assert_eq!(first.lookup(word, false).unwrap(), second.lookup(word, false).unwrap());
    }
}

#[test]
fn corrupt_offset_cache_is_rebuilt() {
    let dir = tempdir();
    let oft = dir.path().join("many.idx.oft");
    let saved = {
        let _dict = build_many(dir.path(), "many", 70, false, false);
        fs::read(&oft).unwrap()
    };

    fs::write(&oft, b"StarDict's Cache, Version: 0.1 garbage").unwrap();
    let ifo = dir.path().join("many.ifo");
    let mut dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();
    assert_eq!(dict.lookup("Word065", false).unwrap(), (true, 65));
    assert_eq!(fs::read(&oft).unwrap(), saved);
}

fn set_mtime(path: &Path, time: SystemTime) {
    File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

#[test]
fn stale_offset_cache_is_rebuilt() {
    let dir = tempdir();
    let idx = dir.path().join("many.idx");
    let oft = dir.path().join("many.idx.oft");
    drop(build_many(dir.path(), "many", 100, false, false));
    let saved = fs::read(&oft).unwrap();

    // Same word count with longer headwords, so every page offset moves.
    let words: Vec<String> = (0..100).map(|i| format!("LongerWord{:03}", i)).collect();
    let pairs: Vec<(&str, &str)> = words.iter().map(|w| (w.as_str(), "meaning")).collect();
    let ifo = DictBuilder::new("many", "many")
        .same_type_sequence("m")
        .words(&pairs)
        .write(dir.path());
    set_mtime(&oft, SystemTime::UNIX_EPOCH + Duration::from_secs(86_400));

    let mut dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();
    assert_eq!(dict.lookup("LongerWord035", false).unwrap(), (true, 35));
    assert_eq!(dict.lookup("LongerWord099", false).unwrap(), (true, 99));
    assert_eq!(dict.key(64).unwrap(), "LongerWord064");

    let rebuilt = fs::read(&oft).unwrap();
    assert_ne!(rebuilt, saved);
    let offsets = offset_cache::load(&idx, 5, None).unwrap();
    assert_eq!(rebuilt, offset_cache::encode(&offsets));
}

#[test]
fn offset_cache_falls_back_to_cache_dir() {
    let dir = tempdir();
    let sibling = dir.path().join("many.idx.oft");
    let cached = dir.path().join("cache").join("many.idx.oft");
    // A directory in the sibling's place makes it unwritable even for root.
    fs::create_dir(&sibling).unwrap();

    let mut first = build_many(dir.path(), "many", 100, false, false);
    assert!(sibling.is_dir());
    assert!(cached.is_file());
    let saved = fs::read(&cached).unwrap();

    // A reload that rewrote the cache would reset this timestamp.
    let future = SystemTime::now() + Duration::from_secs(3600);
    set_mtime(&cached, future);

    let ifo = dir.path().join("many.ifo");
    let mut second = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();
    let modified = fs::metadata(&cached).unwrap().modified().unwrap();
    assert!(modified > SystemTime::now() + Duration::from_secs(1800));
    assert_eq!(fs::read(&cached).unwrap(), saved);
    for word in ["Word000", "Word031", "Word032", "Word099"] {
        assert_eq!(first.lookup(word, false).unwrap(), second.lookup(word, false).unwrap());
    }
    assert_eq!(second.lookup("Word063", false).unwrap(), (true, 63));
}

#[test]
fn synonyms_resolve_to_their_targets() {
    let dir = tempdir();
    let ifo = DictBuilder::new("fruit", "Fruit")
        .same_type_sequence("m")
        .words(FRUIT)
        .synonym("Malus", "apple")
        .synonym("plantain", "banana")
        .write(dir.path());
    let mut dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();

    assert_eq!(dict.info().syn_word_count, 2);
    assert_eq!(dict.lookup("Malus", false).unwrap(), (true, 0));
    assert_eq!(dict.lookup("plantain", false).unwrap(), (true, 1));
    assert_eq!(dict.key(1).unwrap(), "banana");
}

#[test]
fn data_search_requires_every_term() {
    let dir = tempdir();
    let ifo = DictBuilder::new("fruit", "Fruit")
        .same_type_sequence("m")
        .words(&[
            ("apple", "the apple is a fruit"),
            ("pear", "a fruit shaped like a bell"),
            ("pie", "apple baked in pastry"),
        ])
        .write(dir.path());
    let mut dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();
    assert!(dict.contains_search_data());

    let needles = vec!["fruit".to_string(), "apple".to_string()];
    let hits: Vec<String> = (0..dict.len())
        .filter_map(|i| {
            let entry = dict.entry(i).unwrap().clone();
            dict.search_data(&needles, entry.offset, entry.size)
                .unwrap()
                .then_some(entry.key)
        })
        .collect();
    assert_eq!(hits, vec!["apple"]);
}

#[test]
fn binary_only_dictionaries_have_no_search_data() {
    let dir = tempdir();
    let ifo = DictBuilder::new("sounds", "Sounds")
        .same_type_sequence("W")
        .entry("bell", &[1, 2, 3])
        .write(dir.path());
    let dict = Dictionary::load(&ifo, &config_in(dir.path())).unwrap();
    assert!(!dict.contains_search_data());
}

#[test]
fn missing_files_fail_to_load() {
    let dir = tempdir();
    let ifo = fruit_dict(dir.path());
    fs::remove_file(dir.path().join("fruit.dict")).unwrap();
    assert!(matches!(
        Dictionary::load(&ifo, &config_in(dir.path())),
        Err(StardictError::Io(_))
    ));

    let bad = dir.path().join("bad.ifo");
    fs::write(&bad, "StarDict's dict ifo file\nwordcount=3\nbookname=Bad\n").unwrap();
    assert!(matches!(
        Dictionary::load(&bad, &config_in(dir.path())),
        Err(StardictError::MissingKey("idxfilesize"))
    ));
}
