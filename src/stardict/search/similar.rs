//! Inflection stripping for English headwords.
//!
//! Produces the spellings an exact-lookup miss is retried with, in the order
//! they should be tried. Only pure-ASCII words are inflected.

fn is_vowel(c: u8) -> bool {
    matches!(c.to_ascii_uppercase(), b'A' | b'E' | b'I' | b'O' | b'U')
}

fn ends_with_ci(word: &[u8], suffix: &str) -> bool {
    word.len() >= suffix.len()
        && word[word.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

/// True when `stem` (the word minus its suffix) ends in a doubled consonant
/// preceded by a vowel, as in `stopp` or `runn`.
fn doubled_consonant(stem: &[u8]) -> bool {
    let n = stem.len();
    n >= 3 && stem[n - 1] == stem[n - 2] && !is_vowel(stem[n - 2]) && is_vowel(stem[n - 3])
}

fn owned(bytes: &[u8]) -> String {
    // Callers only slice pure-ASCII words.
    String::from_utf8_lossy(bytes).into_owned()
}

/// Candidate base forms of `word`, most likely first.
///
/// Rules, each applied only if the word is long enough:
/// - drop a trailing `s`, or the `d` of a trailing `ed`
/// - drop `ly`, undoing a doubled consonant first; `ily` also becomes `y`
/// - drop `ing`, undoing a doubled consonant first, then retry with `e`
/// - drop `es` after `s x o ch sh`
/// - drop `ed`, undoing a doubled consonant first
/// - `ied` and `ies` become `y`
/// - drop `er`, then `est`
pub fn candidates(word: &str) -> Vec<String> {
    if !word.is_ascii() {
        return Vec::new();
    }
    let w = word.as_bytes();
    let n = w.len();
    let mut out = Vec::new();

    if n > 1 && (w[n - 1].eq_ignore_ascii_case(&b's') || ends_with_ci(w, "ed")) {
        out.push(owned(&w[..n - 1]));
    }

    if n > 2 && ends_with_ci(w, "ly") {
        let stem = &w[..n - 2];
        if n > 5 && doubled_consonant(stem) {
            out.push(owned(&stem[..stem.len() - 1]));
        }
        out.push(owned(stem));
        if n > 4 && ends_with_ci(w, "ily") {
            out.push(format!("{}y", owned(&w[..n - 3])));
        }
    }

    if n > 3 && ends_with_ci(w, "ing") {
        let stem = &w[..n - 3];
        if n > 6 && doubled_consonant(stem) {
            out.push(owned(&stem[..stem.len() - 1]));
        }
        out.push(owned(stem));
        out.push(format!("{}e", owned(stem)));
    }

    if n > 3 && ends_with_ci(w, "es") {
        let before = w[n - 3].to_ascii_lowercase();
        let sibilant = matches!(before, b's' | b'x' | b'o')
            || (n > 4 && before == b'h' && matches!(w[n - 4].to_ascii_lowercase(), b'c' | b's'));
        if sibilant {
            out.push(owned(&w[..n - 2]));
        }
    }

    if n > 3 && ends_with_ci(w, "ed") {
        let stem = &w[..n - 2];
        if n > 5 && doubled_consonant(stem) {
            out.push(owned(&stem[..stem.len() - 1]));
        }
        out.push(owned(stem));
    }

    if n > 3 && ends_with_ci(w, "ied") {
        out.push(format!("{}y", owned(&w[..n - 3])));
    }
    if n > 3 && ends_with_ci(w, "ies") {
        out.push(format!("{}y", owned(&w[..n - 3])));
    }

    if n > 2 && ends_with_ci(w, "er") {
        out.push(owned(&w[..n - 2]));
    }
    if n > 3 && ends_with_ci(w, "est") {
        out.push(owned(&w[..n - 3]));
    }

    out
}
