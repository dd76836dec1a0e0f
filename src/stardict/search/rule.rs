//! Whole-headword pattern matching.

use log::debug;
use regex::{Regex, RegexBuilder};

/// Compiles `pattern` to match entire headwords, ignoring case.
///
/// Returns `None` when the pattern is not a valid regular expression.
pub fn compile(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(&format!("^(?:{})$", pattern))
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            debug!("Rejecting pattern '{}': {}", pattern, e);
            None
        }
    }
}
