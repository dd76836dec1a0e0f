//! Classification of user queries into search strategies.

/// A classified query and the text the chosen strategy operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Exact headword lookup.
    Simple(String),
    /// Edit-distance search; written with a leading `/`.
    Fuzzy(String),
    /// Whole-headword pattern; any query with an unescaped `*` or `?`.
    Regex(String),
    /// Full-text article search; written with a leading `|`.
    Data(String),
}

impl Query {
    /// Text passed to the selected strategy.
    pub fn text(&self) -> &str {
        match self {
            Query::Simple(s) | Query::Fuzzy(s) | Query::Regex(s) | Query::Data(s) => s,
        }
    }
}

/// Classifies `input`.
///
/// A `/` or `|` prefix selects fuzzy or data search and is stripped, leaving
/// the rest untouched. Otherwise backslashes are removed while the character
/// they escape is kept, and an unescaped `*` or `?` selects pattern search.
pub fn analyze_query(input: &str) -> Query {
    if let Some(rest) = input.strip_prefix('/') {
        return Query::Fuzzy(rest.to_string());
    }
    if let Some(rest) = input.strip_prefix('|') {
        return Query::Data(rest.to_string());
    }

    let mut text = String::with_capacity(input.len());
    let mut pattern = false;
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => text.push(escaped),
                None => break,
            },
            '*' | '?' => {
                pattern = true;
                text.push(c);
            }
            _ => text.push(c),
        }
    }

    if pattern {
        Query::Regex(text)
    } else {
        Query::Simple(text)
    }
}
