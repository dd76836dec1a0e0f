//! Full-text query tokenizing.

/// Splits a data-search query into the needles every article must contain.
///
/// Unescaped spaces separate needles. `\ ` is a literal space, `\\` a
/// backslash, `\t` and `\n` a tab and a newline; any other escaped
/// character stands for itself. A trailing lone backslash is dropped.
pub fn split_query(query: &str) -> Vec<String> {
    let mut needles = Vec::new();
    let mut current = String::new();
    let mut chars = query.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('t') => current.push('\t'),
                Some('n') => current.push('\n'),
                Some(other) => current.push(other),
                None => break,
            },
            ' ' => {
                if !current.is_empty() {
                    needles.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        needles.push(current);
    }
    needles
}
