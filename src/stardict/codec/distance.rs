//! Levenshtein edit distance.

/// Reusable edit-distance calculator.
///
/// Keeps one scratch row between calls so that scanning a whole dictionary
/// does not allocate per candidate.
#[derive(Debug, Default)]
pub struct EditDistance {
    row: Vec<usize>,
}

impl EditDistance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of insertions, deletions and substitutions turning `s` into `t`.
    ///
    /// `limit` is accepted for callers that prune candidates by length; the
    /// full distance is always computed.
    pub fn distance<T: PartialEq>(&mut self, s: &[T], t: &[T], _limit: usize) -> usize {
        if s.is_empty() {
            return t.len();
        }
        if t.is_empty() {
            return s.len();
        }

        self.row.clear();
        self.row.extend(0..=t.len());

        for (i, sc) in s.iter().enumerate() {
            let mut diagonal = self.row[0];
            self.row[0] = i + 1;
            for (j, tc) in t.iter().enumerate() {
                let above = self.row[j + 1];
                let cost = if sc == tc { 0 } else { 1 };
                self.row[j + 1] = (above + 1).min(self.row[j] + 1).min(diagonal + cost);
                diagonal = above;
            }
        }
        self.row[t.len()]
    }
}
