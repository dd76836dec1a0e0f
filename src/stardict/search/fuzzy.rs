//! Bounded top-N collection of headwords close to a query.

use std::cmp::Ordering;

use crate::stardict::codec::distance::EditDistance;
use crate::stardict::utils::stardict_strcmp;

#[derive(Debug, Clone)]
struct Slot {
    word: Option<String>,
    distance: usize,
}

/// Keeps the `capacity` best headwords seen so far.
///
/// Each slot starts out empty at the distance bound. A qualifying candidate
/// replaces the last slot holding the current worst distance, and the bound
/// then tightens to the worst distance left in the set.
#[derive(Debug)]
pub struct FuzzyCollector {
    query: Vec<u8>,
    slots: Vec<Slot>,
    max_distance: usize,
    calc: EditDistance,
}

impl FuzzyCollector {
    pub fn new(query: &str, capacity: usize, max_distance: usize) -> Self {
        Self {
            query: query.to_ascii_lowercase().into_bytes(),
            slots: vec![Slot { word: None, distance: max_distance }; capacity],
            max_distance,
            calc: EditDistance::new(),
        }
    }

    /// Current exclusive bound on the distance of a new match.
    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// Scores `candidate` and keeps it if it beats the worst kept match.
    pub fn offer(&mut self, candidate: &str) {
        if self.slots.is_empty() || self.query.is_empty() {
            return;
        }
        let query_len = self.query.len();
        if candidate.len().abs_diff(query_len) >= self.max_distance {
            return;
        }

        let mut folded = candidate.to_ascii_lowercase().into_bytes();
        folded.truncate(query_len);
        let distance = self.calc.distance(&folded, &self.query, self.max_distance);
        if distance >= self.max_distance || distance >= query_len {
            return;
        }

        let mut replace_at = 0;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.word.as_deref() == Some(candidate) {
                return;
            }
            if slot.distance == self.max_distance {
                replace_at = i;
            }
        }
        self.slots[replace_at] = Slot {
            word: Some(candidate.to_string()),
            distance,
        };
        self.max_distance = self
            .slots
            .iter()
            .map(|slot| slot.distance)
            .fold(distance, usize::max);
    }

    /// Kept matches ordered by distance, then by headword order.
    pub fn finish(mut self) -> Vec<(String, usize)> {
        self.slots.sort_by(|a, b| match a.distance.cmp(&b.distance) {
            Ordering::Equal => match (&a.word, &b.word) {
                (Some(x), Some(y)) => stardict_strcmp(x, y),
                _ => Ordering::Equal,
            },
            other => other,
        });
        self.slots
            .into_iter()
            .filter_map(|slot| slot.word.map(|word| (word, slot.distance)))
            .collect()
    }
}
