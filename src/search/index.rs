//! N-gram token index
//!
//! Maps overlapping substrings of indexed text to the set of person IDs whose
//! text produced them, enabling substring lookup without a table scan.

use dashmap::DashMap;
use std::collections::HashSet;

/// Shortest n-gram emitted per word
pub const MIN_GRAM: usize = 1;
/// Longest n-gram emitted per word
pub const MAX_GRAM: usize = 20;

/// Token-level lookup from free-text query to candidate person IDs.
///
/// Internally synchronized; concurrent writers from the index writer task and
/// the startup rebuild are safe. Ownership of the structure stays here: the
/// person handlers only submit index/unindex requests.
pub struct SearchIndex {
    postings: DashMap<String, HashSet<i64>>,
    min_gram: usize,
    max_gram: usize,
}

impl SearchIndex {
    pub fn new(min_gram: usize, max_gram: usize) -> Self {
        Self {
            postings: DashMap::new(),
            min_gram,
            max_gram,
        }
    }

    /// Case-fold `text`, split it on whitespace and emit every n-gram of
    /// `min_gram..=max_gram` characters per word.
    fn tokens(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for word in text.to_lowercase().split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for n in self.min_gram..=self.max_gram.min(chars.len()) {
                for i in 0..=chars.len() - n {
                    tokens.push(chars[i..i + n].iter().collect());
                }
            }
        }
        tokens
    }

    /// Record `token -> id` for every token derived from `text`.
    /// Re-indexing the same pair is safe; postings are sets.
    pub fn index(&self, text: &str, id: i64) {
        for token in self.tokens(text) {
            self.postings.entry(token).or_default().insert(id);
        }
    }

    /// Remove the `id` association for every token derived from `text`.
    ///
    /// Callers must pass the exact text that was originally indexed, or stale
    /// associations remain.
    pub fn unindex(&self, text: &str, id: i64) {
        for token in self.tokens(text) {
            let emptied = match self.postings.get_mut(&token) {
                Some(mut ids) => {
                    ids.remove(&id);
                    ids.is_empty()
                }
                None => false,
            };
            // The guard above must be dropped before removing the entry.
            if emptied {
                self.postings.remove_if(&token, |_, ids| ids.is_empty());
            }
        }
    }

    /// Conjunctive query: case-fold, split on whitespace and intersect the
    /// postings of every term. Returns a flat, unordered ID set; no ranking.
    pub fn query(&self, text: &str) -> HashSet<i64> {
        let mut result: Option<HashSet<i64>> = None;

        for term in text.to_lowercase().split_whitespace() {
            let postings = match self.postings.get(term) {
                Some(ids) => ids.clone(),
                None => return HashSet::new(),
            };
            result = Some(match result {
                None => postings,
                Some(acc) => acc.intersection(&postings).copied().collect(),
            });
        }

        result.unwrap_or_default()
    }

    /// Number of distinct tokens currently held
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new(MIN_GRAM, MAX_GRAM)
    }
}
