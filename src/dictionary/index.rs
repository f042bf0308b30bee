use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::dictionary::types::{normalize_key, word_count, DictionaryEntry};

/// Keys grouped for greedy longest-match scanning
///
/// Multi-word keys are bucketed by word count so a cursor only needs one
/// hash lookup per candidate length instead of a scan over every key. Keys
/// are unique after normalization, so a token run can match at most one key
/// of any given length and the tie order inside a bucket never changes the
/// outcome of a match.
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    /// All keys, descending word count, ties in first-insertion order
    ordered: Vec<String>,

    /// Multi-word keys (word count > 1) by word count
    phrases: BTreeMap<usize, HashMap<String, String>>,
}

impl MatchIndex {
    fn build(entries: &HashMap<String, String>, insertion_order: &[String]) -> Self {
        let mut ordered = insertion_order.to_vec();
        // Stable sort keeps table order among keys of equal length
        ordered.sort_by_key(|key| Reverse(word_count(key)));

        let mut phrases: BTreeMap<usize, HashMap<String, String>> = BTreeMap::new();
        for (key, filename) in entries {
            let words = word_count(key);
            if words > 1 {
                phrases
                    .entry(words)
                    .or_default()
                    .insert(key.clone(), filename.clone());
            }
        }

        Self { ordered, phrases }
    }

    /// Keys in scanning order
    pub fn keys(&self) -> &[String] {
        &self.ordered
    }

    /// Word counts of multi-word keys, longest first
    pub fn phrase_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.phrases.keys().rev().copied()
    }

    /// Longest multi-word phrase starting at `tokens[start]`
    ///
    /// `tokens` must already be uppercased. Returns the matched key, its
    /// filename and its word count.
    pub fn longest_phrase_at<'a>(
        &'a self,
        tokens: &[String],
        start: usize,
    ) -> Option<(&'a str, &'a str, usize)> {
        let remaining = tokens.len().saturating_sub(start);

        for len in self.phrase_lengths() {
            if len > remaining {
                continue;
            }

            let candidate = tokens[start..start + len].join(" ");
            if let Some((key, filename)) = self
                .phrases
                .get(&len)
                .and_then(|bucket| bucket.get_key_value(&candidate))
            {
                return Some((key.as_str(), filename.as_str(), len));
            }
        }

        None
    }
}

/// Immutable token/phrase to clip-filename table
///
/// Built once at startup and shared read-only (wrap in an `Arc` to use it from
/// several resolvers at once). There is no mutation API; reloading means
/// building a new `Dictionary` and swapping the `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, String>,
    index: MatchIndex,
}

impl Dictionary {
    /// Build from entries in table order; later entries overwrite earlier ones
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = DictionaryEntry>,
    {
        let mut map: HashMap<String, String> = HashMap::new();
        let mut insertion_order = Vec::new();

        for entry in entries {
            if !map.contains_key(&entry.key) {
                insertion_order.push(entry.key.clone());
            }
            map.insert(entry.key, entry.filename);
        }

        let index = MatchIndex::build(&map, &insertion_order);
        Self { entries: map, index }
    }

    /// Convenience constructor from raw `(key, filename)` pairs
    pub fn from_pairs<I, K, F>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, F)>,
        K: AsRef<str>,
        F: Into<String>,
    {
        Self::from_entries(
            pairs
                .into_iter()
                .filter_map(|(key, filename)| DictionaryEntry::new(key, filename)),
        )
    }

    /// Exact lookup; the key is normalized first
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = normalize_key(key)?;
        self.entries.get(&key).map(String::as_str)
    }

    pub fn index(&self) -> &MatchIndex {
        &self.index
    }

    pub fn keys(&self) -> &[String] {
        self.index.keys()
    }

    /// Word count of the longest key
    pub fn max_phrase_len(&self) -> usize {
        self.index.keys().first().map(|k| word_count(k)).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
