use serde::Deserialize;

/// Columns whose values become lookup keys, in the order they are applied
pub const KEY_COLUMNS: [&str; 3] = ["token", "phrase", "word"];

/// Column holding the clip location
pub const PATH_COLUMN: &str = "path";

/// One row of the dictionary table
///
/// Only `path` is required. Any of `token`, `phrase` and `word` may be absent
/// or blank; every non-blank one becomes a key for the same clip.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictionaryRow {
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub phrase: Option<String>,

    #[serde(default)]
    pub word: Option<String>,
}

impl DictionaryRow {
    /// Expand the row into its entries, in `token`, `phrase`, `word` order
    pub fn entries(&self) -> Vec<DictionaryEntry> {
        let Some(filename) = self.path.as_deref().and_then(clip_basename) else {
            return Vec::new();
        };

        [&self.token, &self.phrase, &self.word]
            .into_iter()
            .filter_map(|value| value.as_deref().and_then(normalize_key))
            .map(|key| DictionaryEntry { key, filename: filename.to_string() })
            .collect()
    }
}

/// A normalized key pointing at a clip filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub key: String,
    pub filename: String,
}

impl DictionaryEntry {
    pub fn new<K: AsRef<str>, F: Into<String>>(key: K, filename: F) -> Option<Self> {
        Some(Self {
            key: normalize_key(key.as_ref())?,
            filename: filename.into(),
        })
    }

    /// Number of whitespace-separated words in the key
    pub fn word_count(&self) -> usize {
        word_count(&self.key)
    }
}

/// Uppercase, trim and collapse inner whitespace; `None` for blank input
pub fn normalize_key(raw: &str) -> Option<String> {
    let words: Vec<String> = raw.split_whitespace().map(str::to_uppercase).collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

pub fn word_count(key: &str) -> usize {
    key.split_whitespace().count()
}

/// Final path component, accepting both `/` and `\` separators
pub fn clip_basename(path: &str) -> Option<&str> {
    let trimmed = path.trim();
    let name = trimmed.rsplit(|c: char| c == '/' || c == '\\').next()?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
