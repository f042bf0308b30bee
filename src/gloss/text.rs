use std::collections::HashSet;

/// Split a generated gloss string into uppercase tokens
pub fn split_gloss(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_uppercase).collect()
}

/// Rule-based gloss for plain text input
///
/// Keeps runs of ASCII letters, uppercases them and drops stopwords. This is
/// a plain word filter; it does not reorder or validate anything.
pub fn text_to_gloss<S: AsRef<str>>(text: &str, stopwords: &[S]) -> Vec<String> {
    let stopwords: HashSet<String> = stopwords
        .iter()
        .map(|s| s.as_ref().trim().to_uppercase())
        .collect();

    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| !word.is_empty())
        .map(str::to_uppercase)
        .filter(|word| !stopwords.contains(word))
        .collect()
}
