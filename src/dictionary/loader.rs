use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::dictionary::index::Dictionary;
use crate::dictionary::types::{DictionaryRow, KEY_COLUMNS, PATH_COLUMN};
use crate::error::{DictionaryError, Result};

/// Reads the dictionary table from CSV
pub struct DictionaryLoader;

impl DictionaryLoader {
    /// Load the table at `path` and build the dictionary
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dictionary> {
        let path = path.as_ref();
        let source = path.display().to_string();

        let file = std::fs::File::open(path).map_err(|e| DictionaryError::LoadFailed {
            path: source.clone(),
            reason: e.to_string(),
        })?;

        let dictionary = Self::from_reader(file, &source)?;
        info!("Loaded {} dictionary keys from {}", dictionary.len(), source);
        Ok(dictionary)
    }

    /// Build the dictionary from any CSV byte source
    ///
    /// `source` only names the input in errors and logs.
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Dictionary> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| DictionaryError::ParseFailed {
                path: source.to_string(),
                reason: e.to_string(),
            })?
            .clone();

        if !headers.iter().any(|h| h == PATH_COLUMN) {
            return Err(DictionaryError::MissingColumn {
                path: source.to_string(),
                column: PATH_COLUMN.to_string(),
            }
            .into());
        }

        let key_columns: Vec<&str> = KEY_COLUMNS
            .iter()
            .copied()
            .filter(|col| headers.iter().any(|h| h == *col))
            .collect();
        debug!("Key columns present in {}: {:?}", source, key_columns);

        let mut entries = Vec::new();
        let mut rows = 0usize;
        let mut empty_rows = 0usize;

        for record in reader.deserialize::<DictionaryRow>() {
            let row = record.map_err(|e| DictionaryError::ParseFailed {
                path: source.to_string(),
                reason: e.to_string(),
            })?;
            rows += 1;

            let row_entries = row.entries();
            if row_entries.is_empty() {
                empty_rows += 1;
                debug!("Row {} contributes no keys (path: {:?})", rows, row.path);
            }
            entries.extend(row_entries);
        }

        debug!("Read {} rows from {} ({} without keys)", rows, source, empty_rows);
        Ok(Dictionary::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlossError;
    use tempfile::tempdir;

    fn load_str(csv: &str) -> Result<Dictionary> {
        DictionaryLoader::from_reader(csv.as_bytes(), "inline")
    }

    #[test]
    fn test_load_all_key_columns() {
        let dict = load_str(
            "path,token,phrase,word\n\
             clips/hello.mp4,hello,,hi\n\
             clips/thank_you.mp4,,thank you,\n",
        )
        .unwrap();

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.get("HELLO"), Some("hello.mp4"));
        assert_eq!(dict.get("HI"), Some("hello.mp4"));
        assert_eq!(dict.get("THANK YOU"), Some("thank_you.mp4"));
    }

    #[test]
    fn test_later_row_wins() {
        let dict = load_str(
            "path,token\n\
             a/hello_old.mp4,HELLO\n\
             b/hello_new.mp4,HELLO\n",
        )
        .unwrap();

        assert_eq!(dict.get("HELLO"), Some("hello_new.mp4"));
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let dict = load_str("word,path,notes\nbook,x/book.mp4,some text\n").unwrap();
        assert_eq!(dict.get("BOOK"), Some("book.mp4"));
    }

    #[test]
    fn test_blank_rows_are_not_errors() {
        let dict = load_str("path,token,phrase,word\nx/empty.mp4,,,\n,ORPHAN,,\n").unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn test_missing_path_column() {
        let err = load_str("token,word\nHELLO,HI\n").unwrap_err();
        assert!(matches!(
            err,
            GlossError::Dictionary(DictionaryError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let err = load_str("path,token\na.mp4,A,extra\n").unwrap_err();
        assert!(matches!(
            err,
            GlossError::Dictionary(DictionaryError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("index.csv");
        std::fs::write(&table, "path,phrase\nd/good_morning.mp4,good morning\n").unwrap();

        let dict = DictionaryLoader::load(&table).unwrap();
        assert_eq!(dict.get("good morning"), Some("good_morning.mp4"));
    }

    #[test]
    fn test_unreadable_table() {
        let dir = tempdir().unwrap();
        let err = DictionaryLoader::load(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(
            err,
            GlossError::Dictionary(DictionaryError::LoadFailed { .. })
        ));
    }
}
