use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::{Document, Entry, Source, SourceError};

/// A dictionary document stored on the local filesystem.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Source for JsonFile {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Entry>, SourceError> {
        let fp = File::open(&self.path)
            .map_err(|source| SourceError::Io { name: self.name(), source })?;

        let document: Document = serde_json::from_reader(BufReader::new(fp))
            .map_err(|source| SourceError::Malformed { name: self.name(), source })?;

        Ok(document.words)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::*;

    fn write(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_words_from_document() {
        let doc = json!({
            "words": [
                { "id": "1", "word": "علم", "roman": "ilm", "definitions": ["knowledge"] },
                { "id": "2", "word": "عشق", "roman": "ishq" },
            ]
        });
        let file = write(&doc.to_string());

        let entries = JsonFile::new(file.path()).load().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].definitions, ["knowledge"]);
        assert!(entries[1].tags.is_empty());
    }

    #[test]
    fn malformed_entry_fails_the_whole_file() {
        let doc = json!({
            "words": [
                { "id": "1", "word": "علم", "roman": "ilm" },
                { "word": "عشق", "roman": "ishq" },
            ]
        });
        let file = write(&doc.to_string());

        assert!(matches!(
            JsonFile::new(file.path()).load(),
            Err(SourceError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFile::new(dir.path().join("missing.json"));

        assert!(matches!(source.load(), Err(SourceError::Io { .. })));
    }
}
