use std::collections::HashSet;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

pub use file::JsonFile;
pub use http::Http;

use crate::{Entry, SourceError};

mod file;
mod http;

/// On-disk and on-the-wire shape of a dictionary.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    pub words: Vec<Entry>,
}

pub trait Source: Send + Sync {
    /// Human readable name, used in logs and error messages.
    fn name(&self) -> String;

    /// Loads all entries this source provides.
    fn load(&self) -> Result<Vec<Entry>, SourceError>;
}

/// Loads all sources in parallel and concatenates their entries in the
/// order the sources were given. Fails on the first source that fails and
/// on any id that appears twice in the merged collection.
pub fn load_all(sources: &[Arc<dyn Source>]) -> Result<Vec<Entry>, SourceError> {
    use rayon::prelude::*;

    let loaded: Vec<_> = sources.par_iter()
        .map(|source| source.load().map(|entries| (source.name(), entries)))
        .collect();

    let loaded = loaded.into_iter().collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for (name, entries) in loaded {
        info!("loaded {} entries from {}", entries.len(), name);

        for entry in entries {
            if !seen.insert(entry.id.clone()) {
                return Err(SourceError::DuplicateId { id: entry.id, name });
            }

            merged.push(entry);
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::fixtures::entry;

    struct Fixed(&'static str, Vec<Entry>);

    impl Source for Fixed {
        fn name(&self) -> String {
            self.0.into()
        }

        fn load(&self) -> Result<Vec<Entry>, SourceError> {
            Ok(self.1.clone())
        }
    }

    struct Broken;

    impl Source for Broken {
        fn name(&self) -> String {
            "broken".into()
        }

        fn load(&self) -> Result<Vec<Entry>, SourceError> {
            Err(SourceError::Fetch { name: self.name(), message: "offline".into() })
        }
    }

    #[test]
    fn merges_sources_in_order() {
        let sources: Vec<Arc<dyn Source>> = vec![
            Arc::new(Fixed("main", vec![entry("1", "a", "a"), entry("2", "b", "b")])),
            Arc::new(Fixed("extra", vec![entry("3", "c", "c")])),
        ];

        let ids = load_all(&sources).unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect_vec();

        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn rejects_duplicate_ids_across_sources() {
        let sources: Vec<Arc<dyn Source>> = vec![
            Arc::new(Fixed("main", vec![entry("1", "a", "a")])),
            Arc::new(Fixed("extra", vec![entry("1", "b", "b")])),
        ];

        match load_all(&sources) {
            Err(SourceError::DuplicateId { id, name }) => {
                assert_eq!(id, "1");
                assert_eq!(name, "extra");
            }
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn fails_when_any_source_fails() {
        let sources: Vec<Arc<dyn Source>> = vec![
            Arc::new(Fixed("main", vec![entry("1", "a", "a")])),
            Arc::new(Broken),
        ];

        assert!(matches!(load_all(&sources), Err(SourceError::Fetch { .. })));
    }

    #[test]
    fn no_sources_is_an_empty_dictionary() {
        assert!(load_all(&[]).unwrap().is_empty());
    }
}
