use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::query::fold;
use crate::{BookmarkError, Document, Entry};

/// Presentation order of resolved bookmarks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookmarkOrder {
    #[default]
    Newest,
    Oldest,
    Alphabetical,
}

impl BookmarkOrder {
    pub fn label(self) -> &'static str {
        match self {
            BookmarkOrder::Newest => "newest",
            BookmarkOrder::Oldest => "oldest",
            BookmarkOrder::Alphabetical => "alphabetical",
        }
    }

    pub fn next(self) -> Self {
        match self {
            BookmarkOrder::Newest => BookmarkOrder::Oldest,
            BookmarkOrder::Oldest => BookmarkOrder::Alphabetical,
            BookmarkOrder::Alphabetical => BookmarkOrder::Newest,
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
struct Persisted {
    ids: Vec<String>,
}

/// The set of bookmarked entry ids, oldest first.
#[derive(Debug, Default)]
pub struct BookmarkStore {
    ids: Vec<String>,
    path: Option<PathBuf>,
}

impl BookmarkStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store backed by `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BookmarkError> {
        let path = path.into();

        let persisted = match File::open(&path) {
            Ok(fp) => serde_json::from_reader(BufReader::new(fp))
                .map_err(|source| BookmarkError::Malformed { path: path.clone(), source })?,

            Err(err) if err.kind() == ErrorKind::NotFound => Persisted::default(),
            Err(source) => return Err(BookmarkError::Io { path, source }),
        };

        let ids = persisted.ids.into_iter().unique().collect_vec();
        info!("opened {} bookmarks from {:?}", ids.len(), path);

        Ok(Self { ids, path: Some(path) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the store back to its file. In-memory stores do nothing.
    pub fn save(&self) -> Result<(), BookmarkError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let io_err = |source: std::io::Error| BookmarkError::Io { path: path.to_owned(), source };

        let parent_dir = path.parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        fs::create_dir_all(parent_dir).map_err(io_err)?;

        let temp_file = NamedTempFile::new_in(parent_dir).map_err(io_err)?;

        let persisted = Persisted { ids: self.ids.clone() };
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer(&mut writer, &persisted)?;
        writer.flush().map_err(io_err)?;
        drop(writer);

        temp_file.persist(path).map_err(|err| io_err(err.error))?;
        Ok(())
    }

    /// Returns true if the id was not bookmarked before.
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }

        self.ids.push(id.to_owned());
        true
    }

    /// Returns true if the id was bookmarked before.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Flips the bookmark state of `id` and returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.add(id)
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Looks up the bookmarked entries in the collection. Ids that are no
    /// longer part of the collection are skipped.
    pub fn resolve<'a>(&self, entries: &'a [Entry], order: BookmarkOrder) -> Vec<&'a Entry> {
        let by_id: HashMap<&str, &Entry> = entries.iter()
            .map(|entry| (entry.id.as_str(), entry))
            .collect();

        let mut resolved = self.ids.iter()
            .filter_map(|id| {
                let entry = by_id.get(id.as_str()).copied();
                if entry.is_none() {
                    warn!("bookmarked entry {id:?} is not in the dictionary");
                }

                entry
            })
            .collect_vec();

        match order {
            BookmarkOrder::Oldest => {}
            BookmarkOrder::Newest => resolved.reverse(),
            BookmarkOrder::Alphabetical => resolved.sort_by(|lhs, rhs| lhs.word.cmp(&rhs.word)),
        }

        resolved
    }

    /// Writes the bookmarked entries, oldest first, as a dictionary document.
    pub fn export(&self, entries: &[Entry], writer: impl Write) -> Result<(), BookmarkError> {
        let document = Document {
            words: self.resolve(entries, BookmarkOrder::Oldest).into_iter().cloned().collect(),
        };

        serde_json::to_writer_pretty(writer, &document)?;
        Ok(())
    }
}

/// Narrows a bookmark list to entries whose headword or first definition
/// contains the term. An empty term keeps everything.
pub fn filter_bookmarks<'a>(bookmarked: &[&'a Entry], term: &str) -> Vec<&'a Entry> {
    if term.is_empty() {
        return bookmarked.to_vec();
    }

    let folded = fold(term);

    bookmarked.iter()
        .copied()
        .filter(|entry| {
            entry.word.contains(term)
                || entry.gloss().is_some_and(|gloss| fold(gloss).contains(&folded))
        })
        .collect()
}
