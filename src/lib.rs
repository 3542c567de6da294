use serde::{Deserialize, Deserializer, Serialize};

pub use bookmarks::*;
pub use config::*;
pub use error::*;
pub use matchers::*;
pub use query::Needle;
pub use ranking::*;
pub use search::*;
pub use sources::*;

mod bookmarks;
mod config;
mod error;
mod matchers;
mod query;
mod ranking;
mod search;
mod sources;

/// A single dictionary record. Entries are loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier, unique across the whole collection.
    /// Bookmarks refer to entries by this value only.
    pub id: String,

    /// Headword in the source script.
    pub word: String,

    /// Romanized transliteration of the headword.
    pub roman: String,

    #[serde(default)]
    pub pronunciation: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub definitions: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub examples: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub synonyms: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl Entry {
    pub fn new(id: impl Into<String>, word: impl Into<String>, roman: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            roman: roman.into(),
            pronunciation: String::new(),
            definitions: Vec::new(),
            examples: Vec::new(),
            synonyms: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// The first definition, if any. Used as the short gloss in result lists.
    pub fn gloss(&self) -> Option<&str> {
        self.definitions.first().map(String::as_str)
    }
}

// an explicit `null` counts as absent, same as a missing key
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Applies a query against a collection of entries.
pub trait Matcher {
    /// Returns the entries matching the query. The order of the result is
    /// not part of the contract, callers that need a relevance order have
    /// to pass the result through [`rank`].
    fn matches<'a>(&self, query: &str, entries: &'a [Entry]) -> Vec<&'a Entry>;
}
