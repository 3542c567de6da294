use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read dictionary {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to fetch dictionary {name}: {message}")]
    Fetch { name: String, message: String },

    #[error("malformed dictionary {name}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate entry id {id:?} in dictionary {name}")]
    DuplicateId { id: String, name: String },
}

#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("bookmark store {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed bookmark store {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize bookmarks: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
