use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Http, JsonFile, Source};

/// Names a JSON config file.
pub const CONFIG_ENV: &str = "LUGHAT_CONFIG";

/// Replaces the configured sources with a single file path or URL.
pub const DICTIONARY_ENV: &str = "LUGHAT_DICTIONARY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    File { path: PathBuf },
    Http { url: String },
}

impl SourceConfig {
    /// Treats anything that looks like an http(s) URL as a remote source.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            SourceConfig::Http { url: value.into() }
        } else {
            SourceConfig::File { path: value.into() }
        }
    }

    pub fn to_source(&self) -> Arc<dyn Source> {
        match self {
            SourceConfig::File { path } => Arc::new(JsonFile::new(path.clone())),
            SourceConfig::Http { url } => Arc::new(Http::new(url.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Dictionary sources, merged in this order.
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,

    #[serde(default = "default_bookmarks_path")]
    pub bookmarks_path: PathBuf,

    /// Font with glyphs for the source script, added as a fallback font.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            bookmarks_path: default_bookmarks_path(),
            font_path: None,
        }
    }
}

impl Config {
    /// Reads `LUGHAT_CONFIG` and `LUGHAT_DICTIONARY` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config_path = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let dictionary = env::var(DICTIONARY_ENV).ok();

        Self::resolve(config_path.as_deref(), dictionary.as_deref())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let fp = File::open(path)
            .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;

        serde_json::from_reader(BufReader::new(fp))
            .map_err(|source| ConfigError::Malformed { path: path.to_owned(), source })
    }

    pub fn resolve(config_path: Option<&Path>, dictionary: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(dictionary) = dictionary.filter(|value| !value.is_empty()) {
            config.sources = vec![SourceConfig::parse(dictionary)];
        }

        Ok(config)
    }

    pub fn sources(&self) -> Vec<Arc<dyn Source>> {
        self.sources.iter().map(SourceConfig::to_source).collect()
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![SourceConfig::File { path: "dictionary.json".into() }]
}

fn default_bookmarks_path() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".local/share/lughat/bookmarks.json"),
        None => PathBuf::from("bookmarks.json"),
    }
}
