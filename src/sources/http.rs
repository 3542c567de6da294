use crate::{Document, Entry, Source, SourceError};

/// A dictionary document served over HTTP.
pub struct Http {
    url: String,
}

impl Http {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Source for Http {
    fn name(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<Vec<Entry>, SourceError> {
        let response = ureq::get(&self.url)
            .call()
            .map_err(|err| SourceError::Fetch { name: self.name(), message: err.to_string() })?;

        let document: Document = serde_json::from_reader(response.into_reader())
            .map_err(|source| SourceError::Malformed { name: self.name(), source })?;

        Ok(document.words)
    }
}
