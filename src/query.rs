/// A query prepared for matching: the raw text for source-script fields and
/// a case-folded copy for the romanized, definition and tag fields.
#[derive(Debug, Clone)]
pub struct Needle<'q> {
    raw: &'q str,
    folded: String,
}

impl<'q> Needle<'q> {
    pub fn new(raw: &'q str) -> Self {
        Self { raw, folded: fold(raw) }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn raw(&self) -> &'q str {
        self.raw
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Exact substring test, no folding. Used for `word` and `synonyms`.
    pub fn in_script(&self, haystack: &str) -> bool {
        haystack.contains(self.raw)
    }

    /// Case-insensitive substring test.
    pub fn in_folded(&self, haystack: &str) -> bool {
        fold(haystack).contains(&self.folded)
    }

    pub fn in_any_script(&self, haystacks: &[String]) -> bool {
        haystacks.iter().any(|value| self.in_script(value))
    }

    pub fn in_any_folded(&self, haystacks: &[String]) -> bool {
        haystacks.iter().any(|value| self.in_folded(value))
    }
}

pub fn fold(value: &str) -> String {
    value.to_lowercase()
}
