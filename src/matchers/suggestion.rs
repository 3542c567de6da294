use crate::{Entry, Matcher, Needle};

/// Upper bound on the number of suggestions returned per keystroke.
pub const SUGGESTION_LIMIT: usize = 5;

/// Autocomplete predicate. Narrower than [`super::FieldMatcher`]: only the
/// headword, romanization and synonyms are consulted, and the first
/// [`SUGGESTION_LIMIT`] hits in collection order are returned unranked.
pub struct SuggestionMatcher;

impl SuggestionMatcher {
    pub fn is_match(needle: &Needle, entry: &Entry) -> bool {
        needle.in_script(&entry.word)
            || needle.in_folded(&entry.roman)
            || needle.in_any_script(&entry.synonyms)
    }
}

impl Matcher for SuggestionMatcher {
    fn matches<'a>(&self, query: &str, entries: &'a [Entry]) -> Vec<&'a Entry> {
        let needle = Needle::new(query);
        if needle.is_empty() {
            return Vec::new();
        }

        entries.iter()
            .filter(|entry| Self::is_match(&needle, entry))
            .take(SUGGESTION_LIMIT)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dictionary, entry};

    #[test]
    fn empty_prefix_suggests_nothing() {
        assert!(SuggestionMatcher.matches("", &dictionary()).is_empty());
    }

    #[test]
    fn never_returns_more_than_the_limit_and_keeps_collection_order() {
        let dict = (0..12)
            .map(|idx| entry(&idx.to_string(), "کتاب", &format!("kitab{idx}")))
            .collect::<Vec<_>>();

        let suggestions = SuggestionMatcher.matches("KIT", &dict);
        let ids = suggestions.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();

        assert_eq!(ids, ["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn ignores_definitions_and_tags() {
        let dict = dictionary();

        assert!(SuggestionMatcher.matches("knowledge", &dict).is_empty());
        assert!(SuggestionMatcher.matches("poetic", &dict).is_empty());
    }

    #[test]
    fn every_suggestion_satisfies_the_predicate() {
        let dict = dictionary();

        for prefix in ["i", "ش", "دان", "Ish"] {
            let needle = Needle::new(prefix);
            for suggestion in SuggestionMatcher.matches(prefix, &dict) {
                assert!(SuggestionMatcher::is_match(&needle, suggestion));
            }
        }
    }
}
