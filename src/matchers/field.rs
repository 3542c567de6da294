use crate::{Entry, Matcher, Needle};

/// The full search predicate: an entry matches if the query occurs in its
/// headword, romanization, any definition, any tag or any synonym.
pub struct FieldMatcher;

impl FieldMatcher {
    pub fn is_match(needle: &Needle, entry: &Entry) -> bool {
        needle.in_script(&entry.word)
            || needle.in_folded(&entry.roman)
            || needle.in_any_folded(&entry.definitions)
            || needle.in_any_folded(&entry.tags)
            || needle.in_any_script(&entry.synonyms)
    }
}

impl Matcher for FieldMatcher {
    fn matches<'a>(&self, query: &str, entries: &'a [Entry]) -> Vec<&'a Entry> {
        let needle = Needle::new(query);
        if needle.is_empty() {
            return Vec::new();
        }

        entries.iter()
            .filter(|entry| Self::is_match(&needle, entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::fixtures::{dictionary, entry};

    fn ids(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.id.clone()).collect_vec()
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(FieldMatcher.matches("", &dictionary()).is_empty());
    }

    #[test]
    fn matches_roman_case_insensitively() {
        let dict = dictionary();
        assert_eq!(ids(&FieldMatcher.matches("ilm", &dict)), ["1"]);
        assert_eq!(ids(&FieldMatcher.matches("ILM", &dict)), ["1"]);
    }

    #[test]
    fn matches_each_searched_field() {
        let dict = dictionary();

        // word
        assert_eq!(ids(&FieldMatcher.matches("عش", &dict)), ["2"]);
        // definition
        assert_eq!(ids(&FieldMatcher.matches("Knowledge", &dict)), ["1"]);
        // tag
        assert_eq!(ids(&FieldMatcher.matches("poet", &dict)), ["2"]);
        // synonym
        assert_eq!(ids(&FieldMatcher.matches("دان", &dict)), ["1"]);
        // shared tag
        assert_eq!(ids(&FieldMatcher.matches("noun", &dict)), ["1", "2"]);
    }

    #[test]
    fn categories_and_pronunciation_are_not_searched() {
        let mut dict = dictionary();
        dict[0].pronunciation = "il-m".into();

        assert!(FieldMatcher.matches("education", &dict).is_empty());
        assert!(FieldMatcher.matches("il-m", &dict).is_empty());
    }

    #[test]
    fn entry_with_empty_arrays_only_matches_on_word_and_roman() {
        let dict = vec![entry("9", "دل", "dil")];

        assert_eq!(ids(&FieldMatcher.matches("دل", &dict)), ["9"]);
        assert_eq!(ids(&FieldMatcher.matches("Dil", &dict)), ["9"]);
        assert!(FieldMatcher.matches("heart", &dict).is_empty());
    }

    #[test]
    fn removed_entries_are_never_returned() {
        let mut dict = dictionary();
        dict.retain(|e| e.id != "1");

        assert!(FieldMatcher.matches("noun", &dict).iter().all(|e| e.id != "1"));
        assert!(FieldMatcher.matches("ilm", &dict).is_empty());
    }
}
