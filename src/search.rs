use itertools::Itertools;

use crate::{rank, Entry, FieldMatcher, Matcher, SuggestionMatcher};

/// Restricts a result list to one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn accepts(&self, entry: &Entry) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => entry.categories.contains(category),
        }
    }
}

/// How a result list is presented after ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Relevance,
    /// By headword.
    Word,
    /// By romanization.
    Roman,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Word => "word",
            SortOrder::Roman => "roman",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortOrder::Relevance => SortOrder::Word,
            SortOrder::Word => SortOrder::Roman,
            SortOrder::Roman => SortOrder::Relevance,
        }
    }
}

/// Matches and ranks the whole collection against the query.
pub fn search<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    let matches = FieldMatcher.matches(query, entries);
    rank(&matches, query)
}

/// Like [`search`], with a category filter and presentation order applied
/// on top of the ranked result.
pub fn search_with<'a>(
    entries: &'a [Entry],
    query: &str,
    filter: &CategoryFilter,
    order: SortOrder,
) -> Vec<&'a Entry> {
    let results = filter_by_category(search(entries, query), filter);
    sort_results(results, order)
}

/// Autocomplete candidates for a partially typed query.
pub fn suggest<'a>(entries: &'a [Entry], prefix: &str) -> Vec<&'a Entry> {
    SuggestionMatcher.matches(prefix, entries)
}

pub fn filter_by_category<'a>(results: Vec<&'a Entry>, filter: &CategoryFilter) -> Vec<&'a Entry> {
    results.into_iter()
        .filter(|entry| filter.accepts(entry))
        .collect()
}

pub fn sort_results(mut results: Vec<&Entry>, order: SortOrder) -> Vec<&Entry> {
    match order {
        SortOrder::Relevance => {}
        SortOrder::Word => results.sort_by(|lhs, rhs| lhs.word.cmp(&rhs.word)),
        SortOrder::Roman => results.sort_by(|lhs, rhs| lhs.roman.cmp(&rhs.roman)),
    }

    results
}

/// All distinct categories across the results, sorted.
pub fn categories_of(results: &[&Entry]) -> Vec<String> {
    results.iter()
        .flat_map(|entry| entry.categories.iter())
        .unique()
        .sorted()
        .cloned()
        .collect()
}

pub fn find_by_id<'a>(entries: &'a [Entry], id: &str) -> Option<&'a Entry> {
    entries.iter().find(|entry| entry.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dictionary, entry};

    fn ids(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn search_matches_then_ranks() {
        let dict = dictionary();

        assert_eq!(ids(&search(&dict, "ilm")), ["1"]);
        assert_eq!(ids(&search(&dict, "ishq")), ["2"]);
        assert!(search(&dict, "").is_empty());
        assert!(suggest(&dict, "").is_empty());
    }

    #[test]
    fn better_matches_come_first() {
        let dict = vec![
            Entry { tags: vec!["dil".into()], ..entry("1", "قلب", "qalb") },
            entry("2", "دل", "dil"),
        ];

        assert_eq!(ids(&search(&dict, "dil")), ["2", "1"]);
    }

    #[test]
    fn category_filter_keeps_relevance_order() {
        let dict = dictionary();

        let all = search_with(&dict, "noun", &CategoryFilter::All, SortOrder::Relevance);
        assert_eq!(ids(&all), ["1", "2"]);

        let emotion = CategoryFilter::Only("emotion".into());
        assert_eq!(ids(&search_with(&dict, "noun", &emotion, SortOrder::Relevance)), ["2"]);

        let missing = CategoryFilter::Only("sports".into());
        assert!(search_with(&dict, "noun", &missing, SortOrder::Relevance).is_empty());
    }

    #[test]
    fn alternate_orders() {
        let dict = vec![
            entry("1", "ب", "zabaan"),
            entry("2", "ا", "aab"),
            entry("3", "ج", "baab"),
        ];

        let by_word = search_with(&dict, "ab", &CategoryFilter::All, SortOrder::Word);
        assert_eq!(ids(&by_word), ["2", "1", "3"]);

        let by_roman = search_with(&dict, "ab", &CategoryFilter::All, SortOrder::Roman);
        assert_eq!(ids(&by_roman), ["2", "3", "1"]);
    }

    #[test]
    fn collects_sorted_unique_categories() {
        let dict = vec![
            Entry { categories: vec!["verb".into(), "common".into()], ..entry("1", "a", "a") },
            Entry { categories: vec!["common".into()], ..entry("2", "b", "b") },
        ];
        let results = dict.iter().collect::<Vec<_>>();

        assert_eq!(categories_of(&results), ["common", "verb"]);
    }

    #[test]
    fn finds_entries_by_id() {
        let dict = dictionary();

        assert_eq!(find_by_id(&dict, "2").map(|e| e.roman.as_str()), Some("ishq"));
        assert_eq!(find_by_id(&dict, "3"), None);
    }
}
