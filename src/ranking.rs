//! Relevance scoring for matched entries.
//!
//! Every rule is evaluated independently and the points add up, so an exact
//! headword match also collects the prefix and substring bonuses
//! (100 + 50 + 30). Synonym, definition and tag bonuses are awarded once per
//! matching element.

use std::cmp::Reverse;

use itertools::Itertools;

use crate::query::fold;
use crate::{Entry, Needle};

pub const WORD_EXACT: u32 = 100;
pub const ROMAN_EXACT: u32 = 90;
pub const SYNONYM_EXACT: u32 = 80;
pub const WORD_PREFIX: u32 = 50;
pub const ROMAN_PREFIX: u32 = 40;
pub const WORD_CONTAINS: u32 = 30;
pub const ROMAN_CONTAINS: u32 = 20;
pub const SYNONYM_CONTAINS: u32 = 15;
pub const DEFINITION_CONTAINS: u32 = 10;
pub const TAG_CONTAINS: u32 = 5;

/// An entry paired with its score for one ranking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredEntry<'a> {
    pub entry: &'a Entry,
    pub score: u32,
}

/// Computes the relevance of `entry` for the given query.
pub fn score(entry: &Entry, needle: &Needle) -> u32 {
    let query = needle.raw();
    let folded_query = needle.folded();
    let roman = fold(&entry.roman);

    let mut score = 0;

    if entry.word == query {
        score += WORD_EXACT;
    }
    if roman == folded_query {
        score += ROMAN_EXACT;
    }
    if entry.word.starts_with(query) {
        score += WORD_PREFIX;
    }
    if roman.starts_with(folded_query) {
        score += ROMAN_PREFIX;
    }
    if entry.word.contains(query) {
        score += WORD_CONTAINS;
    }
    if roman.contains(folded_query) {
        score += ROMAN_CONTAINS;
    }

    for synonym in &entry.synonyms {
        if synonym == query {
            score += SYNONYM_EXACT;
        }
        if synonym.contains(query) {
            score += SYNONYM_CONTAINS;
        }
    }

    score += DEFINITION_CONTAINS * count(&entry.definitions, |def| needle.in_folded(def));
    score += TAG_CONTAINS * count(&entry.tags, |tag| needle.in_folded(tag));

    score
}

fn count(values: &[String], pred: impl Fn(&str) -> bool) -> u32 {
    values.iter().filter(|value| pred(value)).count() as u32
}

/// Scores every entry and orders them by descending score. Entries with the
/// same score keep their input order.
pub fn rank_scored<'a>(matches: &[&'a Entry], query: &str) -> Vec<ScoredEntry<'a>> {
    let needle = Needle::new(query);

    matches.iter()
        .map(|&entry| ScoredEntry { entry, score: score(entry, &needle) })
        .sorted_by_key(|scored| Reverse(scored.score))
        .collect()
}

/// Like [`rank_scored`], but drops the scores.
pub fn rank<'a>(matches: &[&'a Entry], query: &str) -> Vec<&'a Entry> {
    rank_scored(matches, query)
        .into_iter()
        .map(|scored| scored.entry)
        .collect()
}
