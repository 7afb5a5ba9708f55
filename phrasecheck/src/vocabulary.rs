//! Vocabulary diff between two texts.
//!
//! Finds the Cyrillic lemmas a candidate text uses that a base text never
//! does, ranked by how often they occur in the candidate. Used to see which
//! words a competitor page covers that ours lacks.

use crate::lemma::Lemmatizer;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_DIFF_LIMIT: usize = 300;

static CYRILLIC_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[а-яА-ЯёЁ\-]+").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaFrequency {
    pub lemma: String,
    pub count: usize,
}

/// Primary lemma of every Cyrillic word in `text`, in text order.
fn cyrillic_lemmas<'a>(text: &'a str, lemmatizer: &'a dyn Lemmatizer) -> impl Iterator<Item = String> + 'a {
    CYRILLIC_WORD_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim_matches('-').to_lowercase())
        .filter(|w| !w.is_empty())
        .map(move |w| lemmatizer.analyze(&w).into_iter().next().unwrap_or(w))
}

/// Lemmas present in `candidate` but absent from `base`, most frequent first
/// (ties by lemma), at most `limit` entries.
pub fn unique_lemmas(base: &str, candidate: &str, lemmatizer: &dyn Lemmatizer, limit: usize) -> Vec<LemmaFrequency> {
    let base_lemmas: HashSet<String> = cyrillic_lemmas(base, lemmatizer).collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for lemma in cyrillic_lemmas(candidate, lemmatizer) {
        if !base_lemmas.contains(&lemma) {
            *counts.entry(lemma).or_default() += 1;
        }
    }

    let mut ranked: Vec<LemmaFrequency> = counts
        .into_iter()
        .map(|(lemma, count)| LemmaFrequency { lemma, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.lemma.cmp(&b.lemma)));
    ranked.truncate(limit);

    tracing::debug!(unique = ranked.len(), limit, "vocabulary diff computed");
    ranked
}
