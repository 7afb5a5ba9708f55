//! Word matching cascade.
//!
//! A query word is checked against a page in four tiers, most precise first:
//!
//! 1. lemma: any candidate lemma of the word is a page lemma
//! 2. stem exact: the word's stem is a page stem
//! 3. stem fuzzy: best page stem similarity reaches the configured ratio
//! 4. truncation: a shortened prefix of the word starts some page word
//!
//! The first tier that matches wins; later, weaker heuristics only run when
//! every precise one failed.

use crate::config::MatchConfig;
use crate::document::PageDocument;
use crate::interface::{MatchTier, WordMatchResult};
use rapidfuzz::fuzz;
use std::collections::BTreeSet;

/// Indel similarity of two strings on a 0–100 scale:
/// `200 * lcs(a, b) / (len(a) + len(b))`, measured in chars.
/// Symmetric; two empty strings are identical (100).
pub fn fuzzy_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    let score = fuzz::ratio(a.chars(), b.chars()) * 100.0;
    // normalized similarity is 1 - dist/len; snap float noise off integer scores
    (score * SCORE_SCALE).round() / SCORE_SCALE
}

const SCORE_SCALE: f64 = 1e9;

/// Best-scoring candidate stem. Ties keep the first candidate seen in
/// iteration order, which for a `BTreeSet` is the lexicographically smallest.
fn best_fuzzy_stem<'a>(stem: &str, candidates: &'a BTreeSet<String>) -> Option<(&'a str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let score = fuzzy_ratio(stem, candidate);
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((candidate.as_str(), score));
        }
    }
    best
}

/// First whole token of normalized `text` that starts with `prefix`.
/// Normalized text is word characters separated by single spaces, so a
/// token boundary is a word boundary.
fn find_prefixed_word<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    text.split(' ').find(|token| token.starts_with(prefix))
}

/// Tier 4. Tries the longest viable prefix first: remove 1 char, then 2, …
/// up to the configured maximum, stopping once the prefix would fall below
/// the minimum final length.
fn match_truncated(word: &str, doc: &PageDocument, cfg: &MatchConfig) -> Option<(String, String)> {
    if !cfg.truncation_enabled() {
        return None;
    }
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < cfg.truncation_min_original_len() {
        return None;
    }
    for removed in 1..=cfg.truncation_max_chars_removed() {
        let Some(kept) = chars.len().checked_sub(removed) else { break };
        if kept < cfg.truncation_min_final_len() {
            break;
        }
        let prefix: String = chars[..kept].iter().collect();
        if let Some(token) = find_prefixed_word(doc.normalized_text(), &prefix) {
            return Some((prefix, token.to_string()));
        }
    }
    None
}

/// Run the cascade for one (already normalized) query word against a page.
pub fn match_word(word: &str, doc: &PageDocument, cfg: &MatchConfig) -> WordMatchResult {
    let mut result = WordMatchResult {
        word: word.to_string(),
        matched_tier: MatchTier::None,
        matched_against: None,
        fuzzy_score: None,
        lemmas: Vec::new(),
        stem: None,
        truncated_prefix: None,
    };
    if word.trim().is_empty() {
        return result;
    }

    let linguistics = doc.linguistics();

    // 1. Lemma
    if let Some(cache) = linguistics.lemmas() {
        let lemmas = cache.lemmas_of(word);
        result.lemmas = lemmas.iter().cloned().collect();
        let page_lemmas = doc.lemma_set();
        if let Some(hit) = lemmas.iter().find(|l| page_lemmas.contains(*l)) {
            result.matched_tier = MatchTier::Lemma;
            result.matched_against = Some(hit.clone());
            return trace_result(result);
        }
    }

    // 2, 3. Stem, exact then fuzzy
    if let Some(stem) = linguistics.stemmer().and_then(|s| s.stem_word(word)) {
        let page_stems = doc.stem_set();
        if page_stems.contains(&stem) {
            result.matched_tier = MatchTier::StemExact;
            result.matched_against = Some(stem.clone());
            result.stem = Some(stem);
            return trace_result(result);
        }
        if let Some((candidate, score)) = best_fuzzy_stem(&stem, page_stems) {
            if score >= f64::from(cfg.fuzzy_ratio_threshold()) {
                result.matched_tier = MatchTier::StemFuzzy;
                result.matched_against = Some(candidate.to_string());
                result.fuzzy_score = Some(score);
                result.stem = Some(stem);
                return trace_result(result);
            }
        }
        result.stem = Some(stem);
    }

    // 4. Truncation
    if let Some((prefix, token)) = match_truncated(word, doc, cfg) {
        result.matched_tier = MatchTier::Truncation;
        result.matched_against = Some(token);
        result.truncated_prefix = Some(prefix);
    }
    trace_result(result)
}

fn trace_result(result: WordMatchResult) -> WordMatchResult {
    tracing::trace!(
        word = %result.word,
        tier = ?result.matched_tier,
        against = ?result.matched_against,
        score = ?result.fuzzy_score,
        "word match"
    );
    result
}
