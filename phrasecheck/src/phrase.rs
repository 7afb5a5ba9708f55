//! Phrase evaluation: exact containment and word-by-word LSI matching.

use crate::cascade::match_word;
use crate::config::MatchConfig;
use crate::document::PageDocument;
use crate::interface::{PhraseKind, PhraseMatchResult, PhraseQuery};
use crate::normalize::{normalize, split_phrases};

/// True iff the normalized phrase is a non-empty substring of the page's
/// normalized text.
pub fn evaluate_exact_phrase(phrase: &str, doc: &PageDocument) -> bool {
    exact_result(phrase, doc).found
}

fn exact_result(phrase: &str, doc: &PageDocument) -> PhraseMatchResult {
    let normalized = normalize(phrase);
    let found = !normalized.is_empty() && doc.normalized_text().contains(&normalized);
    PhraseMatchResult {
        phrase: phrase.to_string(),
        kind: PhraseKind::Exact,
        normalized,
        found,
        per_word_details: Vec::new(),
    }
}

/// Match every word of the normalized phrase through the cascade, left to
/// right. Stops at the first unmatched word: the phrase already failed and
/// `per_word_details` ends with that word.
pub fn evaluate_lsi_phrase(phrase: &str, doc: &PageDocument, cfg: &MatchConfig) -> PhraseMatchResult {
    let normalized = normalize(phrase);
    if normalized.is_empty() {
        return PhraseMatchResult::not_found(phrase, PhraseKind::Lsi, normalized);
    }

    let mut per_word_details = Vec::new();
    let mut found = true;
    for word in normalized.split_whitespace() {
        let result = match_word(word, doc, cfg);
        let matched = result.is_match();
        per_word_details.push(result);
        if !matched {
            found = false;
            break;
        }
    }

    PhraseMatchResult {
        phrase: phrase.to_string(),
        kind: PhraseKind::Lsi,
        normalized,
        found,
        per_word_details,
    }
}

/// Dispatch a single query to the exact or LSI evaluator.
pub fn evaluate_phrase(query: &PhraseQuery, doc: &PageDocument, cfg: &MatchConfig) -> PhraseMatchResult {
    let result = match query.kind {
        PhraseKind::Exact => exact_result(&query.text, doc),
        PhraseKind::Lsi => evaluate_lsi_phrase(&query.text, doc, cfg),
    };
    tracing::debug!(
        phrase = %result.phrase,
        kind = ?result.kind,
        found = result.found,
        "phrase checked"
    );
    result
}

/// Evaluate a comma/newline separated phrase list in input order.
///
/// A page that delivered no text, or an absent/empty list, yields no
/// results. A page whose text normalizes to nothing reports every phrase as
/// not found.
pub fn evaluate_phrase_list(
    raw_list: Option<&str>,
    kind: PhraseKind,
    doc: &PageDocument,
    cfg: &MatchConfig,
) -> Vec<PhraseMatchResult> {
    if doc.is_absent() {
        return Vec::new();
    }
    split_phrases(raw_list)
        .into_iter()
        .map(|text| evaluate_phrase(&PhraseQuery { text, kind }, doc, cfg))
        .collect()
}
