//! PhraseCheck Interface Definition
//!
//! Shared records and enums exchanged with callers: the page-fetch side hands
//! in `PageInput`, the reporting side receives `PageReport` / `BatchSummary`.
//! Everything here is plain data; the matching logic lives in `cascade` and
//! `phrase`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Page language. Selects the stemming algorithm for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    #[serde(alias = "uk")]
    Ua,
    En,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Ru, Language::Ua, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::Ua => "ua",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = PhraseCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "ua" | "uk" => Ok(Language::Ua),
            "en" => Ok(Language::En),
            other => Err(PhraseCheckError::InvalidInput(format!("unknown language: {other}"))),
        }
    }
}

/// How a phrase is checked against a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseKind {
    /// Normalized substring containment
    Exact,
    /// Word-by-word matching cascade
    Lsi,
}

/// Which cascade tier satisfied a query word.
///
/// Declaration order is precedence order: a word is reported at the first
/// tier that matches, never a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Lemma,
    StemExact,
    StemFuzzy,
    Truncation,
    None,
}

impl MatchTier {
    pub fn is_match(self) -> bool {
        self != MatchTier::None
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A single target phrase and how to check it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseQuery {
    pub text: String,
    pub kind: PhraseKind,
}

impl PhraseQuery {
    pub fn exact(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: PhraseKind::Exact }
    }

    pub fn lsi(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: PhraseKind::Lsi }
    }
}

/// Outcome of the cascade for one query word.
///
/// `lemmas`, `stem` and `truncated_prefix` are diagnostics: the forms the
/// cascade actually compared, suitable for a debug table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordMatchResult {
    pub word: String,
    pub matched_tier: MatchTier,
    /// Page lemma, stem or token that satisfied the match
    pub matched_against: Option<String>,
    /// Similarity 0–100, only for `StemFuzzy`
    pub fuzzy_score: Option<f64>,
    pub lemmas: Vec<String>,
    pub stem: Option<String>,
    pub truncated_prefix: Option<String>,
}

impl WordMatchResult {
    pub fn is_match(&self) -> bool {
        self.matched_tier.is_match()
    }
}

/// Outcome for one phrase against one page.
///
/// `found` is true iff the normalized phrase is non-empty and, for LSI
/// phrases, every word in `per_word_details` matched. For LSI phrases the
/// details stop at the first failing word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseMatchResult {
    pub phrase: String,
    pub kind: PhraseKind,
    pub normalized: String,
    pub found: bool,
    pub per_word_details: Vec<WordMatchResult>,
}

impl PhraseMatchResult {
    pub(crate) fn not_found(phrase: &str, kind: PhraseKind, normalized: String) -> Self {
        Self {
            phrase: phrase.to_string(),
            kind,
            normalized,
            found: false,
            per_word_details: Vec::new(),
        }
    }
}

/// One (URL, language) page as delivered by the page-fetch collaborator,
/// together with the expectations from the spreadsheet side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInput {
    pub url: String,
    pub language: Option<Language>,
    pub title: String,
    pub description: String,
    pub body: String,
    /// Set when the page could not be fetched; no phrases are checked then
    pub fetch_error: Option<String>,
    pub expected_title: Option<String>,
    pub expected_description: Option<String>,
    /// Comma/newline separated exact phrases
    pub exact_phrases: Option<String>,
    /// Comma/newline separated LSI phrases
    pub lsi_phrases: Option<String>,
}

impl PageInput {
    /// Searchable page text: title, meta description and body, one per line.
    pub fn full_text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.description, self.body)
    }

    pub fn language_or_default(&self) -> Language {
        self.language.unwrap_or(Language::Ru)
    }
}

/// Title/description comparison for a page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetaReport {
    pub title_match: bool,
    pub description_match: bool,
    /// 0–100, one decimal, between normalized page and expected values
    pub title_similarity: f64,
    pub description_similarity: f64,
}

/// All results for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub url: String,
    pub language: Language,
    pub load_error: Option<String>,
    pub meta: Option<MetaReport>,
    pub phrases: Vec<PhraseMatchResult>,
}

impl PageReport {
    pub fn has_issue(&self) -> bool {
        self.load_error.is_some()
            || self.meta.map_or(false, |m| !m.title_match || !m.description_match)
            || self.phrases.iter().any(|p| !p.found)
    }
}

/// Aggregate counters over a batch of page reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub pages: usize,
    pub load_errors: usize,
    pub title_mismatches: usize,
    pub description_mismatches: usize,
    pub pages_with_missing_phrases: usize,
    pub phrases_not_found: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[PageReport]) -> Self {
        reports.iter().fold(Self::default(), |mut acc, report| {
            acc.pages += 1;
            if report.load_error.is_some() {
                acc.load_errors += 1;
            }
            if let Some(meta) = report.meta {
                acc.title_mismatches += usize::from(!meta.title_match);
                acc.description_mismatches += usize::from(!meta.description_match);
            }
            let missing = report.phrases.iter().filter(|p| !p.found).count();
            if missing > 0 {
                acc.pages_with_missing_phrases += 1;
            }
            acc.phrases_not_found += missing;
            acc
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Rejected match settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("fuzzy ratio threshold must be within 0..=100, got {0}")]
    FuzzyThresholdOutOfRange(u8),
    #[error("truncation minimum final length must be at least 1")]
    ZeroMinFinalLength,
}

/// Error type for PhraseCheck operations
#[derive(Debug, Error)]
pub enum PhraseCheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] csv::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type PhraseCheckResult<T> = Result<T, PhraseCheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn lsi_result(found: bool) -> PhraseMatchResult {
        PhraseMatchResult {
            phrase: "x".into(),
            kind: PhraseKind::Lsi,
            normalized: "x".into(),
            found,
            per_word_details: Vec::new(),
        }
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("RU".parse::<Language>().unwrap(), Language::Ru);
        assert_eq!("uk".parse::<Language>().unwrap(), Language::Ua);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_tier_order_is_precedence() {
        assert!(MatchTier::Lemma < MatchTier::StemExact);
        assert!(MatchTier::StemExact < MatchTier::StemFuzzy);
        assert!(MatchTier::StemFuzzy < MatchTier::Truncation);
        assert!(!MatchTier::None.is_match());
    }

    #[test]
    fn test_full_text_joins_parts() {
        let page = PageInput {
            title: "Title".into(),
            description: "Desc".into(),
            body: "Body".into(),
            ..Default::default()
        };
        assert_eq!(page.full_text(), "Title\nDesc\nBody");
    }

    #[test]
    fn test_batch_summary_counts() {
        let reports = vec![
            PageReport {
                url: "a".into(),
                language: Language::Ru,
                load_error: Some("timeout".into()),
                meta: None,
                phrases: Vec::new(),
            },
            PageReport {
                url: "b".into(),
                language: Language::Ru,
                load_error: None,
                meta: Some(MetaReport {
                    title_match: false,
                    description_match: true,
                    title_similarity: 62.5,
                    description_similarity: 100.0,
                }),
                phrases: vec![lsi_result(true), lsi_result(false), lsi_result(false)],
            },
        ];
        let summary = BatchSummary::from_reports(&reports);
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.load_errors, 1);
        assert_eq!(summary.title_mismatches, 1);
        assert_eq!(summary.description_mismatches, 0);
        assert_eq!(summary.pages_with_missing_phrases, 1);
        assert_eq!(summary.phrases_not_found, 2);
        assert!(reports[0].has_issue());
        assert!(reports[1].has_issue());
    }
}
