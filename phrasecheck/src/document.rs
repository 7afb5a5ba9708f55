//! Page document with memoized derived state.
//!
//! Text fields are private and set only in `PageDocument::new`, so the
//! lemma and stem sets cached in `OnceLock`s always describe the current text.

use crate::lemma::{LemmaCache, Lemmatizer};
use crate::normalize::{is_alphanumeric_token, normalize_opt};
use crate::stem::{build_stem_set, WordStemmer};
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

/// The linguistic resources available for one page language.
/// Either may be missing; the tiers that need it are then skipped.
#[derive(Clone, Default)]
pub struct Linguistics {
    lemmas: Option<Arc<LemmaCache>>,
    stemmer: Option<Arc<dyn WordStemmer>>,
}

impl Linguistics {
    pub fn new(lemmas: Option<Arc<LemmaCache>>, stemmer: Option<Arc<dyn WordStemmer>>) -> Self {
        Self { lemmas, stemmer }
    }

    /// No lemmatizer, no stemmer: only truncation can match.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_lemmas(mut self, lemmas: Arc<LemmaCache>) -> Self {
        self.lemmas = Some(lemmas);
        self
    }

    pub fn with_stemmer(mut self, stemmer: Arc<dyn WordStemmer>) -> Self {
        self.stemmer = Some(stemmer);
        self
    }

    pub fn lemmas(&self) -> Option<&LemmaCache> {
        self.lemmas.as_deref()
    }

    pub fn stemmer(&self) -> Option<&dyn WordStemmer> {
        self.stemmer.as_deref()
    }
}

impl std::fmt::Debug for Linguistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linguistics")
            .field("lemmas", &self.lemmas)
            .field("stemmer", &self.stemmer.is_some())
            .finish()
    }
}

/// Lemma vocabulary of a normalized text: the bulk lemmatizer's output,
/// alphanumeric tokens only, lowercased.
pub fn primary_lemmas_of(normalized_text: &str, lemmatizer: &dyn Lemmatizer) -> BTreeSet<String> {
    if normalized_text.is_empty() {
        return BTreeSet::new();
    }
    lemmatizer
        .lemmatize_text(normalized_text)
        .into_iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| is_alphanumeric_token(l))
        .collect()
}

/// One fetched page in one language, built once and shared by reference
/// across every phrase checked against it.
///
/// `lemma_set()` and `stem_set()` are computed on first access and cached,
/// so pages that only carry exact phrases never pay for analysis.
#[derive(Debug)]
pub struct PageDocument {
    raw_text: String,
    normalized_text: String,
    linguistics: Linguistics,
    lemma_set: OnceLock<BTreeSet<String>>,
    stem_set: OnceLock<BTreeSet<String>>,
}

impl PageDocument {
    pub fn new(raw_text: Option<&str>, linguistics: Linguistics) -> Self {
        let raw_text = raw_text.unwrap_or_default().to_string();
        let normalized_text = normalize_opt(Some(&raw_text));
        Self {
            raw_text,
            normalized_text,
            linguistics,
            lemma_set: OnceLock::new(),
            stem_set: OnceLock::new(),
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    pub fn linguistics(&self) -> &Linguistics {
        &self.linguistics
    }

    /// True when the page delivered no text at all (e.g. fetch failure).
    pub fn is_absent(&self) -> bool {
        self.raw_text.trim().is_empty()
    }

    /// Primary lemmas of every page word. Empty without a lemmatizer.
    pub fn lemma_set(&self) -> &BTreeSet<String> {
        self.lemma_set.get_or_init(|| match self.linguistics.lemmas() {
            Some(cache) => {
                let lemmas = primary_lemmas_of(&self.normalized_text, cache.lemmatizer());
                tracing::debug!(lemmas = lemmas.len(), "built page lemma set");
                lemmas
            }
            None => BTreeSet::new(),
        })
    }

    /// Stems of every page word. Empty without a stemmer.
    pub fn stem_set(&self) -> &BTreeSet<String> {
        self.stem_set.get_or_init(|| match self.linguistics.stemmer() {
            Some(stemmer) => {
                let stems = build_stem_set(&self.normalized_text, stemmer);
                tracing::debug!(stems = stems.len(), "built page stem set");
                stems
            }
            None => BTreeSet::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::Language;
    use crate::lemma::DictionaryLemmatizer;
    use crate::stem::SnowballStemmer;

    fn linguistics() -> Linguistics {
        let dict = DictionaryLemmatizer::with_entries([("прокладок", "прокладка"), ("нічні", "нічний")]);
        Linguistics::none()
            .with_lemmas(Arc::new(LemmaCache::new(Arc::new(dict))))
            .with_stemmer(Arc::new(SnowballStemmer::new(Language::Ru)))
    }

    #[test]
    fn test_document_normalizes_once() {
        let doc = PageDocument::new(Some("Нічні   ПРОКЛАДОК, 50 грн"), linguistics());
        assert_eq!(doc.normalized_text(), "нічні прокладок");
        assert_eq!(doc.raw_text(), "Нічні   ПРОКЛАДОК, 50 грн");
        assert!(!doc.is_absent());
    }

    #[test]
    fn test_absent_text() {
        let doc = PageDocument::new(None, linguistics());
        assert!(doc.is_absent());
        assert!(doc.lemma_set().is_empty());
        assert!(doc.stem_set().is_empty());
    }

    #[test]
    fn test_lemma_set_uses_primary_lemmas() {
        let doc = PageDocument::new(Some("нічні прокладок аптека"), linguistics());
        let lemmas: Vec<&str> = doc.lemma_set().iter().map(String::as_str).collect();
        assert_eq!(lemmas, vec!["аптека", "нічний", "прокладка"]);
    }

    #[test]
    fn test_missing_resources_give_empty_sets() {
        let doc = PageDocument::new(Some("нічні прокладок"), Linguistics::none());
        assert!(doc.lemma_set().is_empty());
        assert!(doc.stem_set().is_empty());
    }

    #[test]
    fn test_sets_are_memoized() {
        let doc = PageDocument::new(Some("ночные прокладки"), linguistics());
        let first = doc.stem_set() as *const _;
        let second = doc.stem_set() as *const _;
        assert_eq!(first, second);
        assert!(doc.stem_set().contains("ночн"));
    }

    #[test]
    fn test_primary_lemmas_filters_artifacts() {
        let dict = DictionaryLemmatizer::with_entries([("нош", "но-шпа")]);
        let lemmas = primary_lemmas_of("нош таблетки", &dict);
        assert_eq!(lemmas.into_iter().collect::<Vec<_>>(), vec!["таблетки"]);
    }
}
